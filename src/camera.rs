pub const SCREEN_MARGIN: f32 = 12.0;
pub const MIN_TILE_PX: f32 = 20.0;

// Whole-pixel tiles, board centered in the window
pub struct Camera {
    pub screen_w: f32,
    pub screen_h: f32,
    // screen px per world px
    pub zoom: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    board: (usize, usize, f32),
}

impl Camera {
    pub fn new(width: f32, height: f32) -> Self {
        let mut camera = Camera {
            screen_w: 1.0,
            screen_h: 1.0,
            zoom: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            board: (1, 1, 1.0),
        };
        camera.on_resize(width, height);
        camera
    }

    // Ignores sizes that are not finite and positive, keeping the previous fit.
    pub fn on_resize(&mut self, w: f32, h: f32) {
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            log::warn!("ignoring screen size {w}x{h}");
            return;
        }
        self.screen_w = w;
        self.screen_h = h;
        self.refit();
    }

    pub fn fit_board(&mut self, cols: usize, rows: usize, world_tile: f32) {
        if cols == 0 || rows == 0 || !(world_tile.is_finite() && world_tile > 0.0) {
            return;
        }
        self.board = (cols, rows, world_tile);
        self.refit();
    }

    pub fn tile_px(&self) -> f32 {
        self.board.2 * self.zoom
    }

    fn refit(&mut self) {
        let (cols, rows, world_tile) = self.board;
        let tile_px = ((self.screen_w - 2.0 * SCREEN_MARGIN) / cols as f32)
            .min((self.screen_h - 2.0 * SCREEN_MARGIN) / rows as f32)
            .floor()
            .max(MIN_TILE_PX);

        self.zoom = tile_px / world_tile;
        self.offset_x = ((self.screen_w - cols as f32 * tile_px) * 0.5).round();
        self.offset_y = ((self.screen_h - rows as f32 * tile_px) * 0.5).round();
    }

    pub fn world_to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.zoom + self.offset_x, y * self.zoom + self.offset_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_keeps_margin_and_centers() {
        let mut camera = Camera::new(1024.0, 768.0);
        camera.fit_board(13, 9, 64.0);

        // min((1024-24)/13, (768-24)/9) = min(76.9, 82.6) -> 76
        assert_eq!(camera.tile_px(), 76.0);
        let (left, top) = camera.world_to_screen(0.0, 0.0);
        let (right, bottom) = camera.world_to_screen(13.0 * 64.0, 9.0 * 64.0);
        assert!(left >= SCREEN_MARGIN && right <= 1024.0 - SCREEN_MARGIN);
        assert!(top >= SCREEN_MARGIN && bottom <= 768.0 - SCREEN_MARGIN);
        assert!(((left + right) * 0.5 - 512.0).abs() <= 1.0);
    }

    #[test]
    fn test_tiny_window_uses_minimum_tile() {
        let mut camera = Camera::new(100.0, 80.0);
        camera.fit_board(13, 9, 64.0);
        assert_eq!(camera.tile_px(), MIN_TILE_PX);
    }

    #[test]
    fn test_bad_resize_is_ignored() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.fit_board(13, 9, 64.0);
        let zoom = camera.zoom;

        camera.on_resize(0.0, 600.0);
        camera.on_resize(f32::NAN, 600.0);
        camera.on_resize(800.0, f32::INFINITY);
        assert_eq!(camera.zoom, zoom);
        assert_eq!(camera.screen_w, 800.0);
    }
}
