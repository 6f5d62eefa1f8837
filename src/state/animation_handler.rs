pub struct AnimationHandler {
    elapsed: f32,
    fps: f32,
}

impl AnimationHandler {
    pub fn new(fps: f32) -> Self {
        AnimationHandler { elapsed: 0.0, fps }
    }

    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn frame_index(&self, frame_count: usize) -> usize {
        if frame_count == 0 {
            return 0;
        }
        let frame = (self.elapsed * self.fps).floor();
        if !frame.is_finite() || frame < 0.0 {
            return 0;
        }
        frame as usize % frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_index_wraps() {
        let mut handler = AnimationHandler::new(12.0);
        assert_eq!(handler.frame_index(4), 0);

        handler.advance(1.0 / 12.0 + 0.001);
        assert_eq!(handler.frame_index(4), 1);

        handler.advance(3.0 / 12.0);
        assert_eq!(handler.frame_index(4), 0);
        assert_eq!(handler.frame_index(0), 0);
    }

    #[test]
    fn test_ignores_bad_dt() {
        let mut handler = AnimationHandler::new(12.0);
        handler.advance(f32::NAN);
        handler.advance(-1.0);
        assert_eq!(handler.elapsed(), 0.0);
    }
}
