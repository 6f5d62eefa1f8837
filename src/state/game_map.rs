use super::common::{BoundingBox, GridPos};

#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub enum Tile {
    Empty = 0,
    Solid = 1,
    Hazard = 2,
    Goal = 3,
    HiddenHazard = 4,
    Platform = 5,
    HiddenGoal = 6,
    WalkerSpawn = 7,
}

impl Tile {
    pub fn from_code(code: u8) -> Option<Tile> {
        match code {
            0 => Some(Tile::Empty),
            1 => Some(Tile::Solid),
            2 => Some(Tile::Hazard),
            3 => Some(Tile::Goal),
            4 => Some(Tile::HiddenHazard),
            5 => Some(Tile::Platform),
            6 => Some(Tile::HiddenGoal),
            7 => Some(Tile::WalkerSpawn),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Solid)
    }

    pub fn is_hazard(self) -> bool {
        matches!(self, Tile::Hazard | Tile::HiddenHazard)
    }

    pub fn is_goal(self) -> bool {
        matches!(self, Tile::Goal | Tile::HiddenGoal)
    }

    pub fn is_visible(self) -> bool {
        !matches!(
            self,
            Tile::Empty | Tile::HiddenHazard | Tile::HiddenGoal | Tile::WalkerSpawn
        )
    }
}

// The level's tile grid. Anything outside `[0, cols) x [0, rows)` reads as solid.
#[derive(Clone, Debug)]
pub struct GameMap {
    tiles: Vec<Tile>,
    cols: usize,
    rows: usize,
    tile_size: f32,
}

impl GameMap {
    pub fn new_empty(cols: usize, rows: usize, tile_size: f32) -> GameMap {
        GameMap {
            tiles: vec![Tile::Empty; cols * rows],
            cols,
            rows,
            tile_size,
        }
    }

    pub fn from_rows(rows: &[Vec<Tile>], tile_size: f32) -> GameMap {
        let cols = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut map = GameMap::new_empty(cols, rows.len(), tile_size);
        for (row, line) in rows.iter().enumerate() {
            for (col, tile) in line.iter().enumerate() {
                map.tiles[col + cols * row] = *tile;
            }
        }
        map
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn width(&self) -> f32 {
        self.cols as f32 * self.tile_size
    }

    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    pub fn tile_at_index(&self, col: i32, row: i32) -> Tile {
        if col < 0 || row < 0 || col as usize >= self.cols || row as usize >= self.rows {
            return Tile::Solid;
        }
        self.tiles[col as usize + self.cols * row as usize]
    }

    pub fn tile_at(&self, px: f32, py: f32) -> Tile {
        if !px.is_finite() || !py.is_finite() {
            return Tile::Solid;
        }
        let col = (px / self.tile_size).floor();
        let row = (py / self.tile_size).floor();
        // f32 -> i32 saturates, huge coordinates still land out of bounds
        self.tile_at_index(col as i32, row as i32)
    }

    pub fn is_solid_at(&self, px: f32, py: f32) -> bool {
        self.tile_at(px, py).is_solid()
    }

    pub fn set(&mut self, pos: GridPos, tile: Tile) {
        if pos.col < self.cols && pos.row < self.rows {
            self.tiles[pos.col + self.cols * pos.row] = tile;
        }
    }

    pub fn tile_rect(&self, pos: GridPos) -> BoundingBox {
        BoundingBox::new(
            pos.col as f32 * self.tile_size,
            pos.row as f32 * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    pub fn tiles_overlapping(&self, bb: &BoundingBox) -> Vec<(GridPos, Tile)> {
        let mut result = Vec::new();
        if !bb.is_sane() || self.cols == 0 || self.rows == 0 {
            return result;
        }

        let first_col = (bb.x / self.tile_size).floor().max(0.0) as usize;
        let first_row = (bb.y / self.tile_size).floor().max(0.0) as usize;
        let last_col = ((bb.x + bb.w) / self.tile_size).floor().max(0.0) as usize;
        let last_row = ((bb.y + bb.h) / self.tile_size).floor().max(0.0) as usize;

        for row in first_row..=last_row.min(self.rows - 1) {
            for col in first_col..=last_col.min(self.cols - 1) {
                let pos = GridPos::new(row, col);
                if self.tile_rect(pos).overlaps(bb) {
                    result.push((pos, self.tiles[col + self.cols * row]));
                }
            }
        }
        result
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridPos, Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, tile)| (GridPos::new(i / self.cols, i % self.cols), *tile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_from_codes(codes: &[&[u8]]) -> GameMap {
        let rows: Vec<Vec<Tile>> = codes
            .iter()
            .map(|r| r.iter().map(|c| Tile::from_code(*c).unwrap()).collect())
            .collect();
        GameMap::from_rows(&rows, 10.0)
    }

    #[test]
    fn test_out_of_bounds_is_solid() {
        let map = map_from_codes(&[&[0, 0, 0], &[0, 2, 0]]);

        assert_eq!(map.tile_at_index(-1, 0), Tile::Solid);
        assert_eq!(map.tile_at_index(0, -1), Tile::Solid);
        assert_eq!(map.tile_at_index(3, 0), Tile::Solid);
        assert_eq!(map.tile_at_index(0, 2), Tile::Solid);
        assert_eq!(map.tile_at(-0.1, 5.0), Tile::Solid);
        assert_eq!(map.tile_at(30.0, 5.0), Tile::Solid);
        assert_eq!(map.tile_at(1.0e12, 5.0), Tile::Solid);
        assert_eq!(map.tile_at(f32::NAN, 5.0), Tile::Solid);
    }

    #[test]
    fn test_out_of_bounds_on_single_cell_grid() {
        let map = map_from_codes(&[&[0]]);

        assert_eq!(map.tile_at(5.0, 5.0), Tile::Empty);
        for (col, row) in [(-1, 0), (1, 0), (0, -1), (0, 1), (-1, -1), (1, 1)] {
            assert_eq!(map.tile_at_index(col, row), Tile::Solid);
        }
    }

    #[test]
    fn test_tile_at_floor_divides_pixels() {
        let map = map_from_codes(&[&[0, 0, 0], &[0, 2, 3]]);

        assert_eq!(map.tile_at(10.0, 10.0), Tile::Hazard);
        assert_eq!(map.tile_at(19.99, 19.99), Tile::Hazard);
        assert_eq!(map.tile_at(20.0, 10.0), Tile::Goal);
        assert_eq!(map.tile_at(9.99, 10.0), Tile::Empty);
    }

    #[test]
    fn test_predicates() {
        let solid: Vec<u8> = (0..=7).filter(|c| Tile::from_code(*c).unwrap().is_solid()).collect();
        let hazard: Vec<u8> = (0..=7).filter(|c| Tile::from_code(*c).unwrap().is_hazard()).collect();
        let goal: Vec<u8> = (0..=7).filter(|c| Tile::from_code(*c).unwrap().is_goal()).collect();

        assert_eq!(solid, vec![1]);
        assert_eq!(hazard, vec![2, 4]);
        assert_eq!(goal, vec![3, 6]);
        assert!(!Tile::HiddenHazard.is_visible());
        assert!(Tile::Platform.is_visible());
        assert_eq!(Tile::from_code(8), None);
    }

    #[test]
    fn test_tiles_overlapping() {
        let map = map_from_codes(&[&[0, 0, 0], &[0, 2, 3]]);

        let bb = BoundingBox::new(12.0, 12.0, 10.0, 5.0);
        let hits: Vec<Tile> = map.tiles_overlapping(&bb).into_iter().map(|(_, t)| t).collect();
        assert_eq!(hits, vec![Tile::Hazard, Tile::Goal]);

        // Flush against the cell edge does not count
        let bb = BoundingBox::new(0.0, 10.0, 10.0, 10.0);
        let hits: Vec<Tile> = map.tiles_overlapping(&bb).into_iter().map(|(_, t)| t).collect();
        assert_eq!(hits, vec![Tile::Empty]);
    }
}
