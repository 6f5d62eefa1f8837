use crate::state::common::{BoundingBox, Dir, GridPos};
use crate::state::game_map::GameMap;

// Never falls. Turns around at walls and ledges
#[derive(Clone, Debug)]
pub struct Walker {
    pub bb: BoundingBox,
    pub dir: Dir,
    pub speed: f32,
}

impl Walker {
    // Feet on the first solid tile at or below the marker, or the grid bottom
    pub fn spawn(map: &GameMap, marker: GridPos, size: (f32, f32), speed: f32) -> Walker {
        let tile = map.tile_size();
        let (w, h) = size;

        let ground_row = (marker.row..map.rows())
            .find(|row| map.tile_at_index(marker.col as i32, *row as i32).is_solid())
            .unwrap_or(map.rows());

        let x = marker.col as f32 * tile + (tile - w) * 0.5;
        let y = ground_row as f32 * tile - h;

        Walker {
            bb: BoundingBox::new(x, y, w, h),
            dir: Dir::Right,
            speed,
        }
    }

    pub fn update(&mut self, map: &GameMap, dt: f32) {
        let step = self.speed * dt;
        if !step.is_finite() || step <= 0.0 {
            return;
        }

        let lead_x = match self.dir {
            Dir::Right => self.bb.x + self.bb.w + step,
            Dir::Left => self.bb.x - step,
        };

        let wall_ahead = map.is_solid_at(lead_x, self.bb.y + 1.0)
            || map.is_solid_at(lead_x, self.bb.y + self.bb.h - 1.0);
        let ground_ahead = map.is_solid_at(lead_x, self.bb.y + self.bb.h + 1.0);

        if wall_ahead || !ground_ahead {
            self.dir = self.dir.flipped();
            self.bb.vx = 0.0;
        } else {
            self.bb.vx = self.dir.sign() * self.speed;
            self.bb.x += self.dir.sign() * step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Tile;

    const T: f32 = 64.0;
    const DT: f32 = 1.0 / 60.0;

    // Floor on row 5 from col 2 to col 8, wall at col 9 on row 4, pit elsewhere.
    fn ledge_map() -> GameMap {
        let mut rows = vec![vec![Tile::Empty; 12]; 7];
        for col in 2..=8 {
            rows[5][col] = Tile::Solid;
        }
        rows[4][9] = Tile::Solid;
        rows[5][9] = Tile::Solid;
        GameMap::from_rows(&rows, T)
    }

    #[test]
    fn test_spawn_rests_on_ground_below_marker() {
        let map = ledge_map();
        let walker = Walker::spawn(&map, GridPos::new(1, 4), (0.7 * T, 0.5 * T), 90.0);

        assert!((walker.bb.y + walker.bb.h - 5.0 * T).abs() < 1e-4);
        assert!((walker.bb.center().x - 4.5 * T).abs() < 1e-4);
    }

    #[test]
    fn test_spawn_without_ground_uses_grid_bottom() {
        let map = ledge_map();
        let walker = Walker::spawn(&map, GridPos::new(0, 0), (0.7 * T, 0.5 * T), 90.0);

        assert!((walker.bb.y + walker.bb.h - 7.0 * T).abs() < 1e-4);
    }

    #[test]
    fn test_turns_at_wall() {
        let map = ledge_map();
        let mut walker = Walker::spawn(&map, GridPos::new(4, 8), (0.7 * T, 0.5 * T), 90.0);
        // Put the leading edge right before the wall at col 9
        walker.bb.x = 9.0 * T - walker.bb.w - 0.5;

        walker.update(&map, DT);

        assert_eq!(walker.dir, Dir::Left);
        assert!(walker.bb.x + walker.bb.w < 9.0 * T);
    }

    #[test]
    fn test_turns_at_ledge() {
        let map = ledge_map();
        let mut walker = Walker::spawn(&map, GridPos::new(4, 2), (0.7 * T, 0.5 * T), 90.0);
        walker.dir = Dir::Left;
        walker.bb.x = 2.0 * T + 0.5;

        walker.update(&map, DT);

        assert_eq!(walker.dir, Dir::Right);
        assert_eq!(walker.bb.x, 2.0 * T + 0.5);
    }

    #[test]
    fn test_patrol_stays_on_platform() {
        let map = ledge_map();
        let mut walker = Walker::spawn(&map, GridPos::new(4, 5), (0.7 * T, 0.5 * T), 240.0);
        let mut turns = 0;
        let mut last_dir = walker.dir;

        for _ in 0..2000 {
            walker.update(&map, DT);
            if walker.dir != last_dir {
                turns += 1;
                last_dir = walker.dir;
            }

            let left = walker.bb.x;
            let right = walker.bb.x + walker.bb.w;
            assert!(left >= 2.0 * T, "walked off the left ledge: {left}");
            assert!(right <= 9.0 * T, "walked into the wall: {right}");
            let feet = walker.bb.y + walker.bb.h + 1.0;
            assert!(map.is_solid_at(left, feet) && map.is_solid_at(right, feet));
            assert!(!map.is_solid_at(right, walker.bb.y + 1.0));
        }
        assert!(turns > 4);
    }
}
