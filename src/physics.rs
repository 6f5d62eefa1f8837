use crate::state::{BoundingBox, GameMap};

// Gap left between a snapped rect and the tile it hit
pub const RESOLVE_EPSILON: f32 = 0.01;

const PROBE_INSET: f32 = 1.0;

pub struct KinematicResult {
    // vx/vy: displacement actually applied, zeroed on a blocked axis
    pub new_bb: BoundingBox,
    pub on_ground: bool,
    pub on_ceiling: bool,
    pub on_left: bool,
    pub on_right: bool,
}

// x first, then y. Probes are inset so sliding along a floor doesn't catch the next tile's corner
pub fn resolve_against_map(map: &GameMap, bb: &BoundingBox, dx: f32, dy: f32) -> KinematicResult {
    let tile = map.tile_size();
    let mut on_ground = false;
    let mut on_ceiling = false;
    let mut on_left = false;
    let mut on_right = false;

    // Horizontal
    let mut x = bb.x + dx;
    let mut out_dx = dx;
    let top = bb.y + PROBE_INSET;
    let bottom = bb.y + bb.h - PROBE_INSET;

    if dx > 0.0 {
        let right = x + bb.w;
        if map.is_solid_at(right, top) || map.is_solid_at(right, bottom) {
            x = (right / tile).floor() * tile - bb.w - RESOLVE_EPSILON;
            out_dx = 0.0;
            on_right = true;
        }
    } else if dx < 0.0 {
        let left = x;
        if map.is_solid_at(left, top) || map.is_solid_at(left, bottom) {
            x = ((left / tile).floor() + 1.0) * tile + RESOLVE_EPSILON;
            out_dx = 0.0;
            on_left = true;
        }
    }

    // Vertical, probing from the corrected x
    let mut y = bb.y + dy;
    let mut out_dy = dy;
    let left = x + PROBE_INSET;
    let right = x + bb.w - PROBE_INSET;

    if dy > 0.0 {
        let bottom = y + bb.h;
        if map.is_solid_at(left, bottom) || map.is_solid_at(right, bottom) {
            y = (bottom / tile).floor() * tile - bb.h - RESOLVE_EPSILON;
            out_dy = 0.0;
            on_ground = true;
        }
    } else if dy < 0.0 {
        let top = y;
        if map.is_solid_at(left, top) || map.is_solid_at(right, top) {
            y = ((top / tile).floor() + 1.0) * tile + RESOLVE_EPSILON;
            out_dy = 0.0;
            on_ceiling = true;
        }
    }

    // Resting inside the snap gap still counts as standing
    if dy >= 0.0 && !on_ground {
        let feet = y + bb.h + 2.0 * RESOLVE_EPSILON;
        on_ground = map.is_solid_at(left, feet) || map.is_solid_at(right, feet);
    }

    KinematicResult {
        new_bb: BoundingBox {
            x,
            y,
            w: bb.w,
            h: bb.h,
            vx: out_dx,
            vy: out_dy,
        },
        on_ground,
        on_ceiling,
        on_left,
        on_right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Tile;

    // True when `bb` overlaps any solid tile by more than `tolerance` pixels on both axes.
    fn penetrates_solid(map: &GameMap, bb: &BoundingBox, tolerance: f32) -> bool {
        let shrunk = BoundingBox::new(
            bb.x + tolerance,
            bb.y + tolerance,
            bb.w - 2.0 * tolerance,
            bb.h - 2.0 * tolerance,
        );
        if !shrunk.is_sane() {
            return false;
        }
        let tile = map.tile_size();
        let first_col = (shrunk.x / tile).floor() as i32;
        let last_col = ((shrunk.x + shrunk.w) / tile).floor() as i32;
        let first_row = (shrunk.y / tile).floor() as i32;
        let last_row = ((shrunk.y + shrunk.h) / tile).floor() as i32;

        for row in first_row..=last_row {
            for col in first_col..=last_col {
                if !map.tile_at_index(col, row).is_solid() {
                    continue;
                }
                let cell = BoundingBox::new(col as f32 * tile, row as f32 * tile, tile, tile);
                if cell.overlaps(&shrunk) {
                    return true;
                }
            }
        }
        false
    }

    const T: f32 = 64.0;

    // 13x9 grid, floor on the bottom row and a single block at (row 4, col 7).
    fn scenario_map() -> GameMap {
        let mut rows = vec![vec![Tile::Empty; 13]; 9];
        rows[8] = vec![Tile::Solid; 13];
        rows[4][7] = Tile::Solid;
        GameMap::from_rows(&rows, T)
    }

    #[test]
    fn test_moving_right_stops_flush_against_block() {
        let map = scenario_map();
        let w = 0.6 * T;
        // Row 4, right edge a few pixels short of column 7
        let bb = BoundingBox::new(7.0 * T - w - 5.0, 4.0 * T + 10.0, w, w);

        let res = resolve_against_map(&map, &bb, 20.0, 0.0);

        assert!(res.on_right);
        assert_eq!(res.new_bb.vx, 0.0);
        let right_edge = res.new_bb.x + res.new_bb.w;
        assert!((right_edge - (7.0 * T - RESOLVE_EPSILON)).abs() < 1e-3);
        assert!(!res.on_ground);
    }

    #[test]
    fn test_moving_left_snaps_to_right_side_of_tile() {
        let map = scenario_map();
        let bb = BoundingBox::new(8.0 * T + 3.0, 4.0 * T + 10.0, 30.0, 30.0);

        let res = resolve_against_map(&map, &bb, -10.0, 0.0);

        assert!(res.on_left);
        assert_eq!(res.new_bb.vx, 0.0);
        assert!((res.new_bb.x - (8.0 * T + RESOLVE_EPSILON)).abs() < 1e-3);
    }

    #[test]
    fn test_falling_lands_on_floor() {
        let map = scenario_map();
        let bb = BoundingBox::new(2.0 * T, 8.0 * T - 40.0, 30.0, 30.0);

        let res = resolve_against_map(&map, &bb, 0.0, 25.0);

        assert!(res.on_ground);
        assert_eq!(res.new_bb.vy, 0.0);
        assert!((res.new_bb.y + res.new_bb.h - (8.0 * T - RESOLVE_EPSILON)).abs() < 1e-3);
    }

    #[test]
    fn test_resting_in_snap_gap_is_grounded() {
        let map = scenario_map();
        let y = 8.0 * T - 30.0 - RESOLVE_EPSILON;
        let bb = BoundingBox::new(2.0 * T, y, 30.0, 30.0);

        let res = resolve_against_map(&map, &bb, 0.0, 0.0);
        assert!(res.on_ground);
        assert_eq!(res.new_bb.y, y);

        // A step smaller than the gap does not reach the floor face
        let res = resolve_against_map(&map, &bb, 0.0, 0.004);
        assert!(res.on_ground);
        assert!(res.new_bb.y + res.new_bb.h < 8.0 * T);

        let res = resolve_against_map(&map, &bb, 0.0, -0.5);
        assert!(!res.on_ground);
    }

    #[test]
    fn test_rising_hits_ceiling_without_ground() {
        let map = scenario_map();
        let bb = BoundingBox::new(7.0 * T + 10.0, 5.0 * T + 4.0, 30.0, 30.0);

        let res = resolve_against_map(&map, &bb, 0.0, -12.0);

        assert!(res.on_ceiling);
        assert!(!res.on_ground);
        assert!((res.new_bb.y - (5.0 * T + RESOLVE_EPSILON)).abs() < 1e-3);
    }

    #[test]
    fn test_free_movement_is_untouched() {
        let map = scenario_map();
        let bb = BoundingBox::new(2.0 * T, 2.0 * T, 30.0, 30.0);

        let res = resolve_against_map(&map, &bb, 7.0, -3.0);

        assert_eq!(res.new_bb.x, 2.0 * T + 7.0);
        assert_eq!(res.new_bb.y, 2.0 * T - 3.0);
        assert_eq!(res.new_bb.vx, 7.0);
        assert_eq!(res.new_bb.vy, -3.0);
        assert!(!res.on_ground);
    }

    #[test]
    fn test_world_edge_is_a_wall() {
        let map = scenario_map();
        let bb = BoundingBox::new(2.0, 3.0 * T, 30.0, 30.0);

        let res = resolve_against_map(&map, &bb, -10.0, 0.0);

        assert!(res.on_left);
        assert!((res.new_bb.x - RESOLVE_EPSILON).abs() < 1e-3);
    }

    #[test]
    fn test_sweep_never_ends_inside_solid() {
        let map = scenario_map();
        let size = 0.6 * T;
        let displacements = [-30.0, -17.5, -4.0, 0.0, 3.0, 11.0, 29.0];

        // Start positions on a coarse lattice over the open area
        let mut y = 2.0;
        while y < 8.0 * T - size - 2.0 {
            let mut x = 2.0;
            while x < 13.0 * T - size - 2.0 {
                let bb = BoundingBox::new(x, y, size, size);
                if penetrates_solid(&map, &bb, 0.0) {
                    x += 13.0;
                    continue;
                }
                for dx in displacements {
                    for dy in displacements {
                        let res = resolve_against_map(&map, &bb, dx, dy);
                        assert!(
                            !penetrates_solid(&map, &res.new_bb, PROBE_INSET + RESOLVE_EPSILON),
                            "start ({x}, {y}) moved by ({dx}, {dy}) ended at {:?}",
                            res.new_bb
                        );
                    }
                }
                x += 13.0;
            }
            y += 11.0;
        }
    }
}
