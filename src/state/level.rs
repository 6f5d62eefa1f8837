use super::coin::CoinSet;
use super::common::{GridPos, Pos};
use super::enemies::Walker;
use super::game_map::{GameMap, Tile};
use crate::config::GameConfig;
use crate::level_loader::LevelDescriptor;
use crate::theme::Rgb;

pub struct Level {
    pub title: String,
    pub map: GameMap,
    pub coins: CoinSet,
    pub walkers: Vec<Walker>,
    pub spawn: GridPos,
    pub accent: Option<Rgb>,
    pub tile_texture: Option<String>,
    pub overlay_image: Option<String>,
}

impl Level {
    pub fn load(index: usize, desc: &LevelDescriptor, config: &GameConfig) -> Level {
        let tile_size = config.tile_size;
        let rows: Vec<Vec<Tile>> = desc
            .grid
            .iter()
            .map(|row| {
                row.iter()
                    .map(|code| Tile::from_code(*code).unwrap_or(Tile::Empty))
                    .collect()
            })
            .collect();
        let mut map = GameMap::from_rows(&rows, tile_size);

        let markers: Vec<GridPos> = map
            .iter()
            .filter(|(_, tile)| *tile == Tile::WalkerSpawn)
            .map(|(pos, _)| pos)
            .collect();
        for pos in &markers {
            map.set(*pos, Tile::Empty);
        }

        let walker_size = (
            config.walker_size[0] * tile_size,
            config.walker_size[1] * tile_size,
        );
        let walkers = markers
            .iter()
            .map(|pos| Walker::spawn(&map, *pos, walker_size, config.walker_speed))
            .collect();

        let spawn = resolve_spawn(desc.spawn, &map);
        log::info!(
            "level {} {:?}: {}x{} tiles, {} walker(s), spawn at row {} col {}",
            index,
            desc.title,
            map.cols(),
            map.rows(),
            markers.len(),
            spawn.row,
            spawn.col
        );

        Level {
            title: desc.title.clone(),
            map,
            coins: CoinSet::from_grid(&desc.coin_grid),
            walkers,
            spawn,
            accent: desc.accent,
            tile_texture: desc.tile_texture.clone(),
            overlay_image: desc.overlay_image.clone(),
        }
    }

    // Top-left of a `size` square centered in the spawn cell.
    pub fn spawn_pixel(&self, size: f32) -> Pos {
        let tile = self.map.tile_size();
        Pos::new(
            self.spawn.col as f32 * tile + (tile - size) * 0.5,
            self.spawn.row as f32 * tile + (tile - size) * 0.5,
        )
    }
}

// The requested spawn clamped into the grid, or three rows up from the bottom in column 1.
fn resolve_spawn(requested: Option<GridPos>, map: &GameMap) -> GridPos {
    let max_row = map.rows().saturating_sub(1);
    let max_col = map.cols().saturating_sub(1);

    match requested {
        Some(pos) => {
            let clamped = GridPos::new(pos.row.min(max_row), pos.col.min(max_col));
            if clamped != pos {
                log::warn!(
                    "spawn row {} col {} is outside the grid, clamped",
                    pos.row,
                    pos.col
                );
            }
            clamped
        }
        None => GridPos::new(map.rows().saturating_sub(3), 1.min(max_col)),
    }
}
