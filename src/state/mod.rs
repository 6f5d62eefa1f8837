pub mod animation_handler;
pub mod coin;
pub mod common;
pub mod enemies;
pub mod game_map;
pub mod game_state;
pub mod level;
pub mod player;

pub use common::{BoundingBox, Dir, GridPos};
pub use game_map::{GameMap, Tile};
