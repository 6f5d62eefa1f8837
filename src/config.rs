use crate::error::ContentError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{env, fs};

pub const CONFIG_ENV_VAR: &str = "BLOK_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub tile_size: f32,
    pub player_size: f32,
    pub player_speed: f32,
    pub jump_velocity: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub friction: f32,
    pub walker_speed: f32,
    pub walker_size: [f32; 2],
    pub coin_scale: f32,
    pub coin_fps: f32,
    pub max_frame_dt: f32,
    pub respawn_delay: f32,
    pub level_complete_delay: f32,
    pub preserve_score_across_levels: bool,
    pub content_path: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            tile_size: 64.0,
            player_size: 0.6,
            player_speed: 280.0,
            jump_velocity: 800.0,
            gravity: 1600.0,
            max_fall_speed: 900.0,
            friction: 0.85,
            walker_speed: 90.0,
            walker_size: [0.7, 0.5],
            coin_scale: 0.4,
            coin_fps: 12.0,
            max_frame_dt: 0.033,
            respawn_delay: 0.35,
            level_complete_delay: 1.2,
            preserve_score_across_levels: false,
            content_path: String::from("assets/content.json"),
        }
    }
}

impl GameConfig {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig =
            serde_json::from_str(&s).map_err(|source| ContentError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(config.sanitized())
    }

    pub fn load_or_default() -> Self {
        let path = env::var(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        match Self::load_json(&path) {
            Ok(config) => {
                log::info!("loaded config from {}", path.display());
                config
            }
            Err(ContentError::Io { .. }) => {
                log::info!("no config at {}, using defaults", path.display());
                GameConfig::default()
            }
            Err(err) => {
                log::warn!("{err}; using default config");
                GameConfig::default()
            }
        }
    }

    pub fn sanitized(mut self) -> Self {
        let defaults = GameConfig::default();

        fn positive(value: f32, fallback: f32) -> f32 {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        }

        self.tile_size = positive(self.tile_size, defaults.tile_size);
        self.player_size = positive(self.player_size, defaults.player_size).min(0.95);
        self.player_speed = positive(self.player_speed, defaults.player_speed);
        self.jump_velocity = positive(self.jump_velocity, defaults.jump_velocity);
        self.gravity = positive(self.gravity, defaults.gravity);
        self.max_fall_speed = positive(self.max_fall_speed, defaults.max_fall_speed);
        self.walker_speed = positive(self.walker_speed, defaults.walker_speed);
        self.walker_size = [
            positive(self.walker_size[0], defaults.walker_size[0]).min(1.0),
            positive(self.walker_size[1], defaults.walker_size[1]).min(1.0),
        ];
        self.coin_scale = positive(self.coin_scale, defaults.coin_scale).min(1.0);
        self.coin_fps = positive(self.coin_fps, defaults.coin_fps);
        self.max_frame_dt = positive(self.max_frame_dt, defaults.max_frame_dt);
        if !(self.friction.is_finite() && (0.0..=1.0).contains(&self.friction)) {
            self.friction = defaults.friction;
        }
        if !(self.respawn_delay.is_finite() && self.respawn_delay >= 0.0) {
            self.respawn_delay = defaults.respawn_delay;
        }
        if !(self.level_complete_delay.is_finite() && self.level_complete_delay >= 0.0) {
            self.level_complete_delay = defaults.level_complete_delay;
        }
        self
    }
}
