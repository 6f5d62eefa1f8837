use super::common::{BoundingBox, Pos};
use super::game_map::GameMap;
use super::game_state::InputState;
use crate::config::GameConfig;
use crate::physics::resolve_against_map;

pub enum PlayerUpdateResult {
    Jumped,
}

// Velocities in px/s
pub struct Player {
    pub bb: BoundingBox,
    pub on_ground: bool,
    pub speed: f32,
    pub jump_velocity: f32,
    last_good: BoundingBox,
}

impl Player {
    pub fn new(x: f32, y: f32, size: f32, config: &GameConfig) -> Self {
        let bb = BoundingBox::new(x, y, size, size);
        Player {
            bb,
            on_ground: false,
            speed: config.player_speed,
            jump_velocity: config.jump_velocity,
            last_good: bb,
        }
    }

    pub fn place_at(&mut self, pos: Pos) {
        self.bb.x = pos.x;
        self.bb.y = pos.y;
        self.bb.vx = 0.0;
        self.bb.vy = 0.0;
        self.on_ground = false;
        self.last_good = self.bb;
    }

    // Returns whether anything was replaced
    pub fn sanitize(&mut self, spawn: Pos, size: f32) -> bool {
        if self.bb.is_sane() {
            return false;
        }

        log::warn!("player state is not finite ({:?}), restoring", self.bb);
        self.bb = if self.last_good.is_sane() {
            self.last_good
        } else {
            BoundingBox::new(spawn.x, spawn.y, size, size)
        };
        self.bb.vx = 0.0;
        self.bb.vy = 0.0;
        self.on_ground = false;
        true
    }

    pub fn update(
        &mut self,
        input: &InputState,
        map: &GameMap,
        config: &GameConfig,
        dt: f32,
    ) -> Vec<PlayerUpdateResult> {
        let mut update_results = vec![];

        let mut target_vx = 0.0;
        if input.left {
            target_vx -= self.speed;
        }
        if input.right {
            target_vx += self.speed;
        }
        self.bb.vx = target_vx;

        // Jump only on the press edge and only from the ground found last frame
        if input.jump_pressed && self.on_ground {
            self.bb.vy = -self.jump_velocity;
            self.on_ground = false;
            update_results.push(PlayerUpdateResult::Jumped);
        }

        self.bb.vy = (self.bb.vy + config.gravity * dt).min(config.max_fall_speed);

        let res = resolve_against_map(map, &self.bb, self.bb.vx * dt, self.bb.vy * dt);

        self.bb.x = res.new_bb.x;
        self.bb.y = res.new_bb.y;
        if res.on_left || res.on_right {
            self.bb.vx = 0.0;
        }
        if res.on_ground || res.on_ceiling {
            self.bb.vy = 0.0;
        }
        self.on_ground = res.on_ground;

        if self.on_ground {
            self.bb.vx *= config.friction;
        }

        if self.bb.is_sane() {
            self.last_good = self.bb;
        }

        update_results
    }
}
