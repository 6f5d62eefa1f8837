use super::animation_handler::AnimationHandler;
use super::level::Level;
use super::player::{Player, PlayerUpdateResult};
use crate::config::GameConfig;
use crate::frame_clock::clamp_frame_dt;
use crate::level_loader::{LevelDescriptor, default_level};

// jump_pressed is an edge, cleared after each update
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump_held: bool,
    pub jump_pressed: bool,
}

impl InputState {
    pub fn end_frame(&mut self) {
        self.jump_pressed = false;
    }

    pub fn release_all(&mut self) {
        *self = InputState::default();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Play,
    Passed,
    Won,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    ScoreChanged(u32),
    CoinCollected { col: usize, row: usize },
    Jumped,
    LifeLost,
    Respawned,
    LevelCompleted { index: usize, title: String },
    LevelStarted { index: usize, title: String },
    GameCompleted,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunState {
    pub level_index: usize,
    pub score: u32,
    pub phase: Phase,
    // score goes back to this on death or reset
    pub level_start_score: u32,
}

pub struct Simulation {
    config: GameConfig,
    levels: Vec<LevelDescriptor>,
    level: Level,
    player: Player,
    pub input: InputState,
    run: RunState,
    coin_animation: AnimationHandler,
    pending_respawn: Option<f32>,
    passed_timer: f32,
}

impl Simulation {
    pub fn new(config: GameConfig, mut levels: Vec<LevelDescriptor>) -> Simulation {
        if levels.is_empty() {
            log::warn!("no levels given, using the built-in level");
            levels.push(default_level());
        }

        let level = Level::load(0, &levels[0], &config);
        let size = config.player_size * config.tile_size;
        let spawn = level.spawn_pixel(size);
        let player = Player::new(spawn.x, spawn.y, size, &config);
        let coin_animation = AnimationHandler::new(config.coin_fps);

        Simulation {
            config,
            levels,
            level,
            player,
            input: InputState::default(),
            run: RunState {
                level_index: 0,
                score: 0,
                phase: Phase::Play,
                level_start_score: 0,
            },
            coin_animation,
            pending_respawn: None,
            passed_timer: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) -> Vec<GameEvent> {
        let dt = clamp_frame_dt(dt, self.config.max_frame_dt);
        let mut events = vec![];
        if dt == 0.0 {
            self.input.end_frame();
            return events;
        }

        match self.run.phase {
            Phase::Play => self.update_play(dt, &mut events),
            Phase::Passed => self.update_passed(dt, &mut events),
            Phase::Won => {}
        }

        self.coin_animation.advance(dt);
        self.input.end_frame();
        events
    }

    fn update_play(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        if let Some(remaining) = self.pending_respawn {
            self.update_walkers(dt);
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                self.respawn(events);
            } else {
                self.pending_respawn = Some(remaining);
            }
            return;
        }

        let size = self.player_size();
        let spawn = self.level.spawn_pixel(size);
        self.player.sanitize(spawn, size);

        for result in self
            .player
            .update(&self.input, &self.level.map, &self.config, dt)
        {
            match result {
                PlayerUpdateResult::Jumped => events.push(GameEvent::Jumped),
            }
        }

        self.update_walkers(dt);

        let bb = self.player.bb;
        let touching = self.level.map.tiles_overlapping(&bb);
        let hit_walker = self.level.walkers.iter().any(|w| w.bb.overlaps(&bb));
        let hit_hazard = hit_walker || touching.iter().any(|(_, tile)| tile.is_hazard());
        let reached_goal = touching.iter().any(|(_, tile)| tile.is_goal());

        let collected = self.level.coins.collect_overlapping(
            &bb,
            self.level.map.tile_size(),
            self.config.coin_scale,
        );
        for pos in collected {
            self.run.score += 1;
            events.push(GameEvent::CoinCollected {
                col: pos.col,
                row: pos.row,
            });
            events.push(GameEvent::ScoreChanged(self.run.score));
        }

        if hit_hazard {
            self.lose_life(events);
        } else if reached_goal {
            self.complete_level(events);
        }
    }

    fn update_walkers(&mut self, dt: f32) {
        for walker in &mut self.level.walkers {
            walker.update(&self.level.map, dt);
        }
    }

    fn update_passed(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        self.passed_timer -= dt;
        if self.passed_timer > 0.0 {
            return;
        }

        let next = self.run.level_index + 1;
        if next < self.levels.len() {
            self.run.level_start_score = if self.config.preserve_score_across_levels {
                self.run.score
            } else {
                0
            };
            self.enter_level(next, events);
        } else {
            log::info!("all {} level(s) cleared, score {}", self.levels.len(), self.run.score);
            self.run.phase = Phase::Won;
            events.push(GameEvent::GameCompleted);
        }
    }

    fn lose_life(&mut self, events: &mut Vec<GameEvent>) {
        let at = self.player.bb.center();
        log::info!(
            "life lost on level {} at ({:.1}, {:.1})",
            self.run.level_index,
            at.x,
            at.y
        );
        self.pending_respawn = Some(self.config.respawn_delay);
        self.player.bb.vx = 0.0;
        self.player.bb.vy = 0.0;
        events.push(GameEvent::LifeLost);
    }

    fn respawn(&mut self, events: &mut Vec<GameEvent>) {
        self.pending_respawn = None;
        self.player.place_at(self.level.spawn_pixel(self.player_size()));
        self.level.coins.reset();
        self.input.release_all();
        self.restore_start_score(events);
        events.push(GameEvent::Respawned);
    }

    fn complete_level(&mut self, events: &mut Vec<GameEvent>) {
        log::info!(
            "level {} {:?} complete, score {}",
            self.run.level_index,
            self.level.title,
            self.run.score
        );
        self.run.phase = Phase::Passed;
        self.passed_timer = self.config.level_complete_delay;
        events.push(GameEvent::LevelCompleted {
            index: self.run.level_index,
            title: self.level.title.clone(),
        });
    }

    fn enter_level(&mut self, index: usize, events: &mut Vec<GameEvent>) {
        self.level = Level::load(index, &self.levels[index], &self.config);
        self.run.level_index = index;
        self.run.phase = Phase::Play;
        self.pending_respawn = None;
        self.passed_timer = 0.0;
        self.player.place_at(self.level.spawn_pixel(self.player_size()));
        self.input.release_all();
        self.restore_start_score(events);
        events.push(GameEvent::LevelStarted {
            index,
            title: self.level.title.clone(),
        });
    }

    fn restore_start_score(&mut self, events: &mut Vec<GameEvent>) {
        if self.run.score != self.run.level_start_score {
            self.run.score = self.run.level_start_score;
            events.push(GameEvent::ScoreChanged(self.run.score));
        }
    }

    // Ignored unless playing
    pub fn reset(&mut self) -> Vec<GameEvent> {
        let mut events = vec![];
        if self.run.phase != Phase::Play {
            log::info!("reset ignored in phase {:?}", self.run.phase);
            return events;
        }
        self.enter_level(self.run.level_index, &mut events);
        events
    }

    // The only way out of Won
    pub fn restart_game(&mut self) -> Vec<GameEvent> {
        let mut events = vec![];
        self.run.level_start_score = 0;
        self.enter_level(0, &mut events);
        events
    }

    pub fn jump_to_level(&mut self, index: usize) -> Vec<GameEvent> {
        let mut events = vec![];
        let index = index.min(self.levels.len() - 1);
        self.run.level_start_score = if self.config.preserve_score_across_levels {
            self.run.score
        } else {
            0
        };
        self.enter_level(index, &mut events);
        events
    }

    pub fn set_preserve_score(&mut self, preserve: bool) {
        self.config.preserve_score_across_levels = preserve;
    }

    pub fn phase(&self) -> Phase {
        self.run.phase
    }

    pub fn score(&self) -> u32 {
        self.run.score
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_titles(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(|l| l.title.as_str())
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn coin_frame(&self, frame_count: usize) -> usize {
        self.coin_animation.frame_index(frame_count)
    }

    pub fn elapsed(&self) -> f32 {
        self.coin_animation.elapsed()
    }

    pub fn respawn_progress(&self) -> Option<f32> {
        let remaining = self.pending_respawn?;
        if self.config.respawn_delay <= 0.0 {
            return Some(1.0);
        }
        Some((1.0 - remaining / self.config.respawn_delay).clamp(0.0, 1.0))
    }

    fn player_size(&self) -> f32 {
        self.config.player_size * self.config.tile_size
    }
}
