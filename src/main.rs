use miniquad::*;

mod camera;
mod config;
mod debug_menu;
mod error;
mod frame_clock;
mod level_loader;
mod physics;
mod render;
mod sound_handler;
mod state;
mod theme;

use crate::camera::Camera;
use crate::config::GameConfig;
use crate::debug_menu::{DebugMenu, draw_hud};
use crate::frame_clock::FrameClock;
use crate::render::Renderer;
use crate::sound_handler::SoundHandler;
use crate::state::game_state::{GameEvent, Simulation};
use crate::theme::{ThemeTokens, derive_theme};

struct Stage {
    sim: Simulation,
    renderer: Renderer,
    egui_mq: egui_miniquad::EguiMq,
    camera: Camera,
    clock: FrameClock,
    theme: ThemeTokens,
    sounds: SoundHandler,
    debug_menu: DebugMenu,
}

impl Stage {
    fn new(width: f32, height: f32) -> Stage {
        let config = GameConfig::load_or_default();
        let content = level_loader::load_content_or_default(&config.content_path);

        let mut renderer = Renderer::new();
        renderer.load_coin_frames(&content.coin_frames);
        renderer.preload_images(content.level_image_paths());
        log::info!("{} texture(s) loaded", renderer.texture_count());

        let egui_mq = egui_miniquad::EguiMq::new(&mut *renderer.ctx);
        let clock = FrameClock::new(config.max_frame_dt);
        let debug_menu = DebugMenu::new(config.preserve_score_across_levels);
        let sim = Simulation::new(config, content.levels);

        let mut stage = Stage {
            sim,
            renderer,
            egui_mq,
            camera: Camera::new(width, height),
            clock,
            theme: ThemeTokens::default(),
            sounds: SoundHandler::new(),
            debug_menu,
        };
        stage.apply_level_look();
        stage
    }

    fn apply_level_look(&mut self) {
        let level = self.sim.level();
        self.theme = derive_theme(level.accent);
        self.camera
            .fit_board(level.map.cols(), level.map.rows(), level.map.tile_size());
    }

    fn handle_events(&mut self, events: Vec<GameEvent>) {
        for event in events {
            self.sounds.play_for(&event);
            match event {
                GameEvent::LevelStarted { index, title } => {
                    log::info!("started level {index} {title:?}");
                    self.apply_level_look();
                }
                GameEvent::GameCompleted => {
                    log::info!("game complete with score {}", self.sim.score());
                }
                _ => {}
            }
        }
    }

    fn toggle_pause(&mut self) {
        let paused = self.clock.toggle_pause();
        self.sim.input.release_all();
        log::info!("{}", if paused { "paused" } else { "resumed" });
    }
}

impl EventHandler for Stage {
    fn update(&mut self) {
        if let Some(dt) = self.clock.tick(date::now()) {
            let events = self.sim.update(dt);
            self.handle_events(events);
        }
    }

    fn draw(&mut self) {
        self.renderer.draw(
            &self.sim,
            &self.camera,
            &self.theme,
            self.debug_menu.show_hidden,
        );

        let mut events = vec![];
        self.egui_mq.run(&mut *self.renderer.ctx, |_mq_ctx, egui_ctx| {
            draw_hud(egui_ctx, &self.sim, &self.theme, self.clock.is_paused());
            events = self.debug_menu.render_ui(egui_ctx, &mut self.sim);
        });
        self.egui_mq.draw(&mut *self.renderer.ctx);

        self.renderer.ctx.commit_frame();
        self.handle_events(events);
    }

    fn resize_event(&mut self, width: f32, height: f32) {
        self.camera.on_resize(width, height);
    }

    fn mouse_motion_event(&mut self, x: f32, y: f32) {
        self.egui_mq.mouse_motion_event(x, y);
    }

    fn mouse_wheel_event(&mut self, dx: f32, dy: f32) {
        self.egui_mq.mouse_wheel_event(dx, dy);
    }

    fn mouse_button_down_event(&mut self, mb: MouseButton, x: f32, y: f32) {
        self.egui_mq.mouse_button_down_event(mb, x, y);
    }

    fn mouse_button_up_event(&mut self, mb: MouseButton, x: f32, y: f32) {
        self.egui_mq.mouse_button_up_event(mb, x, y);
    }

    fn char_event(&mut self, character: char, _keymods: KeyMods, _repeat: bool) {
        self.egui_mq.char_event(character);
    }

    fn key_down_event(&mut self, keycode: KeyCode, keymods: KeyMods, repeat: bool) {
        self.egui_mq.key_down_event(keycode, keymods);
        if self.egui_mq.egui_ctx().wants_keyboard_input() {
            return;
        }

        let running = self.clock.is_running();
        let input = &mut self.sim.input;
        match keycode {
            KeyCode::A | KeyCode::Left if running => input.left = true,
            KeyCode::D | KeyCode::Right if running => input.right = true,
            KeyCode::W | KeyCode::Up | KeyCode::Space if running => {
                input.jump_held = true;
                if !repeat {
                    input.jump_pressed = true;
                }
            }
            KeyCode::R if !repeat => {
                let events = self.sim.reset();
                self.handle_events(events);
            }
            KeyCode::Enter | KeyCode::H if !repeat => {
                let events = self.sim.restart_game();
                self.handle_events(events);
            }
            KeyCode::Escape if !repeat => self.toggle_pause(),
            KeyCode::F1 if !repeat => self.debug_menu.toggle(),
            _ => {}
        }
    }

    fn key_up_event(&mut self, keycode: KeyCode, keymods: KeyMods) {
        self.egui_mq.key_up_event(keycode, keymods);

        let input = &mut self.sim.input;
        match keycode {
            KeyCode::A | KeyCode::Left => input.left = false,
            KeyCode::D | KeyCode::Right => input.right = false,
            KeyCode::W | KeyCode::Up | KeyCode::Space => input.jump_held = false,
            _ => {}
        }
    }

    fn window_minimized_event(&mut self) {
        self.clock.suspend();
        self.sim.input.release_all();
    }

    fn window_restored_event(&mut self) {
        self.clock.unsuspend();
    }

    fn quit_requested_event(&mut self) {
        log::info!("quit requested");
        self.clock.stop();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let mut filter = EnvFilter::from_default_env();
    if std::env::var_os("RUST_LOG").is_none()
        && let Ok(directive) = "blok=info".parse()
    {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(target_arch = "wasm32")]
fn init_logging() {}

fn main() {
    init_logging();

    miniquad::start(
        conf::Conf {
            window_title: String::from("Blok"),
            high_dpi: false,
            window_width: 900,
            window_height: 640,
            ..Default::default()
        },
        || {
            let (w, h) = window::screen_size();
            Box::new(Stage::new(w, h))
        },
    );
}
