use crate::state::game_state::{GameEvent, Phase, Simulation};
use crate::theme::{Rgb, ThemeTokens};
use egui::{Align2, Color32, Context, Frame, Id, RichText, Ui};

fn color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c.r, c.g, c.b)
}

fn card(ui: &mut Ui, theme: &ThemeTokens, add_contents: impl FnOnce(&mut Ui)) {
    Frame::new()
        .fill(Color32::from_rgba_unmultiplied(255, 247, 228, 217))
        .stroke(egui::Stroke::new(1.0, color32(theme.text).gamma_multiply(0.25)))
        .corner_radius(10.0)
        .inner_margin(10.0)
        .show(ui, add_contents);
}

pub fn draw_hud(ctx: &Context, sim: &Simulation, theme: &ThemeTokens, paused: bool) {
    let text = color32(theme.text);

    egui::Area::new(Id::new("hud_title"))
        .anchor(Align2::LEFT_TOP, [12.0, 12.0])
        .interactable(false)
        .show(ctx, |ui| {
            card(ui, theme, |ui| {
                ui.label(
                    RichText::new(&sim.level().title)
                        .size(18.0)
                        .strong()
                        .color(text),
                );
            });
        });

    egui::Area::new(Id::new("hud_score"))
        .anchor(Align2::RIGHT_TOP, [-12.0, 12.0])
        .interactable(false)
        .show(ctx, |ui| {
            card(ui, theme, |ui| {
                ui.label(
                    RichText::new(format!("Score {}", sim.score()))
                        .size(18.0)
                        .strong()
                        .color(text),
                );
            });
        });

    let banner = match (sim.phase(), paused) {
        (Phase::Won, _) => Some(("You win!", "Press Enter to play again")),
        (Phase::Passed, _) => Some(("Level passed", "")),
        (Phase::Play, true) => Some(("Paused", "Press Escape to continue")),
        (Phase::Play, false) => None,
    };
    if let Some((title, hint)) = banner {
        egui::Area::new(Id::new("hud_banner"))
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .interactable(false)
            .show(ctx, |ui| {
                card(ui, theme, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new(title).size(32.0).strong().color(text));
                        if !hint.is_empty() {
                            ui.label(RichText::new(hint).size(14.0).color(text));
                        }
                    });
                });
            });
    }
}

pub struct DebugMenu {
    pub open: bool,
    pub show_hidden: bool,
    preserve_score: bool,
}

impl DebugMenu {
    pub fn new(preserve_score: bool) -> DebugMenu {
        DebugMenu {
            open: false,
            show_hidden: false,
            preserve_score,
        }
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn render_ui(&mut self, ctx: &Context, sim: &mut Simulation) -> Vec<GameEvent> {
        let mut events = vec![];
        if !self.open {
            return events;
        }

        let mut open = self.open;
        egui::Window::new("Debug")
            .open(&mut open)
            .default_pos([12.0, 80.0])
            .resizable(false)
            .show(ctx, |ui| {
                let current = sim.run().level_index;
                let titles: Vec<String> = sim.level_titles().map(str::to_string).collect();
                let mut selected = None;
                egui::ComboBox::from_label("Level")
                    .selected_text(format!("{}: {}", current + 1, titles[current]))
                    .show_ui(ui, |ui| {
                        for (index, title) in titles.iter().enumerate() {
                            let label = format!("{}: {}", index + 1, title);
                            if ui.selectable_label(index == current, label).clicked() {
                                selected = Some(index);
                            }
                        }
                    });
                if let Some(index) = selected {
                    log::info!("debug: jumping to level {index}");
                    events.extend(sim.jump_to_level(index));
                }

                if ui
                    .checkbox(&mut self.preserve_score, "Keep score between levels")
                    .changed()
                {
                    sim.set_preserve_score(self.preserve_score);
                }
                ui.checkbox(&mut self.show_hidden, "Show hidden tiles");

                ui.horizontal(|ui| {
                    if ui.button("Reset level").clicked() {
                        events.extend(sim.reset());
                    }
                    if ui.button("Restart game").clicked() {
                        events.extend(sim.restart_game());
                    }
                });

                ui.separator();
                let player = sim.player();
                ui.label(format!(
                    "player ({:.1}, {:.1}) v ({:.0}, {:.0}){}",
                    player.bb.x,
                    player.bb.y,
                    player.bb.vx,
                    player.bb.vy,
                    if player.on_ground { " grounded" } else { "" }
                ));
                let coins = &sim.level().coins;
                ui.label(format!(
                    "coins {}/{}, walkers {}",
                    coins.taken_count(),
                    coins.len(),
                    sim.level().walkers.len()
                ));
            });
        self.open = open;

        events
    }
}
