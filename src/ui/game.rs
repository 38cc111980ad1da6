//! In-game view rendering: story panels, the battle placeholder, and the
//! pause / game-over overlays.

use eframe::egui::{self, RichText};

use crate::app::GameCtx;
use crate::session::{BattlePhase, InGameMode};
use crate::ui::components::menu_button;

/// Render the central gameplay panel.
pub fn render_game(state: &mut GameCtx, ui: &mut egui::Ui) {
    match state.session.in_game_mode() {
        InGameMode::StoryBeforeBattle | InGameMode::StoryAfterBattle => {
            render_story_panel(state, ui);
        }
        InGameMode::Battle => render_battle_panel(state, ui),
    }
}

fn render_story_panel(state: &mut GameCtx, ui: &mut egui::Ui) {
    let theme = state.theme.clone();
    let page = state.current_story_page().cloned();

    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.3);

        match page {
            Some(page) => {
                ui.label(
                    RichText::new(&page.speaker)
                        .size(16.0)
                        .strong()
                        .color(theme.accent),
                );
                ui.add_space(8.0);
                ui.label(
                    RichText::new(&page.text)
                        .size(18.0)
                        .color(theme.text_primary),
                );
            }
            None => {
                ui.label(RichText::new("...").color(theme.text_muted));
            }
        }

        ui.add_space(32.0);
        if menu_button(ui, &theme, "Next").clicked() {
            state.advance_story();
        }
    });
}

fn render_battle_panel(state: &mut GameCtx, ui: &mut egui::Ui) {
    state.ensure_battle_setup();

    let theme = state.theme.clone();
    let phase = state.session.battle_phase();
    let stage_name = state.current_stage_name();
    let boss = state.battle.boss.clone();

    ui.vertical_centered(|ui| {
        ui.add_space(24.0);
        ui.label(
            RichText::new(&stage_name)
                .size(22.0)
                .strong()
                .color(theme.text_primary),
        );
        ui.label(
            RichText::new(phase.label())
                .size(14.0)
                .color(theme.text_muted),
        );
        ui.add_space(24.0);

        if let Some(boss) = &boss {
            ui.label(
                RichText::new(&boss.display_name)
                    .size(18.0)
                    .color(theme.error),
            );
            let fraction = boss.hp as f32 / boss.max_hp.max(1) as f32;
            ui.add(
                egui::ProgressBar::new(fraction)
                    .desired_width(360.0)
                    .text(format!("{}/{}", boss.hp, boss.max_hp)),
            );
        }

        ui.add_space(32.0);

        match phase {
            BattlePhase::BattleStart => {
                if menu_button(ui, &theme, "Begin").clicked() {
                    state.set_battle_phase(BattlePhase::ConversationIntro);
                }
            }
            BattlePhase::ConversationIntro => {
                ui.label(RichText::new("Incoming transmission...").color(theme.text_secondary));
                ui.add_space(8.0);
                if menu_button(ui, &theme, "Continue").clicked() {
                    state.set_battle_phase(BattlePhase::BossBoot);
                }
            }
            BattlePhase::BossBoot => {
                ui.label(RichText::new("Enemy systems online.").color(theme.warning));
                ui.add_space(8.0);
                if menu_button(ui, &theme, "Continue").clicked() {
                    state.set_battle_phase(BattlePhase::Combat);
                }
            }
            BattlePhase::Combat => {
                ui.label(
                    RichText::new("Battle simulation is not wired up yet.")
                        .color(theme.text_muted),
                );
                ui.add_space(8.0);
                if menu_button(ui, &theme, "Victory").clicked() {
                    state.set_battle_phase(BattlePhase::BossDefeated);
                }
                ui.add_space(8.0);
                if menu_button(ui, &theme, "Defeat").clicked() {
                    state.set_battle_phase(BattlePhase::GameOver);
                }
                ui.add_space(16.0);
                ui.label(
                    RichText::new("Esc to pause")
                        .small()
                        .color(theme.text_muted),
                );
            }
            BattlePhase::BossDefeated => {
                if menu_button(ui, &theme, "Continue").clicked() {
                    state.set_battle_phase(BattlePhase::ConversationOutro);
                }
            }
            BattlePhase::ConversationOutro => {
                ui.label(RichText::new("Target silenced.").color(theme.text_secondary));
                ui.add_space(8.0);
                if menu_button(ui, &theme, "Continue").clicked() {
                    state.set_battle_phase(BattlePhase::BattleEnd);
                }
            }
            BattlePhase::BattleEnd => {
                if menu_button(ui, &theme, "Finish").clicked() {
                    state.finish_battle();
                }
            }
            BattlePhase::GameOver => {
                // Handled by the overlay window.
            }
        }
    });
}

/// Render the pause menu window while the session is paused.
pub fn render_pause_overlay(state: &mut GameCtx, ctx: &egui::Context) {
    if !state.session.is_paused() {
        return;
    }

    let theme = state.theme.clone();
    let mut resume = false;
    let mut to_title = false;

    egui::Window::new("Paused")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([280.0, 160.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                if menu_button(ui, &theme, "Resume").clicked() {
                    resume = true;
                }
                ui.add_space(8.0);
                if menu_button(ui, &theme, "Return to Title").clicked() {
                    to_title = true;
                }
            });
        });

    if resume {
        state.session.try_set_paused(false);
    } else if to_title {
        state.flow.start_from_title(&mut state.session);
    }
}

/// Render the game-over window once the phase reaches game over.
pub fn render_game_over_overlay(state: &mut GameCtx, ctx: &egui::Context) {
    if !state.session.is_game_over() {
        return;
    }

    let theme = state.theme.clone();
    let mut retry = false;
    let mut stage_select = false;
    let mut title = false;

    egui::Window::new("Mission Failed")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 200.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                if menu_button(ui, &theme, "Retry").clicked() {
                    retry = true;
                }
                ui.add_space(8.0);
                if menu_button(ui, &theme, "Stage Select").clicked() {
                    stage_select = true;
                }
                ui.add_space(8.0);
                if menu_button(ui, &theme, "Title").clicked() {
                    title = true;
                }
            });
        });

    if retry {
        state.retry_stage();
    } else if stage_select {
        state.flow.return_to_title_with_stage_select(&mut state.session);
    } else if title {
        state.flow.start_from_title(&mut state.session);
    }
}
