//! Stage select overlay rendering

use eframe::egui::{self, RichText};

use crate::app::GameCtx;
use crate::ui::components::{rank_text, section_heading};

/// Render the stage select window over the title screen.
///
/// The rows are built once when the overlay opens (see
/// [`GameCtx::refresh_stage_rows`]); selection and close go through the flow
/// orchestrator, never straight to the session.
pub fn render_stage_select(state: &mut GameCtx, ctx: &egui::Context) {
    let theme = state.theme.clone();
    let rows = state.stage_rows.clone();

    let mut selected: Option<String> = None;
    let mut close_requested = false;

    egui::Window::new("Stage Select")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([420.0, 320.0])
        .show(ctx, |ui| {
            section_heading(ui, &theme, "Sortie");

            egui::ScrollArea::vertical()
                .id_salt("stage_select_scroll")
                .show(ui, |ui| {
                    for row in &rows {
                        ui.horizontal(|ui| {
                            let label = RichText::new(&row.display_name).size(16.0).color(
                                if row.unlocked {
                                    theme.text_primary
                                } else {
                                    theme.text_muted
                                },
                            );

                            let button = egui::Button::new(label)
                                .fill(theme.bg_medium)
                                .min_size(egui::Vec2::new(280.0, 36.0));
                            if ui.add_enabled(row.unlocked, button).clicked() {
                                selected = Some(row.stage_id.clone());
                            }

                            if row.cleared {
                                ui.label(RichText::new("CLEAR").color(theme.success).small());
                            }
                            ui.label(rank_text(&theme, row.best_rank));
                        });
                        ui.add_space(4.0);
                    }
                });

            ui.add_space(12.0);
            ui.horizontal(|ui| {
                if ui.button("Back").clicked() {
                    close_requested = true;
                }
                ui.label(RichText::new("Esc to close").color(theme.text_muted).small());
            });
        });

    if let Some(stage_id) = selected {
        state.start_stage(&stage_id);
    } else if close_requested {
        state.flow.close_stage_select(&mut state.session);
    }
}
