//! Title screen rendering

use eframe::egui::{self, RichText};

use crate::app::GameCtx;
use crate::ui::components::menu_button;

/// Render the title root view.
pub fn render_title(state: &mut GameCtx, ui: &mut egui::Ui) {
    let theme = state.theme.clone();

    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.22);

        ui.label(
            RichText::new("SKYBREAKER")
                .size(52.0)
                .strong()
                .color(theme.accent),
        );
        ui.label(
            RichText::new("stage-based boss battles")
                .size(14.0)
                .color(theme.text_muted),
        );
        ui.add_space(40.0);

        if menu_button(ui, &theme, "Start").clicked() {
            state.start_default_stage();
        }
        ui.add_space(8.0);

        if menu_button(ui, &theme, "Stage Select").clicked() {
            state.flow.open_stage_select(&mut state.session);
        }
        ui.add_space(8.0);

        if menu_button(ui, &theme, "Options").clicked() {
            state.flow.open_option(&mut state.session);
        }
        ui.add_space(8.0);

        if menu_button(ui, &theme, "Quit").clicked() {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }

        if !state.status_message.is_empty() {
            ui.add_space(24.0);
            ui.label(RichText::new(&state.status_message).color(theme.error));
        }
    });
}
