//! Options overlay rendering

use eframe::egui::{self, RichText};

use crate::app::GameCtx;
use crate::ui::components::section_heading;

/// Selectable window resolutions.
const RESOLUTIONS: &[(u32, u32)] = &[
    (1280, 720),
    (1600, 900),
    (1920, 1080),
    (2560, 1440),
];

fn resolution_label(width: u32, height: u32) -> String {
    format!("{}x{}", width, height)
}

/// Render the options window over the title screen.
///
/// Every widget change is forwarded through the option editor immediately so
/// volume and resolution take effect before commit. Save persists, Cancel
/// discards the working copy; both land back on Title.
pub fn render_options(state: &mut GameCtx, ctx: &egui::Context) {
    let theme = state.theme.clone();
    let Some(mut form) = state.option_form.clone() else {
        return;
    };

    let mut changed = false;
    let mut save_requested = false;
    let mut cancel_requested = false;

    egui::Window::new("Options")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([360.0, 300.0])
        .show(ctx, |ui| {
            section_heading(ui, &theme, "Audio");

            ui.horizontal(|ui| {
                ui.label(RichText::new("BGM").color(theme.text_muted));
                changed |= ui
                    .add(egui::Slider::new(&mut form.volume.bgm_volume, 0.0..=1.0))
                    .changed();
                changed |= ui.checkbox(&mut form.volume.bgm_enabled, "On").changed();
            });
            ui.horizontal(|ui| {
                ui.label(RichText::new("SE ").color(theme.text_muted));
                changed |= ui
                    .add(egui::Slider::new(&mut form.volume.se_volume, 0.0..=1.0))
                    .changed();
                changed |= ui.checkbox(&mut form.volume.se_enabled, "On").changed();
            });

            ui.add_space(16.0);
            section_heading(ui, &theme, "Display");

            ui.horizontal(|ui| {
                ui.label(RichText::new("Resolution").color(theme.text_muted));
                let current = resolution_label(form.graphics.width, form.graphics.height);
                egui::ComboBox::from_id_salt("resolution_select")
                    .selected_text(current)
                    .show_ui(ui, |ui| {
                        for &(width, height) in RESOLUTIONS {
                            let is_current = form.graphics.width == width
                                && form.graphics.height == height;
                            if ui
                                .selectable_label(is_current, resolution_label(width, height))
                                .clicked()
                                && !is_current
                            {
                                form.graphics.width = width;
                                form.graphics.height = height;
                                changed = true;
                            }
                        }
                    });
            });
            changed |= ui
                .checkbox(&mut form.graphics.fullscreen, "Fullscreen")
                .changed();

            ui.add_space(20.0);
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    save_requested = true;
                }
                if ui.button("Cancel").clicked() {
                    cancel_requested = true;
                }
            });
        });

    if changed {
        state.apply_option_change(&form);
    }
    if save_requested {
        state.close_option_and_save();
    } else if cancel_requested {
        state.cancel_option();
    }
}
