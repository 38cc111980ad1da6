//! Shared UI components for Skybreaker views

use eframe::egui::{self, RichText, Vec2};

use crate::save::StageRank;
use crate::ui::theme::Theme;

/// Render a large menu button (title screen, pause menu).
pub fn menu_button(ui: &mut egui::Ui, theme: &Theme, label: &str) -> egui::Response {
    let button = egui::Button::new(
        RichText::new(label)
            .size(18.0)
            .color(theme.text_primary),
    )
    .fill(theme.bg_medium)
    .min_size(Vec2::new(240.0, 44.0));

    ui.add(button)
}

/// Render a section heading inside an overlay window.
pub fn section_heading(ui: &mut egui::Ui, theme: &Theme, label: &str) {
    ui.label(
        RichText::new(label)
            .color(theme.accent)
            .size(13.0)
            .strong(),
    );
    ui.add_space(8.0);
}

/// Colored rank text for stage select rows.
pub fn rank_text(theme: &Theme, rank: StageRank) -> RichText {
    let color = match rank {
        StageRank::S => theme.accent,
        StageRank::A => theme.success,
        StageRank::B | StageRank::C => theme.text_secondary,
        StageRank::None => theme.text_muted,
    };
    RichText::new(rank.letter()).color(color).strong()
}
