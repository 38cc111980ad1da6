//! UI modules for Skybreaker
//!
//! Rendering code for the root views and overlay windows, organized by
//! screen.

pub mod components;
mod game;
mod options;
mod stage_select;
pub mod theme;
mod title;

pub use game::{render_game, render_game_over_overlay, render_pause_overlay};
pub use options::render_options;
pub use stage_select::render_stage_select;
pub use title::render_title;
