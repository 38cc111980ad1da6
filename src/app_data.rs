//! Application constants embedded from TOML at compile time.
//!
//! These are app-level facts (window geometry, default stage, back-routing
//! priorities), embedded via `include_str!` and parsed lazily on first
//! access. They are not user-configurable; user choices live in the save
//! record's settings.

use serde::Deserialize;
use std::sync::OnceLock;

const APP_CONFIG_TOML: &str = include_str!("../embedded/app_config.toml");

/// Top-level embedded configuration.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub flow: FlowConfig,
    pub screens: ScreensConfig,
}

/// Initial window geometry and title.
#[derive(Debug, Deserialize)]
pub struct WindowConfig {
    pub initial_size: [f32; 2],
    pub min_size: [f32; 2],
    pub title: String,
}

/// Flow constants.
#[derive(Debug, Deserialize)]
pub struct FlowConfig {
    /// Stage launched by the title screen's Start button.
    pub default_stage_id: String,
}

/// Back-routing priorities for the overlay screens.
///
/// Higher closes first when several overlays are eligible.
#[derive(Debug, Deserialize)]
pub struct ScreensConfig {
    pub stage_select_priority: i32,
    pub option_priority: i32,
    pub pause_priority: i32,
}

fn app_config() -> &'static AppConfig {
    static CONFIG: OnceLock<AppConfig> = OnceLock::new();
    CONFIG.get_or_init(|| {
        toml::from_str(APP_CONFIG_TOML).unwrap_or_else(|e| {
            panic!("Failed to parse app_config.toml: {}", e);
        })
    })
}

/// Get window configuration (lazy-loaded)
pub fn window_config() -> &'static WindowConfig {
    &app_config().window
}

/// Get flow configuration (lazy-loaded)
pub fn flow_config() -> &'static FlowConfig {
    &app_config().flow
}

/// Get screen priority configuration (lazy-loaded)
pub fn screens_config() -> &'static ScreensConfig {
    &app_config().screens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_parses() {
        let window = window_config();
        assert!(!window.title.is_empty());
        assert!(window.initial_size[0] > 0.0);

        assert!(!flow_config().default_stage_id.is_empty());

        let screens = screens_config();
        assert!(screens.pause_priority > screens.option_priority);
        assert!(screens.option_priority > screens.stage_select_priority);
    }
}
