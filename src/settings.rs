//! Game settings DTOs and the shared normalization rule.
//!
//! Normalization is applied on every read from persistence, every write to
//! persistence, and every hand-off to the live applier, so malformed or
//! partially-specified records never propagate.

use serde::{Deserialize, Serialize};

/// Fallback screen size used when a persisted dimension is not positive.
pub const DEFAULT_WIDTH: u32 = 1920;
pub const DEFAULT_HEIGHT: u32 = 1080;

/// User-tunable settings persisted inside the save record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    #[serde(default)]
    pub volume: VolumeSettings,
    #[serde(default)]
    pub graphics: GraphicsSettings,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            volume: VolumeSettings::default(),
            graphics: GraphicsSettings::default(),
        }
    }
}

/// BGM / sound-effect volume settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSettings {
    #[serde(default = "default_volume")]
    pub bgm_volume: f32,
    #[serde(default = "default_true")]
    pub bgm_enabled: bool,
    #[serde(default = "default_volume")]
    pub se_volume: f32,
    #[serde(default = "default_true")]
    pub se_enabled: bool,
}

impl Default for VolumeSettings {
    fn default() -> Self {
        Self {
            bgm_volume: 1.0,
            bgm_enabled: true,
            se_volume: 1.0,
            se_enabled: true,
        }
    }
}

/// Screen resolution and window mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphicsSettings {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_true")]
    pub fullscreen: bool,
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fullscreen: true,
        }
    }
}

fn default_volume() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

impl GameSettings {
    /// Produce the canonical form of this record.
    ///
    /// Volumes are clamped to [0, 1]; non-positive dimensions fall back to
    /// 1920x1080; everything else passes through. Idempotent.
    pub fn normalized(&self) -> Self {
        Self {
            volume: VolumeSettings {
                bgm_volume: clamp01(self.volume.bgm_volume),
                bgm_enabled: self.volume.bgm_enabled,
                se_volume: clamp01(self.volume.se_volume),
                se_enabled: self.volume.se_enabled,
            },
            graphics: GraphicsSettings {
                width: normalize_dimension(self.graphics.width, DEFAULT_WIDTH),
                height: normalize_dimension(self.graphics.height, DEFAULT_HEIGHT),
                fullscreen: self.graphics.fullscreen,
            },
        }
    }
}

fn clamp01(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

fn normalize_dimension(value: u32, fallback: u32) -> u32 {
    if value > 0 { value } else { fallback }
}

/// Live application of settings to whatever rendering/audio surface exists.
pub trait SettingsApplier {
    fn apply_settings(&mut self, settings: &GameSettings);
}

/// Applies settings to the running egui viewport.
///
/// Resolution and fullscreen go through viewport commands; volumes are only
/// logged because this shell carries no audio backend yet.
pub struct EguiSettingsApplier {
    ctx: egui::Context,
}

impl EguiSettingsApplier {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx }
    }
}

impl SettingsApplier for EguiSettingsApplier {
    fn apply_settings(&mut self, settings: &GameSettings) {
        let graphics = &settings.graphics;
        self.ctx
            .send_viewport_cmd(egui::ViewportCommand::Fullscreen(graphics.fullscreen));
        if !graphics.fullscreen {
            self.ctx
                .send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
                    graphics.width as f32,
                    graphics.height as f32,
                )));
        }

        tracing::info!(
            "Applied settings: {}x{} fullscreen={} bgm={:.2}({}) se={:.2}({})",
            graphics.width,
            graphics.height,
            graphics.fullscreen,
            settings.volume.bgm_volume,
            settings.volume.bgm_enabled,
            settings.volume.se_volume,
            settings.volume.se_enabled,
        );
    }
}
