//! Save data model and JSON persistence.
//!
//! The save file holds per-stage progress plus the user settings. A corrupt
//! or unreadable file never propagates an error into the flow layer: the
//! store backs the broken file up and hands out a default record instead.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::masterdata::StageDef;
use crate::settings::GameSettings;

/// Save file name inside the data directory.
const SAVE_FILE_NAME: &str = "save.json";

/// Current save format version.
pub const SAVE_VERSION: u32 = 1;

/// Best clear rank achieved on a stage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum StageRank {
    #[default]
    None,
    C,
    B,
    A,
    S,
}

impl StageRank {
    /// Display letter, "-" when the stage has no recorded clear.
    pub fn letter(&self) -> &'static str {
        match self {
            StageRank::None => "-",
            StageRank::C => "C",
            StageRank::B => "B",
            StageRank::A => "A",
            StageRank::S => "S",
        }
    }
}

/// Per-stage progress record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageProgress {
    pub stage_id: String,
    #[serde(default)]
    pub unlocked: bool,
    #[serde(default)]
    pub cleared: bool,
    #[serde(default)]
    pub best_rank: StageRank,
}

/// The persisted record: progress plus settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    #[serde(default)]
    pub stages: Vec<StageProgress>,
    #[serde(default)]
    pub settings: GameSettings,
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
}

impl SaveData {
    /// Fresh record: no progress, default settings.
    pub fn default_record() -> Self {
        Self {
            version: SAVE_VERSION,
            stages: Vec::new(),
            settings: GameSettings::default(),
            saved_at: Utc::now(),
        }
    }

    pub fn find_stage(&self, stage_id: &str) -> Option<&StageProgress> {
        self.stages.iter().find(|p| p.stage_id == stage_id)
    }

    /// Insert or replace the progress record for a stage.
    pub fn upsert_stage(&mut self, progress: StageProgress) {
        match self
            .stages
            .iter_mut()
            .find(|p| p.stage_id == progress.stage_id)
        {
            Some(existing) => *existing = progress,
            None => self.stages.push(progress),
        }
    }
}

/// Whether a stage is selectable.
///
/// Unlocked stages come from the save record; the first stage in catalog
/// order is always selectable so a fresh save cannot soft-lock.
pub fn is_stage_unlocked(save: &SaveData, stages: &[StageDef], stage_id: &str) -> bool {
    if let Some(progress) = save.find_stage(stage_id) {
        if progress.unlocked {
            return true;
        }
    }
    stages.first().is_some_and(|first| first.id == stage_id)
}

/// Record a stage clear and unlock the next stage in catalog order.
///
/// Keeps the best rank across repeat clears. Loads and saves through the
/// store so the on-disk record stays the single authority.
pub fn record_stage_clear(
    store: &impl SaveStore,
    stages: &[StageDef],
    stage_id: &str,
    rank: StageRank,
) -> Result<()> {
    let mut save = store.load_or_create_default();

    let best_rank = save
        .find_stage(stage_id)
        .map(|p| p.best_rank.max(rank))
        .unwrap_or(rank);
    save.upsert_stage(StageProgress {
        stage_id: stage_id.to_string(),
        unlocked: true,
        cleared: true,
        best_rank,
    });

    let cleared_index = stages.iter().position(|s| s.id == stage_id);
    if let Some(next) = cleared_index.and_then(|i| stages.get(i + 1)) {
        let mut next_progress = save
            .find_stage(&next.id)
            .cloned()
            .unwrap_or(StageProgress {
                stage_id: next.id.clone(),
                unlocked: false,
                cleared: false,
                best_rank: StageRank::None,
            });
        next_progress.unlocked = true;
        save.upsert_stage(next_progress);
    }

    store.save(&save)
}

/// Persistence port for the save record.
pub trait SaveStore {
    /// Load the record, falling back to defaults on any failure.
    fn load_or_create_default(&self) -> SaveData;

    /// Persist the record.
    fn save(&self, data: &SaveData) -> Result<()>;
}

/// JSON file store under the per-user data directory.
#[derive(Clone)]
pub struct JsonSaveStore {
    directory: PathBuf,
    file_path: PathBuf,
    backup_path: PathBuf,
}

impl JsonSaveStore {
    /// Store rooted at the platform data directory.
    pub fn at_default_location() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("com", "skybreaker", "Skybreaker")
            .context("Could not determine data directory")?;
        Ok(Self::new(dirs.data_dir()))
    }

    /// Store rooted at an explicit directory (tests, CLI overrides).
    pub fn new(directory: &Path) -> Self {
        let file_path = directory.join(SAVE_FILE_NAME);
        let backup_path = directory.join(format!("{}.bak", SAVE_FILE_NAME));
        Self {
            directory: directory.to_path_buf(),
            file_path,
            backup_path,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn backup_corrupted_save(&self) {
        if let Err(e) = fs::copy(&self.file_path, &self.backup_path) {
            tracing::warn!(
                "Failed to back up corrupted save {:?}: {}",
                self.file_path,
                e
            );
        }
    }
}

impl SaveStore for JsonSaveStore {
    fn load_or_create_default(&self) -> SaveData {
        if !self.file_path.exists() {
            return SaveData::default_record();
        }

        let parsed = fs::read_to_string(&self.file_path)
            .map_err(anyhow::Error::from)
            .and_then(|json| {
                if json.trim().is_empty() {
                    anyhow::bail!("save file is empty");
                }
                serde_json::from_str::<SaveData>(&json).map_err(anyhow::Error::from)
            });

        match parsed {
            Ok(mut save) => {
                save.settings = save.settings.normalized();
                save
            }
            Err(e) => {
                tracing::warn!(
                    "Save load failed, using defaults. path={:?} error={}",
                    self.file_path,
                    e
                );
                self.backup_corrupted_save();
                SaveData::default_record()
            }
        }
    }

    fn save(&self, data: &SaveData) -> Result<()> {
        fs::create_dir_all(&self.directory)
            .with_context(|| format!("Failed to create {:?}", self.directory))?;

        let mut record = data.clone();
        record.settings = record.settings.normalized();
        record.saved_at = Utc::now();

        let json = serde_json::to_string_pretty(&record)?;
        fs::write(&self.file_path, json)
            .with_context(|| format!("Failed to write {:?}", self.file_path))?;
        tracing::info!("Saved game data to {:?}", self.file_path);
        Ok(())
    }
}
