//! Option-screen orchestration: the editing session over persisted settings.
//!
//! While the options overlay is open there is one private working copy of
//! the settings. Changes are normalized, kept in the working copy, and
//! forwarded to the live applier immediately so volume/resolution effects
//! are audible and visible before commit. Close-and-save persists the
//! working copy; cancel discards it without rolling back live effects.

use anyhow::Result;

use crate::save::SaveStore;
use crate::settings::{GameSettings, SettingsApplier};

/// Manages the transient editing copy of the persisted settings.
pub struct OptionEditor<R, A> {
    store: R,
    applier: A,
    working: Option<GameSettings>,
}

impl<R: SaveStore, A: SettingsApplier> OptionEditor<R, A> {
    pub fn new(store: R, applier: A) -> Self {
        Self {
            store,
            applier,
            working: None,
        }
    }

    /// Whether an editing session is in progress.
    pub fn is_open(&self) -> bool {
        self.working.is_some()
    }

    /// Begin an editing session and return the current settings.
    ///
    /// The returned copy is independent of the internal working copy, so
    /// caller mutation cannot alias editor state.
    pub fn open_and_get_current(&mut self) -> GameSettings {
        let save = self.store.load_or_create_default();
        let current = save.settings.normalized();
        self.working = Some(current.clone());
        current
    }

    /// Normalize and adopt a change, forwarding it to the live applier.
    pub fn apply_change(&mut self, next: &GameSettings) -> GameSettings {
        let normalized = next.normalized();
        self.working = Some(normalized.clone());
        self.applier.apply_settings(&normalized);
        normalized
    }

    /// Persist the working copy and end the editing session.
    ///
    /// Opens a session first when none exists, so a stray close still writes
    /// a canonical record.
    pub fn close_and_save(&mut self) -> Result<()> {
        if self.working.is_none() {
            self.open_and_get_current();
        }

        let mut save = self.store.load_or_create_default();
        if let Some(working) = self.working.take() {
            save.settings = working;
        }
        self.store.save(&save)
    }

    /// Discard the working copy.
    ///
    /// Live effects already applied through [`Self::apply_change`] stay in
    /// effect until something else changes them.
    pub fn cancel(&mut self) {
        self.working = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::SaveData;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// In-memory store shared with the test body through an Rc handle.
    #[derive(Clone, Default)]
    struct MemoryStore {
        record: Rc<RefCell<Option<SaveData>>>,
    }

    impl SaveStore for MemoryStore {
        fn load_or_create_default(&self) -> SaveData {
            let mut save = self
                .record
                .borrow()
                .clone()
                .unwrap_or_else(SaveData::default_record);
            save.settings = save.settings.normalized();
            save
        }

        fn save(&self, data: &SaveData) -> Result<()> {
            let mut record = data.clone();
            record.settings = record.settings.normalized();
            *self.record.borrow_mut() = Some(record);
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingApplier {
        applied: Rc<RefCell<Vec<GameSettings>>>,
    }

    impl SettingsApplier for RecordingApplier {
        fn apply_settings(&mut self, settings: &GameSettings) {
            self.applied.borrow_mut().push(settings.clone());
        }
    }

    fn editor() -> (
        OptionEditor<MemoryStore, RecordingApplier>,
        MemoryStore,
        RecordingApplier,
    ) {
        let store = MemoryStore::default();
        let applier = RecordingApplier::default();
        (
            OptionEditor::new(store.clone(), applier.clone()),
            store,
            applier,
        )
    }

    #[test]
    fn open_returns_normalized_defaults() {
        let (mut editor, _store, _applier) = editor();
        let settings = editor.open_and_get_current();
        assert_eq!(settings, GameSettings::default());
        assert!(editor.is_open());
    }

    #[test]
    fn open_normalizes_persisted_garbage() {
        let (mut editor, store, _applier) = editor();

        let mut save = SaveData::default_record();
        save.settings.volume.bgm_volume = 9.0;
        save.settings.graphics.width = 0;
        *store.record.borrow_mut() = Some(save);

        let settings = editor.open_and_get_current();
        assert_eq!(settings.volume.bgm_volume, 1.0);
        assert_eq!(settings.graphics.width, 1920);
    }

    #[test]
    fn caller_copy_does_not_alias_working_state() {
        let (mut editor, store, _applier) = editor();

        let mut settings = editor.open_and_get_current();
        settings.volume.bgm_volume = 0.1;

        // The mutation above never reached the editor, so a plain close
        // persists the untouched settings.
        editor.close_and_save().unwrap();
        let persisted = store.record.borrow().clone().unwrap();
        assert_eq!(persisted.settings.volume.bgm_volume, 1.0);
    }

    #[test]
    fn apply_change_forwards_normalized_copy_to_applier() {
        let (mut editor, _store, applier) = editor();
        editor.open_and_get_current();

        let mut next = GameSettings::default();
        next.volume.bgm_volume = 2.0;
        let adopted = editor.apply_change(&next);

        assert_eq!(adopted.volume.bgm_volume, 1.0);
        let applied = applier.applied.borrow();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].volume.bgm_volume, 1.0);
    }

    #[test]
    fn close_and_save_persists_clamped_value_end_to_end() {
        let (mut editor, store, _applier) = editor();

        editor.open_and_get_current();
        let mut next = GameSettings::default();
        next.volume.bgm_volume = 2.0;
        editor.apply_change(&next);
        editor.close_and_save().unwrap();

        assert!(!editor.is_open());
        let persisted = store.record.borrow().clone().unwrap();
        assert_eq!(persisted.settings.volume.bgm_volume, 1.0);

        // A fresh editing session reflects the clamped value.
        let reopened = editor.open_and_get_current();
        assert_eq!(reopened.volume.bgm_volume, 1.0);
    }

    #[test]
    fn close_without_open_still_writes_a_canonical_record() {
        let (mut editor, store, _applier) = editor();
        editor.close_and_save().unwrap();
        let persisted = store.record.borrow().clone().unwrap();
        assert_eq!(persisted.settings, GameSettings::default());
    }

    #[test]
    fn cancel_discards_working_copy_but_not_live_effects() {
        let (mut editor, store, applier) = editor();

        editor.open_and_get_current();
        let mut next = GameSettings::default();
        next.volume.se_volume = 0.2;
        editor.apply_change(&next);
        editor.cancel();

        assert!(!editor.is_open());
        // Nothing persisted.
        assert!(store.record.borrow().is_none());
        // The live effect was applied and is not rolled back.
        assert_eq!(applier.applied.borrow().len(), 1);
    }

    #[test]
    fn save_preserves_stage_progress() {
        let (mut editor, store, _applier) = editor();

        let mut save = SaveData::default_record();
        save.upsert_stage(crate::save::StageProgress {
            stage_id: "stage_01".to_string(),
            unlocked: true,
            cleared: true,
            best_rank: crate::save::StageRank::A,
        });
        *store.record.borrow_mut() = Some(save);

        editor.open_and_get_current();
        editor.close_and_save().unwrap();

        let persisted = store.record.borrow().clone().unwrap();
        assert!(persisted.find_stage("stage_01").is_some());
    }
}
