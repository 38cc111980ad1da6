//! Read-only game-design data: stages, bosses, attack sequences, stories.
//!
//! The canonical data ships inside the binary (`embedded/masterdata.json`)
//! the same way the app constants do. Lookups by id fail hard with a
//! not-found error: a missing id is a data-integrity defect to fix upstream,
//! not a runtime condition to paper over with defaults.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

const MASTERDATA_JSON: &str = include_str!("../embedded/masterdata.json");

/// Errors from master data construction and lookup.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MasterDataError {
    #[error("stage not found: {0}")]
    StageNotFound(String),

    #[error("boss not found: {0}")]
    BossNotFound(String),

    #[error("attack sequence not found: {0}")]
    AttackSequenceNotFound(String),

    #[error("story not found: {0}")]
    StoryNotFound(String),

    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },
}

/// Stage metadata for selection and flow decisions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StageDef {
    pub id: String,
    pub display_name: String,
    pub order_index: i32,
    #[serde(default)]
    pub has_intro_story: bool,
    #[serde(default)]
    pub intro_story_id: String,
    #[serde(default)]
    pub has_outro_story: bool,
    #[serde(default)]
    pub outro_story_id: String,
    pub boss_id: String,
}

/// Player tuning values.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerParams {
    pub max_hp: i32,
    pub move_speed: f32,
    pub fire_interval_secs: f32,
}

/// Boss tuning values.
#[derive(Debug, Clone, Deserialize)]
pub struct BossParams {
    pub id: String,
    pub display_name: String,
    pub max_hp: i32,
    pub attack_sequence_id: String,
}

/// One scripted attack pattern step.
#[derive(Debug, Clone, Deserialize)]
pub struct AttackStep {
    pub pattern: String,
    pub duration_secs: f32,
}

/// Ordered attack pattern script for a boss.
#[derive(Debug, Clone, Deserialize)]
pub struct AttackSequence {
    pub id: String,
    pub steps: Vec<AttackStep>,
}

/// One page of dialogue.
#[derive(Debug, Clone, Deserialize)]
pub struct StoryPage {
    pub speaker: String,
    pub text: String,
}

/// A named run of dialogue pages shown before or after a battle.
#[derive(Debug, Clone, Deserialize)]
pub struct StorySequence {
    pub id: String,
    pub pages: Vec<StoryPage>,
}

#[derive(Debug, Deserialize)]
struct MasterDataFile {
    stages: Vec<StageDef>,
    player: PlayerParams,
    bosses: Vec<BossParams>,
    attack_sequences: Vec<AttackSequence>,
    stories: Vec<StorySequence>,
}

/// Read-only stage catalog port consumed by the flow orchestrator.
pub trait StageCatalog {
    /// Look up a stage by id.
    fn stage(&self, stage_id: &str) -> Result<&StageDef, MasterDataError>;

    /// All stages, ascending by order index, ties broken by id.
    fn all_stages(&self) -> &[StageDef];
}

/// In-memory master data repository.
pub struct MasterData {
    ordered_stages: Vec<StageDef>,
    stage_index_by_id: HashMap<String, usize>,
    player: PlayerParams,
    bosses: HashMap<String, BossParams>,
    attack_sequences: HashMap<String, AttackSequence>,
    stories: HashMap<String, StorySequence>,
}

impl MasterData {
    /// Parse the compiled-in master data.
    ///
    /// The embedded file is authored alongside the code, so a parse or
    /// duplicate-id failure here is a build defect and aborts startup.
    pub fn embedded() -> Self {
        let file: MasterDataFile = serde_json::from_str(MASTERDATA_JSON)
            .unwrap_or_else(|e| panic!("Failed to parse masterdata.json: {}", e));
        Self::from_file(file)
            .unwrap_or_else(|e| panic!("Invalid masterdata.json: {}", e))
    }

    fn from_file(file: MasterDataFile) -> Result<Self, MasterDataError> {
        let mut ordered_stages = file.stages;
        ordered_stages.sort_by(|a, b| {
            a.order_index
                .cmp(&b.order_index)
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut stage_index_by_id = HashMap::new();
        for (index, stage) in ordered_stages.iter().enumerate() {
            if stage_index_by_id.insert(stage.id.clone(), index).is_some() {
                return Err(MasterDataError::DuplicateId {
                    kind: "stage",
                    id: stage.id.clone(),
                });
            }
        }

        let mut bosses = HashMap::new();
        for boss in file.bosses {
            if bosses.insert(boss.id.clone(), boss.clone()).is_some() {
                return Err(MasterDataError::DuplicateId {
                    kind: "boss",
                    id: boss.id,
                });
            }
        }

        let mut attack_sequences = HashMap::new();
        for sequence in file.attack_sequences {
            if attack_sequences
                .insert(sequence.id.clone(), sequence.clone())
                .is_some()
            {
                return Err(MasterDataError::DuplicateId {
                    kind: "attack sequence",
                    id: sequence.id,
                });
            }
        }

        let mut stories = HashMap::new();
        for story in file.stories {
            if stories.insert(story.id.clone(), story.clone()).is_some() {
                return Err(MasterDataError::DuplicateId {
                    kind: "story",
                    id: story.id,
                });
            }
        }

        Ok(Self {
            ordered_stages,
            stage_index_by_id,
            player: file.player,
            bosses,
            attack_sequences,
            stories,
        })
    }

    pub fn player_params(&self) -> &PlayerParams {
        &self.player
    }

    pub fn boss(&self, boss_id: &str) -> Result<&BossParams, MasterDataError> {
        self.bosses
            .get(boss_id)
            .ok_or_else(|| MasterDataError::BossNotFound(boss_id.to_string()))
    }

    pub fn attack_sequence(&self, sequence_id: &str) -> Result<&AttackSequence, MasterDataError> {
        self.attack_sequences
            .get(sequence_id)
            .ok_or_else(|| MasterDataError::AttackSequenceNotFound(sequence_id.to_string()))
    }

    pub fn story(&self, story_id: &str) -> Result<&StorySequence, MasterDataError> {
        self.stories
            .get(story_id)
            .ok_or_else(|| MasterDataError::StoryNotFound(story_id.to_string()))
    }

    /// Check every cross-reference in the data set.
    ///
    /// Returns a human-readable problem list; empty means consistent. Used by
    /// the `check-data` CLI command.
    pub fn validate_references(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for stage in &self.ordered_stages {
            if stage.has_intro_story && self.story(&stage.intro_story_id).is_err() {
                problems.push(format!(
                    "stage {}: intro story not found: {}",
                    stage.id, stage.intro_story_id
                ));
            }
            if stage.has_outro_story && self.story(&stage.outro_story_id).is_err() {
                problems.push(format!(
                    "stage {}: outro story not found: {}",
                    stage.id, stage.outro_story_id
                ));
            }
            match self.boss(&stage.boss_id) {
                Err(_) => problems.push(format!(
                    "stage {}: boss not found: {}",
                    stage.id, stage.boss_id
                )),
                Ok(boss) => {
                    if self.attack_sequence(&boss.attack_sequence_id).is_err() {
                        problems.push(format!(
                            "boss {}: attack sequence not found: {}",
                            boss.id, boss.attack_sequence_id
                        ));
                    }
                }
            }
        }

        problems
    }
}

impl StageCatalog for MasterData {
    fn stage(&self, stage_id: &str) -> Result<&StageDef, MasterDataError> {
        self.stage_index_by_id
            .get(stage_id)
            .map(|&index| &self.ordered_stages[index])
            .ok_or_else(|| MasterDataError::StageNotFound(stage_id.to_string()))
    }

    fn all_stages(&self) -> &[StageDef] {
        &self.ordered_stages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_data_parses_and_is_consistent() {
        let data = MasterData::embedded();
        assert!(!data.all_stages().is_empty());
        assert_eq!(data.validate_references(), Vec::<String>::new());
    }

    #[test]
    fn stages_are_ordered_by_index_then_id() {
        let data = MasterData::embedded();
        let stages = data.all_stages();
        for pair in stages.windows(2) {
            let key_a = (pair[0].order_index, pair[0].id.as_str());
            let key_b = (pair[1].order_index, pair[1].id.as_str());
            assert!(key_a < key_b, "{:?} should sort before {:?}", key_a, key_b);
        }
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let data = MasterData::embedded();
        assert_eq!(
            data.stage("no_such_stage"),
            Err(MasterDataError::StageNotFound("no_such_stage".to_string()))
        );
        assert!(matches!(
            data.boss("no_such_boss"),
            Err(MasterDataError::BossNotFound(_))
        ));
        assert!(matches!(
            data.attack_sequence("no_such_seq"),
            Err(MasterDataError::AttackSequenceNotFound(_))
        ));
        assert!(matches!(
            data.story("no_such_story"),
            Err(MasterDataError::StoryNotFound(_))
        ));
    }

    #[test]
    fn intro_story_flags_resolve() {
        let data = MasterData::embedded();
        for stage in data.all_stages() {
            if stage.has_intro_story {
                assert!(data.story(&stage.intro_story_id).is_ok());
            }
            if stage.has_outro_story {
                assert!(data.story(&stage.outro_story_id).is_ok());
            }
        }
    }

    #[test]
    fn duplicate_stage_id_is_rejected() {
        let file = MasterDataFile {
            stages: vec![
                StageDef {
                    id: "s1".to_string(),
                    display_name: "One".to_string(),
                    order_index: 1,
                    has_intro_story: false,
                    intro_story_id: String::new(),
                    has_outro_story: false,
                    outro_story_id: String::new(),
                    boss_id: "b1".to_string(),
                },
                StageDef {
                    id: "s1".to_string(),
                    display_name: "Dup".to_string(),
                    order_index: 2,
                    has_intro_story: false,
                    intro_story_id: String::new(),
                    has_outro_story: false,
                    outro_story_id: String::new(),
                    boss_id: "b1".to_string(),
                },
            ],
            player: PlayerParams {
                max_hp: 10,
                move_speed: 1.0,
                fire_interval_secs: 0.2,
            },
            bosses: Vec::new(),
            attack_sequences: Vec::new(),
            stories: Vec::new(),
        };

        assert_eq!(
            MasterData::from_file(file).err(),
            Some(MasterDataError::DuplicateId {
                kind: "stage",
                id: "s1".to_string()
            })
        );
    }
}
