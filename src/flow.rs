//! Flow orchestration: named user intents that drive the session.
//!
//! `GameFlow` is the only component that mutates [`GameSession`] in response
//! to user input. It validates stage ids against the catalog, applies the
//! session transition, and asks the scene loader for the matching view
//! switch. All preconditions are checked synchronously; nothing is retried.

use thiserror::Error;

use crate::app_data;
use crate::masterdata::{MasterDataError, StageCatalog};
use crate::scene::SceneLoader;
use crate::session::{GameSession, SessionError};

/// Errors from flow operations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FlowError {
    #[error("stage id is empty")]
    EmptyStageId,

    #[error(transparent)]
    Stage(#[from] MasterDataError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Stateless facade over the session, the stage catalog, and the scene loader.
pub struct GameFlow<C, S> {
    catalog: C,
    scenes: S,
}

impl<C: StageCatalog, S: SceneLoader> GameFlow<C, S> {
    pub fn new(catalog: C, scenes: S) -> Self {
        Self { catalog, scenes }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn scenes(&self) -> &S {
        &self.scenes
    }

    /// Land on the bare title screen.
    pub fn start_from_title(&mut self, session: &mut GameSession) {
        session.enter_title();
        self.scenes.load_title_scene();
    }

    pub fn open_stage_select(&mut self, session: &mut GameSession) {
        session.enter_stage_select();
    }

    /// Close always routes back to Title; there is no screen history.
    pub fn close_stage_select(&mut self, session: &mut GameSession) {
        session.enter_title();
    }

    pub fn open_option(&mut self, session: &mut GameSession) {
        session.enter_option();
    }

    pub fn close_option(&mut self, session: &mut GameSession) {
        session.enter_title();
    }

    /// Start the configured default stage.
    pub fn start_default_stage(&mut self, session: &mut GameSession) -> Result<(), FlowError> {
        self.start_game(session, &app_data::flow_config().default_stage_id)
    }

    /// Validate the stage id, enter the stage, and switch to the game scene.
    ///
    /// An unknown id is a data-integrity defect surfaced to the caller, not
    /// recovered from here.
    pub fn start_game(
        &mut self,
        session: &mut GameSession,
        stage_id: &str,
    ) -> Result<(), FlowError> {
        if stage_id.trim().is_empty() {
            return Err(FlowError::EmptyStageId);
        }

        let stage = self.catalog.stage(stage_id)?;
        let has_intro_story = stage.has_intro_story;

        session.enter_in_game(stage_id, has_intro_story)?;
        self.scenes.load_game_scene();
        tracing::info!("Started stage {}", stage_id);
        Ok(())
    }

    /// Leave gameplay and land directly on the stage picker.
    pub fn return_to_title_with_stage_select(&mut self, session: &mut GameSession) {
        session.enter_title();
        self.scenes.load_title_scene();
        session.enter_stage_select();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::masterdata::StageDef;
    use crate::scene::Scene;
    use crate::session::{GameMode, InGameMode};

    struct FakeCatalog {
        stages: Vec<StageDef>,
    }

    impl FakeCatalog {
        fn with_stages(ids: &[(&str, bool)]) -> Self {
            let stages = ids
                .iter()
                .enumerate()
                .map(|(i, (id, has_intro))| StageDef {
                    id: id.to_string(),
                    display_name: id.to_string(),
                    order_index: i as i32 + 1,
                    has_intro_story: *has_intro,
                    intro_story_id: String::new(),
                    has_outro_story: false,
                    outro_story_id: String::new(),
                    boss_id: "boss".to_string(),
                })
                .collect();
            Self { stages }
        }
    }

    impl StageCatalog for FakeCatalog {
        fn stage(&self, stage_id: &str) -> Result<&StageDef, MasterDataError> {
            self.stages
                .iter()
                .find(|s| s.id == stage_id)
                .ok_or_else(|| MasterDataError::StageNotFound(stage_id.to_string()))
        }

        fn all_stages(&self) -> &[StageDef] {
            &self.stages
        }
    }

    #[derive(Default)]
    struct RecordingScenes {
        calls: Vec<Scene>,
    }

    impl SceneLoader for RecordingScenes {
        fn load_title_scene(&mut self) {
            self.calls.push(Scene::Title);
        }

        fn load_game_scene(&mut self) {
            self.calls.push(Scene::Game);
        }
    }

    fn flow_with(
        ids: &[(&str, bool)],
    ) -> (GameFlow<FakeCatalog, RecordingScenes>, GameSession) {
        (
            GameFlow::new(FakeCatalog::with_stages(ids), RecordingScenes::default()),
            GameSession::new(),
        )
    }

    #[test]
    fn start_game_enters_stage_and_loads_game_scene() {
        let (mut flow, mut session) = flow_with(&[("stage_01", true)]);

        flow.start_game(&mut session, "stage_01").unwrap();

        assert_eq!(session.mode(), GameMode::InGame);
        assert_eq!(session.in_game_mode(), InGameMode::StoryBeforeBattle);
        assert_eq!(session.current_stage_id(), "stage_01");
        assert_eq!(flow.scenes().calls, vec![Scene::Game]);
    }

    #[test]
    fn start_game_without_intro_goes_straight_to_battle() {
        let (mut flow, mut session) = flow_with(&[("stage_02", false)]);
        flow.start_game(&mut session, "stage_02").unwrap();
        assert_eq!(session.in_game_mode(), InGameMode::Battle);
    }

    #[test]
    fn start_game_rejects_blank_id_before_lookup() {
        let (mut flow, mut session) = flow_with(&[("stage_01", false)]);

        assert_eq!(
            flow.start_game(&mut session, "  "),
            Err(FlowError::EmptyStageId)
        );
        assert_eq!(session.mode(), GameMode::Title);
        assert!(flow.scenes().calls.is_empty());
    }

    #[test]
    fn start_game_surfaces_unknown_stage_without_mutating() {
        let (mut flow, mut session) = flow_with(&[("stage_01", false)]);

        let result = flow.start_game(&mut session, "stage_99");
        assert_eq!(
            result,
            Err(FlowError::Stage(MasterDataError::StageNotFound(
                "stage_99".to_string()
            )))
        );
        assert_eq!(session.mode(), GameMode::Title);
        assert_eq!(session.current_stage_id(), "");
        assert!(flow.scenes().calls.is_empty());
    }

    #[test]
    fn open_and_close_stage_select_route_through_title() {
        let (mut flow, mut session) = flow_with(&[]);

        flow.open_stage_select(&mut session);
        assert_eq!(session.mode(), GameMode::StageSelect);

        flow.close_stage_select(&mut session);
        assert_eq!(session.mode(), GameMode::Title);
    }

    #[test]
    fn open_and_close_option_route_through_title() {
        let (mut flow, mut session) = flow_with(&[]);

        flow.open_option(&mut session);
        assert_eq!(session.mode(), GameMode::Option);

        flow.close_option(&mut session);
        assert_eq!(session.mode(), GameMode::Title);
    }

    #[test]
    fn start_from_title_loads_title_scene() {
        let (mut flow, mut session) = flow_with(&[]);
        session.enter_stage_select();

        flow.start_from_title(&mut session);

        assert_eq!(session.mode(), GameMode::Title);
        assert_eq!(flow.scenes().calls, vec![Scene::Title]);
    }

    #[test]
    fn return_to_title_with_stage_select_lands_on_picker() {
        let (mut flow, mut session) = flow_with(&[("stage_01", false)]);
        flow.start_game(&mut session, "stage_01").unwrap();

        flow.return_to_title_with_stage_select(&mut session);

        assert_eq!(session.mode(), GameMode::StageSelect);
        assert_eq!(session.current_stage_id(), "");
        assert!(!session.is_paused());
        assert_eq!(flow.scenes().calls, vec![Scene::Game, Scene::Title]);
    }

    #[test]
    fn start_default_stage_uses_configured_id() {
        let default_id = crate::app_data::flow_config().default_stage_id.clone();
        let (mut flow, mut session) = flow_with(&[(default_id.as_str(), true)]);

        flow.start_default_stage(&mut session).unwrap();
        assert_eq!(session.current_stage_id(), default_id);
    }
}
