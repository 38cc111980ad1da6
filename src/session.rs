//! Game-flow session state.
//!
//! `GameSession` is the single source of truth for which top-level screen is
//! showing and what the in-game sub-state is. It is pure data plus transition
//! guards: scene loading and UI switching decisions live in `flow` and the
//! view layer. One instance is created at startup and handed by reference to
//! everything that needs it; there is no global holder.

use thiserror::Error;

/// Errors from guarded session transitions.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("stage id is empty")]
    EmptyStageId,

    #[error("operation is only valid while in-game")]
    NotInGame,
}

/// High-level mode of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    Title,
    StageSelect,
    Option,
    InGame,
}

/// Sub-mode while [`GameMode::InGame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InGameMode {
    StoryBeforeBattle,
    Battle,
    StoryAfterBattle,
}

/// Detailed phase inside a single battle.
///
/// The expected forward progression is declaration order, with `GameOver`
/// reachable from any phase. The session does not enforce sequence; whatever
/// drives gameplay sets phases explicitly. The only guard here is that
/// `GameOver` forces the pause flag off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BattlePhase {
    #[default]
    BattleStart,
    ConversationIntro,
    BossBoot,
    Combat,
    BossDefeated,
    ConversationOutro,
    BattleEnd,
    GameOver,
}

impl BattlePhase {
    /// Human-readable phase name for logs and the placeholder combat view.
    pub fn label(&self) -> &'static str {
        match self {
            BattlePhase::BattleStart => "Battle start",
            BattlePhase::ConversationIntro => "Intro conversation",
            BattlePhase::BossBoot => "Boss boot",
            BattlePhase::Combat => "Combat",
            BattlePhase::BossDefeated => "Boss defeated",
            BattlePhase::ConversationOutro => "Outro conversation",
            BattlePhase::BattleEnd => "Battle end",
            BattlePhase::GameOver => "Game over",
        }
    }
}

/// Single source of truth for the current game flow state.
///
/// Invariants, enforced by every operation:
/// - paused implies in-game and not game over
/// - `current_stage_id` is non-empty exactly while in-game
pub struct GameSession {
    mode: GameMode,
    in_game_mode: InGameMode,
    battle_phase: BattlePhase,
    is_paused: bool,
    current_stage_id: String,
}

impl GameSession {
    /// Create a session sitting on the title screen.
    pub fn new() -> Self {
        let mut session = Self {
            mode: GameMode::Title,
            in_game_mode: InGameMode::Battle,
            battle_phase: BattlePhase::BattleStart,
            is_paused: false,
            current_stage_id: String::new(),
        };
        session.enter_title();
        session
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn in_game_mode(&self) -> InGameMode {
        self.in_game_mode
    }

    pub fn battle_phase(&self) -> BattlePhase {
        self.battle_phase
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    /// Current stage id (e.g. "stage_01"). Empty when not in-game.
    pub fn current_stage_id(&self) -> &str {
        &self.current_stage_id
    }

    pub fn is_in_game(&self) -> bool {
        self.mode == GameMode::InGame
    }

    pub fn is_game_over(&self) -> bool {
        self.is_in_game() && self.battle_phase == BattlePhase::GameOver
    }

    pub fn can_pause(&self) -> bool {
        self.is_in_game() && !self.is_game_over()
    }

    /// Enter Title mode. Clears in-game state and unpauses.
    pub fn enter_title(&mut self) {
        self.mode = GameMode::Title;
        self.reset_in_game_state();
    }

    /// Enter StageSelect mode (floating UI on title).
    pub fn enter_stage_select(&mut self) {
        self.mode = GameMode::StageSelect;
        // Never keep paused outside InGame.
        self.is_paused = false;
    }

    /// Enter Option mode (floating UI on title).
    pub fn enter_option(&mut self) {
        self.mode = GameMode::Option;
        self.is_paused = false;
    }

    /// Enter InGame mode for the given stage.
    ///
    /// Starts in [`InGameMode::StoryBeforeBattle`] when the stage has an intro
    /// story, otherwise straight into [`InGameMode::Battle`].
    pub fn enter_in_game(
        &mut self,
        stage_id: &str,
        has_intro_story: bool,
    ) -> Result<(), SessionError> {
        if stage_id.trim().is_empty() {
            return Err(SessionError::EmptyStageId);
        }

        self.mode = GameMode::InGame;
        self.current_stage_id = stage_id.to_string();
        self.is_paused = false;

        self.in_game_mode = if has_intro_story {
            InGameMode::StoryBeforeBattle
        } else {
            InGameMode::Battle
        };
        self.battle_phase = BattlePhase::BattleStart;
        Ok(())
    }

    /// Update the in-game sub-mode. Only valid while in-game.
    pub fn set_in_game_mode(&mut self, next: InGameMode) -> Result<(), SessionError> {
        self.ensure_in_game()?;
        self.in_game_mode = next;

        // Story screens cannot be paused.
        if next != InGameMode::Battle {
            self.is_paused = false;
        }
        Ok(())
    }

    /// Update the battle phase. Only valid while in-game.
    pub fn set_battle_phase(&mut self, next: BattlePhase) -> Result<(), SessionError> {
        self.ensure_in_game()?;
        self.battle_phase = next;

        // Pausing is not allowed on the game-over screen.
        if next == BattlePhase::GameOver {
            self.is_paused = false;
        }
        Ok(())
    }

    /// Try to set the pause flag.
    ///
    /// Unpausing always succeeds. Pausing succeeds only while live in-game
    /// (not game over); returns false without mutating otherwise.
    pub fn try_set_paused(&mut self, paused: bool) -> bool {
        if !paused {
            self.is_paused = false;
            return true;
        }

        if !self.can_pause() {
            return false;
        }

        self.is_paused = true;
        true
    }

    /// Toggle pause. Returns false if the result would be "paused" but
    /// pausing is not allowed.
    pub fn try_toggle_pause(&mut self) -> bool {
        self.try_set_paused(!self.is_paused)
    }

    fn reset_in_game_state(&mut self) {
        self.is_paused = false;
        self.current_stage_id.clear();

        // Irrelevant outside InGame, but reset to stable defaults.
        self.in_game_mode = InGameMode::Battle;
        self.battle_phase = BattlePhase::BattleStart;
    }

    fn ensure_in_game(&self) -> Result<(), SessionError> {
        if !self.is_in_game() {
            return Err(SessionError::NotInGame);
        }
        Ok(())
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
