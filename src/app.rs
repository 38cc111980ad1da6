use anyhow::Result;
use eframe::egui;

use crate::app_data;
use crate::battle::{BattleContext, StandardEntityFactory};
use crate::flow::GameFlow;
use crate::masterdata::{MasterData, StageCatalog, StoryPage};
use crate::options::OptionEditor;
use crate::router::{RouterError, ScreenRouter};
use crate::save::{self, JsonSaveStore, SaveStore, StageRank};
use crate::scene::{Scene, SceneDirector};
use crate::session::{BattlePhase, GameMode, GameSession, InGameMode};
use crate::settings::{EguiSettingsApplier, GameSettings, SettingsApplier};
use crate::ui;
use crate::ui::theme::Theme;

/// One stage-select row, joined from the catalog and save progress.
#[derive(Debug, Clone)]
pub struct StageRow {
    pub stage_id: String,
    pub display_name: String,
    pub unlocked: bool,
    pub cleared: bool,
    pub best_rank: StageRank,
}

/// Everything the views and the back-router close actions operate on.
///
/// The router lives next to this struct rather than inside it so a back
/// event can hold the router mutably while the close action mutates the
/// rest of the state.
pub struct GameCtx {
    /// Authoritative flow state, re-read by every view each frame
    pub session: GameSession,
    /// Flow orchestrator over the stage catalog and scene director
    pub flow: GameFlow<MasterData, SceneDirector>,
    /// Options editing session over the save store and live applier
    pub options: OptionEditor<JsonSaveStore, EguiSettingsApplier>,
    /// Store handle for stage progress (same file the option editor writes)
    pub save_store: JsonSaveStore,
    /// Inert battle entity container for the current sortie
    pub battle: BattleContext,
    /// UI palette
    pub theme: Theme,
    /// Status line for surfaced errors
    pub status_message: String,
    /// Widget-bound settings copy while the options overlay is open
    pub option_form: Option<GameSettings>,
    /// Stage-select rows, rebuilt when the overlay opens
    pub stage_rows: Vec<StageRow>,
    /// Pages of the story currently playing
    story_pages: Vec<StoryPage>,
    /// Index into `story_pages`
    story_page: usize,
}

impl GameCtx {
    pub fn new(egui_ctx: egui::Context) -> Result<Self> {
        let master = MasterData::embedded();
        for problem in master.validate_references() {
            tracing::warn!("Master data problem: {}", problem);
        }

        let save_store = JsonSaveStore::at_default_location()?;
        Self::with_parts(egui_ctx, master, save_store)
    }

    fn with_parts(
        egui_ctx: egui::Context,
        master: MasterData,
        save_store: JsonSaveStore,
    ) -> Result<Self> {
        // Apply persisted settings before the first frame.
        let save = save_store.load_or_create_default();
        let mut applier = EguiSettingsApplier::new(egui_ctx);
        applier.apply_settings(&save.settings);

        let options = OptionEditor::new(save_store.clone(), applier);
        let mut flow = GameFlow::new(master, SceneDirector::new());
        let mut session = GameSession::new();
        flow.start_from_title(&mut session);

        Ok(Self {
            session,
            flow,
            options,
            save_store,
            battle: BattleContext::new(),
            theme: Theme::cockpit(),
            status_message: String::new(),
            option_form: None,
            stage_rows: Vec::new(),
            story_pages: Vec::new(),
            story_page: 0,
        })
    }

    /// Start a stage by id, surfacing failures on the status line.
    pub fn start_stage(&mut self, stage_id: &str) {
        self.battle = BattleContext::new();
        self.story_pages.clear();
        self.story_page = 0;

        if let Err(e) = self.flow.start_game(&mut self.session, stage_id) {
            tracing::error!("Failed to start stage {}: {}", stage_id, e);
            self.status_message = format!("Failed to start stage: {}", e);
            return;
        }
        self.status_message.clear();

        if self.session.in_game_mode() == InGameMode::StoryBeforeBattle {
            let story_id = self
                .flow
                .catalog()
                .stage(stage_id)
                .map(|stage| stage.intro_story_id.clone())
                .unwrap_or_default();
            self.load_story(&story_id);
        }
    }

    pub fn start_default_stage(&mut self) {
        let stage_id = app_data::flow_config().default_stage_id.clone();
        self.start_stage(&stage_id);
    }

    /// Rebuild the stage-select rows from the catalog and current progress.
    pub fn refresh_stage_rows(&mut self) {
        let save = self.save_store.load_or_create_default();
        let stages = self.flow.catalog().all_stages();

        self.stage_rows = stages
            .iter()
            .map(|stage| {
                let progress = save.find_stage(&stage.id);
                StageRow {
                    stage_id: stage.id.clone(),
                    display_name: stage.display_name.clone(),
                    unlocked: save::is_stage_unlocked(&save, stages, &stage.id),
                    cleared: progress.is_some_and(|p| p.cleared),
                    best_rank: progress.map(|p| p.best_rank).unwrap_or_default(),
                }
            })
            .collect();
    }

    /// Adopt an options-form change and echo the normalized copy back.
    pub fn apply_option_change(&mut self, next: &GameSettings) {
        let adopted = self.options.apply_change(next);
        self.option_form = Some(adopted);
    }

    /// Persist the working settings and land back on the title root.
    pub fn close_option_and_save(&mut self) {
        if let Err(e) = self.options.close_and_save() {
            tracing::error!("Failed to save settings: {}", e);
            self.status_message = format!("Failed to save settings: {}", e);
        }
        self.flow.close_option(&mut self.session);
        self.option_form = None;
    }

    /// Discard the working settings and land back on the title root.
    pub fn cancel_option(&mut self) {
        self.options.cancel();
        self.flow.close_option(&mut self.session);
        self.option_form = None;
    }

    /// Create the battle entities for the current stage if missing.
    pub fn ensure_battle_setup(&mut self) {
        if self.battle.player.is_some() {
            return;
        }

        let stage_id = self.session.current_stage_id().to_string();
        let factory = self.flow.catalog().stage(&stage_id).and_then(|stage| {
            let boss = self.flow.catalog().boss(&stage.boss_id)?;
            Ok(StandardEntityFactory::new(
                self.flow.catalog().player_params().clone(),
                boss.clone(),
            ))
        });

        match factory {
            Ok(factory) => self.battle.setup(&factory),
            Err(e) => {
                tracing::error!("Cannot set up battle for {}: {}", stage_id, e);
                self.status_message = format!("Battle setup failed: {}", e);
            }
        }
    }

    /// Move the battle phase, keeping the entity container in step.
    pub fn set_battle_phase(&mut self, next: BattlePhase) {
        if let Err(e) = self.session.set_battle_phase(next) {
            tracing::warn!("Rejected phase change to {:?}: {}", next, e);
            return;
        }
        self.battle.phase = next;

        if next == BattlePhase::BossDefeated {
            if let Some(boss) = &mut self.battle.boss {
                boss.hp = 0;
            }
        }
    }

    pub fn current_story_page(&self) -> Option<&StoryPage> {
        self.story_pages.get(self.story_page)
    }

    /// Advance the story one page; the last page hands control onward.
    pub fn advance_story(&mut self) {
        self.story_page += 1;
        if self.story_page < self.story_pages.len() {
            return;
        }

        match self.session.in_game_mode() {
            InGameMode::StoryBeforeBattle => {
                if let Err(e) = self.session.set_in_game_mode(InGameMode::Battle) {
                    tracing::warn!("Could not enter battle after intro: {}", e);
                }
            }
            InGameMode::StoryAfterBattle => self.complete_stage(),
            InGameMode::Battle => {}
        }
    }

    /// Leave the battle once it reports done: outro story when the stage
    /// has one, otherwise straight to completion.
    pub fn finish_battle(&mut self) {
        let stage_id = self.session.current_stage_id().to_string();
        let outro = self
            .flow
            .catalog()
            .stage(&stage_id)
            .ok()
            .filter(|stage| stage.has_outro_story)
            .map(|stage| stage.outro_story_id.clone());

        match outro {
            Some(story_id) => {
                if let Err(e) = self.session.set_in_game_mode(InGameMode::StoryAfterBattle) {
                    tracing::warn!("Could not enter outro story: {}", e);
                    return;
                }
                self.load_story(&story_id);
            }
            None => self.complete_stage(),
        }
    }

    /// Restart the current battle from the boss boot phase.
    pub fn retry_stage(&mut self) {
        if let Err(e) = self.session.set_battle_phase(BattlePhase::BossBoot) {
            tracing::warn!("Retry rejected: {}", e);
            return;
        }
        self.battle.reset_for_retry();
    }

    pub fn current_stage_name(&self) -> String {
        let stage_id = self.session.current_stage_id();
        self.flow
            .catalog()
            .stage(stage_id)
            .map(|stage| stage.display_name.clone())
            .unwrap_or_else(|_| stage_id.to_string())
    }

    fn load_story(&mut self, story_id: &str) {
        self.story_page = 0;
        self.story_pages = match self.flow.catalog().story(story_id) {
            Ok(story) => story.pages.clone(),
            Err(e) => {
                tracing::error!("Story lookup failed: {}", e);
                Vec::new()
            }
        };

        // An empty story hands control onward immediately.
        if self.story_pages.is_empty() {
            self.advance_story();
        }
    }

    fn complete_stage(&mut self) {
        let stage_id = self.session.current_stage_id().to_string();

        // TODO: derive the rank from battle results once the simulation lands.
        let rank = StageRank::A;
        let stages = self.flow.catalog().all_stages().to_vec();
        if let Err(e) = save::record_stage_clear(&self.save_store, &stages, &stage_id, rank) {
            tracing::error!("Failed to record clear for {}: {}", stage_id, e);
            self.status_message = format!("Failed to record progress: {}", e);
        }

        self.battle = BattleContext::new();
        self.story_pages.clear();
        self.story_page = 0;
        self.flow.return_to_title_with_stage_select(&mut self.session);
    }
}

/// Register the closeable overlays with their back-routing priorities.
///
/// Activity predicates read the session lazily, so the router stays in step
/// with whatever the orchestrators did this frame.
fn build_router() -> Result<ScreenRouter<GameCtx>, RouterError> {
    let screens = app_data::screens_config();
    let mut router = ScreenRouter::new();

    router.register(
        "stage_select",
        screens.stage_select_priority,
        |ctx: &GameCtx| ctx.session.mode() == GameMode::StageSelect,
        |ctx: &mut GameCtx| ctx.flow.close_stage_select(&mut ctx.session),
    )?;
    router.register(
        "option",
        screens.option_priority,
        |ctx: &GameCtx| ctx.session.mode() == GameMode::Option,
        |ctx: &mut GameCtx| ctx.close_option_and_save(),
    )?;
    router.register(
        "pause",
        screens.pause_priority,
        |ctx: &GameCtx| ctx.session.is_paused(),
        |ctx: &mut GameCtx| {
            ctx.session.try_set_paused(false);
        },
    )?;

    Ok(router)
}

/// Main application
pub struct SkybreakerApp {
    state: GameCtx,
    router: ScreenRouter<GameCtx>,
}

impl SkybreakerApp {
    /// Create a new application instance
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self> {
        let state = GameCtx::new(cc.egui_ctx.clone())?;
        state.theme.apply(&cc.egui_ctx);

        let router = build_router()?;
        tracing::info!("Skybreaker ready");
        Ok(Self { state, router })
    }

    /// Deliver one back event: topmost overlay first, otherwise open pause.
    fn handle_back_input(&mut self) {
        if self.router.try_handle_back(&mut self.state) {
            return;
        }
        if self.state.session.can_pause() {
            self.state.session.try_set_paused(true);
        }
    }
}

impl eframe::App for SkybreakerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Each Esc press counts as exactly one back event.
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.handle_back_input();
        }

        // Lazily prepare overlay state for the current mode.
        match self.state.session.mode() {
            GameMode::StageSelect => {
                if self.state.stage_rows.is_empty() {
                    self.state.refresh_stage_rows();
                }
            }
            GameMode::Option => {
                if self.state.option_form.is_none() {
                    let current = self.state.options.open_and_get_current();
                    self.state.option_form = Some(current);
                }
            }
            _ => {
                self.state.stage_rows.clear();
            }
        }

        match self.state.flow.scenes().current() {
            Scene::Title => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui::render_title(&mut self.state, ui);
                });

                match self.state.session.mode() {
                    GameMode::StageSelect => ui::render_stage_select(&mut self.state, ctx),
                    GameMode::Option => ui::render_options(&mut self.state, ctx),
                    _ => {}
                }
            }
            Scene::Game => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui::render_game(&mut self.state, ui);
                });

                ui::render_pause_overlay(&mut self.state, ctx);
                ui::render_game_over_overlay(&mut self.state, ctx);
            }
        }
    }
}
