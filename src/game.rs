//! Game controller
//!
//! Owns the session state and its collaborators, drives the frame loop and
//! turns input events into phase transitions. Everything runs on the host's
//! single UI thread: input handlers and frames never interleave.

use serde::Serialize;

use crate::error::{GameError, LeaderboardError, StoreError};
use crate::highscores::{Leaderboard, ScoreEntry, normalize_player_name};
use crate::persistence::{KeyValueStore, load_best_score, save_best_score};
use crate::renderer::{FrameSnapshot, Renderer};
use crate::settings::{Difficulty, DifficultyProfile, Settings, Theme};
use crate::sim::{Crash, GamePhase, GameState, TickOutcome, Viewport, tick};

/// Input from the host, already decoded from keys/clicks/touches
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Upward impulse (space, up arrow, click, tap)
    Flap,
    Pause,
    Resume,
    /// Pause when playing, resume when paused (escape)
    TogglePause,
    /// Start a fresh run from pause or game over
    Restart,
    /// Go to a screen; `Playing` starts a run
    Navigate(GamePhase),
    /// Host viewport changed size
    Resize(Viewport),
    SettingChanged(SettingChange),
    ResetSettings,
    /// Submit the last run's score under this name
    SubmitScore(String),
    ClearScores,
}

/// A single settings field update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingChange {
    /// Saved immediately; a live run keeps its difficulty until it ends
    Difficulty(Difficulty),
    Sound(bool),
    Theme(Theme),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Error,
}

/// User-visible, non-fatal message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Shown on the game-over screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub final_score: u64,
    pub best_score: u64,
    pub new_best: bool,
    #[serde(skip)]
    pub crash: Crash,
}

/// Single-slot frame request tracker.
///
/// At most one frame is pending. Cancelling clears the slot and the time
/// baseline, so the first frame after a (re)start has zero delta.
#[derive(Debug, Clone, Default)]
struct FrameLoop {
    pending: bool,
    last_time: Option<f64>,
}

impl FrameLoop {
    /// Request the first frame of a loop. Returns false if one is already pending.
    fn start(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        self.last_time = None;
        true
    }

    fn cancel(&mut self) {
        self.pending = false;
        self.last_time = None;
    }

    /// Consume the pending request, returning the delta since the last frame
    fn take(&mut self, now_ms: f64) -> Option<f64> {
        if !self.pending {
            return None;
        }
        self.pending = false;
        let delta = self.last_time.map_or(0.0, |t| (now_ms - t).max(0.0));
        self.last_time = Some(now_ms);
        Some(delta)
    }

    /// Chain the next frame of a running loop
    fn reschedule(&mut self) {
        self.pending = true;
    }
}

/// Game instance holding all state
pub struct Game<S, L> {
    state: GameState,
    settings: Settings,
    /// Difficulty locked in when the current run started
    run_profile: DifficultyProfile,
    viewport: Viewport,
    store: S,
    leaderboard: L,
    best_score: u64,
    frame_loop: FrameLoop,
    last_run: Option<RunSummary>,
    scores: Vec<ScoreEntry>,
    notices: Vec<Notice>,
}

impl<S: KeyValueStore, L: Leaderboard> Game<S, L> {
    /// Load settings and best score, starting in the loading phase
    pub fn new(store: S, leaderboard: L, viewport: Viewport) -> Self {
        Self::with_state(GameState::new(), store, leaderboard, viewport)
    }

    /// Same as `new` with a caller-provided session (e.g. seeded)
    pub fn with_state(state: GameState, store: S, leaderboard: L, viewport: Viewport) -> Self {
        let settings = Settings::load(&store);
        let mut notices = Vec::new();
        let best_score = load_best_score(&store).unwrap_or_else(|e| {
            log::warn!("Could not read best score: {}", e);
            notices.push(Notice::error(format!("Could not load best score: {}", e)));
            0
        });
        Self {
            state,
            run_profile: settings.profile(),
            settings,
            viewport,
            store,
            leaderboard,
            best_score,
            frame_loop: FrameLoop::default(),
            last_run: None,
            scores: Vec::new(),
            notices,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    /// Result of the most recent run, once it has ended
    pub fn last_run(&self) -> Option<&RunSummary> {
        self.last_run.as_ref()
    }

    /// Leaderboard entries fetched when the scores screen was opened
    pub fn scores(&self) -> &[ScoreEntry] {
        &self.scores
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn leaderboard(&self) -> &L {
        &self.leaderboard
    }

    /// Drain pending notices
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Whether the host should call `frame` on its next animation frame
    pub fn wants_frame(&self) -> bool {
        self.frame_loop.pending
    }

    /// Viewport changed; applies to subsequent spawns and bounds checks.
    ///
    /// While a run is live the new size must still fit the run's difficulty,
    /// otherwise the resize is refused and the old viewport kept.
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), GameError> {
        if self.state.flier.is_some() {
            self.run_profile.check_viewport(viewport.height)?;
        }
        log::debug!("Viewport {}x{}", viewport.width, viewport.height);
        self.viewport = viewport;
        Ok(())
    }

    /// Loading screen finished
    pub fn finish_loading(&mut self) -> Result<(), GameError> {
        self.state.transition(GamePhase::Menu)?;
        Ok(())
    }

    /// Start a fresh run from the menu, pause or game over
    pub fn start_run(&mut self) -> Result<(), GameError> {
        if !self.state.phase.can_transition_to(GamePhase::Playing) {
            return Err(self.illegal(GamePhase::Playing));
        }
        let profile = self.settings.profile();
        profile.check_viewport(self.viewport.height)?;
        self.state.transition(GamePhase::Playing)?;

        self.frame_loop.cancel();
        self.last_run = None;
        self.run_profile = profile;
        self.state.begin_run(self.viewport, &profile);
        log::info!(
            "Run started ({}, {}x{})",
            self.settings.difficulty.as_str(),
            self.viewport.width,
            self.viewport.height
        );
        self.frame_loop.start();
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), GameError> {
        if self.state.phase != GamePhase::Playing {
            return Err(self.illegal(GamePhase::Paused));
        }
        self.state.transition(GamePhase::Paused)?;
        self.frame_loop.cancel();
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), GameError> {
        if self.state.phase != GamePhase::Paused {
            return Err(self.illegal(GamePhase::Playing));
        }
        self.state.transition(GamePhase::Playing)?;
        self.frame_loop.start();
        Ok(())
    }

    /// Back to the main menu, abandoning any live run
    pub fn go_to_menu(&mut self) -> Result<(), GameError> {
        self.state.transition(GamePhase::Menu)?;
        self.frame_loop.cancel();
        self.state.end_run();
        Ok(())
    }

    /// Open a menu overlay (scores, settings, about)
    pub fn open_overlay(&mut self, overlay: GamePhase) -> Result<(), GameError> {
        if !overlay.is_overlay() {
            return Err(self.illegal(overlay));
        }
        self.state.transition(overlay)?;
        if overlay == GamePhase::Scores {
            self.refresh_scores();
        }
        Ok(())
    }

    fn illegal(&self, to: GamePhase) -> GameError {
        crate::error::TransitionError {
            from: self.state.phase,
            to,
        }
        .into()
    }

    /// Apply an input event. Events that do not apply in the current phase are ignored.
    pub fn handle(&mut self, event: InputEvent) {
        let result = match event {
            InputEvent::Flap => {
                self.state.flap();
                Ok(())
            }
            InputEvent::Pause => self.pause(),
            InputEvent::Resume => self.resume(),
            InputEvent::TogglePause => match self.state.phase {
                GamePhase::Playing => self.pause(),
                GamePhase::Paused => self.resume(),
                _ => Ok(()),
            },
            InputEvent::Restart => match self.state.phase {
                GamePhase::Paused | GamePhase::GameOver => self.start_run(),
                _ => Ok(()),
            },
            InputEvent::Navigate(GamePhase::Playing) => self.start_run(),
            InputEvent::Navigate(GamePhase::Menu) => self.go_to_menu(),
            InputEvent::Navigate(GamePhase::Paused) => self.pause(),
            InputEvent::Navigate(overlay) if overlay.is_overlay() => self.open_overlay(overlay),
            InputEvent::Navigate(other) => Err(self.illegal(other)),
            InputEvent::Resize(viewport) => self.resize(viewport),
            InputEvent::SettingChanged(change) => {
                self.change_setting(change);
                Ok(())
            }
            InputEvent::ResetSettings => {
                self.reset_settings();
                Ok(())
            }
            InputEvent::SubmitScore(name) => {
                self.submit_score(&name);
                Ok(())
            }
            InputEvent::ClearScores => {
                self.clear_scores();
                Ok(())
            }
        };

        if let Err(e) = result {
            match e {
                GameError::Config(e) => {
                    log::warn!("{}", e);
                    self.notices.push(Notice::error(e.to_string()));
                }
                GameError::Transition(e) => log::debug!("Ignored input: {}", e),
            }
        }
    }

    /// Host's per-frame callback.
    ///
    /// Simulates and renders one frame if one was requested and a run is
    /// live. Returns whether another frame is wanted.
    pub fn frame(&mut self, now_ms: f64, renderer: &mut impl Renderer) -> bool {
        if !self.state.phase.runs_simulation() {
            self.frame_loop.cancel();
            return false;
        }
        let Some(delta) = self.frame_loop.take(now_ms) else {
            return false;
        };

        let outcome = tick(&mut self.state, &self.run_profile, self.viewport, delta);
        renderer.render(&self.snapshot());

        match outcome {
            TickOutcome::Crashed(crash) => {
                self.on_game_over(crash);
                false
            }
            TickOutcome::Continue { .. } => {
                self.frame_loop.reschedule();
                true
            }
            TickOutcome::Idle => {
                self.frame_loop.cancel();
                false
            }
        }
    }

    /// Read-only view of the current frame for a renderer
    pub fn snapshot(&self) -> FrameSnapshot<'_> {
        FrameSnapshot {
            phase: self.state.phase,
            viewport: self.viewport,
            theme: self.settings.theme,
            score: self.state.score,
            flier: self.state.flier.as_ref(),
            obstacles: &self.state.obstacles,
            particles: &self.state.particles,
        }
    }

    fn on_game_over(&mut self, crash: Crash) {
        self.frame_loop.cancel();
        self.state.end_run();

        let score = self.state.score;
        let new_best = score > self.best_score;
        if new_best {
            self.best_score = score;
            log::info!("New best score: {}", score);
            if let Err(e) = save_best_score(&mut self.store, score) {
                self.store_failed("save best score", &e);
            }
        }
        log::info!("Game over ({:?}): score {}, best {}", crash, score, self.best_score);

        self.last_run = Some(RunSummary {
            final_score: score,
            best_score: self.best_score,
            new_best,
            crash,
        });
    }

    fn change_setting(&mut self, change: SettingChange) {
        match change {
            SettingChange::Difficulty(d) => self.settings.difficulty = d,
            SettingChange::Sound(on) => self.settings.sound = on,
            SettingChange::Theme(t) => self.settings.theme = t,
        }
        self.save_settings();
    }

    fn reset_settings(&mut self) {
        if let Err(e) = self.settings.reset(&mut self.store) {
            self.store_failed("save settings", &e);
        }
    }

    fn save_settings(&mut self) {
        if let Err(e) = self.settings.save(&mut self.store) {
            self.store_failed("save settings", &e);
        }
    }

    fn store_failed(&mut self, what: &str, e: &StoreError) {
        log::warn!("Could not {}: {}", what, e);
        self.notices
            .push(Notice::error(format!("Could not {}: {}", what, e)));
    }

    fn leaderboard_failed(&mut self, what: &str, e: &LeaderboardError) {
        log::warn!("Could not {}: {}", what, e);
        self.notices
            .push(Notice::error(format!("Could not {}: {}", what, e)));
    }

    fn submit_score(&mut self, name: &str) {
        if self.state.phase != GamePhase::GameOver {
            return;
        }
        let Some(run) = self.last_run else {
            return;
        };
        let player = normalize_player_name(name);
        match self.leaderboard.submit_score(&player, run.final_score) {
            Ok(()) => {
                log::info!("Submitted score {} for {}", run.final_score, player);
                self.notices.push(Notice::info("Score saved"));
            }
            Err(e) => self.leaderboard_failed("save score", &e),
        }
    }

    fn refresh_scores(&mut self) {
        match self.leaderboard.list_scores() {
            Ok(scores) => self.scores = scores,
            Err(e) => {
                self.scores.clear();
                self.leaderboard_failed("load scores", &e);
            }
        }
    }

    fn clear_scores(&mut self) {
        if self.state.phase != GamePhase::Scores {
            return;
        }
        match self.leaderboard.clear_scores() {
            Ok(()) => {
                self.scores.clear();
                self.notices.push(Notice::info("Scores cleared"));
            }
            Err(e) => self.leaderboard_failed("clear scores", &e),
        }
    }
}
