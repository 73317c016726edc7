//! Browser bindings
//!
//! `WebGame` wraps a `Game` backed by LocalStorage for a JS host. The host
//! forwards input, calls `frame` from `requestAnimationFrame` while
//! `wants_frame` is true, and draws the JSON display list on a canvas.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::game::{Game, InputEvent, RunSummary, SettingChange};
use crate::highscores::LocalLeaderboard;
use crate::persistence::LocalStorageStore;
use crate::renderer::{NullRenderer, display_list};
use crate::settings::{Difficulty, Theme};
use crate::sim::{GamePhase, Viewport};

type BrowserGame = Game<LocalStorageStore, LocalLeaderboard<LocalStorageStore>>;

/// Score overlay state
#[derive(Serialize)]
struct Hud<'a> {
    phase: GamePhase,
    score: u64,
    best_score: u64,
    last_run: Option<&'a RunSummary>,
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WebGame {
    game: BrowserGame,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Result<WebGame, JsValue> {
        crate::init_wasm_logging();
        let store = LocalStorageStore::open().map_err(js_error)?;
        let scores = LocalStorageStore::open().map_err(js_error)?;
        let game = Game::new(store, LocalLeaderboard::new(scores), Viewport::new(width, height));
        log::info!("Skyflap ready ({}x{})", width, height);
        Ok(Self { game })
    }

    pub fn finish_loading(&mut self) {
        if let Err(e) = self.game.finish_loading() {
            log::debug!("{}", e);
        }
    }

    pub fn flap(&mut self) {
        self.game.handle(InputEvent::Flap);
    }

    pub fn toggle_pause(&mut self) {
        self.game.handle(InputEvent::TogglePause);
    }

    pub fn restart(&mut self) {
        self.game.handle(InputEvent::Restart);
    }

    /// Go to a screen by name ("menu", "playing", "scores", ...)
    pub fn navigate(&mut self, screen: &str) {
        match GamePhase::from_name(screen) {
            Some(phase) => self.game.handle(InputEvent::Navigate(phase)),
            None => log::warn!("Unknown screen {:?}", screen),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.game.handle(InputEvent::Resize(Viewport::new(width, height)));
    }

    pub fn set_difficulty(&mut self, name: &str) {
        let difficulty = Difficulty::from_name_or_default(name);
        self.game.handle(InputEvent::SettingChanged(SettingChange::Difficulty(difficulty)));
    }

    pub fn set_theme(&mut self, name: &str) {
        let theme = Theme::from(name.to_string());
        self.game.handle(InputEvent::SettingChanged(SettingChange::Theme(theme)));
    }

    pub fn set_sound(&mut self, on: bool) {
        self.game.handle(InputEvent::SettingChanged(SettingChange::Sound(on)));
    }

    pub fn reset_settings(&mut self) {
        self.game.handle(InputEvent::ResetSettings);
    }

    pub fn submit_score(&mut self, player: String) {
        self.game.handle(InputEvent::SubmitScore(player));
    }

    pub fn clear_scores(&mut self) {
        self.game.handle(InputEvent::ClearScores);
    }

    pub fn wants_frame(&self) -> bool {
        self.game.wants_frame()
    }

    /// Simulate one frame. Returns whether another is wanted.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        self.game.frame(now_ms, &mut NullRenderer)
    }

    /// Current scene as a JSON array of shapes
    pub fn display_list(&self) -> Result<String, JsValue> {
        serde_json::to_string(&display_list(&self.game.snapshot())).map_err(js_error)
    }

    pub fn hud(&self) -> Result<String, JsValue> {
        let hud = Hud {
            phase: self.game.phase(),
            score: self.game.score(),
            best_score: self.game.best_score(),
            last_run: self.game.last_run(),
        };
        serde_json::to_string(&hud).map_err(js_error)
    }

    /// Leaderboard entries loaded for the scores screen
    pub fn scores(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.game.scores()).map_err(js_error)
    }

    /// Pending notices as JSON, emptying the queue
    pub fn take_notices(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.game.take_notices()).map_err(js_error)
    }
}
