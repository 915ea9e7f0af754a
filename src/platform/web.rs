//! Browser bridge
//!
//! JS owns the frame loop and the canvas; it feeds raw device state in and
//! pulls JSON snapshots out once per animation frame.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use super::{parse_mode, settings_from_host};
use crate::highscores::{HighScores, SummarySink};
use crate::sim::{InputAggregator, RawInput, Round, TickInput};

fn to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Game handle exported to JS
#[wasm_bindgen]
pub struct WebGame {
    round: Round,
    input: InputAggregator,
    raw: RawInput,
    scores: HighScores,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game from optional settings JSON
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>) -> Result<WebGame, JsValue> {
        console_error_panic_hook::set_once();
        // A second handle on the same page finds the logger already installed
        if console_log::init_with_level(log::Level::Info).is_err() {
            log::debug!("Logger already initialised");
        }

        let mut settings = settings_from_host(settings_json.as_deref()).map_err(to_js)?;
        if settings.seed.is_none() {
            settings.seed = Some(js_sys::Date::now() as u64);
        }
        log::info!("Reaction Rush (web) ready, preset {}", settings.preset.as_str());

        Ok(WebGame {
            round: Round::new(settings),
            input: InputAggregator::new(),
            raw: RawInput::default(),
            scores: HighScores::new(),
        })
    }

    pub fn start(&mut self, mode: &str) -> Result<(), JsValue> {
        self.round.start(parse_mode(mode)).map_err(to_js)
    }

    pub fn reset(&mut self, mode: &str) -> Result<(), JsValue> {
        self.input = InputAggregator::new();
        self.round.reset(parse_mode(mode)).map_err(to_js)
    }

    pub fn pause(&mut self) {
        self.round.pause();
    }

    pub fn resume(&mut self) {
        self.round.resume();
    }

    /// Held keyboard state
    pub fn set_keys(&mut self, up: bool, down: bool, left: bool, right: bool, dash: bool, shoot: bool) {
        self.raw.up = up;
        self.raw.down = down;
        self.raw.left = left;
        self.raw.right = right;
        self.raw.dash_key = dash;
        self.raw.shoot_key = shoot;
    }

    /// Virtual joystick deflection
    pub fn set_joystick(&mut self, x: f32, y: f32) {
        self.raw.joystick = Some(Vec2::new(x, y));
    }

    pub fn release_joystick(&mut self) {
        self.raw.joystick = None;
    }

    pub fn press_dash(&mut self) {
        self.input.press_dash();
    }

    pub fn press_shoot(&mut self) {
        self.input.press_shoot();
    }

    /// Advance by `elapsed_ms` and return the snapshot as JSON ("null" before the first start)
    pub fn tick(&mut self, elapsed_ms: f32) -> Result<String, JsValue> {
        let mode = self
            .round
            .world()
            .map(|w| w.round.mode)
            .unwrap_or_default();
        let input = TickInput {
            elapsed_ms,
            intent: self.input.sample(&self.raw),
            mode,
        };
        let snapshot = self.round.tick(&input);

        if let Some(summary) = self.round.take_summary() {
            self.scores.record(&summary, js_sys::Date::now());
        }

        match snapshot {
            Some(snapshot) => snapshot.to_json().map_err(to_js),
            None => Ok("null".to_string()),
        }
    }

    pub fn best_score(&self) -> f64 {
        self.round.best_score() as f64
    }

    /// Session leaderboard as JSON, for the host to persist
    pub fn high_scores_json(&self) -> Result<String, JsValue> {
        self.scores.to_json().map_err(to_js)
    }

    /// Restore a leaderboard previously saved by the host
    pub fn load_high_scores(&mut self, json: &str) -> Result<(), JsValue> {
        self.scores = HighScores::from_json(json).map_err(to_js)?;
        log::info!("Loaded {} high scores", self.scores.entries.len());
        Ok(())
    }
}
