//! WASM bindings for the browser frontend

#![cfg(feature = "wasm")]

use std::str::FromStr;
use std::time::Duration;

use wasm_bindgen::prelude::*;

use crate::{Division, EngineConfig, EventLog, Move, OpponentStrategy, RankTier, Session};

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Frame length from a JS millisecond delta. Negative and NaN deltas count
/// as zero; infinite or overflowing ones are rejected.
fn frame_duration(dt_ms: f64) -> Option<Duration> {
    let dt_ms = if dt_ms.is_nan() { 0.0 } else { dt_ms.max(0.0) };
    Duration::try_from_secs_f64(dt_ms / 1000.0).ok()
}

/// A game session driven by the page's animation frame loop
#[wasm_bindgen]
pub struct WasmSession {
    session: Session,
    log: EventLog,
}

#[wasm_bindgen]
impl WasmSession {
    /// # Arguments
    /// * `config_json` - Optional JSON `EngineConfig`; missing fields use defaults
    /// * `seed` - RNG seed for opponent and auto-selected moves
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>, seed: u32) -> Result<WasmSession, JsError> {
        let config = match config_json {
            Some(json) => EngineConfig::from_json(&json)
                .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?,
            None => EngineConfig::default(),
        };

        let mut session = Session::new(config, u64::from(seed))
            .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;
        let log = session.record_events();

        Ok(WasmSession { session, log })
    }

    #[wasm_bindgen(js_name = startMatch)]
    pub fn start_match(&mut self) {
        self.session.start_match();
    }

    pub fn restart(&mut self) {
        self.session.restart();
    }

    /// Advance by one frame. Returns the phase name after the tick.
    pub fn advance(&mut self, dt_ms: f64) -> Result<String, JsError> {
        let dt = frame_duration(dt_ms)
            .ok_or_else(|| JsError::new(&format!("Invalid frame time: {} ms", dt_ms)))?;
        Ok(self.session.advance(dt).to_string())
    }

    /// Submit "rock", "paper" or "scissors". Returns false when the engine
    /// is not accepting moves.
    #[wasm_bindgen(js_name = submitMove)]
    pub fn submit_move(&mut self, name: &str) -> Result<bool, JsError> {
        let player_move = Move::from_str(name)
            .map_err(|_| JsError::new(&format!("Unknown move: {}", name)))?;
        Ok(self.session.submit_move(player_move))
    }

    pub fn phase(&self) -> String {
        self.session.phase().to_string()
    }

    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        to_js(&self.session.snapshot())
    }

    /// Every notification since the last call, oldest first
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&self) -> Result<js_sys::Array, JsError> {
        let events = js_sys::Array::new();
        for event in self.log.drain() {
            events.push(&to_js(&event)?);
        }
        Ok(events)
    }

    #[wasm_bindgen(js_name = grantDailyReward)]
    pub fn grant_daily_reward(&mut self, day: u32) -> u32 {
        self.session.ledgers_mut().rewards.grant_daily_reward(day)
    }

    #[wasm_bindgen(js_name = grantAdReward)]
    pub fn grant_ad_reward(&mut self) -> u32 {
        self.session.ledgers_mut().rewards.grant_ad_reward()
    }

    #[wasm_bindgen(js_name = spendGold)]
    pub fn spend_gold(&mut self, amount: u32) -> bool {
        self.session.ledgers_mut().rewards.spend_gold(amount).is_ok()
    }

    #[wasm_bindgen(js_name = patternSummary)]
    pub fn pattern_summary(&self) -> String {
        self.session.ledgers().patterns.to_string()
    }
}

#[derive(serde::Serialize)]
struct StrategyInfo {
    id: String,
    name: String,
    description: String,
    config: OpponentStrategy,
}

/// Get all available opponent strategies with ready-to-use config values
#[wasm_bindgen(js_name = getOpponentStrategies)]
pub fn get_opponent_strategies() -> Result<JsValue, JsError> {
    let strategies = [
        ("uniform", "Uniform", OpponentStrategy::Uniform),
        ("habitual", "Habitual", OpponentStrategy::Habitual { stickiness: 60 }),
        ("cycling", "Cycling", OpponentStrategy::Cycling),
    ];

    let infos: Vec<StrategyInfo> = strategies
        .into_iter()
        .map(|(id, name, config)| StrategyInfo {
            id: id.to_string(),
            name: name.to_string(),
            description: config.describe(),
            config,
        })
        .collect();

    to_js(&infos)
}

#[derive(serde::Serialize)]
struct RankInfo {
    tier: RankTier,
    division: Division,
}

/// Tier and division for a point total, for rank badges outside a session
#[wasm_bindgen(js_name = rankForPoints)]
pub fn rank_for_points(points: u32) -> Result<JsValue, JsError> {
    to_js(&RankInfo {
        tier: RankTier::from_points(points),
        division: Division::from_points(points),
    })
}
