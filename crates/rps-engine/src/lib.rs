//! Match progression and decision engine for HP-based rock-paper-scissors.
//!
//! A [`Session`] owns the long-lived ledgers (rank, streak, currency,
//! opponent pattern history) and a [`RoundMachine`] that turns move choices
//! into timed rounds, HP damage and match results. Presentation layers drive
//! it with `advance(dt)` and `submit_move`, and observe it through the
//! per-ledger `subscribe` hooks.
//!
//! This crate is compiled to:
//! - Native (simulator, game clients)
//! - WASM (browser frontend, `wasm` feature)

mod config;
mod error;
mod match_state;
mod moves;
mod observer;
mod pattern;
mod random;
mod rank;
mod reward;
mod round;
mod session;
mod streak;
mod strategy;

#[cfg(feature = "wasm")]
mod wasm;

pub use config::{
    BattleConfig, EngineConfig, PatternConfig, RankConfig, RewardConfig, StreakConfig, TimingConfig,
};
pub use error::{ConfigError, Currency, MatchError, RewardError};
pub use match_state::{MatchEvent, MatchState};
pub use moves::{MatchOutcome, Move, RoundOutcome};
pub use observer::{Observers, SubscriptionId};
pub use pattern::{MoveDistribution, PatternAnalyzer, UNIFORM_PERCENTAGE};
pub use random::SeededRng;
pub use rank::{Division, RankEvent, RankLedger, RankTier};
pub use reward::{CurrencyEvent, RewardLedger};
pub use round::{RoundEvent, RoundMachine, RoundPhase};
pub use session::{EventLog, Ledgers, Session, SessionEvent, SessionSnapshot};
pub use streak::{StreakEvent, StreakReward, StreakTracker};
pub use strategy::{choose_opponent_move, OpponentStrategy};

/// Win rule from the player's side.
/// Returns `None` when either move is `Move::None`.
pub fn judge(player: Move, opponent: Move) -> Option<RoundOutcome> {
    if !player.is_playable() || !opponent.is_playable() {
        return None;
    }

    let outcome = if player == opponent {
        RoundOutcome::Draw
    } else if player.beats(opponent) {
        RoundOutcome::Win
    } else {
        RoundOutcome::Lose
    };
    Some(outcome)
}
