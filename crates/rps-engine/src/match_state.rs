//! Per-match HP battle state
//!
//! Both sides start at `max_hp`. The loser of a round takes
//! `damage_per_round`, clamped at zero, and the match ends the moment either
//! side reaches zero.

use serde::{Deserialize, Serialize};

use crate::config::BattleConfig;
use crate::error::MatchError;
use crate::moves::{MatchOutcome, RoundOutcome};
use crate::observer::{Observers, SubscriptionId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    RoundStarted { round: u32 },
    RoundEnded { round: u32, outcome: RoundOutcome },
    HpChanged { player_hp: u32, opponent_hp: u32 },
    MatchEnded { outcome: MatchOutcome },
}

#[derive(Debug)]
pub struct MatchState {
    max_hp: u32,
    damage_per_round: u32,
    current_round: u32,
    player_hp: u32,
    opponent_hp: u32,
    observers: Observers<MatchEvent>,
}

impl MatchState {
    pub fn new(config: &BattleConfig) -> Self {
        tracing::debug!(
            max_hp = config.max_hp,
            damage = config.damage_per_round,
            "match state initialized"
        );
        Self {
            max_hp: config.max_hp,
            damage_per_round: config.damage_per_round,
            current_round: 0,
            player_hp: config.max_hp,
            opponent_hp: config.max_hp,
            observers: Observers::new(),
        }
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&MatchEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    /// 0 before the first round, then 1-based.
    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn player_hp(&self) -> u32 {
        self.player_hp
    }

    pub fn opponent_hp(&self) -> u32 {
        self.opponent_hp
    }

    pub fn is_match_ended(&self) -> bool {
        self.player_hp == 0 || self.opponent_hp == 0
    }

    /// Classification of an ended match; `None` while both sides stand.
    /// A double knockout counts as a defeat.
    pub fn outcome(&self) -> Option<MatchOutcome> {
        match (self.player_hp, self.opponent_hp) {
            (0, _) => Some(MatchOutcome::Defeat),
            (_, 0) => Some(MatchOutcome::Victory),
            _ => None,
        }
    }

    fn notify_hp(&mut self) {
        let event = MatchEvent::HpChanged {
            player_hp: self.player_hp,
            opponent_hp: self.opponent_hp,
        };
        self.observers.notify(&event);
    }

    /// Full HP on both sides and round counter back to 0.
    pub fn start_match(&mut self) {
        self.current_round = 0;
        self.player_hp = self.max_hp;
        self.opponent_hp = self.max_hp;

        tracing::info!(
            player_hp = self.player_hp,
            opponent_hp = self.opponent_hp,
            "new match started"
        );
        self.notify_hp();
    }

    /// Returns the new round number.
    pub fn start_next_round(&mut self) -> Result<u32, MatchError> {
        if self.is_match_ended() {
            tracing::warn!(round = self.current_round, "match already ended");
            return Err(MatchError::AlreadyEnded {
                round: self.current_round,
            });
        }

        self.current_round += 1;
        tracing::info!(
            round = self.current_round,
            player_hp = self.player_hp,
            opponent_hp = self.opponent_hp,
            "round started"
        );
        self.observers.notify(&MatchEvent::RoundStarted {
            round: self.current_round,
        });
        Ok(self.current_round)
    }

    /// Damage the loser of the round and evaluate match end.
    ///
    /// Returns the match outcome when this round ended the match.
    pub fn apply_round_result(
        &mut self,
        outcome: RoundOutcome,
    ) -> Result<Option<MatchOutcome>, MatchError> {
        if self.is_match_ended() {
            tracing::warn!(round = self.current_round, "round result after match end ignored");
            return Err(MatchError::AlreadyEnded {
                round: self.current_round,
            });
        }

        match outcome {
            RoundOutcome::Win => {
                self.opponent_hp = self.opponent_hp.saturating_sub(self.damage_per_round);
            }
            RoundOutcome::Lose => {
                self.player_hp = self.player_hp.saturating_sub(self.damage_per_round);
            }
            RoundOutcome::Draw => {}
        }

        tracing::info!(
            round = self.current_round,
            %outcome,
            player_hp = self.player_hp,
            opponent_hp = self.opponent_hp,
            "round resolved"
        );
        self.observers.notify(&MatchEvent::RoundEnded {
            round: self.current_round,
            outcome,
        });
        self.notify_hp();

        Ok(self.check_match_end())
    }

    fn check_match_end(&mut self) -> Option<MatchOutcome> {
        let outcome = self.outcome()?;

        if self.player_hp == 0 && self.opponent_hp == 0 {
            tracing::info!("double knockout, scored as defeat");
        }
        tracing::info!(
            %outcome,
            player_hp = self.player_hp,
            opponent_hp = self.opponent_hp,
            "match ended"
        );
        self.observers.notify(&MatchEvent::MatchEnded { outcome });
        Some(outcome)
    }

    /// Manual HP override, clamped to `[0, max_hp]`. Ends the match if it
    /// knocks out a side that was still standing.
    pub fn set_hp(&mut self, player_hp: u32, opponent_hp: u32) -> Option<MatchOutcome> {
        let was_ended = self.is_match_ended();
        self.player_hp = player_hp.min(self.max_hp);
        self.opponent_hp = opponent_hp.min(self.max_hp);

        tracing::info!(
            player_hp = self.player_hp,
            opponent_hp = self.opponent_hp,
            "hp set manually"
        );
        self.notify_hp();

        if was_ended {
            return None;
        }
        self.check_match_end()
    }

    pub fn reset(&mut self) {
        self.current_round = 0;
        self.player_hp = self.max_hp;
        self.opponent_hp = self.max_hp;
        tracing::debug!("match reset");
        self.notify_hp();
    }
}
