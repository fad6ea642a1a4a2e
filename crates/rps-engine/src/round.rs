//! Round state machine
//!
//! Drives the timed loop of a match:
//!
//! ```text
//! Idle --start--> Analysis --delay--> Selecting --timer/submit--> Revealing
//!   --delay--> RoundEnd --both standing, delay--> Analysis
//!                       \--either HP 0--> MatchEnd
//! ```
//!
//! The machine owns only the transient per-round fields. Every ledger is
//! passed in by reference on each call and mutated through its own
//! operations. Time only moves when the caller invokes [`RoundMachine::advance`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, TimingConfig};
use crate::judge;
use crate::moves::{Move, RoundOutcome};
use crate::observer::{Observers, SubscriptionId};
use crate::random::SeededRng;
use crate::session::Ledgers;
use crate::strategy::{choose_opponent_move, OpponentStrategy};

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum RoundPhase {
    #[default]
    Idle,
    Analysis,
    Selecting,
    Revealing,
    RoundEnd,
    MatchEnd,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    PhaseChanged {
        phase: RoundPhase,
    },
    PlayerMoveSelected {
        player_move: Move,
        auto: bool,
    },
    Revealed {
        player_move: Move,
        opponent_move: Move,
        outcome: RoundOutcome,
    },
}

#[derive(Debug)]
pub struct RoundMachine {
    timing: TimingConfig,
    opponent: OpponentStrategy,
    rng: SeededRng,
    phase: RoundPhase,
    remaining: Duration,
    player_move: Move,
    opponent_move: Move,
    auto_selected: bool,
    last_outcome: Option<RoundOutcome>,
    observers: Observers<RoundEvent>,
}

impl RoundMachine {
    pub fn new(config: &EngineConfig, rng: SeededRng) -> Self {
        Self {
            timing: config.timing.clone(),
            opponent: config.opponent,
            rng,
            phase: RoundPhase::Idle,
            remaining: Duration::ZERO,
            player_move: Move::None,
            opponent_move: Move::None,
            auto_selected: false,
            last_outcome: None,
            observers: Observers::new(),
        }
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&RoundEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Time left in the current timed phase (the countdown while selecting).
    pub fn remaining_time(&self) -> Duration {
        self.remaining
    }

    pub fn player_move(&self) -> Move {
        self.player_move
    }

    /// Hidden from the player until the reveal; exposed for presentation.
    pub fn opponent_move(&self) -> Move {
        self.opponent_move
    }

    pub fn was_auto_selected(&self) -> bool {
        self.auto_selected
    }

    pub fn last_outcome(&self) -> Option<RoundOutcome> {
        self.last_outcome
    }

    fn set_phase(&mut self, phase: RoundPhase) {
        if self.phase == phase {
            return;
        }
        tracing::debug!(from = %self.phase, to = %phase, "phase changed");
        self.phase = phase;
        self.observers.notify(&RoundEvent::PhaseChanged { phase });
    }

    /// Drop all transient round state and return to Idle.
    pub fn reset(&mut self) {
        self.remaining = Duration::ZERO;
        self.player_move = Move::None;
        self.opponent_move = Move::None;
        self.auto_selected = false;
        self.last_outcome = None;
        self.set_phase(RoundPhase::Idle);
    }

    /// Cancel whatever is in flight, refill HP and begin round 1.
    pub fn start_match(&mut self, ledgers: &mut Ledgers) {
        self.reset();
        ledgers.battle.start_match();
        self.enter_analysis(ledgers);
    }

    /// Move time forward by `dt`. At most one timed transition happens per
    /// call; leftover time is not carried into the next phase.
    pub fn advance(&mut self, dt: Duration, ledgers: &mut Ledgers) -> RoundPhase {
        match self.phase {
            RoundPhase::Idle | RoundPhase::MatchEnd => {}
            RoundPhase::Analysis => {
                if self.tick(dt) {
                    self.enter_selecting(ledgers);
                }
            }
            RoundPhase::Selecting => {
                if self.tick(dt) {
                    if !self.player_move.is_playable() {
                        self.auto_select();
                    }
                    self.enter_revealing(ledgers);
                }
            }
            RoundPhase::Revealing => {
                if self.tick(dt) {
                    self.enter_round_end(ledgers);
                }
            }
            RoundPhase::RoundEnd => {
                if self.tick(dt) {
                    self.enter_analysis(ledgers);
                }
            }
        }
        self.phase
    }

    /// The player's pick. Accepted only while selecting; anything else is
    /// ignored and returns false.
    pub fn submit_move(&mut self, player_move: Move, ledgers: &mut Ledgers) -> bool {
        if self.phase != RoundPhase::Selecting || !player_move.is_playable() {
            tracing::debug!(phase = %self.phase, %player_move, "move submission ignored");
            return false;
        }

        self.player_move = player_move;
        self.auto_selected = false;
        self.observers.notify(&RoundEvent::PlayerMoveSelected {
            player_move,
            auto: false,
        });
        self.enter_revealing(ledgers);
        true
    }

    fn tick(&mut self, dt: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(dt);
        self.remaining.is_zero()
    }

    fn auto_select(&mut self) {
        self.player_move = self.rng.next_move();
        self.auto_selected = true;
        tracing::info!(player_move = %self.player_move, "selection timed out, move auto-selected");
        self.observers.notify(&RoundEvent::PlayerMoveSelected {
            player_move: self.player_move,
            auto: true,
        });
    }

    fn enter_analysis(&mut self, ledgers: &mut Ledgers) {
        if ledgers.battle.start_next_round().is_err() {
            self.enter_match_end();
            return;
        }
        self.player_move = Move::None;
        self.opponent_move = Move::None;
        self.auto_selected = false;
        self.remaining = self.timing.analysis();
        self.set_phase(RoundPhase::Analysis);
    }

    fn enter_selecting(&mut self, ledgers: &Ledgers) {
        self.player_move = Move::None;
        self.auto_selected = false;
        self.opponent_move = choose_opponent_move(&self.opponent, &ledgers.patterns, &mut self.rng);
        self.remaining = self.timing.selection();
        tracing::debug!(round = ledgers.battle.current_round(), "waiting for player move");
        self.set_phase(RoundPhase::Selecting);
    }

    fn enter_revealing(&mut self, ledgers: &mut Ledgers) {
        if ledgers.battle.is_match_ended() {
            tracing::info!(
                round = ledgers.battle.current_round(),
                "match ended mid-round, round not scored"
            );
            self.enter_match_end();
            return;
        }

        self.remaining = self.timing.reveal();
        self.set_phase(RoundPhase::Revealing);

        let Some(outcome) = judge(self.player_move, self.opponent_move) else {
            tracing::error!(
                player_move = %self.player_move,
                opponent_move = %self.opponent_move,
                "unscorable round skipped"
            );
            return;
        };

        self.last_outcome = Some(outcome);
        self.observers.notify(&RoundEvent::Revealed {
            player_move: self.player_move,
            opponent_move: self.opponent_move,
            outcome,
        });
        self.resolve(outcome, ledgers);
    }

    /// Push a round outcome into every ledger.
    fn resolve(&mut self, outcome: RoundOutcome, ledgers: &mut Ledgers) {
        if let Err(err) = ledgers.battle.apply_round_result(outcome) {
            tracing::warn!(%err, "round result not applied");
            return;
        }

        match outcome {
            RoundOutcome::Win => {
                let reward = ledgers.streak.record_win();
                let points = ledgers.rank.calculate_points(outcome, reward.multiplier);
                ledgers.rank.add_points(points);
                ledgers.rewards.grant_match_reward(outcome, reward.gold);
            }
            RoundOutcome::Lose => {
                ledgers.streak.record_loss();
                let points = ledgers
                    .rank
                    .calculate_points(outcome, ledgers.streak.current_multiplier());
                ledgers.rank.add_points(points);
            }
            RoundOutcome::Draw => {
                let points = ledgers
                    .rank
                    .calculate_points(outcome, ledgers.streak.current_multiplier());
                ledgers.rank.add_points(points);
            }
        }

        ledgers.patterns.record_move(self.opponent_move);
    }

    fn enter_round_end(&mut self, ledgers: &Ledgers) {
        self.remaining = self.timing.result();
        self.set_phase(RoundPhase::RoundEnd);

        if ledgers.battle.is_match_ended() {
            self.enter_match_end();
        }
    }

    fn enter_match_end(&mut self) {
        self.remaining = Duration::ZERO;
        self.set_phase(RoundPhase::MatchEnd);
    }
}
