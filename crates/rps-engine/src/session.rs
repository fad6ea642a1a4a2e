//! Session: the single owner of every long-lived ledger
//!
//! A session outlives individual matches. Restarting a match only touches
//! the round machine and the HP state; streak, rank, currency and pattern
//! history persist until the caller resets them explicitly.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::match_state::{MatchEvent, MatchState};
use crate::moves::{MatchOutcome, Move, RoundOutcome};
use crate::observer::SubscriptionId;
use crate::pattern::{MoveDistribution, PatternAnalyzer};
use crate::random::SeededRng;
use crate::rank::{Division, RankEvent, RankLedger, RankTier};
use crate::reward::{CurrencyEvent, RewardLedger};
use crate::round::{RoundEvent, RoundMachine, RoundPhase};
use crate::streak::{StreakEvent, StreakTracker};

/// Every ledger the round machine reports into
#[derive(Debug)]
pub struct Ledgers {
    pub battle: MatchState,
    pub streak: StreakTracker,
    pub rank: RankLedger,
    pub rewards: RewardLedger,
    pub patterns: PatternAnalyzer,
}

impl Ledgers {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            battle: MatchState::new(&config.battle),
            streak: StreakTracker::new(&config.streak),
            rank: RankLedger::new(&config.rank),
            rewards: RewardLedger::new(&config.reward),
            patterns: PatternAnalyzer::new(config.pattern.history_size),
        }
    }
}

/// Any notification the engine emits, tagged by source
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    Round(RoundEvent),
    Match(MatchEvent),
    Streak(StreakEvent),
    Rank(RankEvent),
    Currency(CurrencyEvent),
}

/// Shared log filled by [`Session::record_events`]
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<SessionEvent>>>,
}

impl EventLog {
    fn push(&self, event: SessionEvent) {
        self.events.borrow_mut().push(event);
    }

    /// Take every event recorded so far, in firing order.
    pub fn drain(&self) -> Vec<SessionEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

/// Read-only view of everything a presentation layer draws
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: RoundPhase,
    pub round: u32,
    pub remaining_ms: u64,
    pub player_hp: u32,
    pub opponent_hp: u32,
    pub max_hp: u32,
    pub player_move: Move,
    pub last_outcome: Option<RoundOutcome>,
    pub match_outcome: Option<MatchOutcome>,
    pub streak: u32,
    pub multiplier: u32,
    pub points: u32,
    pub tier: RankTier,
    pub division: Division,
    pub points_to_next_tier: u32,
    pub gold: u32,
    pub gems: u32,
    pub predicted_move: Move,
    pub distribution: MoveDistribution,
}

#[derive(Debug)]
pub struct Session {
    config: EngineConfig,
    ledgers: Ledgers,
    machine: RoundMachine,
}

impl Session {
    /// Validates `config`. The same seed and inputs replay the same session.
    pub fn new(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let ledgers = Ledgers::new(&config);
        let machine = RoundMachine::new(&config, SeededRng::new(seed));
        tracing::info!(
            seed,
            max_hp = config.battle.max_hp,
            opponent = ?config.opponent,
            "session created"
        );

        Ok(Self {
            config,
            ledgers,
            machine,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ledgers(&self) -> &Ledgers {
        &self.ledgers
    }

    /// Direct ledger access for subscriptions and out-of-match operations
    /// such as daily rewards or shop purchases.
    pub fn ledgers_mut(&mut self) -> &mut Ledgers {
        &mut self.ledgers
    }

    pub fn machine(&self) -> &RoundMachine {
        &self.machine
    }

    pub fn phase(&self) -> RoundPhase {
        self.machine.phase()
    }

    pub fn match_outcome(&self) -> Option<MatchOutcome> {
        self.ledgers.battle.outcome()
    }

    pub fn subscribe_rounds(&mut self, handler: impl FnMut(&RoundEvent) + 'static) -> SubscriptionId {
        self.machine.subscribe(handler)
    }

    pub fn unsubscribe_rounds(&mut self, id: SubscriptionId) -> bool {
        self.machine.unsubscribe(id)
    }

    /// Idle -> Analysis, cancelling any match in flight.
    pub fn start_match(&mut self) {
        self.machine.start_match(&mut self.ledgers);
    }

    /// Same as [`Session::start_match`]; named for the post-match button.
    pub fn restart(&mut self) {
        tracing::info!("match restarted");
        self.start_match();
    }

    /// Abandon the current match and go back to Idle.
    pub fn stop(&mut self) {
        self.machine.reset();
        self.ledgers.battle.reset();
    }

    pub fn advance(&mut self, dt: Duration) -> RoundPhase {
        self.machine.advance(dt, &mut self.ledgers)
    }

    pub fn submit_move(&mut self, player_move: Move) -> bool {
        self.machine.submit_move(player_move, &mut self.ledgers)
    }

    /// Wipe streak, rank, currency and pattern history.
    pub fn reset_progress(&mut self) {
        tracing::info!("session progress reset");
        self.ledgers.streak.reset();
        self.ledgers.rank.reset();
        self.ledgers.rewards.reset();
        self.ledgers.patterns.reset();
    }

    /// Subscribe one shared log to every event source.
    pub fn record_events(&mut self) -> EventLog {
        let log = EventLog::default();

        let sink = log.clone();
        self.machine
            .subscribe(move |e| sink.push(SessionEvent::Round(e.clone())));
        let sink = log.clone();
        self.ledgers
            .battle
            .subscribe(move |e| sink.push(SessionEvent::Match(e.clone())));
        let sink = log.clone();
        self.ledgers
            .streak
            .subscribe(move |e| sink.push(SessionEvent::Streak(e.clone())));
        let sink = log.clone();
        self.ledgers
            .rank
            .subscribe(move |e| sink.push(SessionEvent::Rank(e.clone())));
        let sink = log.clone();
        self.ledgers
            .rewards
            .subscribe(move |e| sink.push(SessionEvent::Currency(e.clone())));

        log
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let battle = &self.ledgers.battle;
        let rank = &self.ledgers.rank;
        SessionSnapshot {
            phase: self.machine.phase(),
            round: battle.current_round(),
            remaining_ms: self.machine.remaining_time().as_millis() as u64,
            player_hp: battle.player_hp(),
            opponent_hp: battle.opponent_hp(),
            max_hp: battle.max_hp(),
            player_move: self.machine.player_move(),
            last_outcome: self.machine.last_outcome(),
            match_outcome: battle.outcome(),
            streak: self.ledgers.streak.current_streak(),
            multiplier: self.ledgers.streak.current_multiplier(),
            points: rank.current_points(),
            tier: rank.current_tier(),
            division: rank.current_division(),
            points_to_next_tier: rank.points_to_next_tier(),
            gold: self.ledgers.rewards.gold(),
            gems: self.ledgers.rewards.gems(),
            predicted_move: self.ledgers.patterns.predict_next_move(),
            distribution: self.ledgers.patterns.percentages(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.battle.max_hp = 0;
        assert_eq!(Session::new(config, 1).unwrap_err(), ConfigError::ZeroMaxHp);
    }

    #[test]
    fn test_event_log_drains() {
        let mut session = Session::new(EngineConfig::default(), 1).unwrap();
        let log = session.record_events();

        session.start_match();
        assert_eq!(log.len(), 3);
        let events = log.drain();

        assert_eq!(
            events,
            vec![
                SessionEvent::Match(MatchEvent::HpChanged { player_hp: 30, opponent_hp: 30 }),
                SessionEvent::Match(MatchEvent::RoundStarted { round: 1 }),
                SessionEvent::Round(RoundEvent::PhaseChanged { phase: RoundPhase::Analysis }),
            ]
        );
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
    }

    #[test]
    fn test_unsubscribe_rounds() {
        let mut session = Session::new(EngineConfig::default(), 1).unwrap();
        let phases = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&phases);
        let id = session.subscribe_rounds(move |e| {
            if let RoundEvent::PhaseChanged { phase } = e {
                sink.borrow_mut().push(*phase);
            }
        });

        session.start_match();
        assert!(session.unsubscribe_rounds(id));
        assert!(!session.unsubscribe_rounds(id));
        session.advance(Duration::from_secs(60));

        assert_eq!(*phases.borrow(), vec![RoundPhase::Analysis]);
    }

    #[test]
    fn test_session_event_json_shape() {
        let event = SessionEvent::Match(MatchEvent::RoundStarted { round: 2 });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"source": "match", "event": {"RoundStarted": {"round": 2}}})
        );
    }

    #[test]
    fn test_snapshot_fresh_session() {
        let session = Session::new(EngineConfig::default(), 1).unwrap();
        let snap = session.snapshot();

        assert_eq!(snap.phase, RoundPhase::Idle);
        assert_eq!(snap.player_hp, 30);
        assert_eq!(snap.gold, 100);
        assert_eq!(snap.tier, RankTier::Bronze);
        assert_eq!(snap.match_outcome, None);
    }

    #[test]
    fn test_stop_returns_to_idle() {
        let mut session = Session::new(EngineConfig::default(), 1).unwrap();
        session.start_match();
        session.stop();

        assert_eq!(session.phase(), RoundPhase::Idle);
        assert_eq!(session.ledgers().battle.current_round(), 0);
    }
}
