//! Scripted stand-ins for the human player

use clap::ValueEnum;
use rps_engine::{Move, PatternAnalyzer, SeededRng};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PlayerPolicy {
    /// Uniformly random pick each round
    Random,
    Rock,
    Paper,
    Scissors,
    /// Play the counter of the analyzer's predicted opponent move
    Counter,
    /// Never submit; every round times out and is auto-selected
    Idle,
}

pub struct Player {
    policy: PlayerPolicy,
    rng: SeededRng,
}

impl Player {
    pub fn new(policy: PlayerPolicy, rng: SeededRng) -> Self {
        Self { policy, rng }
    }

    /// `None` means let the selection timer run out.
    pub fn choose(&mut self, patterns: &PatternAnalyzer) -> Option<Move> {
        match self.policy {
            PlayerPolicy::Random => Some(self.rng.next_move()),
            PlayerPolicy::Rock => Some(Move::Rock),
            PlayerPolicy::Paper => Some(Move::Paper),
            PlayerPolicy::Scissors => Some(Move::Scissors),
            PlayerPolicy::Counter if patterns.total_moves() == 0 => Some(self.rng.next_move()),
            PlayerPolicy::Counter => Some(patterns.predict_next_move().counter()),
            PlayerPolicy::Idle => None,
        }
    }
}
