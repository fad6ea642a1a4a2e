//! Opponent strategy definitions and execution

use serde::{Deserialize, Serialize};

use crate::moves::Move;
use crate::pattern::PatternAnalyzer;
use crate::random::SeededRng;

/// How the opponent picks its move when a selection phase begins
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OpponentStrategy {
    /// Uniform random choice each round.
    #[default]
    Uniform,
    /// Replay the predicted (most frequent) move of its own recent history
    /// with `stickiness`% probability, otherwise uniform.
    Habitual { stickiness: u8 },
    /// Play whatever beats its own previous move. Starts uniform.
    Cycling,
}

impl OpponentStrategy {
    /// Human-readable description for menus and logs
    pub fn describe(&self) -> String {
        match self {
            OpponentStrategy::Uniform => "Picks rock, paper or scissors uniformly at random.".to_string(),
            OpponentStrategy::Habitual { stickiness } => format!(
                "Falls back on its favourite move {}% of the time, otherwise random.",
                stickiness
            ),
            OpponentStrategy::Cycling => {
                "Rotates to the move that beats its previous one.".to_string()
            }
        }
    }
}

/// Execute the opponent strategy for one round
///
/// # Arguments
/// * `strategy` - The configured opponent strategy
/// * `history` - Analyzer holding the opponent's own recent moves
/// * `rng` - Session random number generator
pub fn choose_opponent_move(
    strategy: &OpponentStrategy,
    history: &PatternAnalyzer,
    rng: &mut SeededRng,
) -> Move {
    match strategy {
        OpponentStrategy::Uniform => rng.next_move(),
        OpponentStrategy::Habitual { stickiness } => {
            execute_habitual(*stickiness, history, rng)
        }
        OpponentStrategy::Cycling => execute_cycling(history, rng),
    }
}

/// Habitual: lean on the analyzer's prediction
fn execute_habitual(stickiness: u8, history: &PatternAnalyzer, rng: &mut SeededRng) -> Move {
    if history.total_moves() == 0 {
        return rng.next_move();
    }

    if rng.next_percent() < stickiness {
        history.predict_next_move()
    } else {
        rng.next_move()
    }
}

/// Cycling: counter own last move
fn execute_cycling(history: &PatternAnalyzer, rng: &mut SeededRng) -> Move {
    match history.recent_moves(1).last() {
        Some(last) => last.counter(),
        None => rng.next_move(),
    }
}
