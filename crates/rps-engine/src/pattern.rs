//! Opponent pattern analysis
//!
//! Keeps a sliding window of the opponent's most recent moves together with
//! per-move counters. Counters are maintained incrementally on insert and
//! eviction, so they always describe exactly the moves inside the window.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::moves::Move;

/// Percentage used for every move when there is no history yet.
pub const UNIFORM_PERCENTAGE: f32 = 33.3;

/// Share of each move in the window, in percent
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveDistribution {
    pub rock: f32,
    pub paper: f32,
    pub scissors: f32,
}

impl MoveDistribution {
    pub fn get(&self, m: Move) -> f32 {
        match m {
            Move::Rock => self.rock,
            Move::Paper => self.paper,
            Move::Scissors => self.scissors,
            Move::None => 0.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PatternAnalyzer {
    capacity: usize,
    history: VecDeque<Move>,
    counts: [u32; 3],
}

impl PatternAnalyzer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            history: VecDeque::with_capacity(capacity + 1),
            counts: [0; 3],
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn total_moves(&self) -> usize {
        self.history.len()
    }

    /// Occurrences of `m` inside the window
    pub fn count(&self, m: Move) -> u32 {
        m.index().map(|i| self.counts[i]).unwrap_or(0)
    }

    /// Record one opponent move. `Move::None` is ignored.
    pub fn record_move(&mut self, m: Move) {
        let Some(slot) = m.index() else {
            return;
        };

        self.history.push_back(m);
        self.counts[slot] += 1;

        if self.history.len() > self.capacity {
            if let Some(evicted) = self.history.pop_front() {
                if let Some(old) = evicted.index() {
                    self.counts[old] -= 1;
                }
            }
        }

        tracing::debug!(
            recorded = %m,
            summary = %self,
            "opponent move recorded"
        );
    }

    /// The newest `count` moves, oldest first. Returns fewer when the
    /// window holds fewer.
    pub fn recent_moves(&self, count: usize) -> Vec<Move> {
        let start = self.history.len().saturating_sub(count);
        self.history.iter().skip(start).copied().collect()
    }

    pub fn percentages(&self) -> MoveDistribution {
        let total = self.history.len();
        if total == 0 {
            return MoveDistribution {
                rock: UNIFORM_PERCENTAGE,
                paper: UNIFORM_PERCENTAGE,
                scissors: UNIFORM_PERCENTAGE,
            };
        }

        let share = |c: u32| c as f32 / total as f32 * 100.0;
        MoveDistribution {
            rock: share(self.counts[0]),
            paper: share(self.counts[1]),
            scissors: share(self.counts[2]),
        }
    }

    /// Ties resolve Rock, then Paper, then Scissors.
    pub fn most_frequent_move(&self) -> Move {
        let [rock, paper, scissors] = self.counts;
        if rock >= paper && rock >= scissors {
            Move::Rock
        } else if paper >= scissors {
            Move::Paper
        } else {
            Move::Scissors
        }
    }

    /// Naive prediction: the opponent repeats its most frequent move.
    pub fn predict_next_move(&self) -> Move {
        self.most_frequent_move()
    }

    /// True iff the newest `count` moves are all `m`. The newest move must
    /// be `m` even when `count` is 0, so an empty history never matches.
    pub fn has_consecutive_pattern(&self, m: Move, count: usize) -> bool {
        if self.history.len() < count {
            return false;
        }

        self.history
            .iter()
            .rev()
            .take_while(|recorded| **recorded == m)
            .count()
            >= count.max(1)
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.counts = [0; 3];
        tracing::debug!("pattern history reset");
    }
}

impl fmt::Display for PatternAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.history.is_empty() {
            return write!(f, "No data yet");
        }

        let p = self.percentages();
        write!(
            f,
            "Pattern: Rock {:.1}% | Paper {:.1}% | Scissors {:.1}%",
            p.rock, p.paper, p.scissors
        )
    }
}
