//! Move and result vocabulary shared by every component

use serde::{Deserialize, Serialize};

/// A hand shape. `None` marks "no move yet" and is never scored.
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
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Move {
    #[default]
    None,
    Rock,
    Paper,
    Scissors,
}

impl Move {
    /// The three scored moves, in tie-break order.
    pub const PLAYABLE: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    pub fn is_playable(self) -> bool {
        self != Move::None
    }

    /// Position within [`Move::PLAYABLE`]; `None` has no slot.
    pub fn index(self) -> Option<usize> {
        match self {
            Move::None => None,
            Move::Rock => Some(0),
            Move::Paper => Some(1),
            Move::Scissors => Some(2),
        }
    }

    /// True when `self` wins against `other`.
    pub fn beats(self, other: Move) -> bool {
        matches!(
            (self, other),
            (Move::Rock, Move::Scissors) | (Move::Paper, Move::Rock) | (Move::Scissors, Move::Paper)
        )
    }

    /// The move that beats `self`.
    pub fn counter(self) -> Move {
        match self {
            Move::None => Move::None,
            Move::Rock => Move::Paper,
            Move::Paper => Move::Scissors,
            Move::Scissors => Move::Rock,
        }
    }
}

/// Result of one round, from the player's point of view
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RoundOutcome {
    Win,
    Lose,
    Draw,
}

impl RoundOutcome {
    /// The same round seen from the opponent's side.
    pub fn inverse(self) -> Self {
        match self {
            RoundOutcome::Win => RoundOutcome::Lose,
            RoundOutcome::Lose => RoundOutcome::Win,
            RoundOutcome::Draw => RoundOutcome::Draw,
        }
    }
}

/// Final classification of a match
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MatchOutcome {
    Victory,
    Defeat,
}
