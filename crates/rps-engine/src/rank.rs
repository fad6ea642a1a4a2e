//! Rank points, tiers and divisions
//!
//! Only the point total is stored. Tier and division are pure functions of
//! that total and are recomputed on every read, so they can never drift.

use serde::{Deserialize, Serialize};

use crate::config::RankConfig;
use crate::moves::RoundOutcome;
use crate::observer::{Observers, SubscriptionId};

/// Width of one tier in points
pub const TIER_SPAN: u32 = 500;

/// Width of one division band inside a tier
pub const DIVISION_SPAN: u32 = 125;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
pub enum RankTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Master,
    GrandMaster,
}

impl RankTier {
    /// Inclusive lower bound in points
    pub const fn threshold(self) -> u32 {
        match self {
            RankTier::Bronze => 0,
            RankTier::Silver => 500,
            RankTier::Gold => 1000,
            RankTier::Platinum => 1500,
            RankTier::Diamond => 2000,
            RankTier::Master => 2500,
            RankTier::GrandMaster => 3000,
        }
    }

    pub const fn next(self) -> Option<RankTier> {
        match self {
            RankTier::Bronze => Some(RankTier::Silver),
            RankTier::Silver => Some(RankTier::Gold),
            RankTier::Gold => Some(RankTier::Platinum),
            RankTier::Platinum => Some(RankTier::Diamond),
            RankTier::Diamond => Some(RankTier::Master),
            RankTier::Master => Some(RankTier::GrandMaster),
            RankTier::GrandMaster => None,
        }
    }

    pub const fn from_points(points: u32) -> RankTier {
        match points {
            3000.. => RankTier::GrandMaster,
            2500.. => RankTier::Master,
            2000.. => RankTier::Diamond,
            1500.. => RankTier::Platinum,
            1000.. => RankTier::Gold,
            500.. => RankTier::Silver,
            _ => RankTier::Bronze,
        }
    }
}

/// Fine band within a tier, ordered IV (lowest index) to I
#[allow(clippy::upper_case_acronyms)]
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
pub enum Division {
    IV,
    III,
    II,
    I,
}

impl Division {
    const ORDER: [Division; 4] = [Division::IV, Division::III, Division::II, Division::I];

    /// Sub-band `(points mod 500) / 125` selects index `3 - sub` of
    /// [IV, III, II, I].
    pub fn from_points(points: u32) -> Division {
        let sub = ((points % TIER_SPAN) / DIVISION_SPAN).min(3);
        Self::ORDER[(3 - sub) as usize]
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankEvent {
    PointsChanged { total: u32 },
    RankChanged { tier: RankTier, division: Division },
}

#[derive(Debug)]
pub struct RankLedger {
    config: RankConfig,
    current_points: u32,
    observers: Observers<RankEvent>,
}

impl RankLedger {
    pub fn new(config: &RankConfig) -> Self {
        Self {
            config: config.clone(),
            current_points: 0,
            observers: Observers::new(),
        }
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&RankEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn current_points(&self) -> u32 {
        self.current_points
    }

    pub fn current_tier(&self) -> RankTier {
        RankTier::from_points(self.current_points)
    }

    pub fn current_division(&self) -> Division {
        Division::from_points(self.current_points)
    }

    /// e.g. "Silver II"
    pub fn rank_display(&self) -> String {
        format!("{} {}", self.current_tier(), self.current_division())
    }

    /// Point delta for one round result
    pub fn calculate_points(&self, result: RoundOutcome, streak_multiplier: u32) -> i32 {
        match result {
            RoundOutcome::Win => {
                let multiplier = i32::try_from(streak_multiplier).unwrap_or(i32::MAX);
                self.config.win_points.saturating_mul(multiplier)
            }
            RoundOutcome::Lose => self.config.lose_points,
            RoundOutcome::Draw => self.config.draw_points,
        }
    }

    /// Apply a delta, flooring the total at zero. Returns the new total.
    pub fn add_points(&mut self, delta: i32) -> u32 {
        let total = (i64::from(self.current_points) + i64::from(delta)).clamp(0, i64::from(u32::MAX));
        tracing::info!(delta, total, "rank points changed");
        self.set_total(total as u32)
    }

    fn set_total(&mut self, total: u32) -> u32 {
        let old_tier = self.current_tier();
        self.current_points = total;

        self.observers.notify(&RankEvent::PointsChanged {
            total: self.current_points,
        });

        let new_tier = self.current_tier();
        if new_tier != old_tier {
            let division = self.current_division();
            tracing::info!(from = %old_tier, to = %new_tier, %division, "rank tier changed");
            self.observers.notify(&RankEvent::RankChanged {
                tier: new_tier,
                division,
            });
        }

        self.current_points
    }

    /// Points still needed to reach the next tier; 0 at the top tier.
    pub fn points_to_next_tier(&self) -> u32 {
        match self.current_tier().next() {
            Some(next) => next.threshold() - self.current_points,
            None => 0,
        }
    }

    pub fn reset(&mut self) {
        if self.current_points == 0 {
            return;
        }
        tracing::info!(was = self.current_points, "rank points reset");
        self.set_total(0);
    }
}
