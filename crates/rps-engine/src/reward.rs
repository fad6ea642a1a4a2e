//! Currency ledger: gold and gems with grant/spend operations

use serde::{Deserialize, Serialize};

use crate::config::RewardConfig;
use crate::error::{Currency, RewardError};
use crate::moves::RoundOutcome;
use crate::observer::{Observers, SubscriptionId};

/// Daily login rewards ramp for this many days, then go flat
pub const DAILY_RAMP_DAYS: u32 = 7;
pub const DAILY_RAMP_CAP: u32 = 100;
pub const DAILY_FLAT_GOLD: u32 = 50;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurrencyEvent {
    Changed { gold: u32, gems: u32 },
}

#[derive(Debug)]
pub struct RewardLedger {
    config: RewardConfig,
    gold: u32,
    gems: u32,
    observers: Observers<CurrencyEvent>,
}

impl RewardLedger {
    /// Balances start at the configured starting amounts.
    pub fn new(config: &RewardConfig) -> Self {
        tracing::debug!(
            gold = config.starting_gold,
            gems = config.starting_gems,
            "reward ledger initialized"
        );
        Self {
            config: config.clone(),
            gold: config.starting_gold,
            gems: config.starting_gems,
            observers: Observers::new(),
        }
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&CurrencyEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn gold(&self) -> u32 {
        self.gold
    }

    pub fn gems(&self) -> u32 {
        self.gems
    }

    pub fn has_enough_gold(&self, amount: u32) -> bool {
        self.gold >= amount
    }

    pub fn has_enough_gems(&self, amount: u32) -> bool {
        self.gems >= amount
    }

    fn notify(&mut self) {
        let event = CurrencyEvent::Changed {
            gold: self.gold,
            gems: self.gems,
        };
        self.observers.notify(&event);
    }

    pub fn add_gold(&mut self, amount: u32) {
        if amount == 0 {
            return;
        }
        self.gold = self.gold.saturating_add(amount);
        tracing::info!(amount, total = self.gold, "gold added");
        self.notify();
    }

    pub fn add_gems(&mut self, amount: u32) {
        if amount == 0 {
            return;
        }
        self.gems = self.gems.saturating_add(amount);
        tracing::info!(amount, total = self.gems, "gems added");
        self.notify();
    }

    pub fn spend_gold(&mut self, amount: u32) -> Result<(), RewardError> {
        if self.gold < amount {
            tracing::warn!(have = self.gold, need = amount, "not enough gold");
            return Err(RewardError::InsufficientFunds {
                currency: Currency::Gold,
                available: self.gold,
                requested: amount,
            });
        }
        self.gold -= amount;
        tracing::info!(amount, total = self.gold, "gold spent");
        self.notify();
        Ok(())
    }

    pub fn spend_gems(&mut self, amount: u32) -> Result<(), RewardError> {
        if self.gems < amount {
            tracing::warn!(have = self.gems, need = amount, "not enough gems");
            return Err(RewardError::InsufficientFunds {
                currency: Currency::Gems,
                available: self.gems,
                requested: amount,
            });
        }
        self.gems -= amount;
        tracing::info!(amount, total = self.gems, "gems spent");
        self.notify();
        Ok(())
    }

    /// Only a win pays: base gold plus the streak bonus. Returns gold granted.
    pub fn grant_match_reward(&mut self, result: RoundOutcome, streak_bonus: u32) -> u32 {
        if result != RoundOutcome::Win {
            return 0;
        }
        let total = self.config.win_base_gold.saturating_add(streak_bonus);
        self.add_gold(total);
        tracing::debug!(
            total,
            base = self.config.win_base_gold,
            streak = streak_bonus,
            "victory reward granted"
        );
        total
    }

    /// Day 1..=7 pays `min(day * 10, 100)`, later days a flat 50.
    pub fn grant_daily_reward(&mut self, day: u32) -> u32 {
        let reward = if day > DAILY_RAMP_DAYS {
            DAILY_FLAT_GOLD
        } else {
            day.saturating_mul(10).min(DAILY_RAMP_CAP)
        };
        self.add_gold(reward);
        tracing::debug!(day, reward, "daily reward granted");
        reward
    }

    pub fn grant_ad_reward(&mut self) -> u32 {
        let reward = self.config.ad_reward_gold;
        self.add_gold(reward);
        tracing::debug!(reward, "ad reward granted");
        reward
    }

    /// Back to the starting balances.
    pub fn reset(&mut self) {
        self.gold = self.config.starting_gold;
        self.gems = self.config.starting_gems;
        self.notify();
    }
}
