//! Consecutive-win tracking and streak rewards

use serde::{Deserialize, Serialize};

use crate::config::StreakConfig;
use crate::observer::{Observers, SubscriptionId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreakEvent {
    Changed { streak: u32 },
    Reward { streak: u32, gold: u32 },
}

/// Returned by [`StreakTracker::record_win`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreakReward {
    pub streak: u32,
    pub multiplier: u32,
    pub gold: u32,
}

#[derive(Debug)]
pub struct StreakTracker {
    max_multiplier: u32,
    gold_table: Vec<u32>,
    current_streak: u32,
    observers: Observers<StreakEvent>,
}

impl StreakTracker {
    /// `config` is expected to be validated (non-empty table).
    pub fn new(config: &StreakConfig) -> Self {
        Self {
            max_multiplier: config.max_multiplier,
            gold_table: config.gold_table.clone(),
            current_streak: 0,
            observers: Observers::new(),
        }
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&StreakEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn current_multiplier(&self) -> u32 {
        self.current_streak.min(self.max_multiplier)
    }

    /// Gold owed for the current streak; 0 without a streak.
    pub fn gold_reward(&self) -> u32 {
        if self.current_streak == 0 {
            return 0;
        }
        self.reward_for(self.current_streak)
    }

    /// Gold the next win would pay.
    pub fn next_reward(&self) -> u32 {
        self.reward_for(self.current_streak.saturating_add(1))
    }

    fn reward_for(&self, streak: u32) -> u32 {
        let last = self.gold_table.len().saturating_sub(1);
        let index = (streak.saturating_sub(1) as usize).min(last);
        self.gold_table.get(index).copied().unwrap_or(0)
    }

    pub fn record_win(&mut self) -> StreakReward {
        self.current_streak = self.current_streak.saturating_add(1);
        let reward = StreakReward {
            streak: self.current_streak,
            multiplier: self.current_multiplier(),
            gold: self.gold_reward(),
        };

        tracing::info!(
            streak = reward.streak,
            multiplier = reward.multiplier,
            gold = reward.gold,
            "win streak extended"
        );
        self.observers.notify(&StreakEvent::Changed {
            streak: reward.streak,
        });
        self.observers.notify(&StreakEvent::Reward {
            streak: reward.streak,
            gold: reward.gold,
        });

        reward
    }

    /// A lost round ends the streak. Draws do not call this.
    pub fn record_loss(&mut self) {
        tracing::info!(was = self.current_streak, "win streak reset");
        self.current_streak = 0;
        self.observers.notify(&StreakEvent::Changed { streak: 0 });
    }

    /// Keep the streak through a loss the caller chose to forgive.
    pub fn defend(&mut self) {
        tracing::info!(streak = self.current_streak, "win streak defended");
    }

    /// Clear the streak without treating it as a loss.
    pub fn reset(&mut self) {
        if self.current_streak == 0 {
            return;
        }
        self.current_streak = 0;
        self.observers.notify(&StreakEvent::Changed { streak: 0 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn tracker() -> StreakTracker {
        StreakTracker::new(&StreakConfig::default())
    }

    #[test]
    fn test_first_win() {
        let mut streak = tracker();
        let reward = streak.record_win();

        assert_eq!(reward, StreakReward { streak: 1, multiplier: 1, gold: 10 });
        assert_eq!(streak.current_streak(), 1);
    }

    #[test]
    fn test_table_repeats_last_entry() {
        let mut streak = tracker();
        let golds: Vec<u32> = (0..6).map(|_| streak.record_win().gold).collect();

        assert_eq!(golds, vec![10, 20, 30, 40, 40, 40]);
        assert_eq!(streak.current_multiplier(), 4);
    }

    #[test]
    fn test_loss_resets() {
        let mut streak = tracker();
        streak.record_win();
        streak.record_win();
        streak.record_loss();

        assert_eq!(streak.current_streak(), 0);
        assert_eq!(streak.current_multiplier(), 0);
        assert_eq!(streak.gold_reward(), 0);
    }

    #[test]
    fn test_next_reward() {
        let mut streak = tracker();
        assert_eq!(streak.next_reward(), 10);
        streak.record_win();
        assert_eq!(streak.next_reward(), 20);
    }

    #[test]
    fn test_events() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut streak = tracker();
        let sink = Rc::clone(&events);
        streak.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        streak.record_win();
        streak.record_loss();

        assert_eq!(
            *events.borrow(),
            vec![
                StreakEvent::Changed { streak: 1 },
                StreakEvent::Reward { streak: 1, gold: 10 },
                StreakEvent::Changed { streak: 0 },
            ]
        );
    }

    #[test]
    fn test_defend_keeps_streak() {
        let mut streak = tracker();
        streak.record_win();
        streak.defend();
        assert_eq!(streak.current_streak(), 1);
    }

    proptest! {
        #[test]
        fn prop_multiplier_is_capped(wins in 0u32..50, cap in 1u32..10) {
            let mut streak = StreakTracker::new(&StreakConfig {
                max_multiplier: cap,
                ..StreakConfig::default()
            });
            for _ in 0..wins {
                streak.record_win();
            }
            prop_assert_eq!(streak.current_streak(), wins);
            prop_assert_eq!(streak.current_multiplier(), wins.min(cap));

            streak.record_loss();
            prop_assert_eq!(streak.current_streak(), 0);
        }
    }
}
