//! Engine configuration constants and tunable parameters.
//!
//! Every section carries `DEFAULT_*` constants and a `Default` impl, and
//! deserializes with `#[serde(default)]` so a JSON file only needs the
//! fields it overrides. Durations are written in milliseconds.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::strategy::OpponentStrategy;

/// HP battle rules
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub max_hp: u32,
    /// Damage dealt to the loser of a round.
    pub damage_per_round: u32,
}

impl BattleConfig {
    pub const DEFAULT_MAX_HP: u32 = 30;
    pub const DEFAULT_DAMAGE_PER_ROUND: u32 = 10;
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            max_hp: Self::DEFAULT_MAX_HP,
            damage_per_round: Self::DEFAULT_DAMAGE_PER_ROUND,
        }
    }
}

/// Phase durations of the round loop
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub analysis_ms: u64,
    /// Countdown the player has to pick a move.
    pub selection_ms: u64,
    pub reveal_ms: u64,
    /// Hold on the round result before the next round starts.
    pub result_ms: u64,
}

impl TimingConfig {
    pub const DEFAULT_ANALYSIS_MS: u64 = 1_000;
    pub const DEFAULT_SELECTION_MS: u64 = 5_000;
    pub const DEFAULT_REVEAL_MS: u64 = 1_000;
    pub const DEFAULT_RESULT_MS: u64 = 2_500;

    pub fn analysis(&self) -> Duration {
        Duration::from_millis(self.analysis_ms)
    }

    pub fn selection(&self) -> Duration {
        Duration::from_millis(self.selection_ms)
    }

    pub fn reveal(&self) -> Duration {
        Duration::from_millis(self.reveal_ms)
    }

    pub fn result(&self) -> Duration {
        Duration::from_millis(self.result_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            analysis_ms: Self::DEFAULT_ANALYSIS_MS,
            selection_ms: Self::DEFAULT_SELECTION_MS,
            reveal_ms: Self::DEFAULT_REVEAL_MS,
            result_ms: Self::DEFAULT_RESULT_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Number of opponent moves retained for frequency analysis.
    pub history_size: usize,
}

impl PatternConfig {
    pub const DEFAULT_HISTORY_SIZE: usize = 10;
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            history_size: Self::DEFAULT_HISTORY_SIZE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreakConfig {
    pub max_multiplier: u32,
    /// Gold paid for the 1st, 2nd, ... consecutive win; the last entry
    /// repeats for longer streaks.
    pub gold_table: Vec<u32>,
}

impl StreakConfig {
    pub const DEFAULT_MAX_MULTIPLIER: u32 = 4;
    pub const DEFAULT_GOLD_TABLE: [u32; 4] = [10, 20, 30, 40];
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            max_multiplier: Self::DEFAULT_MAX_MULTIPLIER,
            gold_table: Self::DEFAULT_GOLD_TABLE.to_vec(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankConfig {
    /// Multiplied by the streak multiplier on a win.
    pub win_points: i32,
    pub lose_points: i32,
    pub draw_points: i32,
}

impl RankConfig {
    pub const DEFAULT_WIN_POINTS: i32 = 20;
    pub const DEFAULT_LOSE_POINTS: i32 = -15;
    pub const DEFAULT_DRAW_POINTS: i32 = 5;
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            win_points: Self::DEFAULT_WIN_POINTS,
            lose_points: Self::DEFAULT_LOSE_POINTS,
            draw_points: Self::DEFAULT_DRAW_POINTS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub starting_gold: u32,
    pub starting_gems: u32,
    /// Gold for a won round before the streak bonus.
    pub win_base_gold: u32,
    pub ad_reward_gold: u32,
}

impl RewardConfig {
    pub const DEFAULT_STARTING_GOLD: u32 = 100;
    pub const DEFAULT_STARTING_GEMS: u32 = 0;
    pub const DEFAULT_WIN_BASE_GOLD: u32 = 10;
    pub const DEFAULT_AD_REWARD_GOLD: u32 = 50;
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            starting_gold: Self::DEFAULT_STARTING_GOLD,
            starting_gems: Self::DEFAULT_STARTING_GEMS,
            win_base_gold: Self::DEFAULT_WIN_BASE_GOLD,
            ad_reward_gold: Self::DEFAULT_AD_REWARD_GOLD,
        }
    }
}

/// Complete engine configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub battle: BattleConfig,
    pub timing: TimingConfig,
    pub pattern: PatternConfig,
    pub streak: StreakConfig,
    pub rank: RankConfig,
    pub reward: RewardConfig,
    pub opponent: OpponentStrategy,
}

impl EngineConfig {
    /// Parse from JSON and validate. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break an invariant at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.battle.max_hp == 0 {
            return Err(ConfigError::ZeroMaxHp);
        }
        if self.battle.damage_per_round == 0 {
            return Err(ConfigError::ZeroDamage);
        }
        if self.timing.selection_ms == 0 {
            return Err(ConfigError::ZeroSelectionTime);
        }
        if self.pattern.history_size == 0 {
            return Err(ConfigError::ZeroHistorySize);
        }
        if self.streak.max_multiplier == 0 {
            return Err(ConfigError::ZeroMultiplierCap);
        }
        if self.streak.gold_table.is_empty() {
            return Err(ConfigError::EmptyStreakTable);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.battle.max_hp, 30);
        assert_eq!(config.battle.damage_per_round, 10);
        assert_eq!(config.timing.selection(), Duration::from_secs(5));
        assert_eq!(config.pattern.history_size, 10);
        assert_eq!(config.streak.gold_table, vec![10, 20, 30, 40]);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{"battle": {"max_hp": 50}}"#).unwrap();
        assert_eq!(config.battle.max_hp, 50);
        assert_eq!(config.battle.damage_per_round, 10);
        assert_eq!(config.timing, TimingConfig::default());
    }

    #[test]
    fn test_rejects_zero_max_hp() {
        let err = EngineConfig::from_json(r#"{"battle": {"max_hp": 0}}"#).unwrap_err();
        assert_eq!(err, ConfigError::ZeroMaxHp);
    }

    #[test]
    fn test_rejects_negative_max_hp() {
        let err = EngineConfig::from_json(r#"{"battle": {"max_hp": -5}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_empty_streak_table() {
        let mut config = EngineConfig::default();
        config.streak.gold_table.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyStreakTable));
    }

    #[test]
    fn test_rejects_zero_history() {
        let mut config = EngineConfig::default();
        config.pattern.history_size = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroHistorySize));
    }
}
