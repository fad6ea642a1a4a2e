//! Error types
//!
//! Nothing in normal play is fatal. Rejections that a caller may want to
//! surface (spending more than the balance, asking for a round after the
//! match ended) come back as typed errors; everything else is a guarded
//! no-op. Invalid configuration is the only construction-time failure.

/// Rejected engine configuration
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_hp must be greater than zero")]
    ZeroMaxHp,

    #[error("damage_per_round must be greater than zero")]
    ZeroDamage,

    #[error("history_size must be greater than zero")]
    ZeroHistorySize,

    #[error("max_multiplier must be greater than zero")]
    ZeroMultiplierCap,

    #[error("streak gold table must have at least one entry")]
    EmptyStreakTable,

    #[error("selection time must be greater than zero")]
    ZeroSelectionTime,

    #[error("invalid config JSON: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Match progression errors
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("match already ended after round {round}")]
    AlreadyEnded { round: u32 },
}

/// Currency ledger errors
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RewardError {
    #[error("not enough {currency}: have {available}, need {requested}")]
    InsufficientFunds {
        currency: Currency,
        available: u32,
        requested: u32,
    },
}

/// Currency kinds held by the reward ledger
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Currency {
    Gold,
    Gems,
}
