//! Common types used throughout chipjar.
//!
//! The reward economy is small: a jackpot drawn from a weighted [`RewardTable`], a daily gift
//! gated by a per-user cooldown, and the [`UserRecord`] the store keeps for every user. Logic
//! that touches randomness or storage lives in `chipjar-execution`; this crate only holds the
//! shapes and the validation that happens when configuration is loaded.

pub mod rewards;

pub use rewards::{
    Command, ConfigError, JackpotConfig, Outcome, RewardConfig, RewardEntry, RewardTable,
    Rewards, TableError, UserId, UserIdError, UserRecord,
};
