use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error as ThisError;

use super::{
    RewardEntry, RewardTable, TableError, DEFAULT_COOLDOWN_SECS, DEFAULT_DAILY_GIFT_AMOUNT,
    DEFAULT_JACKPOT_VALUES, DEFAULT_JACKPOT_WEIGHTS,
};

#[derive(Debug, ThisError, Clone, PartialEq)]
pub enum ConfigError {
    #[error("jackpot values and weights differ in length (values={values}, weights={weights})")]
    LengthMismatch { values: usize, weights: usize },
    #[error("invalid jackpot table: {0}")]
    Table(#[from] TableError),
    #[error("daily gift amount must be at least 1")]
    ZeroDailyGift,
}

/// Jackpot distribution as written in config: parallel `values` and `weights` lists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JackpotConfig {
    pub values: Vec<u64>,
    pub weights: Vec<f64>,
}

impl Default for JackpotConfig {
    fn default() -> Self {
        Self {
            values: DEFAULT_JACKPOT_VALUES.to_vec(),
            weights: DEFAULT_JACKPOT_WEIGHTS.to_vec(),
        }
    }
}

impl JackpotConfig {
    pub fn table(&self) -> Result<RewardTable, ConfigError> {
        if self.values.len() != self.weights.len() {
            return Err(ConfigError::LengthMismatch {
                values: self.values.len(),
                weights: self.weights.len(),
            });
        }
        let entries = self
            .values
            .iter()
            .zip(&self.weights)
            .map(|(&value, &weight)| RewardEntry::new(value, weight))
            .collect();
        Ok(RewardTable::new(entries)?)
    }
}

/// Reward settings section of the bot configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub jackpot: JackpotConfig,
    pub daily_gift_amount: u64,
    pub cooldown_secs: u64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            jackpot: JackpotConfig::default(),
            daily_gift_amount: DEFAULT_DAILY_GIFT_AMOUNT,
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
        }
    }
}

impl RewardConfig {
    /// Validate the raw settings into the immutable [`Rewards`] used at runtime.
    pub fn build(&self) -> Result<Rewards, ConfigError> {
        let table = self.jackpot.table()?;
        if self.daily_gift_amount == 0 {
            return Err(ConfigError::ZeroDailyGift);
        }
        Ok(Rewards {
            jackpot: table,
            daily_gift_amount: self.daily_gift_amount,
            cooldown: Duration::from_secs(self.cooldown_secs),
        })
    }
}

/// Validated reward settings, constructed once at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct Rewards {
    pub jackpot: RewardTable,
    pub daily_gift_amount: u64,
    pub cooldown: Duration,
}

impl Default for Rewards {
    fn default() -> Self {
        // The defaults are constants known to validate.
        match RewardConfig::default().build() {
            Ok(rewards) => rewards,
            Err(err) => unreachable!("default reward config is invalid: {err}"),
        }
    }
}
