use anyhow::Context;
use chipjar_types::RewardConfig;
use serde::{Deserialize, Serialize};
use std::{
    net::{Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};

/// Bot configuration (from config file).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones.
    pub json_logs: bool,
    pub listen: SocketAddr,
    pub database_path: PathBuf,
    /// Seed for the jackpot generator; drawn from OS entropy when absent.
    pub seed: Option<u64>,
    /// Chat webhook that receives rendered replies; replies are only logged when absent.
    pub reply_url: Option<String>,
    pub rewards: RewardConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            listen: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            database_path: PathBuf::from("chipjar.db"),
            seed: None,
            reply_url: None,
            rewards: RewardConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        Self::from_yaml(&raw)
            .with_context(|| format!("could not parse config file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(raw)?;
        // Reward settings are fatal to startup when malformed.
        config.rewards.build().context("invalid rewards section")?;
        Ok(config)
    }
}
