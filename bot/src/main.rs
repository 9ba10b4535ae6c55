use anyhow::{Context, Result};
use chipjar_bot::{router, AppState, Config, Replier, SqliteStore, SystemClock};
use chipjar_execution::Handler;
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::{path::PathBuf, str::FromStr, sync::Arc};
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(author, version, about = "Chat-bot reward service (jackpot and daily gift).")]
struct Args {
    /// Path to the YAML config file.
    #[arg(long)]
    config: PathBuf,
}

fn init_tracing(config: &Config) -> Result<()> {
    let level = Level::from_str(&config.log_level)
        .map_err(|_| anyhow::anyhow!("invalid log level {:?}", config.log_level))?;
    let builder = tracing_subscriber::fmt().with_max_level(level);
    if config.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse arguments
    let args = Args::parse();
    let config = Config::load(&args.config)?;

    // Create logger
    init_tracing(&config)?;

    let rewards = config
        .rewards
        .build()
        .context("invalid reward configuration")?;
    let store = SqliteStore::open(&config.database_path)?;
    let rng = match config.seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_entropy(),
    };
    let replier = Replier::from_url(config.reply_url.as_deref())?;
    info!(
        database = %config.database_path.display(),
        daily_gift_amount = rewards.daily_gift_amount,
        cooldown_secs = rewards.cooldown.as_secs(),
        jackpot_entries = rewards.jackpot.len(),
        seeded = config.seed.is_some(),
        webhook = config.reply_url.is_some(),
        "starting chipjar bot"
    );

    let state = Arc::new(AppState {
        handler: Handler::new(store, rewards, rng),
        replier,
        clock: Box::new(SystemClock),
    });

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    info!("Listening on {}", config.listen);
    axum::serve(listener, router(state))
        .await
        .context("axum server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_config_flag() {
        let args = Args::parse_from(["chipjar-bot", "--config", "bot.yaml"]);
        assert_eq!(args.config, PathBuf::from("bot.yaml"));
    }

    #[test]
    fn requires_config_flag() {
        assert!(Args::try_parse_from(["chipjar-bot"]).is_err());
    }
}
