use super::*;
use proptest::prelude::*;
use std::time::Duration;

#[test]
fn test_table_rejects_empty() {
    assert_eq!(RewardTable::new(vec![]), Err(TableError::Empty));
}

#[test]
fn test_table_rejects_non_positive_weight() {
    let err = RewardTable::new(vec![RewardEntry::new(10, 1.0), RewardEntry::new(20, 0.0)])
        .unwrap_err();
    assert!(matches!(err, TableError::NonPositiveWeight { index: 1, .. }));

    let err = RewardTable::new(vec![RewardEntry::new(10, -3.0)]).unwrap_err();
    assert!(matches!(err, TableError::NonPositiveWeight { index: 0, .. }));
}

#[test]
fn test_table_rejects_nan_and_infinite_weight() {
    assert!(matches!(
        RewardTable::new(vec![RewardEntry::new(10, f64::NAN)]),
        Err(TableError::NonPositiveWeight { .. })
    ));
    assert!(matches!(
        RewardTable::new(vec![RewardEntry::new(10, f64::INFINITY)]),
        Err(TableError::NonPositiveWeight { .. })
    ));
}

#[test]
fn test_table_rejects_overflowing_total() {
    let err = RewardTable::new(vec![
        RewardEntry::new(1, f64::MAX),
        RewardEntry::new(2, f64::MAX),
    ])
    .unwrap_err();
    assert_eq!(err, TableError::NonFiniteTotal);
}

#[test]
fn test_table_rejects_zero_value() {
    let err = RewardTable::new(vec![RewardEntry::new(0, 1.0)]).unwrap_err();
    assert_eq!(err, TableError::ZeroValue { index: 0 });
}

#[test]
fn test_table_allows_duplicate_values() {
    let table = RewardTable::new(vec![
        RewardEntry::new(5, 1.0),
        RewardEntry::new(5, 3.0),
        RewardEntry::new(9, 4.0),
    ])
    .expect("valid table");
    assert_eq!(table.len(), 3);
    assert_eq!(table.total_weight(), 8.0);
    assert_eq!(table.probability_of(5), 0.5);
    assert_eq!(table.last().value, 9);
}

#[test]
fn test_default_rewards() {
    let rewards = Rewards::default();
    assert_eq!(rewards.daily_gift_amount, DEFAULT_DAILY_GIFT_AMOUNT);
    assert_eq!(rewards.cooldown, DEFAULT_COOLDOWN);
    assert_eq!(DEFAULT_COOLDOWN, Duration::from_secs(24 * 60 * 60));
    let values: Vec<u64> = rewards.jackpot.entries().iter().map(|e| e.value).collect();
    assert_eq!(values, vec![25, 50, 100]);
    assert_eq!(rewards.jackpot.total_weight(), 100.0);
}

#[test]
fn test_config_length_mismatch() {
    let config = RewardConfig {
        jackpot: JackpotConfig {
            values: vec![1, 2],
            weights: vec![1.0],
        },
        ..RewardConfig::default()
    };
    assert_eq!(
        config.build(),
        Err(ConfigError::LengthMismatch {
            values: 2,
            weights: 1
        })
    );
}

#[test]
fn test_config_rejects_zero_daily_gift() {
    let config = RewardConfig {
        daily_gift_amount: 0,
        ..RewardConfig::default()
    };
    assert_eq!(config.build(), Err(ConfigError::ZeroDailyGift));
}

#[test]
fn test_config_wraps_table_errors() {
    let config = RewardConfig {
        jackpot: JackpotConfig {
            values: vec![],
            weights: vec![],
        },
        ..RewardConfig::default()
    };
    assert_eq!(config.build(), Err(ConfigError::Table(TableError::Empty)));
}

#[test]
fn test_config_yaml_partial_uses_defaults() {
    let config: RewardConfig = serde_yaml::from_str("daily_gift_amount: 250\n").unwrap();
    assert_eq!(config.daily_gift_amount, 250);
    assert_eq!(config.cooldown_secs, DEFAULT_COOLDOWN_SECS);
    assert_eq!(config.jackpot, JackpotConfig::default());

    let config: RewardConfig = serde_yaml::from_str(
        "jackpot:\n  values: [1, 1000]\n  weights: [99.5, 0.5]\ncooldown_secs: 3600\n",
    )
    .unwrap();
    let rewards = config.build().unwrap();
    assert_eq!(rewards.cooldown, Duration::from_secs(3600));
    assert_eq!(rewards.jackpot.probability_of(1000), 0.005);
}

#[test]
fn test_command_parse() {
    assert_eq!(Command::parse("!jackpot"), Some(Command::Jackpot));
    assert_eq!(Command::parse("!JP"), Some(Command::Jackpot));
    assert_eq!(Command::parse("daily"), Some(Command::DailyGift));
    assert_eq!(Command::parse("  !gift now please"), Some(Command::DailyGift));
    assert_eq!(Command::parse("!dailygift"), Some(Command::DailyGift));
    assert_eq!(Command::parse("!Bal"), Some(Command::Balance));
    assert_eq!(Command::parse("!balance"), Some(Command::Balance));
    assert_eq!(Command::parse("!dance"), None);
    assert_eq!(Command::parse(""), None);
    assert_eq!(Command::parse("!"), None);
}

#[test]
fn test_outcome_json_shape() {
    let outcome = Outcome::Granted {
        command: Command::DailyGift,
        amount: 100,
        balance: 300,
    };
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["kind"], "granted");
    assert_eq!(json["command"], "daily_gift");
    assert_eq!(json["amount"], 100);

    let json = serde_json::to_value(Outcome::CooldownActive {
        hours: 23,
        minutes: 59,
    })
    .unwrap();
    assert_eq!(json["kind"], "cooldown_active");
    assert_eq!(json["hours"], 23);
}

#[test]
fn test_user_id_validation() {
    assert_eq!(UserId::new(""), Err(UserIdError::Empty));
    assert_eq!(UserId::new("   "), Err(UserIdError::Empty));
    assert!(matches!(
        UserId::new("x".repeat(MAX_USER_ID_LENGTH + 1)),
        Err(UserIdError::TooLong { .. })
    ));
    let id = UserId::new(" twitch:42 ").unwrap();
    assert_eq!(id.as_str(), "twitch:42");
    assert_eq!(id.to_string(), "twitch:42");
}

#[test]
fn test_user_id_serde() {
    let id: UserId = serde_json::from_str("\"discord:7\"").unwrap();
    assert_eq!(id.as_str(), "discord:7");
    assert!(serde_json::from_str::<UserId>("\"\"").is_err());
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"discord:7\"");
}

proptest! {
    #[test]
    fn prop_valid_tables_build(weights in prop::collection::vec(0.001f64..1_000.0, 1..16)) {
        let entries: Vec<RewardEntry> = weights
            .iter()
            .enumerate()
            .map(|(i, &w)| RewardEntry::new(i as u64 + 1, w))
            .collect();
        let table = RewardTable::new(entries).unwrap();
        let total: f64 = weights.iter().sum();
        prop_assert!((table.total_weight() - total).abs() < 1e-9);
        prop_assert_eq!(table.len(), weights.len());
    }
}
