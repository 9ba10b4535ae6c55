use std::time::Duration;

/// Default jackpot values, paired index-wise with [`DEFAULT_JACKPOT_WEIGHTS`].
pub const DEFAULT_JACKPOT_VALUES: [u64; 3] = [25, 50, 100];

/// Default jackpot weights (50% / 35% / 15%).
pub const DEFAULT_JACKPOT_WEIGHTS: [f64; 3] = [50.0, 35.0, 15.0];

/// Chips granted by a successful daily gift.
pub const DEFAULT_DAILY_GIFT_AMOUNT: u64 = 100;

/// Minimum time between two daily gifts for the same user.
pub const DEFAULT_COOLDOWN_SECS: u64 = 24 * 60 * 60;

/// Default cooldown as a [`Duration`].
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(DEFAULT_COOLDOWN_SECS);

/// Maximum length of a platform-scoped user identity.
pub const MAX_USER_ID_LENGTH: usize = 128;

pub const MS_PER_MINUTE: u64 = 60 * 1_000;
pub const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
