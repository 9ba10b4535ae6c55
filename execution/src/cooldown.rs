//! Daily-gift cooldown gate.

use chipjar_types::rewards::{MS_PER_HOUR, MS_PER_MINUTE};
use std::time::Duration;

/// Time left before a user may claim again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Remaining(Duration);

impl Remaining {
    pub fn as_duration(&self) -> Duration {
        self.0
    }

    /// Whole hours left (floored).
    pub fn hours(&self) -> u64 {
        u64::try_from(self.0.as_millis() / MS_PER_HOUR as u128).unwrap_or(u64::MAX)
    }

    /// Whole minutes left within the current hour (floored).
    pub fn minutes(&self) -> u64 {
        ((self.0.as_millis() % MS_PER_HOUR as u128) / MS_PER_MINUTE as u128) as u64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CooldownDecision {
    Eligible,
    CoolingDown(Remaining),
}

impl CooldownDecision {
    pub fn is_eligible(&self) -> bool {
        matches!(self, CooldownDecision::Eligible)
    }

    pub fn remaining(&self) -> Option<Remaining> {
        match self {
            CooldownDecision::Eligible => None,
            CooldownDecision::CoolingDown(remaining) => Some(*remaining),
        }
    }
}

/// Decide whether a user whose last grant was at `last_grant_ms` may claim at `now_ms`.
///
/// Never granted means eligible. Elapsed time equal to `cooldown` is eligible. A `now_ms` earlier
/// than `last_grant_ms` counts as zero elapsed time.
pub fn evaluate(last_grant_ms: Option<u64>, now_ms: u64, cooldown: Duration) -> CooldownDecision {
    let Some(last_grant_ms) = last_grant_ms else {
        return CooldownDecision::Eligible;
    };
    let elapsed = Duration::from_millis(now_ms.saturating_sub(last_grant_ms));
    if elapsed >= cooldown {
        return CooldownDecision::Eligible;
    }
    CooldownDecision::CoolingDown(Remaining(cooldown - elapsed))
}
