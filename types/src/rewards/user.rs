use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error as ThisError;

use super::MAX_USER_ID_LENGTH;

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum UserIdError {
    #[error("user id is empty")]
    Empty,
    #[error("user id too long (len={len}, max={max})")]
    TooLong { len: usize, max: usize },
}

/// Platform-scoped user identity, e.g. `twitch:12345`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Result<Self, UserIdError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(UserIdError::Empty);
        }
        if trimmed.len() > MAX_USER_ID_LENGTH {
            return Err(UserIdError::TooLong {
                len: trimmed.len(),
                max: MAX_USER_ID_LENGTH,
            });
        }
        if trimmed.len() == id.len() {
            Ok(Self(id))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-user economy state, owned by the store.
///
/// A user the store has never seen reads as the default record: zero balance, never gifted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub balance: u64,
    /// Unix epoch milliseconds of the last granted daily gift.
    pub last_gift_ms: Option<u64>,
}
