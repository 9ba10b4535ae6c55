use chipjar_types::{UserId, UserRecord};
use std::{future::Future, sync::Arc};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("stored record is invalid: {0}")]
    Corrupt(String),
}

/// Result of a conditional daily-gift write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GiftWrite {
    /// Credit and grant time were both recorded; `balance` is the new balance.
    Applied { balance: u64 },
    /// The stored grant time no longer matched the expected one; nothing was written.
    Conflict,
}

/// User-record store backing the reward commands.
///
/// Implementations may be shared between processes, so atomicity must come from the backend
/// (a transaction or conditional update), never from a lock held by the caller.
pub trait Store: Send + Sync {
    /// Load a user's record. Unknown users read as [`UserRecord::default`].
    fn user(&self, user: &UserId) -> impl Future<Output = Result<UserRecord, StoreError>> + Send;

    /// Add `amount` to the user's balance, returning the new balance.
    fn credit_balance(
        &self,
        user: &UserId,
        amount: u64,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Atomically add `amount` and set the grant time to `now_ms`, but only if the stored grant
    /// time still equals `expected_last_ms`.
    fn credit_and_set_gift_time(
        &self,
        user: &UserId,
        amount: u64,
        expected_last_ms: Option<u64>,
        now_ms: u64,
    ) -> impl Future<Output = Result<GiftWrite, StoreError>> + Send;
}

impl<S: Store> Store for Arc<S> {
    fn user(&self, user: &UserId) -> impl Future<Output = Result<UserRecord, StoreError>> + Send {
        self.as_ref().user(user)
    }

    fn credit_balance(
        &self,
        user: &UserId,
        amount: u64,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send {
        self.as_ref().credit_balance(user, amount)
    }

    fn credit_and_set_gift_time(
        &self,
        user: &UserId,
        amount: u64,
        expected_last_ms: Option<u64>,
        now_ms: u64,
    ) -> impl Future<Output = Result<GiftWrite, StoreError>> + Send {
        self.as_ref()
            .credit_and_set_gift_time(user, amount, expected_last_ms, now_ms)
    }
}
