use chipjar_types::{Outcome, UserId};
use std::future::Future;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum MessengerError {
    #[error("messenger unavailable: {0}")]
    Unavailable(String),
}

/// Delivers command outcomes back to the chat platform.
pub trait Messenger: Send + Sync {
    fn deliver(
        &self,
        user: &UserId,
        outcome: &Outcome,
    ) -> impl Future<Output = Result<(), MessengerError>> + Send;
}
