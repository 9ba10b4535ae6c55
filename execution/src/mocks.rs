//! In-memory collaborators for tests and local experiments.

use crate::{GiftWrite, Messenger, MessengerError, Store, StoreError};
use chipjar_types::{Outcome, UserId, UserRecord};
use futures::future::poll_fn;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
    task::Poll,
};

/// Hash-map backed [`Store`] with switches for simulating outages and races.
#[derive(Default)]
pub struct Memory {
    users: Mutex<HashMap<UserId, UserRecord>>,
    reads_unavailable: AtomicBool,
    writes_unavailable: AtomicBool,
    yield_after_read: AtomicBool,
    writes: AtomicUsize,
}

impl Memory {
    fn users(&self) -> MutexGuard<'_, HashMap<UserId, UserRecord>> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, user: UserId, record: UserRecord) {
        self.users().insert(user, record);
    }

    /// Stored record, or `None` if the store has never written this user.
    pub fn get(&self, user: &UserId) -> Option<UserRecord> {
        self.users().get(user).cloned()
    }

    /// Fail every operation.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.reads_unavailable.store(unavailable, Ordering::SeqCst);
        self.writes_unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Serve reads but fail every write.
    pub fn set_writes_unavailable(&self, unavailable: bool) {
        self.writes_unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Yield to the executor once after each read so concurrent callers interleave between
    /// their read and their write.
    pub fn set_yield_after_read(&self, enabled: bool) {
        self.yield_after_read.store(enabled, Ordering::SeqCst);
    }

    /// Number of successful writes.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self, flag: &AtomicBool) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }
}

async fn yield_once() {
    let mut yielded = false;
    poll_fn(|cx| {
        if yielded {
            return Poll::Ready(());
        }
        yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    })
    .await
}

impl Store for Memory {
    async fn user(&self, user: &UserId) -> Result<UserRecord, StoreError> {
        self.check(&self.reads_unavailable)?;
        let record = self.get(user).unwrap_or_default();
        if self.yield_after_read.load(Ordering::SeqCst) {
            yield_once().await;
        }
        Ok(record)
    }

    async fn credit_balance(&self, user: &UserId, amount: u64) -> Result<u64, StoreError> {
        self.check(&self.writes_unavailable)?;
        let mut users = self.users();
        let record = users.entry(user.clone()).or_default();
        record.balance = record.balance.saturating_add(amount);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(record.balance)
    }

    async fn credit_and_set_gift_time(
        &self,
        user: &UserId,
        amount: u64,
        expected_last_ms: Option<u64>,
        now_ms: u64,
    ) -> Result<GiftWrite, StoreError> {
        self.check(&self.writes_unavailable)?;
        let mut users = self.users();
        let record = users.entry(user.clone()).or_default();
        if record.last_gift_ms != expected_last_ms {
            return Ok(GiftWrite::Conflict);
        }
        record.balance = record.balance.saturating_add(amount);
        record.last_gift_ms = Some(now_ms);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(GiftWrite::Applied {
            balance: record.balance,
        })
    }
}

/// [`Messenger`] that records every delivery.
#[derive(Default)]
pub struct Recorder {
    delivered: Mutex<Vec<(UserId, Outcome)>>,
    unavailable: AtomicBool,
}

impl Recorder {
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn delivered(&self) -> Vec<(UserId, Outcome)> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Messenger for Recorder {
    async fn deliver(&self, user: &UserId, outcome: &Outcome) -> Result<(), MessengerError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(MessengerError::Unavailable("recorder offline".to_string()));
        }
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((user.clone(), outcome.clone()));
        Ok(())
    }
}

/// Shorthand for building a [`UserId`] in tests.
pub fn user(id: &str) -> UserId {
    match UserId::new(id) {
        Ok(user) => user,
        Err(err) => panic!("invalid test user id {id:?}: {err}"),
    }
}
