use chipjar_types::{Command, Outcome, Rewards, UserId};
use rand::RngCore;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};

use crate::{
    cooldown::{evaluate, CooldownDecision, Remaining},
    select, GiftWrite, Messenger, Store,
};

/// Composes the jackpot draw and the daily-gift gate with a [`Store`].
///
/// The handler itself is stateless apart from its random source; every invocation is a single
/// load/decide/write against the store.
pub struct Handler<S: Store, R: RngCore + Send> {
    store: S,
    rewards: Rewards,
    rng: Mutex<R>,
}

impl<S: Store, R: RngCore + Send> Handler<S, R> {
    pub fn new(store: S, rewards: Rewards, rng: R) -> Self {
        Self {
            store,
            rewards,
            rng: Mutex::new(rng),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn rewards(&self) -> &Rewards {
        &self.rewards
    }

    /// Run `command` for `user` and deliver the outcome through `messenger`.
    ///
    /// Delivery failures are logged and not retried; the outcome is returned either way.
    pub async fn handle<M: Messenger>(
        &self,
        messenger: &M,
        user: &UserId,
        command: Command,
        now_ms: u64,
    ) -> Outcome {
        let outcome = self.execute(user, command, now_ms).await;
        if let Err(err) = messenger.deliver(user, &outcome).await {
            warn!(%user, command = command.as_str(), ?err, "failed to deliver outcome");
        }
        outcome
    }

    /// Run `command` for `user` without delivering the outcome.
    pub async fn execute(&self, user: &UserId, command: Command, now_ms: u64) -> Outcome {
        match command {
            Command::Jackpot => self.jackpot(user).await,
            Command::DailyGift => self.daily_gift(user, now_ms).await,
            Command::Balance => self.balance(user).await,
        }
    }

    fn draw(&self) -> u64 {
        // A panic mid-draw cannot leave the generator logically broken.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        select(&self.rewards.jackpot, &mut *rng)
    }

    async fn jackpot(&self, user: &UserId) -> Outcome {
        let amount = self.draw();
        match self.store.credit_balance(user, amount).await {
            Ok(balance) => {
                info!(%user, amount, balance, "jackpot granted");
                Outcome::Granted {
                    command: Command::Jackpot,
                    amount,
                    balance,
                }
            }
            Err(err) => {
                warn!(%user, amount, ?err, "jackpot credit failed");
                Outcome::TransientFailure
            }
        }
    }

    async fn daily_gift(&self, user: &UserId, now_ms: u64) -> Outcome {
        let record = match self.store.user(user).await {
            Ok(record) => record,
            Err(err) => {
                warn!(%user, ?err, "daily gift lookup failed");
                return Outcome::TransientFailure;
            }
        };
        if let CooldownDecision::CoolingDown(remaining) =
            evaluate(record.last_gift_ms, now_ms, self.rewards.cooldown)
        {
            debug!(
                %user,
                hours = remaining.hours(),
                minutes = remaining.minutes(),
                "daily gift on cooldown"
            );
            return cooldown_outcome(remaining);
        }

        let amount = self.rewards.daily_gift_amount;
        match self
            .store
            .credit_and_set_gift_time(user, amount, record.last_gift_ms, now_ms)
            .await
        {
            Ok(GiftWrite::Applied { balance }) => {
                info!(%user, amount, balance, "daily gift granted");
                Outcome::Granted {
                    command: Command::DailyGift,
                    amount,
                    balance,
                }
            }
            Ok(GiftWrite::Conflict) => self.after_conflict(user, now_ms).await,
            Err(err) => {
                warn!(%user, amount, ?err, "daily gift write failed");
                Outcome::TransientFailure
            }
        }
    }

    /// Another invocation for the same user won the conditional write. Report the cooldown it
    /// started; never try to grant a second time.
    async fn after_conflict(&self, user: &UserId, now_ms: u64) -> Outcome {
        let record = match self.store.user(user).await {
            Ok(record) => record,
            Err(err) => {
                warn!(%user, ?err, "daily gift reload after conflict failed");
                return Outcome::TransientFailure;
            }
        };
        match evaluate(record.last_gift_ms, now_ms, self.rewards.cooldown) {
            CooldownDecision::CoolingDown(remaining) => {
                debug!(%user, "daily gift lost race to a concurrent claim");
                cooldown_outcome(remaining)
            }
            CooldownDecision::Eligible => {
                warn!(%user, "daily gift conflict left user eligible");
                Outcome::TransientFailure
            }
        }
    }

    async fn balance(&self, user: &UserId) -> Outcome {
        match self.store.user(user).await {
            Ok(record) => Outcome::Balance {
                balance: record.balance,
            },
            Err(err) => {
                warn!(%user, ?err, "balance lookup failed");
                Outcome::TransientFailure
            }
        }
    }
}

fn cooldown_outcome(remaining: Remaining) -> Outcome {
    Outcome::CooldownActive {
        hours: remaining.hours(),
        minutes: remaining.minutes(),
    }
}
