//! chipjar execution layer.
//!
//! This crate contains the reward logic shared by every front end: the weighted jackpot draw
//! ([`select`]), the daily-gift cooldown gate ([`evaluate`]) and the [`Handler`] that composes
//! them with a [`Store`] and a [`Messenger`].
//!
//! ## Purity
//! - [`select`] and [`evaluate`] hold no state and never fail.
//! - Randomness is injected (`rand::RngCore`); nothing here reads an ambient generator.
//! - Wall-clock time is passed in by the caller as Unix epoch milliseconds.
//!
//! ## Store invariants
//! A daily-gift grant credits the balance and records the grant time in one conditional store
//! write keyed on the previously observed grant time. Two racing invocations for one user can
//! therefore never both be granted, without any in-process locking.
//!
//! ## Example
//! ```rust,ignore
//! use chipjar_execution::{mocks::Memory, Handler};
//! use chipjar_types::{Command, Rewards, UserId};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! # async fn example() {
//! let handler = Handler::new(Memory::default(), Rewards::default(), StdRng::seed_from_u64(7));
//! let user = UserId::new("twitch:1").unwrap();
//! let outcome = handler.execute(&user, Command::DailyGift, 1_700_000_000_000).await;
//! assert!(outcome.is_granted());
//! # }
//! ```

mod cooldown;
mod handler;
mod messenger;
mod selector;
mod store;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;


pub use cooldown::{evaluate, CooldownDecision, Remaining};
pub use handler::Handler;
pub use messenger::{Messenger, MessengerError};
pub use selector::{select, select_at};
pub use store::{GiftWrite, Store, StoreError};
