//! chipjar chat-bot service.
//!
//! Accepts reward commands over HTTP, runs them through the execution [`Handler`] against a
//! SQLite user store, and relays the rendered reply.
//!
//! [`Handler`]: chipjar_execution::Handler

mod api;
mod config;
mod reply;
mod sqlite;

pub use api::{router, AppState, BotHandler, Clock, CommandRequest, CommandResponse, SystemClock};
pub use config::Config;
pub use reply::{render, Replier, WebhookMessenger};
pub use sqlite::SqliteStore;
