//! Reward domain types.
//!
//! Defines the reward table, user record, command/outcome vocabulary and configuration schema
//! used by the execution layer and the bot.

mod command;
mod config;
mod constants;
mod table;
mod user;

pub use command::*;
pub use config::*;
pub use constants::*;
pub use table::*;
pub use user::*;

#[cfg(test)]
mod tests;
