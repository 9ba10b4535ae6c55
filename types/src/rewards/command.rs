use serde::{Deserialize, Serialize};

/// Reward commands a user can invoke from chat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Jackpot,
    DailyGift,
    Balance,
}

impl Command {
    /// Parse a chat message such as `!daily` or `Jackpot please`.
    ///
    /// Only the first word counts; the `!` prefix is optional and case is ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let word = word.strip_prefix('!').unwrap_or(word);
        match word.to_ascii_lowercase().as_str() {
            "jackpot" | "jp" => Some(Command::Jackpot),
            "daily" | "gift" | "dailygift" => Some(Command::DailyGift),
            "balance" | "bal" => Some(Command::Balance),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Jackpot => "jackpot",
            Command::DailyGift => "daily_gift",
            Command::Balance => "balance",
        }
    }
}

/// Result of one command invocation, handed to the messenger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Reward credited; `balance` is the balance after the credit.
    Granted {
        command: Command,
        amount: u64,
        balance: u64,
    },
    /// Daily gift refused; whole hours and minutes left, floored.
    CooldownActive { hours: u64, minutes: u64 },
    Balance { balance: u64 },
    /// A collaborator was unavailable and nothing was changed.
    TransientFailure,
}

impl Outcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, Outcome::Granted { .. })
    }
}
