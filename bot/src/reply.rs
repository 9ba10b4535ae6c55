use anyhow::Context;
use chipjar_execution::{Messenger, MessengerError};
use chipjar_types::{Command, Outcome, UserId};
use serde::Serialize;
use std::time::Duration;
use tracing::info;
use url::Url;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);

/// Render an outcome as the chat message shown to `user`.
pub fn render(user: &UserId, outcome: &Outcome) -> String {
    match outcome {
        Outcome::Granted {
            command: Command::Jackpot,
            amount,
            balance,
        } => format!("{user} hit the jackpot and won {amount} chips! Balance: {balance}."),
        Outcome::Granted {
            amount, balance, ..
        } => format!("{user} claimed the daily gift of {amount} chips. Balance: {balance}."),
        Outcome::CooldownActive { hours, minutes } => format!(
            "{user}, you already claimed your daily gift. Try again in {hours}h {minutes}m."
        ),
        Outcome::Balance { balance } => format!("{user} has {balance} chips."),
        Outcome::TransientFailure => {
            "Something went wrong on our side, please try again later.".to_string()
        }
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    user_id: &'a UserId,
    text: String,
    outcome: &'a Outcome,
}

/// Posts rendered replies to a chat platform webhook.
pub struct WebhookMessenger {
    client: reqwest::Client,
    url: Url,
}

impl WebhookMessenger {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let url = Url::parse(url).with_context(|| format!("invalid reply url {url}"))?;
        let client = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .context("build webhook client")?;
        Ok(Self { client, url })
    }

    async fn post(&self, user: &UserId, outcome: &Outcome) -> Result<(), MessengerError> {
        let payload = WebhookPayload {
            user_id: user,
            text: render(user, outcome),
            outcome,
        };
        self.client
            .post(self.url.clone())
            .json(&payload)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| MessengerError::Unavailable(err.to_string()))?;
        Ok(())
    }
}

/// Reply sink selected by configuration.
pub enum Replier {
    /// Log replies only; the HTTP response carries the message back to the caller.
    Log,
    Webhook(WebhookMessenger),
}

impl Replier {
    pub fn from_url(reply_url: Option<&str>) -> anyhow::Result<Self> {
        Ok(match reply_url {
            Some(url) => Replier::Webhook(WebhookMessenger::new(url)?),
            None => Replier::Log,
        })
    }
}

impl Messenger for Replier {
    async fn deliver(&self, user: &UserId, outcome: &Outcome) -> Result<(), MessengerError> {
        match self {
            Replier::Log => {
                info!(%user, message = %render(user, outcome), "reply");
                Ok(())
            }
            Replier::Webhook(webhook) => webhook.post(user, outcome).await,
        }
    }
}
