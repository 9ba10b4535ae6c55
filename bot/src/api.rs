use axum::{
    extract::State as AxumState,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chipjar_execution::Handler;
use chipjar_types::{Command, Outcome, UserId};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::debug;

use crate::{render, Replier, SqliteStore};

/// Source of "now" for cooldown decisions, in Unix epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }
}

pub type BotHandler = Handler<SqliteStore, ChaCha20Rng>;

pub struct AppState {
    pub handler: BotHandler,
    pub replier: Replier,
    pub clock: Box<dyn Clock>,
}

#[derive(Deserialize)]
pub struct CommandRequest {
    pub user_id: String,
    pub text: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct CommandResponse {
    pub outcome: Outcome,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn bad_request(error: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/commands", post(submit_command))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn submit_command(
    AxumState(state): AxumState<Arc<AppState>>,
    Json(request): Json<CommandRequest>,
) -> Response {
    let user = match UserId::new(request.user_id) {
        Ok(user) => user,
        Err(err) => return bad_request(err.to_string()),
    };
    let Some(command) = Command::parse(&request.text) else {
        debug!(%user, text = %request.text, "ignoring unknown command");
        return bad_request("unknown command");
    };
    let now_ms = state.clock.now_ms();
    let outcome = state
        .handler
        .handle(&state.replier, &user, command, now_ms)
        .await;
    let message = render(&user, &outcome);
    Json(CommandResponse { outcome, message }).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use chipjar_types::Rewards;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tower::ServiceExt;

    const NOW: u64 = 1_700_000_000_000;
    const MINUTE_MS: u64 = 60 * 1_000;

    struct FixedClock(Arc<AtomicU64>);

    impl Clock for FixedClock {
        fn now_ms(&self) -> u64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn app() -> (Router, Arc<AtomicU64>) {
        let now = Arc::new(AtomicU64::new(NOW));
        let state = Arc::new(AppState {
            handler: Handler::new(
                SqliteStore::open_in_memory().unwrap(),
                Rewards::default(),
                ChaCha20Rng::seed_from_u64(11),
            ),
            replier: Replier::Log,
            clock: Box::new(FixedClock(now.clone())),
        });
        (router(state), now)
    }

    async fn post_command(app: &Router, body: serde_json::Value) -> (StatusCode, Vec<u8>) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/commands")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app();
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_daily_gift_then_cooldown() {
        let (app, now) = app();
        let request = serde_json::json!({ "user_id": "twitch:alice", "text": "!daily" });

        let (status, body) = post_command(&app, request.clone()).await;
        assert_eq!(status, StatusCode::OK);
        let response: CommandResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            response.outcome,
            Outcome::Granted {
                command: Command::DailyGift,
                amount: 100,
                balance: 100,
            }
        );
        assert!(response.message.contains("daily gift of 100 chips"));

        now.store(NOW + MINUTE_MS, Ordering::SeqCst);
        let (status, body) = post_command(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        let response: CommandResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            response.outcome,
            Outcome::CooldownActive {
                hours: 23,
                minutes: 59,
            }
        );
        assert!(response.message.ends_with("Try again in 23h 59m."));
    }

    #[tokio::test]
    async fn test_jackpot_and_balance() {
        let (app, _) = app();
        let (status, body) = post_command(
            &app,
            serde_json::json!({ "user_id": "discord:bob", "text": "!jackpot" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let response: CommandResponse = serde_json::from_slice(&body).unwrap();
        let Outcome::Granted { amount, .. } = response.outcome else {
            panic!("unexpected outcome {:?}", response.outcome);
        };

        let (_, body) = post_command(
            &app,
            serde_json::json!({ "user_id": "discord:bob", "text": "!bal" }),
        )
        .await;
        let response: CommandResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response.outcome, Outcome::Balance { balance: amount });
    }

    #[tokio::test]
    async fn test_rejects_unknown_command_and_bad_user() {
        let (app, _) = app();
        let (status, body) = post_command(
            &app,
            serde_json::json!({ "user_id": "twitch:alice", "text": "!dance" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(error["error"], "unknown command");

        let (status, _) = post_command(
            &app,
            serde_json::json!({ "user_id": "  ", "text": "!daily" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
