//! HTTP endpoint handlers.
//!
//! The relay endpoint holds the caller's request open until the drainer
//! has forwarded that payload, then answers with the endpoint's outcome.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::queue::{DrainerState, Outcome, Relay};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub relay: Relay,
}

impl AppState {
    pub fn new(config: Config, relay: Relay) -> Self {
        Self {
            config: Arc::new(config),
            relay,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub state: DrainerState,
    pub queue_depth: usize,
    pub throttle_ms: u64,
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        state: state.relay.state(),
        queue_depth: state.relay.queue_depth(),
        throttle_ms: state.config.throttle_ms,
    })
}

// =============================================================================
// Relay
// =============================================================================

/// Relay response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_result: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Relay endpoint.
///
/// This endpoint:
/// 1. Enqueues the JSON body as-is
/// 2. Waits for the drainer to forward it
/// 3. Returns 200 with the webhook outcome, or 500 if the call failed
pub async fn relay_webhook(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    info!(
        queue_depth = state.relay.queue_depth(),
        drainer_state = ?state.relay.state(),
        "relay_request_received"
    );

    match state.relay.submit(payload).await {
        Ok(outcome) => {
            info!(
                status_code = outcome.status_code,
                success = outcome.success,
                "relay_request_complete"
            );

            (
                StatusCode::OK,
                Json(RelayResponse {
                    message: "Webhook request processed",
                    webhook_result: Some(outcome),
                    error: None,
                }),
            )
        }
        Err(e) => {
            error!(error = %e, "relay_request_failed");

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RelayResponse {
                    message: "Error sending webhook",
                    webhook_result: None,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
