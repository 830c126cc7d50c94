//! Web server module: the relay's HTTP front door.
//!
//! This module provides:
//! - `POST /`: enqueue a JSON payload and wait for its delivery outcome
//! - `GET /health`: drainer state and queue depth

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{health, relay_webhook, AppState, HealthResponse, RelayResponse};

/// Build the router with all routes and middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(relay_webhook))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
