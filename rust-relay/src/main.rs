//! Throttle Relay - HTTP front door for a rate-limited webhook.
//!
//! This binary:
//! - Receives JSON payloads on `POST /`
//! - Queues them in memory
//! - Forwards them one at a time, spaced by `THROTTLE_MS`
//! - Answers each caller with its own delivery outcome
//!
//! Queued payloads are not persisted and are abandoned on shutdown.

use std::{future::IntoFuture, net::SocketAddr};

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use relay::{router, AppState, Config, Relay, WebhookClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("relay_starting");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        port = config.port,
        webhook_url = %config.webhook_url,
        throttle_ms = config.throttle_ms,
        "config_loaded"
    );

    // Start the drainer
    let client = WebhookClient::new(config.webhook_url.clone())
        .context("Failed to create webhook client")?;
    let relay = Relay::spawn(client, config.throttle());

    let state = AppState::new(config.clone(), relay.clone());
    let app = router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "relay_listening");

    // No drain on shutdown: queued and in-flight payloads are dropped.
    tokio::select! {
        result = axum::serve(listener, app).into_future() => {
            result.context("Server error")?;
        }
        () = shutdown_signal() => {}
    }

    let abandoned = relay.queue_depth();
    if abandoned > 0 {
        warn!(abandoned, drainer_state = ?relay.state(), "relay_queue_abandoned");
    }

    info!("relay_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("relay_stopping");
}
