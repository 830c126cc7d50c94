//! Outbound delivery to the webhook endpoint.
//!
//! The drainer only knows the `Forwarder` trait; `WebhookClient` is the
//! production implementation backed by reqwest.

pub mod client;
#[cfg(test)]
pub(crate) mod recording;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::RelayError;

pub use client::WebhookClient;

/// Sends one payload to the webhook endpoint.
#[async_trait]
pub trait Forwarder: Send + Sync + 'static {
    /// Forward `payload` and return the response status code.
    ///
    /// Any received status is `Ok`, including 4xx and 5xx. `Err` is reserved
    /// for failures where no response was received.
    async fn forward(&self, payload: &Value) -> Result<u16, RelayError>;
}
