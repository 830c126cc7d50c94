//! Queue message types.
//!
//! This module defines:
//! - `QueueEntry`: one payload waiting to be forwarded, paired with its
//!   completion handle
//! - `Outcome`: what the webhook endpoint answered for that entry
//! - `DrainerState`: what the drainer is doing right now

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::warn;

use crate::error::RelayError;

/// Result delivered to whoever enqueued an entry.
pub type DeliveryResult = Result<Outcome, RelayError>;

// =============================================================================
// Outcome
// =============================================================================

/// Response summary for one forwarded payload.
///
/// Any status line counts as an outcome. Only failures before a status was
/// received are reported as `RelayError::Transport`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    /// HTTP status returned by the webhook endpoint
    pub status_code: u16,
    /// Whether the status is in the 2xx range
    pub success: bool,
    /// When the response was received
    pub delivered_at: DateTime<Utc>,
}

impl Outcome {
    pub fn from_status(status_code: u16, delivered_at: DateTime<Utc>) -> Self {
        Self {
            status_code,
            success: (200..300).contains(&status_code),
            delivered_at,
        }
    }
}

// =============================================================================
// Queue Entry
// =============================================================================

/// A payload waiting in the forwarding queue.
#[derive(Debug)]
pub struct QueueEntry {
    /// Opaque JSON body, forwarded byte-for-byte as re-serialized JSON
    pub payload: Value,
    reply: oneshot::Sender<DeliveryResult>,
}

impl QueueEntry {
    /// Create an entry and the handle its submitter waits on.
    pub fn new(payload: Value) -> (Self, Delivery) {
        let (reply, rx) = oneshot::channel();
        (Self { payload, reply }, Delivery { rx })
    }

    /// Resolve the entry, consuming it.
    ///
    /// A submitter that stopped waiting is not an error; the result is
    /// logged and dropped.
    pub fn complete(self, result: DeliveryResult) {
        if self.reply.send(result).is_err() {
            warn!("delivery_receiver_dropped");
        }
    }
}

/// Completion handle for one enqueued payload.
#[derive(Debug)]
pub struct Delivery {
    rx: oneshot::Receiver<DeliveryResult>,
}

impl Delivery {
    /// Wait until the drainer has forwarded this entry.
    pub async fn outcome(self) -> DeliveryResult {
        self.rx.await.unwrap_or(Err(RelayError::Closed))
    }
}

// =============================================================================
// Drainer State
// =============================================================================

/// Observable state of the queue drainer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrainerState {
    /// Queue empty, nothing scheduled
    Idle,
    /// Queue non-empty, waiting for the throttle window to elapse
    Scheduled,
    /// Waiting on the webhook endpoint for the head entry
    Sending,
}
