//! Throttled webhook relay.
//!
//! Accepts JSON payloads over HTTP, queues them in memory, and forwards
//! them one at a time to a fixed webhook endpoint with a minimum spacing
//! between the start of consecutive calls.
//!
//! ## Architecture
//!
//! ```text
//! POST / → web → Relay handle → Drainer (queue + rate gate) → WebhookClient → endpoint
//!                      ▲                                                         │
//!                      └──────────────── Outcome / RelayError ◀──────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod forward;
pub mod gate;
pub mod queue;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use error::RelayError;
pub use forward::{Forwarder, WebhookClient};
pub use gate::{can_send_now, GateDecision, RateGate};
pub use queue::{Delivery, DrainerState, Outcome, Relay};
pub use web::{router, AppState};
