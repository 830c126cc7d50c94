//! Forwarding queue and the drainer that empties it.
//!
//! This module provides:
//! - Entry and outcome types
//! - The FIFO the drainer owns
//! - The drainer task and the `Relay` handle used to submit payloads
//!
//! ## Flow
//!
//! ```text
//! Relay::enqueue → channel → Drainer (FIFO, rate gate) → Forwarder → Delivery
//! ```

pub mod drainer;
pub mod forwarding;
pub mod types;

pub use drainer::{Drainer, Relay};
pub use forwarding::ForwardingQueue;
pub use types::{Delivery, DeliveryResult, DrainerState, Outcome, QueueEntry};
