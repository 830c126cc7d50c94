//! Rate gate deciding whether the next forward may start.
//!
//! Spacing is measured between the *start* of consecutive forwards: the
//! drainer stamps the gate right before issuing a call, not when the
//! response arrives.

use std::time::Duration;

use tokio::time::Instant;

/// Result of asking the gate for permission to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// A forward may start now.
    Open,
    /// The throttle window has not elapsed yet.
    Closed {
        /// Minimum delay before checking again.
        wait: Duration,
    },
}

impl GateDecision {
    pub fn is_open(&self) -> bool {
        matches!(self, GateDecision::Open)
    }

    /// Remaining wait, zero when the gate is open.
    pub fn wait(&self) -> Duration {
        match self {
            GateDecision::Open => Duration::ZERO,
            GateDecision::Closed { wait } => *wait,
        }
    }
}

/// Decide whether a forward may start at `now`.
///
/// Open when nothing has been sent yet or when at least `interval` has
/// elapsed since `last_sent_at`.
pub fn can_send_now(now: Instant, last_sent_at: Option<Instant>, interval: Duration) -> GateDecision {
    let Some(last) = last_sent_at else {
        return GateDecision::Open;
    };

    let elapsed = now.saturating_duration_since(last);
    if elapsed >= interval {
        GateDecision::Open
    } else {
        GateDecision::Closed {
            wait: interval - elapsed,
        }
    }
}

/// Gate state owned by the drainer.
#[derive(Debug, Clone)]
pub struct RateGate {
    interval: Duration,
    last_sent_at: Option<Instant>,
}

impl RateGate {
    /// Create a gate that has never sent.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_sent_at: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_sent_at(&self) -> Option<Instant> {
        self.last_sent_at
    }

    pub fn check(&self, now: Instant) -> GateDecision {
        can_send_now(now, self.last_sent_at, self.interval)
    }

    /// Record that a forward started at `now`.
    pub fn mark_sent(&mut self, now: Instant) {
        self.last_sent_at = Some(now);
    }
}
