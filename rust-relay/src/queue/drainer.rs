//! Queue drainer: the single task allowed to call the webhook endpoint.
//!
//! The drainer owns the forwarding queue and the rate gate. Submitters talk
//! to it through a `Relay` handle over an unbounded channel, so only one
//! forward can ever be in flight.
//!
//! ## State machine
//!
//! ```text
//! Idle ──enqueue, gate open──────────────▶ Sending
//! Idle ──enqueue, gate closed────────────▶ Scheduled
//! Scheduled ──wake-up, gate open─────────▶ Sending
//! Scheduled ──wake-up, gate still closed─▶ Scheduled (re-armed)
//! Sending ──done, queue non-empty────────▶ Scheduled
//! Sending ──done, queue empty────────────▶ Idle
//! ```

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::Utc;
use serde_json::Value;
use tokio::{
    sync::{mpsc, watch},
    time::Instant,
};
use tracing::{debug, info, warn};

use super::forwarding::ForwardingQueue;
use super::types::{Delivery, DeliveryResult, DrainerState, Outcome, QueueEntry};
use crate::error::RelayError;
use crate::forward::Forwarder;
use crate::gate::{GateDecision, RateGate};

/// Cloneable handle for submitting payloads to the drainer.
#[derive(Clone)]
pub struct Relay {
    inbox: mpsc::UnboundedSender<QueueEntry>,
    pending: Arc<AtomicUsize>,
    state: watch::Receiver<DrainerState>,
}

impl Relay {
    /// Create a handle and the drainer it feeds, without starting it.
    pub fn new<F: Forwarder>(forwarder: F, interval: Duration) -> (Self, Drainer<F>) {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(DrainerState::Idle);
        let pending = Arc::new(AtomicUsize::new(0));

        let relay = Self {
            inbox: inbox_tx,
            pending: Arc::clone(&pending),
            state: state_rx,
        };

        let drainer = Drainer {
            forwarder,
            gate: RateGate::new(interval),
            queue: ForwardingQueue::new(),
            inbox: inbox_rx,
            pending,
            state: state_tx,
        };

        (relay, drainer)
    }

    /// Create a handle and run its drainer on the current tokio runtime.
    pub fn spawn<F: Forwarder>(forwarder: F, interval: Duration) -> Self {
        let (relay, drainer) = Self::new(forwarder, interval);
        tokio::spawn(drainer.run());
        relay
    }

    /// Append a payload to the queue and return its completion handle.
    ///
    /// The entry is in the queue when this returns, so call order is
    /// delivery order.
    pub fn enqueue(&self, payload: Value) -> Result<Delivery, RelayError> {
        let (entry, delivery) = QueueEntry::new(payload);

        self.pending.fetch_add(1, Ordering::SeqCst);
        if self.inbox.send(entry).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            return Err(RelayError::Closed);
        }

        Ok(delivery)
    }

    /// Enqueue a payload and wait until it has been forwarded.
    pub async fn submit(&self, payload: Value) -> DeliveryResult {
        self.enqueue(payload)?.outcome().await
    }

    /// Entries submitted but not yet popped by the drainer.
    pub fn queue_depth(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> DrainerState {
        *self.state.borrow()
    }
}

/// Owns the queue and gate; forwards entries one at a time.
pub struct Drainer<F> {
    forwarder: F,
    gate: RateGate,
    queue: ForwardingQueue,
    inbox: mpsc::UnboundedReceiver<QueueEntry>,
    pending: Arc<AtomicUsize>,
    state: watch::Sender<DrainerState>,
}

impl<F: Forwarder> Drainer<F> {
    /// Run until every `Relay` handle is dropped and the queue is empty.
    pub async fn run(mut self) {
        info!(
            throttle_ms = self.gate.interval().as_millis() as u64,
            "drainer_started"
        );

        let mut inbox_open = true;

        loop {
            if inbox_open {
                inbox_open = self.collect_inbox();
            }

            if self.queue.is_empty() {
                if !inbox_open {
                    break;
                }

                self.set_state(DrainerState::Idle);
                debug!("drainer_idle");

                match self.inbox.recv().await {
                    Some(entry) => self.queue.enqueue(entry),
                    None => inbox_open = false,
                }
                continue;
            }

            match self.gate.check(Instant::now()) {
                GateDecision::Closed { wait } => {
                    self.set_state(DrainerState::Scheduled);
                    debug!(
                        wait_ms = wait.as_millis() as u64,
                        queue_depth = self.queue.len(),
                        "drainer_scheduled"
                    );

                    // New arrivals are accepted while waiting; the gate is
                    // re-checked on every wake-up.
                    tokio::select! {
                        () = tokio::time::sleep(wait) => {}
                        entry = self.inbox.recv(), if inbox_open => match entry {
                            Some(entry) => self.queue.enqueue(entry),
                            None => inbox_open = false,
                        },
                    }
                }
                GateDecision::Open => {
                    if let Some(entry) = self.queue.dequeue() {
                        self.pending.fetch_sub(1, Ordering::SeqCst);
                        self.send(entry).await;
                    }
                }
            }
        }

        self.set_state(DrainerState::Idle);
        info!("drainer_stopped");
    }

    /// Move everything waiting in the channel into the queue.
    ///
    /// Returns `false` once every `Relay` handle has been dropped.
    fn collect_inbox(&mut self) -> bool {
        loop {
            match self.inbox.try_recv() {
                Ok(entry) => self.queue.enqueue(entry),
                Err(mpsc::error::TryRecvError::Empty) => return true,
                Err(mpsc::error::TryRecvError::Disconnected) => return false,
            }
        }
    }

    async fn send(&mut self, entry: QueueEntry) {
        self.set_state(DrainerState::Sending);
        self.gate.mark_sent(Instant::now());

        info!(
            sent_at = %Utc::now().to_rfc3339(),
            queue_depth = self.queue.len(),
            "webhook_sending"
        );

        let result = match self.forwarder.forward(&entry.payload).await {
            Ok(status_code) => {
                let outcome = Outcome::from_status(status_code, Utc::now());
                if outcome.success {
                    info!(status_code, "webhook_delivered");
                } else {
                    warn!(status_code, "webhook_rejected");
                }
                Ok(outcome)
            }
            Err(e) => {
                warn!(error = %e, "webhook_failed");
                Err(e)
            }
        };

        entry.complete(result);
    }

    fn set_state(&self, state: DrainerState) {
        self.state.send_replace(state);
    }
}
