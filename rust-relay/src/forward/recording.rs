//! In-memory forwarder for scheduler and handler tests.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::Instant;

use super::Forwarder;
use crate::error::RelayError;

/// A forwarded call as seen by the fake endpoint.
#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub started_at: Instant,
    pub payload: Value,
}

/// Records every call and answers from a script, defaulting to 200.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingForwarder {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    script: Arc<Mutex<VecDeque<Result<u16, RelayError>>>>,
    latency: Duration,
}

impl RecordingForwarder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated response time for every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Queue the answer for the next unanswered call.
    pub fn respond(&self, result: Result<u16, RelayError>) {
        self.script.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Forwarder for RecordingForwarder {
    async fn forward(&self, payload: &Value) -> Result<u16, RelayError> {
        self.calls.lock().unwrap().push(RecordedCall {
            started_at: Instant::now(),
            payload: payload.clone(),
        });

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.script.lock().unwrap().pop_front().unwrap_or(Ok(200))
    }
}
