//! In-memory FIFO of entries waiting to be forwarded.

use std::collections::VecDeque;

use super::types::QueueEntry;

/// Unbounded FIFO owned by the drainer.
///
/// Insertion order is delivery order. There is no capacity bound; callers
/// that need backpressure must apply it before enqueueing.
#[derive(Debug, Default)]
pub struct ForwardingQueue {
    entries: VecDeque<QueueEntry>,
}

impl ForwardingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the tail.
    pub fn enqueue(&mut self, entry: QueueEntry) {
        self.entries.push_back(entry);
    }

    /// Remove and return the head, or `None` when empty.
    pub fn dequeue(&mut self) -> Option<QueueEntry> {
        self.entries.pop_front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dequeue_empty() {
        let mut queue = ForwardingQueue::new();
        assert!(queue.is_empty());
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = ForwardingQueue::new();
        for id in 1..=3 {
            let (entry, _delivery) = QueueEntry::new(json!({ "id": id }));
            queue.enqueue(entry);
        }
        assert_eq!(queue.len(), 3);

        let ids: Vec<_> = std::iter::from_fn(|| queue.dequeue())
            .map(|entry| entry.payload["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(queue.is_empty());
    }
}
