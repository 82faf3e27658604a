use chrono::{DateTime, Utc};
use common::{MessageType, Priority, ProcessingStatus};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Duration;

/// A single unit of work moving through the processor. Plays the role the
/// teacher's `EventEnvelope<T>` plays for Kafka topics, generalized to an
/// in-process heap: retry/dead-letter bookkeeping lives on the message
/// itself rather than on a topic-scoped wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedMessage {
    pub id: String,
    pub user_id: String,
    pub message_type: MessageType,
    pub priority: Priority,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub retry_count: u32,
    pub max_retries: u32,
    pub processing_timeout_secs: u64,
    pub status: ProcessingStatus,
    pub processing_started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl QueuedMessage {
    pub fn new(
        user_id: impl Into<String>,
        message_type: MessageType,
        payload: serde_json::Value,
        priority: Priority,
        scheduled_at: Option<DateTime<Utc>>,
        metadata: HashMap<String, String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            message_type,
            priority,
            payload,
            created_at: Utc::now(),
            scheduled_at,
            retry_count: 0,
            max_retries: 3,
            processing_timeout_secs: 30,
            status: ProcessingStatus::Pending,
            processing_started_at: None,
            completed_at: None,
            last_error: None,
            metadata,
        }
    }

    pub fn processing_timeout(&self) -> Duration {
        Duration::from_secs(self.processing_timeout_secs)
    }
}

impl PartialEq for QueuedMessage {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for QueuedMessage {}

impl PartialOrd for QueuedMessage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedMessage {
    /// Lower `priority` value and earlier `created_at` should come out of
    /// the heap first; `BinaryHeap` pops the greatest element, so both
    /// comparisons are inverted here.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.created_at.cmp(&self.created_at))
    }
}

/// Wraps a message with the instant it becomes eligible to move back onto
/// a priority heap. Used for both the retry list and the scheduled store;
/// `BinaryHeap` pops the earliest `ready_at` first (same inversion trick
/// as `QueuedMessage::cmp`).
#[derive(Debug, Clone)]
pub struct DelayedMessage {
    pub ready_at: DateTime<Utc>,
    pub message: QueuedMessage,
}

impl PartialEq for DelayedMessage {
    fn eq(&self, other: &Self) -> bool {
        self.message.id == other.message.id
    }
}

impl Eq for DelayedMessage {}

impl PartialOrd for DelayedMessage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DelayedMessage {
    fn cmp(&self, other: &Self) -> Ordering {
        other.ready_at.cmp(&self.ready_at)
    }
}

/// Handler registered per `MessageType` via `register_handler`. Boxed so
/// the registry can hold arbitrary async closures.
pub type MessageHandler = std::sync::Arc<
    dyn Fn(QueuedMessage) -> futures::future::BoxFuture<'static, Result<(), crate::errors::QueueError>>
        + Send
        + Sync,
>;

/// Point-in-time view returned by `status()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub pending_by_priority: HashMap<String, usize>,
    pub retry_count: usize,
    pub dead_letter_count: usize,
    pub scheduled_count: usize,
    pub avg_processing_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    fn message(priority: Priority, created_offset_secs: i64) -> QueuedMessage {
        let mut m = QueuedMessage::new(
            "u-1",
            MessageType::Text,
            serde_json::json!({}),
            priority,
            None,
            HashMap::new(),
        );
        m.created_at = Utc::now() + chrono::Duration::seconds(created_offset_secs);
        m
    }

    #[test]
    fn heap_pops_critical_before_normal() {
        let mut heap = BinaryHeap::new();
        heap.push(message(Priority::Normal, 0));
        heap.push(message(Priority::Critical, 1));
        heap.push(message(Priority::Low, 2));

        assert_eq!(heap.pop().unwrap().priority, Priority::Critical);
        assert_eq!(heap.pop().unwrap().priority, Priority::Normal);
        assert_eq!(heap.pop().unwrap().priority, Priority::Low);
    }

    #[test]
    fn heap_breaks_ties_by_earlier_created_at() {
        let earlier = message(Priority::Normal, -10);
        let earlier_id = earlier.id.clone();
        let mut heap = BinaryHeap::new();
        heap.push(message(Priority::Normal, 10));
        heap.push(earlier);

        assert_eq!(heap.pop().unwrap().id, earlier_id);
    }
}
