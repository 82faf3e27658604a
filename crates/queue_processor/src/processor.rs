use crate::errors::QueueError;
use crate::types::{DelayedMessage, MessageHandler, QueueSnapshot, QueuedMessage};
use chrono::{DateTime, Utc};
use common::{MessageType, Priority, ProcessingStatus, RuntimeConfig, SharedStore};
use std::collections::{BinaryHeap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Durable-write TTL for CRITICAL/HIGH messages and for the generic
/// stop-time PENDING flush (§6's `queue:critical:<id>` namespace).
const DURABLE_TTL: Duration = Duration::from_secs(3600);

/// Accepts enqueued messages, drives them through registered per-type
/// handlers with bounded concurrency, retries with exponential backoff,
/// delivers scheduled messages at their due time, and quarantines poison
/// messages to a dead-letter store.
pub struct QueueProcessor {
    config: RuntimeConfig,
    store: Arc<dyn SharedStore>,
    handlers: Mutex<HashMap<MessageType, MessageHandler>>,
    heap: Mutex<BinaryHeap<QueuedMessage>>,
    retry_heap: Mutex<BinaryHeap<DelayedMessage>>,
    scheduled_heap: Mutex<BinaryHeap<DelayedMessage>>,
    dead_letters: Mutex<Vec<QueuedMessage>>,
    user_in_flight: Mutex<HashMap<String, usize>>,
    user_last_served: Mutex<HashMap<String, DateTime<Utc>>>,
    avg_processing_ms: Mutex<f64>,
    running: AtomicBool,
    /// Open question (ii): whether a retried message keeps its original
    /// priority instead of being demoted to NORMAL. Defaults to false, the
    /// literal spec behavior.
    retry_preserves_priority: bool,
}

impl QueueProcessor {
    pub fn new(config: RuntimeConfig, store: Arc<dyn SharedStore>) -> Arc<Self> {
        let retry_preserves_priority = std::env::var("RETRY_PRESERVES_PRIORITY")
            .map(|v| v == "true")
            .unwrap_or(false);

        Arc::new(Self {
            config,
            store,
            handlers: Mutex::new(HashMap::new()),
            heap: Mutex::new(BinaryHeap::new()),
            retry_heap: Mutex::new(BinaryHeap::new()),
            scheduled_heap: Mutex::new(BinaryHeap::new()),
            dead_letters: Mutex::new(Vec::new()),
            user_in_flight: Mutex::new(HashMap::new()),
            user_last_served: Mutex::new(HashMap::new()),
            avg_processing_ms: Mutex::new(0.0),
            running: AtomicBool::new(false),
            retry_preserves_priority,
        })
    }

    pub async fn register_handler(&self, message_type: MessageType, handler: MessageHandler) {
        self.handlers.lock().await.insert(message_type, handler);
    }

    /// `enqueue(userId, type, payload, priority, scheduledAt?, metadata?)`.
    /// Returns immediately with the assigned message id.
    pub async fn enqueue(
        &self,
        user_id: impl Into<String>,
        message_type: MessageType,
        payload: serde_json::Value,
        priority: Priority,
        scheduled_at: Option<DateTime<Utc>>,
        metadata: HashMap<String, String>,
    ) -> Result<String, QueueError> {
        let message = QueuedMessage::new(user_id, message_type, payload, priority, scheduled_at, metadata);
        let id = message.id.clone();

        if let Some(due) = scheduled_at {
            self.persist_scheduled(&message, due).await?;
            self.scheduled_heap
                .lock()
                .await
                .push(DelayedMessage { ready_at: due, message });
            return Ok(id);
        }

        if matches!(priority, Priority::Critical | Priority::High) {
            self.persist_durable(&message).await?;
        }

        self.heap.lock().await.push(message);
        Ok(id)
    }

    pub async fn status(&self) -> QueueSnapshot {
        let mut pending_by_priority: HashMap<String, usize> = HashMap::new();
        for msg in self.heap.lock().await.iter() {
            *pending_by_priority.entry(format!("{:?}", msg.priority)).or_insert(0) += 1;
        }

        QueueSnapshot {
            pending_by_priority,
            retry_count: self.retry_heap.lock().await.len(),
            dead_letter_count: self.dead_letters.lock().await.len(),
            scheduled_count: self.scheduled_heap.lock().await.len(),
            avg_processing_ms: *self.avg_processing_ms.lock().await,
        }
    }

    /// Reloads messages persisted by a prior clean `stop()`.
    pub async fn initialize(&self) -> Result<(), QueueError> {
        let keys = self.store.scan_prefix("queue:pending:").await?;
        for key in keys {
            if let Some(bytes) = self.store.get(&key).await? {
                match serde_json::from_slice::<QueuedMessage>(&bytes) {
                    Ok(message) => self.heap.lock().await.push(message),
                    Err(e) => tracing::warn!(key = %key, error = %e, "dropping unreadable persisted message"),
                }
            }
            self.store.delete(&key).await?;
        }
        Ok(())
    }

    /// Spawns the fixed worker pool plus the retry/scheduled sweepers and
    /// the monitoring loop. Returns the join handles so the caller can
    /// cancel them during shutdown.
    pub fn start(self: &Arc<Self>) -> Vec<tokio::task::JoinHandle<()>> {
        self.running.store(true, Ordering::SeqCst);
        let mut handles = Vec::with_capacity(self.config.max_workers + 3);

        for _ in 0..self.config.max_workers {
            let this = Arc::clone(self);
            handles.push(tokio::spawn(async move { this.worker_loop().await }));
        }

        let retry_sweeper = Arc::clone(self);
        handles.push(tokio::spawn(async move { retry_sweeper.retry_sweep_loop().await }));

        let scheduled_sweeper = Arc::clone(self);
        handles.push(tokio::spawn(async move { scheduled_sweeper.scheduled_sweep_loop().await }));

        let monitor = Arc::clone(self);
        handles.push(tokio::spawn(async move { monitor.monitor_loop().await }));

        handles
    }

    /// Stops accepting new dispatch cycles and flushes every PENDING
    /// message back to durable storage, regardless of its priority.
    pub async fn stop(&self) -> Result<(), QueueError> {
        self.running.store(false, Ordering::SeqCst);

        let pending: Vec<QueuedMessage> = std::mem::take(&mut *self.heap.lock().await).into_iter().collect();
        for message in pending {
            let key = format!("queue:pending:{}", message.id);
            let payload = serde_json::to_vec(&message).map_err(|e| QueueError::Serialization(e.to_string()))?;
            self.store.set_ex(&key, payload, DURABLE_TTL).await?;
        }
        Ok(())
    }

    async fn worker_loop(self: Arc<Self>) {
        while self.running.load(Ordering::SeqCst) {
            let Some(message) = self.heap.lock().await.pop() else {
                tokio::time::sleep(Duration::from_millis(100)).await;
                continue;
            };

            let now = Utc::now();

            if !self.rate_gate_allows(&message.user_id, now).await {
                self.heap.lock().await.push(message);
                tokio::time::sleep(Duration::from_millis(100)).await;
                continue;
            }

            if !self.concurrency_gate_allows(&message.user_id).await {
                self.heap.lock().await.push(message);
                tokio::time::sleep(Duration::from_millis(200)).await;
                continue;
            }

            self.dispatch(message, now).await;
        }
    }

    async fn dispatch(&self, mut message: QueuedMessage, now: DateTime<Utc>) {
        self.user_last_served.lock().await.insert(message.user_id.clone(), now);
        *self
            .user_in_flight
            .lock()
            .await
            .entry(message.user_id.clone())
            .or_insert(0) += 1;

        message.status = ProcessingStatus::Processing;
        message.processing_started_at = Some(now);

        let result = self.invoke_handler(message.clone()).await;

        {
            let mut in_flight = self.user_in_flight.lock().await;
            if let Some(count) = in_flight.get_mut(&message.user_id) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    in_flight.remove(&message.user_id);
                }
            }
        }

        match result {
            Ok(()) => {
                let elapsed_ms = Utc::now().signed_duration_since(now).num_milliseconds().max(0) as f64;
                self.record_processing_time(elapsed_ms).await;
                message.status = ProcessingStatus::Completed;
                message.completed_at = Some(Utc::now());
                tracing::debug!(id = %message.id, elapsed_ms, "message completed");
            }
            Err(error) => {
                tracing::warn!(id = %message.id, error = %error, "handler failed");
                message.last_error = Some(error.to_string());
                self.handle_failure(message).await;
            }
        }
    }

    async fn rate_gate_allows(&self, user_id: &str, now: DateTime<Utc>) -> bool {
        let last_served = self.user_last_served.lock().await;
        match last_served.get(user_id) {
            Some(prev) => now.signed_duration_since(*prev).num_milliseconds() >= 1000,
            None => true,
        }
    }

    async fn concurrency_gate_allows(&self, user_id: &str) -> bool {
        let in_flight = self.user_in_flight.lock().await;
        in_flight.get(user_id).copied().unwrap_or(0) < self.config.max_concurrent_per_user
    }

    async fn invoke_handler(&self, message: QueuedMessage) -> Result<(), QueueError> {
        let handler = self.handlers.lock().await.get(&message.message_type).cloned();
        let Some(handler) = handler else {
            return Err(QueueError::HandlerNotRegistered(message.message_type));
        };

        let timeout = message.processing_timeout();
        match tokio::time::timeout(timeout, handler(message)).await {
            Ok(result) => result,
            Err(_) => Err(QueueError::Timeout),
        }
    }

    /// On failure: retry with exponential backoff if under the retry cap,
    /// else move to the dead-letter store. Delay is computed from the
    /// retry count *before* incrementing so the progression matches
    /// 1, 2, 4, 8, ... seconds for the 1st, 2nd, 3rd, ... retry.
    async fn handle_failure(&self, mut message: QueuedMessage) {
        if message.retry_count < message.max_retries {
            let delay_secs = 2u64.saturating_pow(message.retry_count).min(60);
            message.retry_count += 1;
            message.status = ProcessingStatus::Retry;
            if !self.retry_preserves_priority {
                message.priority = Priority::Normal;
            }
            let ready_at = Utc::now() + chrono::Duration::seconds(delay_secs as i64);
            tracing::info!(id = %message.id, retry_count = message.retry_count, delay_secs, "message scheduled for retry");
            self.retry_heap.lock().await.push(DelayedMessage { ready_at, message });
        } else {
            message.status = ProcessingStatus::DeadLetter;
            tracing::error!(id = %message.id, "message exhausted retries, moved to dead letter");
            self.dead_letters.lock().await.push(message);
        }
    }

    async fn retry_sweep_loop(self: Arc<Self>) {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        while self.running.load(Ordering::SeqCst) {
            interval.tick().await;
            self.drain_due(&self.retry_heap).await;
        }
    }

    async fn scheduled_sweep_loop(self: Arc<Self>) {
        let mut interval = tokio::time::interval(Duration::from_secs(5));
        while self.running.load(Ordering::SeqCst) {
            interval.tick().await;
            let due = self.drain_due(&self.scheduled_heap).await;
            for message in &due {
                if let Some(at) = message.scheduled_at {
                    let key = format!("scheduled:{}:{}", at.timestamp(), message.id);
                    if let Err(e) = self.store.delete(&key).await {
                        tracing::warn!(key = %key, error = %e, "failed to clear delivered scheduled entry");
                    }
                }
            }
        }
    }

    /// Pops every entry whose `ready_at` has passed off `source` and
    /// re-pushes them onto the live priority heap as PENDING. Returns the
    /// drained messages for any caller-specific bookkeeping.
    async fn drain_due(&self, source: &Mutex<BinaryHeap<DelayedMessage>>) -> Vec<QueuedMessage> {
        let now = Utc::now();
        let mut guard = source.lock().await;
        let mut ready = Vec::new();
        while let Some(top) = guard.peek() {
            if top.ready_at > now {
                break;
            }
            ready.push(guard.pop().expect("just peeked").message);
        }
        drop(guard);

        if !ready.is_empty() {
            let mut heap = self.heap.lock().await;
            for message in &ready {
                let mut message = message.clone();
                message.status = ProcessingStatus::Pending;
                heap.push(message);
            }
        }
        ready
    }

    async fn monitor_loop(self: Arc<Self>) {
        let mut interval = tokio::time::interval(Duration::from_secs(10));
        while self.running.load(Ordering::SeqCst) {
            interval.tick().await;

            let depth = self.heap.lock().await.len();
            let avg = *self.avg_processing_ms.lock().await;

            if let Err(e) = self
                .store
                .set_ex("metric:queue_depth:latest", depth.to_string().into_bytes(), Duration::from_secs(3600))
                .await
            {
                tracing::warn!(error = %e, "failed to publish queue_depth metric");
            }
            if let Err(e) = self
                .store
                .set_ex(
                    "metric:queue_avg_processing_ms:latest",
                    format!("{avg:.2}").into_bytes(),
                    Duration::from_secs(3600),
                )
                .await
            {
                tracing::warn!(error = %e, "failed to publish queue_avg_processing_ms metric");
            }
        }
    }

    /// Exponential moving average: 0.9 existing weight, 0.1 new sample.
    async fn record_processing_time(&self, sample_ms: f64) {
        let mut avg = self.avg_processing_ms.lock().await;
        *avg = if *avg == 0.0 { sample_ms } else { *avg * 0.9 + sample_ms * 0.1 };
    }

    async fn persist_durable(&self, message: &QueuedMessage) -> Result<(), QueueError> {
        let key = format!("queue:critical:{}", message.id);
        let payload = serde_json::to_vec(message).map_err(|e| QueueError::Serialization(e.to_string()))?;
        self.store.set_ex(&key, payload, DURABLE_TTL).await?;
        Ok(())
    }

    async fn persist_scheduled(&self, message: &QueuedMessage, due: DateTime<Utc>) -> Result<(), QueueError> {
        let key = format!("scheduled:{}:{}", due.timestamp(), message.id);
        let payload = serde_json::to_vec(message).map_err(|e| QueueError::Serialization(e.to_string()))?;
        let ttl_secs = (due - Utc::now() + chrono::Duration::hours(1)).num_seconds().max(1) as u64;
        self.store.set_ex(&key, payload, Duration::from_secs(ttl_secs)).await?;
        Ok(())
    }

    #[cfg(test)]
    async fn dead_letter_count(&self) -> usize {
        self.dead_letters.lock().await.len()
    }

    #[cfg(test)]
    async fn push_for_test(&self, message: QueuedMessage) {
        self.heap.lock().await.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::InMemorySharedStore;

    fn processor() -> Arc<QueueProcessor> {
        QueueProcessor::new(RuntimeConfig::default(), Arc::new(InMemorySharedStore::new()))
    }

    #[tokio::test]
    async fn enqueue_critical_persists_durably() {
        let qp = processor();
        let id = qp
            .enqueue("u-1", MessageType::Text, serde_json::json!({"a": 1}), Priority::Critical, None, HashMap::new())
            .await
            .unwrap();

        let key = format!("queue:critical:{id}");
        assert!(qp.store.get(&key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn enqueue_normal_skips_durable_write() {
        let qp = processor();
        let id = qp
            .enqueue("u-1", MessageType::Text, serde_json::json!({}), Priority::Normal, None, HashMap::new())
            .await
            .unwrap();

        assert!(qp.store.get(&format!("queue:critical:{id}")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn priority_preemption_pops_critical_first() {
        let qp = processor();
        for _ in 0..5 {
            qp.enqueue("u-1", MessageType::Text, serde_json::json!({}), Priority::Normal, None, HashMap::new())
                .await
                .unwrap();
        }
        qp.enqueue("u-2", MessageType::Text, serde_json::json!({}), Priority::Critical, None, HashMap::new())
            .await
            .unwrap();

        let next = qp.heap.lock().await.pop().unwrap();
        assert_eq!(next.priority, Priority::Critical);
        assert_eq!(next.user_id, "u-2");
    }

    #[tokio::test]
    async fn retry_then_dead_letter_after_max_retries() {
        let qp = processor();
        let mut message = QueuedMessage::new(
            "u-1",
            MessageType::Text,
            serde_json::json!({}),
            Priority::High,
            None,
            HashMap::new(),
        );
        message.max_retries = 3;

        for expected_retry_count in 1..=3 {
            qp.handle_failure(message.clone()).await;
            let requeued = qp.retry_heap.lock().await.pop().unwrap().message;
            assert_eq!(requeued.retry_count, expected_retry_count);
            assert_eq!(requeued.priority, Priority::Normal);
            message = requeued;
        }

        // Fourth failure exhausts retries.
        qp.handle_failure(message).await;
        assert_eq!(qp.dead_letter_count().await, 1);
        assert!(qp.retry_heap.lock().await.is_empty());
    }

    #[tokio::test]
    async fn scheduled_message_is_not_dispatched_before_due() {
        let qp = processor();
        let due = Utc::now() + chrono::Duration::seconds(3600);
        qp.enqueue("u-1", MessageType::Text, serde_json::json!({}), Priority::Normal, Some(due), HashMap::new())
            .await
            .unwrap();

        assert!(qp.heap.lock().await.is_empty());
        assert_eq!(qp.scheduled_heap.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn status_reports_pending_and_dead_letter_counts() {
        let qp = processor();
        qp.push_for_test(QueuedMessage::new(
            "u-1",
            MessageType::Text,
            serde_json::json!({}),
            Priority::Normal,
            None,
            HashMap::new(),
        ))
        .await;

        let snapshot = qp.status().await;
        assert_eq!(snapshot.pending_by_priority.get("Normal"), Some(&1));
        assert_eq!(snapshot.dead_letter_count, 0);
    }

    #[test]
    fn retry_delay_progression_matches_spec() {
        let delays: Vec<u64> = (0..8).map(|n| 2u64.saturating_pow(n).min(60)).collect();
        assert_eq!(delays, vec![1, 2, 4, 8, 16, 32, 60, 60]);
    }
}
