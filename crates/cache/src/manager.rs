use crate::envelope;
use crate::errors::CacheError;
use crate::keying;
use crate::types::{AiContextSummary, CacheConfig, CacheEntry, CacheStats, ConversationContext, UserProfile};
use chrono::Utc;
use common::{CacheLevel, SharedStore};
use moka::sync::Cache as MokaCache;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const CONVERSATION_TTL: Duration = Duration::from_secs(24 * 3600);
const PROFILE_TTL: Duration = Duration::from_secs(7 * 24 * 3600);
const CANNED_TTL: Duration = Duration::from_secs(24 * 3600);
/// Eviction, once triggered, proceeds down to this fraction of each limit
/// (§4.3 invariant: "eviction proceeds until ≤ 90% of both limits").
const EVICT_TARGET_FRACTION: f64 = 0.9;

/// Probes L1 (in-process) -> L2 (shared fast store) -> L3 (durable
/// store), promoting on hit and maintaining exact hit/miss counters.
///
/// L1 is a `moka::sync::Cache` weighted by byte size, which gives the
/// byte-bound eviction for free; the entry-count bound is enforced
/// alongside it with a small LRU-order deque kept in sync through moka's
/// eviction listener, matching §4.3's "bounded by both entry count and
/// total bytes".
pub struct CacheManager {
    config: CacheConfig,
    store: Arc<dyn SharedStore>,
    l1: MokaCache<String, Arc<CacheEntry>>,
    order: Arc<Mutex<VecDeque<String>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    avg_response_time_ms: Mutex<f64>,
}

impl CacheManager {
    pub fn new(config: CacheConfig, store: Arc<dyn SharedStore>) -> Arc<Self> {
        let order: Arc<Mutex<VecDeque<String>>> = Arc::new(Mutex::new(VecDeque::new()));
        let order_for_listener = Arc::clone(&order);

        let byte_capacity = (config.max_bytes as f64 * EVICT_TARGET_FRACTION) as u64;
        let l1 = MokaCache::builder()
            .max_capacity(byte_capacity.max(1))
            .weigher(|_key: &String, value: &Arc<CacheEntry>| -> u32 {
                value.byte_size.min(u32::MAX as usize) as u32
            })
            .eviction_listener(move |key: Arc<String>, _value, _cause| {
                let mut order = order_for_listener.lock().expect("order mutex poisoned");
                order.retain(|k| k != key.as_str());
            })
            .build();

        Arc::new(Self {
            config,
            store,
            l1,
            order,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            avg_response_time_ms: Mutex::new(0.0),
        })
    }

    /// Seeds canonical greeting/help/fallback responses into L1+L2 with a
    /// 24h TTL (§4.3 "Warm-up").
    pub async fn initialize(&self) -> Result<(), CacheError> {
        let seeds = [
            ("greeting", "Hi! How can I help you today?"),
            ("help", "I can help with orders, billing, and general support questions."),
            ("fallback", "Sorry, I didn't quite catch that. Could you rephrase?"),
        ];
        for (name, response) in seeds {
            self.set(
                &format!("canned:{name}"),
                response.as_bytes(),
                CANNED_TTL,
                &[CacheLevel::L1, CacheLevel::L2],
            )
            .await?;
        }
        tracing::info!(count = seeds.len(), "cache warm-up complete");
        Ok(())
    }

    /// `get(key)`. Probes L1 -> L2 -> L3, promoting on hit per §4.3.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let started = Instant::now();
        let result = self.get_inner(key).await;
        self.record_response_time(started.elapsed());
        result
    }

    async fn get_inner(&self, key: &str) -> Option<Vec<u8>> {
        let now = Utc::now();

        if let Some(entry) = self.l1.get(key) {
            if !entry.is_expired(now) {
                entry.touch();
                self.touch_order(key);
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.bytes.clone());
            }
            self.l1.invalidate(key);
        }

        if let Some(bytes) = self.probe_store(&l2_key(key)).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            self.insert_l1(key, bytes.clone(), self.config.default_ttl, false);
            return Some(bytes);
        }

        if let Some(bytes) = self.probe_store(&l3_key(key)).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            self.insert_l1(key, bytes.clone(), self.config.default_ttl, false);
            if let Err(e) = self.write_l2(key, &bytes, self.config.default_ttl).await {
                tracing::warn!(%key, error = %e, "failed to promote L3 hit into L2");
            }
            return Some(bytes);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Reads L2 then L3 without any L1 promotion. Used by
    /// `get_user_profile`, which per the supplemental TTL table never
    /// lives in L1.
    async fn get_l2_l3_only(&self, key: &str) -> Option<Vec<u8>> {
        if let Some(bytes) = self.probe_store(&l2_key(key)).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Some(bytes);
        }
        if let Some(bytes) = self.probe_store(&l3_key(key)).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            if let Err(e) = self.write_l2(key, &bytes, self.config.default_ttl).await {
                tracing::warn!(%key, error = %e, "failed to promote L3 hit into L2");
            }
            return Some(bytes);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    async fn probe_store(&self, namespaced_key: &str) -> Option<Vec<u8>> {
        match self.store.get(namespaced_key).await {
            Ok(Some(raw)) => match envelope::unpack(&raw) {
                Ok((bytes, _compressed)) => Some(bytes),
                Err(e) => {
                    tracing::warn!(key = %namespaced_key, error = %e, "malformed cache envelope, treating as miss");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key = %namespaced_key, error = %e, "shared store read failed, treating as miss");
                None
            }
        }
    }

    /// `set(key, value, ttl, levels)`.
    pub async fn set(&self, key: &str, value: &[u8], ttl: Duration, levels: &[CacheLevel]) -> Result<(), CacheError> {
        if levels.contains(&CacheLevel::L1) {
            self.insert_l1(key, value.to_vec(), ttl, false);
        }
        if levels.contains(&CacheLevel::L2) {
            self.write_l2(key, value, ttl).await?;
        }
        if levels.contains(&CacheLevel::L3) {
            self.write_l3(key, value, ttl).await?;
        }
        Ok(())
    }

    /// `delete(key)`. Removes from all tiers.
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.l1.invalidate(key);
        {
            let mut order = self.order.lock().expect("order mutex poisoned");
            order.retain(|k| k != key);
        }
        self.store.delete(&l2_key(key)).await?;
        self.store.delete(&l3_key(key)).await?;
        Ok(())
    }

    /// `invalidateUser(userId)`. Scrubs conversation context and user
    /// profile for the user. AI-response entries are content-addressed
    /// (§4.3's keying has no user id in it at all) so there is no
    /// per-user pattern to scrub them by; see DESIGN.md.
    pub async fn invalidate_user(&self, user_id: &str) -> Result<(), CacheError> {
        self.delete(&format!("conversation:{user_id}")).await?;
        self.delete(&format!("profile:{user_id}")).await?;
        Ok(())
    }

    /// Deletes every L2/L3 key matching `prefix`, used by the Health
    /// Controller's failover cache-purge step (§4.4).
    pub async fn purge_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
        let mut purged = 0;
        for namespaced in [format!("l2:{prefix}"), format!("l3:{prefix}")] {
            let keys = self.store.scan_prefix(&namespaced).await?;
            for key in &keys {
                self.store.delete(key).await?;
            }
            purged += keys.len();
        }
        Ok(purged)
    }

    pub async fn get_cached_ai_response(&self, input: &str, context: &AiContextSummary) -> Option<String> {
        let key = keying::ai_response_key(input, context);
        let bytes = self.get(&key).await?;
        String::from_utf8(bytes).ok()
    }

    pub async fn cache_ai_response(
        &self,
        input: &str,
        context: &AiContextSummary,
        response: &str,
    ) -> Result<(), CacheError> {
        let key = keying::ai_response_key(input, context);
        self.set(&key, response.as_bytes(), self.config.default_ttl, &[CacheLevel::L1, CacheLevel::L2])
            .await
    }

    pub async fn get_conversation_context(&self, user_id: &str) -> Option<ConversationContext> {
        let bytes = self.get(&format!("conversation:{user_id}")).await?;
        serde_json::from_slice(&bytes).ok()
    }

    pub async fn set_conversation_context(&self, user_id: &str, context: &ConversationContext) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(context).map_err(|e| CacheError::Serialization(e.to_string()))?;
        self.set(
            &format!("conversation:{user_id}"),
            &bytes,
            CONVERSATION_TTL,
            &[CacheLevel::L1, CacheLevel::L2, CacheLevel::L3],
        )
        .await
    }

    /// Never cached in L1 (supplemental TTL table: lower read frequency
    /// per process doesn't justify the in-process slot).
    pub async fn get_user_profile(&self, user_id: &str) -> Option<UserProfile> {
        let bytes = self.get_l2_l3_only(&format!("profile:{user_id}")).await?;
        serde_json::from_slice(&bytes).ok()
    }

    pub async fn set_user_profile(&self, user_id: &str, profile: &UserProfile) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(profile).map_err(|e| CacheError::Serialization(e.to_string()))?;
        self.set(&format!("profile:{user_id}"), &bytes, PROFILE_TTL, &[CacheLevel::L2, CacheLevel::L3])
            .await
    }

    pub fn stats(&self) -> CacheStats {
        self.l1.run_pending_tasks();
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        CacheStats {
            hits,
            misses,
            hit_rate: if total == 0 { 0.0 } else { hits as f64 / total as f64 },
            l1_entry_count: self.l1.entry_count(),
            l1_bytes: self.l1.weighted_size(),
            avg_response_time_ms: *self.avg_response_time_ms.lock().expect("avg response mutex poisoned"),
        }
    }

    /// Spawns the 5-minute expired-entry sweep.
    pub fn spawn_sweep_loop(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(300));
            loop {
                interval.tick().await;
                self.sweep_expired();
            }
        })
    }

    /// Spawns the 1-minute statistics emission (§4.3 "Background tasks").
    pub fn spawn_stats_loop(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(60));
            loop {
                interval.tick().await;
                let stats = self.stats();
                if let Err(e) = self
                    .store
                    .set_ex(
                        "metric:cache_hit_rate:latest",
                        format!("{:.4}", stats.hit_rate).into_bytes(),
                        Duration::from_secs(3600),
                    )
                    .await
                {
                    tracing::warn!(error = %e, "failed to publish cache_hit_rate metric");
                }
                tracing::debug!(?stats, "cache statistics");
            }
        })
    }

    fn sweep_expired(&self) {
        let now = Utc::now();
        let keys: Vec<String> = self.order.lock().expect("order mutex poisoned").iter().cloned().collect();
        let mut swept = 0;
        for key in keys {
            if let Some(entry) = self.l1.get(&key) {
                if entry.is_expired(now) {
                    self.l1.invalidate(&key);
                    swept += 1;
                }
            }
        }
        self.l1.run_pending_tasks();
        if swept > 0 {
            tracing::debug!(swept, "l1 sweep removed expired entries");
        }
    }

    fn insert_l1(&self, key: &str, bytes: Vec<u8>, ttl: Duration, compressed: bool) {
        let entry = Arc::new(CacheEntry::new(key.to_string(), bytes, ttl, compressed));
        self.l1.insert(key.to_string(), entry);
        self.touch_order(key);
        self.enforce_entry_cap();
    }

    fn touch_order(&self, key: &str) {
        let mut order = self.order.lock().expect("order mutex poisoned");
        order.retain(|k| k != key);
        order.push_back(key.to_string());
    }

    /// Enforces the entry-count bound down to 90% once exceeded, mirroring
    /// the byte-weight bound moka already enforces for us.
    fn enforce_entry_cap(&self) {
        let target = (self.config.max_entries as f64 * EVICT_TARGET_FRACTION) as usize;
        loop {
            let len = self.order.lock().expect("order mutex poisoned").len();
            if len as u64 <= self.config.max_entries && len <= target.max(1) {
                break;
            }
            let victim = self.order.lock().expect("order mutex poisoned").pop_front();
            match victim {
                Some(victim) => self.l1.invalidate(&victim),
                None => break,
            }
        }
    }

    /// Exponential moving average over response latency, same 0.9/0.1
    /// weighting the Queue Processor uses for its own rolling average.
    fn record_response_time(&self, elapsed: Duration) {
        let sample_ms = elapsed.as_secs_f64() * 1000.0;
        let mut avg = self.avg_response_time_ms.lock().expect("avg response mutex poisoned");
        *avg = if *avg == 0.0 { sample_ms } else { *avg * 0.9 + sample_ms * 0.1 };
    }

    async fn write_l2(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let packed = envelope::pack(value, self.config.compression_threshold);
        self.store.set_ex(&l2_key(key), packed, ttl).await?;
        Ok(())
    }

    async fn write_l3(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let packed = envelope::pack(value, self.config.compression_threshold);
        let l3_ttl = ttl * self.config.l3_ttl_multiplier;
        self.store.set_ex(&l3_key(key), packed, l3_ttl).await?;
        Ok(())
    }
}

fn l2_key(key: &str) -> String {
    format!("l2:{key}")
}

fn l3_key(key: &str) -> String {
    format!("l3:{key}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::InMemorySharedStore;

    fn manager(config: CacheConfig) -> Arc<CacheManager> {
        CacheManager::new(config, Arc::new(InMemorySharedStore::new()))
    }

    #[tokio::test]
    async fn l3_hit_promotes_to_l1_and_l2() {
        let cm = manager(CacheConfig::default());
        cm.write_l3("k", b"value", Duration::from_secs(60)).await.unwrap();

        let first = cm.get("k").await;
        assert_eq!(first, Some(b"value".to_vec()));

        // Now served from L1 directly: blow away L2/L3 and confirm it's
        // still there.
        cm.store.delete(&l2_key("k")).await.unwrap();
        cm.store.delete(&l3_key("k")).await.unwrap();
        assert_eq!(cm.get("k").await, Some(b"value".to_vec()));
    }

    #[tokio::test]
    async fn ai_response_round_trips_within_ttl() {
        let cm = manager(CacheConfig::default());
        let ctx = AiContextSummary {
            user_type: "new".to_string(),
            conversation_stage: "onboarding".to_string(),
            last_intent: "greeting".to_string(),
        };
        cm.cache_ai_response("Hello", &ctx, "Hi there!").await.unwrap();
        assert_eq!(cm.get_cached_ai_response("hello", &ctx).await, Some("Hi there!".to_string()));
    }

    #[tokio::test]
    async fn conversation_context_round_trips() {
        let cm = manager(CacheConfig::default());
        let mut ctx = ConversationContext::new();
        ctx.insert("stage".to_string(), serde_json::json!("support"));
        cm.set_conversation_context("u-1", &ctx).await.unwrap();
        assert_eq!(cm.get_conversation_context("u-1").await, Some(ctx));
    }

    #[tokio::test]
    async fn invalidate_user_clears_conversation_and_profile() {
        let cm = manager(CacheConfig::default());
        let mut ctx = ConversationContext::new();
        ctx.insert("a".to_string(), serde_json::json!(1));
        cm.set_conversation_context("u-1", &ctx).await.unwrap();
        cm.set_user_profile("u-1", &UserProfile::new()).await.unwrap();

        cm.invalidate_user("u-1").await.unwrap();

        assert_eq!(cm.get_conversation_context("u-1").await, None);
        assert_eq!(cm.get_user_profile("u-1").await, None);
    }

    #[tokio::test]
    async fn user_profile_never_enters_l1() {
        let cm = manager(CacheConfig::default());
        cm.set_user_profile("u-1", &UserProfile::new()).await.unwrap();
        cm.get_user_profile("u-1").await;
        assert!(cm.l1.get(&format!("profile:u-1")).is_none());
    }

    #[tokio::test]
    async fn entry_count_eviction_keeps_l1_at_or_under_max() {
        let mut config = CacheConfig::default();
        config.max_entries = 10;
        config.max_bytes = 10 * 1024 * 1024;
        let cm = manager(config);

        for i in 0..20 {
            cm.set(&format!("k{i}"), b"v", Duration::from_secs(60), &[CacheLevel::L1]).await.unwrap();
        }

        cm.l1.run_pending_tasks();
        assert!(cm.l1.entry_count() <= 10);
    }

    #[tokio::test]
    async fn miss_then_set_then_hit_updates_counters() {
        let cm = manager(CacheConfig::default());
        assert_eq!(cm.get("missing").await, None);
        cm.set("missing", b"v", Duration::from_secs(60), &[CacheLevel::L1]).await.unwrap();
        assert_eq!(cm.get("missing").await, Some(b"v".to_vec()));

        let stats = cm.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }
}
