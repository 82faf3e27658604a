use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Tiers a `set` may target. Mirrors `common::CacheLevel` but is its own
/// small type so callers can request a set of levels (`{L1, L2}`) rather
/// than a single one.
pub use common::CacheLevel;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub max_entries: u64,
    pub max_bytes: u64,
    pub compression_threshold: usize,
    pub default_ttl: Duration,
    /// L3's TTL multiplier over the logical TTL (§4.3: "2x the logical
    /// TTL to serve as cold warm-up").
    pub l3_ttl_multiplier: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            max_bytes: 100 * 1024 * 1024,
            compression_threshold: 1024,
            default_ttl: Duration::from_secs(3600),
            l3_ttl_multiplier: 2,
        }
    }
}

impl CacheConfig {
    pub fn from_runtime(config: &common::RuntimeConfig) -> Self {
        Self {
            max_entries: config.max_memory_cache_size,
            max_bytes: config.max_memory_size_bytes,
            compression_threshold: config.compression_threshold,
            default_ttl: config.default_ttl,
            l3_ttl_multiplier: 2,
        }
    }
}

/// In-process representation of one L1 entry (§3 `CacheEntry`). Wrapped in
/// an `Arc` inside the moka cache so hit bookkeeping (`access_count`,
/// `last_access`) can be updated in place without a re-insert.
#[derive(Debug)]
pub struct CacheEntry {
    pub key: String,
    pub bytes: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub ttl: Duration,
    pub compressed: bool,
    pub byte_size: usize,
    pub access_count: std::sync::atomic::AtomicU64,
    pub last_access: std::sync::Mutex<DateTime<Utc>>,
}

impl CacheEntry {
    pub fn new(key: String, bytes: Vec<u8>, ttl: Duration, compressed: bool) -> Self {
        let now = Utc::now();
        let byte_size = bytes.len();
        Self {
            key,
            bytes,
            created_at: now,
            ttl,
            compressed,
            byte_size,
            access_count: std::sync::atomic::AtomicU64::new(0),
            last_access: std::sync::Mutex::new(now),
        }
    }

    /// `now > created_at + ttl` => logically absent, even if still
    /// physically present in L1 (§3 invariant; lazy deletion on lookup).
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match chrono::Duration::from_std(self.ttl) {
            Ok(ttl) => now > self.created_at + ttl,
            Err(_) => false,
        }
    }

    pub fn touch(&self) {
        self.access_count.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        *self.last_access.lock().expect("last_access mutex poisoned") = Utc::now();
    }
}

/// Statistics emitted by the 1-minute background reporting task (§4.3
/// "Background tasks").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub l1_entry_count: u64,
    pub l1_bytes: u64,
    pub avg_response_time_ms: f64,
}

/// The relevant-context subset that participates in the AI response cache
/// key (§4.3 "Keying"): exactly `{user_type, conversation_stage,
/// last_intent}`. Any other field the caller tracks (session id, request
/// id, timestamps, ...) is ephemeral and must not affect cache identity,
/// so it simply isn't part of this struct.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AiContextSummary {
    pub user_type: String,
    pub conversation_stage: String,
    pub last_intent: String,
}

/// Free-form conversation state cached per user (§4.3's
/// `getConversationContext`/`setConversationContext`).
pub type ConversationContext = HashMap<String, serde_json::Value>;

/// Free-form user profile cached per user (§4.3's `getUserProfile`/
/// `setUserProfile`).
pub type UserProfile = HashMap<String, serde_json::Value>;
