use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a [`SharedStore`] implementation.
///
/// Mirrors the shape of the durable-store errors elsewhere in the workspace
/// (`ProcessingError`, `EventBusError`): a small closed set plus a catch-all
/// for the underlying client's own error text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SharedStoreError {
    #[error("key not found")]
    NotFound,
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("operation timed out")]
    Timeout,
}

/// The cross-process key-value contract every subsystem persists through.
///
/// Namespaces and TTL semantics are the caller's concern (see the namespace
/// table in the spec); this trait only guarantees get/set-with-ttl/delete
/// and a prefix scan, which is everything the four subsystems need from a
/// durable store. A production deployment backs this with Redis; tests and
/// local runs use [`InMemorySharedStore`].
#[async_trait]
pub trait SharedStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, SharedStoreError>;

    async fn set_ex(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), SharedStoreError>;

    async fn delete(&self, key: &str) -> Result<(), SharedStoreError>;

    /// Returns every currently-live key starting with `prefix`. Used for
    /// pattern-scoped invalidation (`invalidateUser`, cache purge on
    /// failover) where the caller already knows the namespace to scan.
    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>, SharedStoreError>;
}

struct Entry {
    value: Vec<u8>,
    expires_at: std::time::Instant,
}

/// In-memory stand-in for a real durable store, grounded on the pack's
/// `MockRedisClient` pattern: same trait, same semantics, backed by a
/// `Mutex<HashMap<..>>` instead of a network round-trip. Expired entries
/// are treated as absent lazily on read, same as a real TTL store would
/// report them once the TTL lapses.
#[derive(Default)]
pub struct InMemorySharedStore {
    data: Mutex<HashMap<String, Entry>>,
}

impl InMemorySharedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SharedStore for InMemorySharedStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, SharedStoreError> {
        let mut guard = self.data.lock().expect("shared store mutex poisoned");
        if let Some(entry) = guard.get(key) {
            if entry.expires_at <= std::time::Instant::now() {
                guard.remove(key);
                return Ok(None);
            }
            return Ok(Some(entry.value.clone()));
        }
        Ok(None)
    }

    async fn set_ex(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), SharedStoreError> {
        let mut guard = self.data.lock().expect("shared store mutex poisoned");
        guard.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: std::time::Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SharedStoreError> {
        let mut guard = self.data.lock().expect("shared store mutex poisoned");
        guard.remove(key);
        Ok(())
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>, SharedStoreError> {
        let now = std::time::Instant::now();
        let guard = self.data.lock().expect("shared store mutex poisoned");
        Ok(guard
            .iter()
            .filter(|(k, v)| k.starts_with(prefix) && v.expires_at > now)
            .map(|(k, _)| k.clone())
            .collect())
    }
}

/// Redis-backed [`SharedStore`], grounded on `common-redis::RedisClient`'s
/// use of a multiplexed async connection. This is the production
/// implementation; `InMemorySharedStore` is used wherever a `SharedStore`
/// is needed but no Redis endpoint is configured (tests, local dev).
pub struct RedisSharedStore {
    connection: redis::aio::ConnectionManager,
}

impl RedisSharedStore {
    pub async fn connect(redis_url: &str) -> Result<Self, SharedStoreError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| SharedStoreError::Backend(e.to_string()))?;
        let connection = client
            .get_connection_manager()
            .await
            .map_err(|e| SharedStoreError::Backend(e.to_string()))?;
        Ok(Self { connection })
    }
}

#[async_trait]
impl SharedStore for RedisSharedStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, SharedStoreError> {
        use redis::AsyncCommands;
        let mut conn = self.connection.clone();
        conn.get(key)
            .await
            .map_err(|e| SharedStoreError::Backend(e.to_string()))
    }

    async fn set_ex(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), SharedStoreError> {
        use redis::AsyncCommands;
        let mut conn = self.connection.clone();
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, seconds)
            .await
            .map_err(|e| SharedStoreError::Backend(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), SharedStoreError> {
        use redis::AsyncCommands;
        let mut conn = self.connection.clone();
        conn.del::<_, ()>(key)
            .await
            .map_err(|e| SharedStoreError::Backend(e.to_string()))
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>, SharedStoreError> {
        use redis::AsyncCommands;
        let mut conn = self.connection.clone();
        let pattern = format!("{prefix}*");
        conn.keys(pattern)
            .await
            .map_err(|e| SharedStoreError::Backend(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_a_value() {
        let store = InMemorySharedStore::new();
        store
            .set_ex("k", b"v".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"v".to_vec()));
    }

    #[tokio::test]
    async fn expired_entries_read_as_absent() {
        let store = InMemorySharedStore::new();
        store
            .set_ex("k", b"v".to_vec(), Duration::from_millis(0))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn scan_prefix_finds_matching_live_keys() {
        let store = InMemorySharedStore::new();
        store
            .set_ex("user:42:a", b"1".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        store
            .set_ex("user:42:b", b"2".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        store
            .set_ex("user:99:a", b"3".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        let mut found = store.scan_prefix("user:42:").await.unwrap();
        found.sort();
        assert_eq!(found, vec!["user:42:a".to_string(), "user:42:b".to_string()]);
    }

    #[tokio::test]
    async fn delete_removes_the_key() {
        let store = InMemorySharedStore::new();
        store
            .set_ex("k", b"v".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
