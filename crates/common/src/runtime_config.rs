//! Process-wide configuration shared by the four subsystems.
//!
//! Follows the `from_env()` idiom already used by `AppConfig` and
//! `WhatsAppClientConfig`: read each key from the environment, parse with a
//! documented fallback, and log the effective values once at startup.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub health_check_interval: Duration,
    pub failure_threshold: u32,
    pub recovery_threshold: u32,
    pub max_workers: usize,
    pub max_concurrent_per_user: usize,
    pub batch_size: usize,
    pub max_memory_cache_size: u64,
    pub max_memory_size_bytes: u64,
    pub compression_threshold: usize,
    pub default_ttl: Duration,
    pub snapshot_interval: Duration,
    pub max_snapshots: usize,
    pub emergency_contacts: Vec<String>,
    pub webhook_signing_secret: Option<String>,
    pub redis_url: Option<String>,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        let config = Self {
            health_check_interval: Duration::from_secs(env_parse("HEALTH_CHECK_INTERVAL", 30)),
            failure_threshold: env_parse("FAILURE_THRESHOLD", 3),
            recovery_threshold: env_parse("RECOVERY_THRESHOLD", 3),
            max_workers: env_parse("MAX_WORKERS", 100),
            max_concurrent_per_user: env_parse("MAX_CONCURRENT_PER_USER", 3),
            batch_size: env_parse("BATCH_SIZE", 100),
            max_memory_cache_size: env_parse("MAX_MEMORY_CACHE_SIZE", 10_000),
            max_memory_size_bytes: env_parse("MAX_MEMORY_SIZE_BYTES", 100 * 1024 * 1024),
            compression_threshold: env_parse("COMPRESSION_THRESHOLD", 1024),
            default_ttl: Duration::from_secs(env_parse("DEFAULT_TTL", 3600)),
            snapshot_interval: Duration::from_secs(env_parse("SNAPSHOT_INTERVAL", 300)),
            max_snapshots: env_parse("MAX_SNAPSHOTS", 10),
            emergency_contacts: std::env::var("EMERGENCY_CONTACTS")
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),
            webhook_signing_secret: std::env::var("WEBHOOK_SIGNING_SECRET").ok(),
            redis_url: std::env::var("REDIS_URL").ok(),
        };

        tracing::info!(
            max_workers = config.max_workers,
            max_concurrent_per_user = config.max_concurrent_per_user,
            max_memory_cache_size = config.max_memory_cache_size,
            health_check_interval_secs = config.health_check_interval.as_secs(),
            "runtime configuration loaded"
        );

        config
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            health_check_interval: Duration::from_secs(30),
            failure_threshold: 3,
            recovery_threshold: 3,
            max_workers: 100,
            max_concurrent_per_user: 3,
            batch_size: 100,
            max_memory_cache_size: 10_000,
            max_memory_size_bytes: 100 * 1024 * 1024,
            compression_threshold: 1024,
            default_ttl: Duration::from_secs(3600),
            snapshot_interval: Duration::from_secs(300),
            max_snapshots: 10,
            emergency_contacts: Vec::new(),
            webhook_signing_secret: None,
            redis_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = RuntimeConfig::default();
        assert_eq!(config.max_workers, 100);
        assert_eq!(config.max_concurrent_per_user, 3);
        assert_eq!(config.max_memory_cache_size, 10_000);
        assert_eq!(config.max_memory_size_bytes, 100 * 1024 * 1024);
        assert_eq!(config.compression_threshold, 1024);
    }
}
