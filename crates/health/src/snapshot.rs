//! Snapshot capture, ring-buffered retention, and scoped rollback (§4.4
//! "Snapshots").

use crate::collaborators::InfrastructureRollback;
use crate::errors::HealthError;
use crate::types::{RollbackType, SystemSnapshot};
use common::SharedStore;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

const SNAPSHOT_RETENTION_DAYS: i64 = 7;

pub struct SnapshotManager {
    store: Arc<dyn SharedStore>,
    rollback: Arc<dyn InfrastructureRollback>,
    max_snapshots: usize,
    next_version: AtomicU64,
    ring: Mutex<Vec<SystemSnapshot>>,
}

impl SnapshotManager {
    pub fn new(store: Arc<dyn SharedStore>, rollback: Arc<dyn InfrastructureRollback>, max_snapshots: usize) -> Self {
        Self { store, rollback, max_snapshots, next_version: AtomicU64::new(1), ring: Mutex::new(Vec::new()) }
    }

    /// Captures the current state. `cache_config`/`balancer_config` are
    /// opaque descriptive maps the caller assembles from its own running
    /// configuration.
    pub async fn capture(
        &self,
        application_version: &str,
        infrastructure_descriptor: &str,
        cache_config: HashMap<String, String>,
        balancer_config: HashMap<String, String>,
    ) -> Result<SystemSnapshot, HealthError> {
        let version = self.next_version.fetch_add(1, Ordering::SeqCst);
        let snapshot = SystemSnapshot {
            version,
            captured_at: chrono::Utc::now(),
            database_backup_id: None,
            application_version: application_version.to_string(),
            infrastructure_descriptor: infrastructure_descriptor.to_string(),
            cache_config,
            balancer_config,
        };

        self.store
            .set_ex(
                &format!("snapshot:{version}"),
                serde_json::to_vec(&snapshot).map_err(|e| HealthError::Serialization(e.to_string()))?,
                Duration::from_secs((SNAPSHOT_RETENTION_DAYS * 24 * 3600) as u64),
            )
            .await?;

        let mut ring = self.ring.lock().await;
        ring.push(snapshot.clone());
        if ring.len() > self.max_snapshots {
            let evicted = ring.remove(0);
            let _ = self.store.delete(&format!("snapshot:{}", evicted.version)).await;
        }

        tracing::info!(version, "system snapshot captured");
        Ok(snapshot)
    }

    pub async fn latest(&self) -> Option<SystemSnapshot> {
        self.ring.lock().await.last().cloned()
    }

    pub async fn get(&self, version: u64) -> Result<SystemSnapshot, HealthError> {
        self.ring
            .lock()
            .await
            .iter()
            .find(|s| s.version == version)
            .cloned()
            .ok_or(HealthError::NoSuchSnapshot(version))
    }

    /// Restores components in dependency order (database, then
    /// application, then infrastructure scopes as selected), then always
    /// restores cache and routing configuration regardless of scope.
    pub async fn rollback(&self, version: u64, scope: RollbackType) -> Result<(), HealthError> {
        let snapshot = self.get(version).await?;

        if matches!(scope, RollbackType::Database | RollbackType::Full) {
            self.rollback.restore_database(version).await?;
        }
        if matches!(scope, RollbackType::Application | RollbackType::Full) {
            self.rollback.restore_application(version).await?;
        }
        if matches!(scope, RollbackType::Infrastructure | RollbackType::Full) {
            self.rollback.restore_infrastructure(version).await?;
        }

        self.restore_cache_and_routing(&snapshot).await?;

        tracing::info!(version, ?scope, "rollback complete");
        Ok(())
    }

    async fn restore_cache_and_routing(&self, snapshot: &SystemSnapshot) -> Result<(), HealthError> {
        self.store
            .set_ex(
                "routing:active_config_version",
                snapshot.version.to_string().into_bytes(),
                Duration::from_secs(3600),
            )
            .await?;
        Ok(())
    }

    /// Drops snapshots older than the retention window, matching the
    /// original's `_cleanup_old_data` loop.
    pub async fn cleanup_old(&self) {
        let cutoff = chrono::Utc::now() - chrono::Duration::days(SNAPSHOT_RETENTION_DAYS);
        let mut ring = self.ring.lock().await;
        let (keep, drop): (Vec<_>, Vec<_>) = ring.drain(..).partition(|s| s.captured_at > cutoff);
        for dropped in &drop {
            let _ = self.store.delete(&format!("snapshot:{}", dropped.version)).await;
        }
        *ring = keep;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::NoopInfrastructureRollback;
    use common::InMemorySharedStore;

    fn manager(max: usize) -> SnapshotManager {
        SnapshotManager::new(Arc::new(InMemorySharedStore::new()), Arc::new(NoopInfrastructureRollback), max)
    }

    #[tokio::test]
    async fn ring_buffer_keeps_only_max_snapshots() {
        let mgr = manager(2);
        for _ in 0..5 {
            mgr.capture("v1", "infra", HashMap::new(), HashMap::new()).await.unwrap();
        }
        assert_eq!(mgr.ring.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn rollback_always_restores_cache_and_routing() {
        let mgr = manager(10);
        let snap = mgr.capture("v1", "infra", HashMap::new(), HashMap::new()).await.unwrap();
        mgr.rollback(snap.version, RollbackType::Infrastructure).await.unwrap();
        let stored = mgr.store.get("routing:active_config_version").await.unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn rollback_of_unknown_version_fails() {
        let mgr = manager(10);
        assert!(mgr.rollback(999, RollbackType::Full).await.is_err());
    }
}
