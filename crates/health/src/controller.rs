//! Health probe loop, aggregate status state machine, automatic
//! failover, and the on-demand dashboard (§4.4).

use crate::alerts::AlertEngine;
use crate::errors::HealthError;
use crate::snapshot::SnapshotManager;
use crate::types::{Alert, CheckStatus, HealthCheck, MonitoringDashboard};
use cache::CacheManager;
use chrono::Utc;
use common::{AlertLevel, SharedStore, SystemStatus};
use load_balancer::LoadBalancer;
use queue_processor::QueueProcessor;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// Gap between consecutive failover steps, and between the sequence's
/// completion and the stabilization re-probe.
const FAILOVER_STEP_GAP: Duration = Duration::from_secs(5);
const STABILIZATION_WAIT: Duration = Duration::from_secs(60);
/// Cache-purge patterns used by failover step 4 (§4.4): user errors,
/// failed messages, and short-lived temporary keys.
const POISONED_CACHE_PREFIXES: [&str; 3] = ["user_error:", "failed_message:", "tmp:"];

pub struct HealthController {
    checks: Mutex<Vec<HealthCheck>>,
    status: RwLock<SystemStatus>,
    failover_in_progress: AtomicBool,
    failure_threshold: u32,
    recovery_threshold: u32,
    max_workers: usize,
    store: Arc<dyn SharedStore>,
    http_client: reqwest::Client,
    pub alerts: AlertEngine,
    pub snapshots: SnapshotManager,
    load_balancer: Arc<LoadBalancer>,
    queue_processor: Arc<QueueProcessor>,
    cache_manager: Arc<CacheManager>,
}

impl HealthController {
    pub fn new(
        config: &common::RuntimeConfig,
        store: Arc<dyn SharedStore>,
        alerts: AlertEngine,
        snapshots: SnapshotManager,
        load_balancer: Arc<LoadBalancer>,
        queue_processor: Arc<QueueProcessor>,
        cache_manager: Arc<CacheManager>,
    ) -> Arc<Self> {
        Arc::new(Self {
            checks: Mutex::new(Vec::new()),
            status: RwLock::new(SystemStatus::Healthy),
            failover_in_progress: AtomicBool::new(false),
            failure_threshold: config.failure_threshold,
            recovery_threshold: config.recovery_threshold,
            max_workers: config.max_workers,
            store,
            http_client: reqwest::Client::new(),
            alerts,
            snapshots,
            load_balancer,
            queue_processor,
            cache_manager,
        })
    }

    pub async fn register_check(&self, check: HealthCheck) {
        self.checks.lock().await.push(check);
    }

    pub async fn status(&self) -> SystemStatus {
        *self.status.read().await
    }

    /// Issues every configured probe once. Spawned on a 30s interval by
    /// [`Self::spawn_probe_loop`].
    pub async fn probe_tick(self: &Arc<Self>) {
        let mut checks = self.checks.lock().await;
        for check in checks.iter_mut() {
            let ok = self.probe_one(check).await;
            check.last_check = Some(Utc::now());

            if ok {
                check.consecutive_failures = 0;
                check.consecutive_successes += 1;
                match check.status {
                    CheckStatus::Critical if check.consecutive_successes < self.recovery_threshold => {}
                    _ => check.status = CheckStatus::Healthy,
                }
            } else {
                check.consecutive_successes = 0;
                check.consecutive_failures += 1;
                check.status = if check.consecutive_failures >= self.failure_threshold && check.critical {
                    CheckStatus::Critical
                } else {
                    CheckStatus::Degraded
                };
            }
        }
        drop(checks);

        self.recompute_aggregate().await;
    }

    async fn probe_one(&self, check: &HealthCheck) -> bool {
        let result = tokio::time::timeout(check.timeout, self.http_client.get(check.endpoint.as_str()).send()).await;
        match result {
            Ok(Ok(response)) => response.status().as_u16() == check.expected_status,
            Ok(Err(e)) => {
                tracing::debug!(check = %check.name, error = %e, "health probe transport error");
                false
            }
            Err(_) => {
                tracing::debug!(check = %check.name, "health probe timed out");
                false
            }
        }
    }

    async fn recompute_aggregate(self: &Arc<Self>) {
        let (critical_count, degraded_count) = {
            let checks = self.checks.lock().await;
            (
                checks.iter().filter(|c| c.status == CheckStatus::Critical).count(),
                checks.iter().filter(|c| c.status == CheckStatus::Degraded).count(),
            )
        };

        let new_status = if critical_count >= 2 {
            SystemStatus::Emergency
        } else if critical_count == 1 {
            SystemStatus::Critical
        } else if degraded_count >= 3 {
            SystemStatus::Degraded
        } else {
            SystemStatus::Healthy
        };

        let previous = {
            let mut status = self.status.write().await;
            let previous = *status;
            *status = new_status;
            previous
        };

        if previous != new_status {
            tracing::warn!(?previous, new = ?new_status, "aggregate system status transition");
            self.on_transition(previous, new_status).await;
        }
    }

    async fn on_transition(self: &Arc<Self>, previous: SystemStatus, new: SystemStatus) {
        if new == SystemStatus::Degraded && previous == SystemStatus::Healthy {
            self.publish_degradation_config().await;
        }
        if new == SystemStatus::Critical && !self.failover_in_progress.load(Ordering::SeqCst) {
            let controller = Arc::clone(self);
            tokio::spawn(async move {
                if let Err(e) = controller.run_failover_sequence().await {
                    tracing::error!(error = %e, "automatic failover sequence failed");
                }
            });
        }
        if new == SystemStatus::Emergency {
            self.emergency_response().await;
        }
    }

    async fn publish_degradation_config(&self) {
        let config = serde_json::json!({
            "rate_limit_factor": 0.7,
            "cache_ttl_factor": 0.5,
            "queue_priority_mode": true,
            "non_critical_features": false,
        });
        if let Err(e) = self
            .store
            .set_ex("degradation:config", config.to_string().into_bytes(), Duration::from_secs(3600))
            .await
        {
            tracing::error!(error = %e, "failed to publish degradation config");
        }
        tracing::warn!("system degraded: published degradation configuration");
    }

    async fn emergency_response(&self) {
        tracing::error!("system in EMERGENCY: capturing snapshot and notifying");
        if let Err(e) = self
            .snapshots
            .capture("unknown", "unknown", HashMap::new(), HashMap::new())
            .await
        {
            tracing::error!(error = %e, "emergency snapshot capture failed");
        }

        let alert = Alert {
            rule_name: "system_emergency".to_string(),
            level: AlertLevel::Critical,
            observed_value: 1.0,
            threshold: 0.0,
            fired_at: Utc::now(),
            resolved: false,
            resolved_at: None,
        };
        self.alerts.dispatch_notifications(&alert).await;
    }

    /// Automatic failover sequence (§4.4): scale up, restart critical
    /// services, activate backup routing, purge poisoned cache, each
    /// separated by a 5s gap, aborting on the first step that fails. On
    /// completion, waits for stabilization and re-probes.
    async fn run_failover_sequence(self: Arc<Self>) -> Result<(), HealthError> {
        if self.failover_in_progress.swap(true, Ordering::SeqCst) {
            return Err(HealthError::FailoverInProgress);
        }
        tracing::warn!("automatic failover sequence starting");

        let result = self.failover_steps().await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "failover sequence aborted");
            self.failover_in_progress.store(false, Ordering::SeqCst);
            return result;
        }

        tokio::time::sleep(STABILIZATION_WAIT).await;
        self.probe_tick().await;

        let status = self.status().await;
        if matches!(status, SystemStatus::Healthy | SystemStatus::Degraded) {
            tracing::info!(?status, "failover stabilized");
        } else {
            tracing::error!(?status, "failover did not stabilize, escalating to emergency response");
            self.emergency_response().await;
        }
        self.failover_in_progress.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn failover_steps(&self) -> Result<(), HealthError> {
        self.scale_up_capacity().await?;
        tokio::time::sleep(FAILOVER_STEP_GAP).await;

        self.restart_critical_services().await?;
        tokio::time::sleep(FAILOVER_STEP_GAP).await;

        self.activate_backup_routing().await?;
        tokio::time::sleep(FAILOVER_STEP_GAP).await;

        self.purge_poisoned_cache().await?;
        Ok(())
    }

    async fn scale_up_capacity(&self) -> Result<(), HealthError> {
        let current = self.max_workers as f64;
        let target = (current * 1.5).ceil() as usize;
        let max = self.max_workers * 4;
        let target = target.min(max);

        self.store
            .set_ex("scale:target_capacity", target.to_string().into_bytes(), Duration::from_secs(3600))
            .await
            .map_err(|e| HealthError::FailoverStepFailed(format!("scale-up: {e}")))?;
        tracing::info!(target, "failover: published scale-up directive");
        Ok(())
    }

    async fn restart_critical_services(&self) -> Result<(), HealthError> {
        let mut checks = self.checks.lock().await;
        let mut restarted = 0;
        for check in checks.iter_mut().filter(|c| c.status == CheckStatus::Critical) {
            check.consecutive_failures = 0;
            check.consecutive_successes = 0;
            restarted += 1;
            tracing::warn!(check = %check.name, "failover: restart requested for critical service");
        }
        let _ = restarted;
        Ok(())
    }

    async fn activate_backup_routing(&self) -> Result<(), HealthError> {
        self.store
            .set_ex("routing:backup_mode", b"true".to_vec(), Duration::from_secs(3600))
            .await
            .map_err(|e| HealthError::FailoverStepFailed(format!("backup routing: {e}")))?;
        tracing::warn!("failover: backup routing activated");
        Ok(())
    }

    async fn purge_poisoned_cache(&self) -> Result<(), HealthError> {
        let mut purged = 0;
        for prefix in POISONED_CACHE_PREFIXES {
            purged += self
                .cache_manager
                .purge_prefix(prefix)
                .await
                .map_err(|e| HealthError::FailoverStepFailed(format!("cache purge: {e}")))?;
        }
        tracing::warn!(purged, "failover: purged potentially poisoned cache entries");
        Ok(())
    }

    /// Assembles the on-demand dashboard (§4.4 "Dashboard").
    pub async fn dashboard(&self) -> MonitoringDashboard {
        let status = self.status().await;
        let unresolved_alerts = self.alerts.unresolved().await;

        let mut metrics = HashMap::new();
        for name in ["queue_depth", "queue_avg_processing_ms", "cache_hit_rate"] {
            if let Ok(Some(raw)) = self.store.get(&format!("metric:{name}:latest")).await {
                if let Ok(text) = String::from_utf8(raw) {
                    if let Ok(value) = text.parse::<f64>() {
                        metrics.insert(name.to_string(), value);
                    }
                }
            }
        }
        let queue_status = self.queue_processor.status().await;
        metrics.insert(
            "queue_depth".to_string(),
            queue_status.pending_by_priority.values().sum::<usize>() as f64,
        );
        metrics.insert("queue_dead_letter_count".to_string(), queue_status.dead_letter_count as f64);
        let cache_stats = self.cache_manager.stats();
        metrics.insert("cache_hit_rate".to_string(), cache_stats.hit_rate);

        let pool_snapshot = self.load_balancer.snapshot().await;
        metrics.insert("pool_size".to_string(), pool_snapshot.len() as f64);

        MonitoringDashboard { status, metrics, unresolved_alerts, generated_at: Utc::now() }
    }

    pub fn spawn_probe_loop(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                self.probe_tick().await;
            }
        })
    }

    pub fn spawn_snapshot_loop(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if let Err(e) = self.snapshots.capture("unknown", "unknown", HashMap::new(), HashMap::new()).await {
                    tracing::error!(error = %e, "periodic snapshot capture failed");
                }
            }
        })
    }

    /// Hourly retention sweep for alert/snapshot history, matching the
    /// original's `_cleanup_old_data` loop (§4.4).
    pub fn spawn_cleanup_loop(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(3600));
            loop {
                ticker.tick().await;
                self.alerts.cleanup_old_alerts().await;
                self.snapshots.cleanup_old().await;
            }
        })
    }

    /// Feeds the dashboard's live metrics into the alert engine so rules
    /// like `high_error_rate`/`low_cache_hit_rate` see samples without a
    /// caller having to wire each metric source up by hand.
    pub fn spawn_alert_feed_loop(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let dashboard = self.dashboard().await;
                for (name, value) in dashboard.metrics {
                    self.alerts.record_sample(&format!("metric:{name}:latest"), value).await;
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{LoggingNotifier, NoopInfrastructureRollback};
    use common::{InMemorySharedStore, RuntimeConfig};

    fn controller() -> Arc<HealthController> {
        let store: Arc<dyn SharedStore> = Arc::new(InMemorySharedStore::new());
        let config = RuntimeConfig { failure_threshold: 3, recovery_threshold: 3, max_workers: 10, ..RuntimeConfig::default() };
        let alerts = AlertEngine::new(Arc::clone(&store), Arc::new(LoggingNotifier), vec![]);
        let snapshots = SnapshotManager::new(Arc::clone(&store), Arc::new(NoopInfrastructureRollback), 10);
        let lb = Arc::new(LoadBalancer::new(vec![], Arc::clone(&store)));
        let qp = QueueProcessor::new(config.clone(), Arc::clone(&store));
        let cache = CacheManager::new(cache::CacheConfig::default(), Arc::clone(&store));
        HealthController::new(&config, store, alerts, snapshots, lb, qp, cache)
    }

    fn failing_check(name: &str, critical: bool) -> HealthCheck {
        let mut check = HealthCheck::new(name, "http://127.0.0.1:1/nonexistent", critical);
        check.timeout = Duration::from_millis(50);
        check
    }

    #[tokio::test]
    async fn two_critical_failures_yield_emergency() {
        let controller = controller();
        controller.register_check(failing_check("db", true)).await;
        controller.register_check(failing_check("cache", true)).await;

        for _ in 0..3 {
            controller.probe_tick().await;
        }

        assert_eq!(controller.status().await, SystemStatus::Emergency);
    }

    #[tokio::test]
    async fn one_critical_failure_yields_critical() {
        let controller = controller();
        controller.register_check(failing_check("db", true)).await;
        controller.register_check(HealthCheck::new("ok", "http://127.0.0.1:1/nonexistent", false)).await;

        for _ in 0..3 {
            controller.probe_tick().await;
        }

        assert_eq!(controller.status().await, SystemStatus::Critical);
    }

    #[tokio::test]
    async fn three_degraded_with_no_critical_yields_degraded() {
        let controller = controller();
        controller.register_check(failing_check("a", false)).await;
        controller.register_check(failing_check("b", false)).await;
        controller.register_check(failing_check("c", false)).await;

        controller.probe_tick().await;

        assert_eq!(controller.status().await, SystemStatus::Degraded);
    }

    #[tokio::test]
    async fn dashboard_reflects_current_status() {
        let controller = controller();
        let dashboard = controller.dashboard().await;
        assert_eq!(dashboard.status, SystemStatus::Healthy);
    }
}
