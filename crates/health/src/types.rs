use chrono::{DateTime, Utc};
use common::{AlertLevel, Comparison, SystemStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// One monitored dependency (§3 `HealthCheck`).
#[derive(Debug, Clone)]
pub struct HealthCheck {
    pub name: String,
    pub endpoint: String,
    pub timeout: Duration,
    pub expected_status: u16,
    pub critical: bool,
    pub consecutive_failures: u32,
    /// Consecutive successful probes since the last failure. Used only to
    /// require `recovery_threshold` clean probes before a CRITICAL check
    /// is allowed back down to HEALTHY, avoiding flapping; `consecutive_failures`
    /// itself still resets to zero on every single success per §4.4.
    pub consecutive_successes: u32,
    pub last_check: Option<DateTime<Utc>>,
    pub status: CheckStatus,
}

/// A single check's own status, distinct from the aggregate `SystemStatus`
/// it feeds into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    Healthy,
    Degraded,
    Critical,
}

impl HealthCheck {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>, critical: bool) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(5),
            expected_status: 200,
            critical,
            consecutive_failures: 0,
            consecutive_successes: 0,
            last_check: None,
            status: CheckStatus::Healthy,
        }
    }
}

/// Ring-buffered point-in-time system state (§3 `SystemSnapshot`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub version: u64,
    pub captured_at: DateTime<Utc>,
    pub database_backup_id: Option<String>,
    pub application_version: String,
    pub infrastructure_descriptor: String,
    pub cache_config: HashMap<String, String>,
    pub balancer_config: HashMap<String, String>,
}

/// A configured alert trigger (§3 `AlertRule`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRule {
    pub name: String,
    pub metric_name: String,
    pub condition: Comparison,
    pub threshold: f64,
    pub sustain: Duration,
    pub level: AlertLevel,
    pub cooldown: Duration,
    pub enabled: bool,
}

/// A fired alert (§3 `Alert`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub rule_name: String,
    pub level: AlertLevel,
    pub observed_value: f64,
    pub threshold: f64,
    pub fired_at: DateTime<Utc>,
    pub resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Read-only aggregation assembled on demand for the webhook crate's
/// `/health` endpoint (§4.4 "Dashboard").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringDashboard {
    pub status: SystemStatus,
    pub metrics: HashMap<String, f64>,
    pub unresolved_alerts: Vec<Alert>,
    pub generated_at: DateTime<Utc>,
}

/// Emitted by the alert engine for EMERGENCY transitions and
/// CRITICAL-level alerts; the actual delivery is the opaque `notify`
/// collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationDispatch {
    pub contact: String,
    pub channel: String,
    pub alert_rule_name: String,
    pub dispatched_at: DateTime<Utc>,
}

/// Scope for a rollback operation (§4.4 "Snapshots").
pub use common::RollbackType;
