//! External collaborators the controller calls out to but does not own
//! the implementation of (§6, §9 "Open questions — decided (iii)").

use crate::errors::HealthError;
use crate::types::{Alert, RollbackType};
use async_trait::async_trait;

/// `notify(contact, alert) -> Result<(), NotifyError>`. Invoked by the
/// alert engine for CRITICAL-level alerts and by EMERGENCY transitions.
/// Opaque, like the Queue Processor's `send`/`infer` collaborators.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, contact: &str, alert: &Alert) -> Result<(), HealthError>;
}

/// A `Notifier` that only logs; the default wired in when no real
/// channel (SMS/email/Slack) has been configured.
pub struct LoggingNotifier;

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn notify(&self, contact: &str, alert: &Alert) -> Result<(), HealthError> {
        tracing::warn!(contact, rule = %alert.rule_name, level = ?alert.level, "alert notification (no notifier configured)");
        Ok(())
    }
}

/// Substrate-specific restore for `RollbackType::Infrastructure`/`Database`/
/// `Application`. The controller owns ordering and the always-restore-
/// cache-and-routing guarantee; the substrate call itself is left to the
/// operator, matching the original's "leave substrate-specific
/// implementation" guidance.
#[async_trait]
pub trait InfrastructureRollback: Send + Sync {
    async fn restore_database(&self, snapshot_version: u64) -> Result<(), HealthError>;
    async fn restore_application(&self, snapshot_version: u64) -> Result<(), HealthError>;
    async fn restore_infrastructure(&self, snapshot_version: u64) -> Result<(), HealthError>;
}

/// No-op implementation used when no substrate integration has been
/// wired in; logs the scope and succeeds.
pub struct NoopInfrastructureRollback;

#[async_trait]
impl InfrastructureRollback for NoopInfrastructureRollback {
    async fn restore_database(&self, snapshot_version: u64) -> Result<(), HealthError> {
        tracing::info!(snapshot_version, scope = ?RollbackType::Database, "rollback requested, no substrate configured");
        Ok(())
    }

    async fn restore_application(&self, snapshot_version: u64) -> Result<(), HealthError> {
        tracing::info!(snapshot_version, scope = ?RollbackType::Application, "rollback requested, no substrate configured");
        Ok(())
    }

    async fn restore_infrastructure(&self, snapshot_version: u64) -> Result<(), HealthError> {
        tracing::info!(snapshot_version, scope = ?RollbackType::Infrastructure, "rollback requested, no substrate configured");
        Ok(())
    }
}
