pub mod alerts;
pub mod collaborators;
pub mod controller;
pub mod errors;
pub mod snapshot;
pub mod types;

pub use alerts::AlertEngine;
pub use collaborators::{InfrastructureRollback, LoggingNotifier, NoopInfrastructureRollback, Notifier};
pub use controller::HealthController;
pub use errors::HealthError;
pub use snapshot::SnapshotManager;
pub use types::{
    Alert, AlertRule, CheckStatus, HealthCheck, MonitoringDashboard, NotificationDispatch, RollbackType,
    SystemSnapshot,
};
