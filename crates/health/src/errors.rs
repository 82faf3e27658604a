use thiserror::Error;

/// Error taxonomy for the Health / Failover Controller.
#[derive(Error, Debug, Clone)]
pub enum HealthError {
    #[error("unknown health check: {0}")]
    UnknownCheck(String),

    #[error("unknown alert rule: {0}")]
    UnknownRule(String),

    #[error("no snapshot at version {0}")]
    NoSuchSnapshot(u64),

    #[error("failover already in progress")]
    FailoverInProgress,

    #[error("failover step failed: {0}")]
    FailoverStepFailed(String),

    #[error("shared store error: {0}")]
    SharedStore(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("notification failed: {0}")]
    NotifyFailed(String),
}

impl From<common::SharedStoreError> for HealthError {
    fn from(e: common::SharedStoreError) -> Self {
        HealthError::SharedStore(e.to_string())
    }
}
