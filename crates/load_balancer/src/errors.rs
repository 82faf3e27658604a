use thiserror::Error;

/// Error taxonomy for the Number Pool Load Balancer.
///
/// A small closed set of variants plus a retryability classification so
/// callers (the Queue Processor's send handler) can decide whether to
/// retry or dead-letter without string-matching on the message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadBalancerError {
    #[error("no sending number is currently available")]
    NoNumberAvailable,

    #[error("user {0} has no assignment")]
    NoAssignment(String),

    #[error("sending number {0} is not present in the pool")]
    UnknownNumber(String),

    #[error("shared store error: {0}")]
    SharedStore(String),
}

impl LoadBalancerError {
    /// `none` from `assignNumber` is explicitly a backpressure signal per
    /// §4.1's failure semantics, not a permanent error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LoadBalancerError::NoNumberAvailable)
    }
}

impl From<common::SharedStoreError> for LoadBalancerError {
    fn from(e: common::SharedStoreError) -> Self {
        LoadBalancerError::SharedStore(e.to_string())
    }
}
