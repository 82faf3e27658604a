use common::MessageType;
use thiserror::Error;

/// Error taxonomy for the Priority Queue Processor, mirroring
/// `ProcessingError`/`LoadBalancerError`'s shape: a closed set of variants
/// plus classification helpers the worker loop and callers need.
#[derive(Error, Debug, Clone)]
pub enum QueueError {
    #[error("no handler registered for message type {0:?}")]
    HandlerNotRegistered(MessageType),

    #[error("handler exceeded its processing timeout")]
    Timeout,

    #[error("handler failed: {0}")]
    HandlerFailed(String),

    #[error("shared store error: {0}")]
    SharedStore(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("queue processor is not running")]
    NotRunning,
}

impl QueueError {
    /// Structured-first, text-fallback rate-limit classification (open
    /// question (i)): `HandlerFailed` carries whatever detail the handler
    /// raised, which may be an unstructured string from an upstream
    /// collaborator.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            QueueError::HandlerFailed(detail) => detail.to_lowercase().contains("rate limit"),
            _ => false,
        }
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(self, QueueError::HandlerNotRegistered(_) | QueueError::NotRunning)
    }
}

impl From<common::SharedStoreError> for QueueError {
    fn from(e: common::SharedStoreError) -> Self {
        QueueError::SharedStore(e.to_string())
    }
}
