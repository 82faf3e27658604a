use thiserror::Error;

/// Error taxonomy for the Multi-Level Cache, mirroring
/// `LoadBalancerError`/`QueueError`'s shape.
///
/// Per §7's propagation policy the cache never raises on miss or on a
/// deserialization problem — callers get `None`/a default and the failure
/// is logged. This enum exists for the narrower set of cases a caller
/// does need to observe (e.g. a backend outage during `set`).
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    #[error("shared store error: {0}")]
    SharedStore(String),

    #[error("envelope is malformed: {0}")]
    MalformedEnvelope(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<common::SharedStoreError> for CacheError {
    fn from(e: common::SharedStoreError) -> Self {
        CacheError::SharedStore(e.to_string())
    }
}
