//! AI inference collaborator (§6 "AI inference (collaborator)").
//!
//! Out of scope per the spec: only the interface is defined here, the
//! same way `health::collaborators` stops at `Notifier`/
//! `InfrastructureRollback` without picking a concrete notification
//! channel or rollback substrate.

use async_trait::async_trait;
use cache::AiContextSummary;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AiError {
    #[error("ai inference failed: {0}")]
    Failed(String),
}

/// `infer(input, context) -> reply`, invoked by the TEXT/IMAGE/AUDIO/
/// VIDEO/DOCUMENT handlers and wrapped by the cache on both sides.
#[async_trait]
pub trait AiClient: Send + Sync {
    async fn infer(&self, input: &str, context: &AiContextSummary) -> Result<String, AiError>;
}

/// Wired in when no real inference backend is configured. Returns the
/// same canned fallback the cache warms up on `initialize`, so an
/// unconfigured deployment still answers instead of erroring every
/// message.
pub struct FallbackAiClient;

#[async_trait]
impl AiClient for FallbackAiClient {
    async fn infer(&self, input: &str, _context: &AiContextSummary) -> Result<String, AiError> {
        tracing::debug!(input, "no AI backend configured, returning canned fallback");
        Ok("Sorry, I didn't quite catch that. Could you rephrase?".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fallback_client_always_answers() {
        let ctx = AiContextSummary::default();
        let reply = FallbackAiClient.infer("anything", &ctx).await.unwrap();
        assert!(!reply.is_empty());
    }
}
