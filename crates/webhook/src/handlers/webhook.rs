//! GET verification handshake and POST message ingress (§4 "External
//! Interfaces", §6).

use crate::state::AppState;
use crate::types::{Message, WebhookPayload, WebhookVerifyQuery};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
};
use common::{MessageType, Priority};
use hmac::{Hmac, Mac};
use queue_processor::QueueError;
use sha2::Sha256;
use std::collections::HashMap;
use tracing::{error, info, warn};

type HmacSha256 = Hmac<Sha256>;

pub async fn verify_webhook(
    Query(query): Query<WebhookVerifyQuery>,
    State(state): State<AppState>,
) -> Result<String, StatusCode> {
    match (query.mode.as_deref(), &query.verify_token, &query.challenge) {
        (Some("subscribe"), Some(token), Some(challenge)) => {
            if token == &state.config.verify_token {
                info!("webhook verification successful");
                Ok(challenge.clone())
            } else {
                warn!(%token, "invalid verify token");
                Err(StatusCode::FORBIDDEN)
            }
        }
        _ => {
            error!(?query, "invalid verification query parameters");
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

/// POST ingress: verifies the `X-Hub-Signature-256` HMAC over the raw
/// body, parses the payload, and enqueues one message per inbound
/// message at HIGH priority for interactive replies and NORMAL otherwise.
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<StatusCode, StatusCode> {
    if let Some(secret) = &state.runtime_config.webhook_signing_secret {
        let signature =
            headers.get("X-Hub-Signature-256").and_then(|v| v.to_str().ok()).ok_or(StatusCode::UNAUTHORIZED)?;
        if !verify_signature(secret, &body, signature) {
            warn!("webhook signature verification failed");
            return Err(StatusCode::UNAUTHORIZED);
        }
    }

    let payload: WebhookPayload = serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "failed to parse webhook payload");
        StatusCode::BAD_REQUEST
    })?;

    for entry in &payload.entry {
        for change in &entry.changes {
            for message in change.value.messages.iter().flatten() {
                if let Err(e) = enqueue_inbound_message(&state, message).await {
                    error!(error = %e, message_id = %message.id, "failed to enqueue inbound message");
                }
            }
        }
    }

    Ok(StatusCode::OK)
}

async fn enqueue_inbound_message(state: &AppState, message: &Message) -> Result<String, QueueError> {
    let priority = if message.interactive.is_some() { Priority::High } else { Priority::Normal };
    let message_type = classify_message_type(&message.message_type);

    let mut metadata = HashMap::new();
    metadata.insert("message_id".to_string(), message.id.clone());
    metadata.insert("source_type".to_string(), message.message_type.clone());

    let payload = serde_json::json!({
        "id": message.id,
        "from": message.from,
        "timestamp": message.timestamp,
        "type": message.message_type,
        "text": message.text.as_ref().map(|t| t.body.clone()),
    });

    state.queue_processor.enqueue(message.from.clone(), message_type, payload, priority, None, metadata).await
}

/// Maps the raw WhatsApp `type` field to the closed set of message types
/// the queue processor dispatches on. Anything that isn't a conversational
/// payload (statuses, unsupported types, ...) is classified as `System` so
/// it still gets a handler slot instead of being silently dropped.
fn classify_message_type(raw: &str) -> MessageType {
    match raw {
        "text" => MessageType::Text,
        "image" => MessageType::Image,
        "audio" => MessageType::Audio,
        "video" => MessageType::Video,
        "document" => MessageType::Document,
        "interactive" => MessageType::Interactive,
        _ => MessageType::System,
    }
}

fn verify_signature(secret: &str, body: &[u8], header_value: &str) -> bool {
    let Some(hex_sig) = header_value.strip_prefix("sha256=") else {
        return false;
    };
    let Ok(expected_bytes) = hex::decode(hex_sig) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected_bytes).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_a_correctly_signed_body() {
        let secret = "test-secret";
        let body = b"{\"object\":\"whatsapp_business_account\"}";
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        let sig = hex::encode(mac.finalize().into_bytes());
        assert!(verify_signature(secret, body, &format!("sha256={sig}")));
    }

    #[test]
    fn rejects_a_tampered_body() {
        let secret = "test-secret";
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(b"original");
        let sig = hex::encode(mac.finalize().into_bytes());
        assert!(!verify_signature(secret, b"tampered", &format!("sha256={sig}")));
    }

    #[test]
    fn rejects_a_malformed_header() {
        assert!(!verify_signature("secret", b"body", "not-a-valid-header"));
    }
}
