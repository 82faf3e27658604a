//! Conversational message handler registered with the queue processor
//! (§3 "Processing Logic" / §4.1 + §4.3 integration): pull the cached
//! reply if there is one, otherwise ask the AI collaborator, memoize
//! the answer, then hand it to the number pool for delivery.

use std::collections::HashMap;
use std::sync::Arc;

use cache::{AiContextSummary, CacheManager};
use common::MessageType;
use futures::future::BoxFuture;
use load_balancer::LoadBalancer;
use queue_processor::{MessageHandler, QueueError, QueueProcessor, QueuedMessage};
use whatsapp_client::client::message_types::{TextMessage, WhatsAppMessage};

use crate::ai::AiClient;
use crate::outbound::WhatsAppSenderPool;

/// Collaborators shared by every message-type handler. Cheaply cloned —
/// every field is already an `Arc`.
#[derive(Clone)]
pub struct ConversationalHandlerContext {
    pub cache: Arc<CacheManager>,
    pub load_balancer: Arc<LoadBalancer>,
    pub sender_pool: Arc<WhatsAppSenderPool>,
    pub ai_client: Arc<dyn AiClient>,
}

/// Registers the same conversational handler for every inbound message
/// type the ingress can emit (§3.1 payload types); text/image/audio/
/// video/document all go through cache → AI → send, differing only in
/// the `payload` shape each carries.
pub async fn register_conversational_handlers(queue: &QueueProcessor, ctx: ConversationalHandlerContext) {
    for message_type in [
        MessageType::Text,
        MessageType::Image,
        MessageType::Audio,
        MessageType::Video,
        MessageType::Document,
    ] {
        let ctx = ctx.clone();
        let handler: MessageHandler = Arc::new(move |message: QueuedMessage| {
            let ctx = ctx.clone();
            Box::pin(async move { handle_conversational_message(message, ctx).await }) as BoxFuture<'static, Result<(), QueueError>>
        });
        queue.register_handler(message_type, handler).await;
    }
}

async fn handle_conversational_message(
    message: QueuedMessage,
    ctx: ConversationalHandlerContext,
) -> Result<(), QueueError> {
    let input = extract_text(&message);
    let context = conversation_context_summary(&ctx, &message.user_id).await;

    let reply = if let Some(cached) = ctx.cache.get_cached_ai_response(&input, &context).await {
        cached
    } else {
        let generated = ctx
            .ai_client
            .infer(&input, &context)
            .await
            .map_err(|e| QueueError::HandlerFailed(e.to_string()))?;
        if let Err(e) = ctx.cache.cache_ai_response(&input, &context, &generated).await {
            tracing::warn!(error = %e, user_id = %message.user_id, "failed to memoize AI response");
        }
        generated
    };

    let (number, _reason) = ctx
        .load_balancer
        .get_optimal_for_message(&message.user_id, message.message_type, message.priority)
        .await
        .map_err(|e| QueueError::HandlerFailed(e.to_string()))?;

    let outbound = TextMessage::new(&message.user_id, &reply).map_err(|e| QueueError::HandlerFailed(e.to_string()))?;

    let send_result = ctx
        .sender_pool
        .send(&number.phone_id, &number.credentials, WhatsAppMessage::Text(outbound))
        .await;

    let success = send_result.is_ok();
    let error_detail = send_result.as_ref().err().map(|e| e.to_string());
    if let Err(e) = ctx
        .load_balancer
        .record_message_result(&message.user_id, &number.phone_id, success, error_detail.as_deref())
        .await
    {
        tracing::warn!(error = %e, phone_id = %number.phone_id, "failed to record message result");
    }

    send_result.map(|_| ()).map_err(|e| QueueError::HandlerFailed(e.to_string()))
}

/// Best-effort text extraction across message shapes; non-text payloads
/// fall back to a short type label so the AI collaborator still gets a
/// grounded prompt instead of an empty string.
fn extract_text(message: &QueuedMessage) -> String {
    message
        .payload
        .get("text")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("[{:?} message]", message.message_type))
}

async fn conversation_context_summary(ctx: &ConversationalHandlerContext, user_id: &str) -> AiContextSummary {
    let stored: HashMap<String, serde_json::Value> =
        ctx.cache.get_conversation_context(user_id).await.unwrap_or_default();

    AiContextSummary {
        user_type: field_as_string(&stored, "user_type").unwrap_or_else(|| "unknown".to_string()),
        conversation_stage: field_as_string(&stored, "conversation_stage").unwrap_or_else(|| "new".to_string()),
        last_intent: field_as_string(&stored, "last_intent").unwrap_or_else(|| "none".to_string()),
    }
}

fn field_as_string(map: &HashMap<String, serde_json::Value>, key: &str) -> Option<String> {
    map.get(key).and_then(|v| v.as_str()).map(|s| s.to_string())
}
