//! AI-response cache key derivation (§4.3 "Keying").
//!
//! `"ai_response:" || md5(json({input, context_hash}))` where
//! `context_hash = md5(json(relevant_context_subset))` and the relevant
//! subset is exactly `{user_type, conversation_stage, last_intent}`.

use crate::types::AiContextSummary;
use md5::{Digest, Md5};

pub fn ai_response_key(input: &str, context: &AiContextSummary) -> String {
    let normalized_input = input.trim().to_lowercase();
    let context_json = serde_json::to_string(context).expect("AiContextSummary always serializes");
    let context_hash = format!("{:x}", Md5::digest(context_json.as_bytes()));

    let keyed = serde_json::json!({
        "input": normalized_input,
        "context_hash": context_hash,
    });
    let keyed_json = serde_json::to_string(&keyed).expect("keyed object always serializes");
    format!("ai_response:{:x}", Md5::digest(keyed_json.as_bytes()))
}
