//! Bridges the Number Pool Load Balancer's per-call `(phoneId,
//! credentials)` selection with `whatsapp_client::WhatsAppClient`, which
//! bakes one fixed phone number and access token into its config at
//! construction.
//!
//! A `WhatsAppClient` is cheap to keep around (it only owns an HTTP
//! client and a rate limiter) but expensive to rebuild per send, so this
//! pool caches one per `phone_id` and only constructs a fresh client the
//! first time a given sending number is used.

use load_balancer::SendingCredentials;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use whatsapp_client::client::message_types::WhatsAppMessage;
use whatsapp_client::client::responses::WhatsAppMessageResponse;
use whatsapp_client::{WhatsAppClient, WhatsAppClientConfig, WhatsAppResult};

/// Defaults shared by every client the pool constructs; only the
/// per-number identity (`phone_number_id`/`access_token`) varies.
#[derive(Debug, Clone)]
pub struct OutboundDefaults {
    pub api_version: String,
    pub api_base_url: String,
    pub rate_limit_per_minute: u32,
    pub rate_limit_burst: u32,
    pub request_timeout_seconds: u64,
    pub max_concurrent_requests: usize,
    pub max_retry_attempts: u32,
    pub initial_retry_delay_ms: u64,
    pub max_retry_delay_ms: u64,
}

impl Default for OutboundDefaults {
    fn default() -> Self {
        Self {
            api_version: "v23.0".to_string(),
            api_base_url: "https://graph.facebook.com".to_string(),
            rate_limit_per_minute: 800,
            rate_limit_burst: 50,
            request_timeout_seconds: 30,
            max_concurrent_requests: 20,
            max_retry_attempts: 3,
            initial_retry_delay_ms: 1000,
            max_retry_delay_ms: 30_000,
        }
    }
}

pub struct WhatsAppSenderPool {
    defaults: OutboundDefaults,
    clients: Mutex<HashMap<String, Arc<WhatsAppClient>>>,
}

impl WhatsAppSenderPool {
    pub fn new(defaults: OutboundDefaults) -> Self {
        Self { defaults, clients: Mutex::new(HashMap::new()) }
    }

    /// `send(phoneId, credentials, payload)` (§4.2/§6): looks up or lazily
    /// builds the client for this sending number, then dispatches.
    pub async fn send(
        &self,
        phone_id: &str,
        credentials: &SendingCredentials,
        message: WhatsAppMessage,
    ) -> WhatsAppResult<WhatsAppMessageResponse> {
        let client = self.client_for(phone_id, credentials).await?;
        client.send_message(message).await
    }

    async fn client_for(
        &self,
        phone_id: &str,
        credentials: &SendingCredentials,
    ) -> WhatsAppResult<Arc<WhatsAppClient>> {
        let mut clients = self.clients.lock().await;
        if let Some(existing) = clients.get(phone_id) {
            return Ok(existing.clone());
        }

        let config = WhatsAppClientConfig {
            access_token: credentials.token.clone(),
            api_version: self.defaults.api_version.clone(),
            phone_number_id: phone_id.to_string(),
            api_base_url: self.defaults.api_base_url.clone(),
            rate_limit_per_minute: self.defaults.rate_limit_per_minute,
            rate_limit_burst: self.defaults.rate_limit_burst,
            request_timeout_seconds: self.defaults.request_timeout_seconds,
            max_concurrent_requests: self.defaults.max_concurrent_requests,
            max_retry_attempts: self.defaults.max_retry_attempts,
            initial_retry_delay_ms: self.defaults.initial_retry_delay_ms,
            max_retry_delay_ms: self.defaults.max_retry_delay_ms,
            host: "0.0.0.0".to_string(),
            port: 0,
        };

        let client = Arc::new(WhatsAppClient::new(config)?);
        clients.insert(phone_id.to_string(), client.clone());
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> SendingCredentials {
        SendingCredentials { id: "cred-1".to_string(), account_id: "acct-1".to_string(), token: "tok".to_string() }
    }

    #[tokio::test]
    async fn reuses_the_same_client_for_a_known_phone_id() {
        let pool = WhatsAppSenderPool::new(OutboundDefaults::default());
        let first = pool.client_for("123", &creds()).await.unwrap();
        let second = pool.client_for("123", &creds()).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn builds_distinct_clients_per_phone_id() {
        let pool = WhatsAppSenderPool::new(OutboundDefaults::default());
        let a = pool.client_for("123", &creds()).await.unwrap();
        let b = pool.client_for("456", &creds()).await.unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
