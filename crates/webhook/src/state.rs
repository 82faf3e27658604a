use crate::config::AppConfig;
use crate::outbound::WhatsAppSenderPool;
use cache::CacheManager;
use common::RuntimeConfig;
use health::HealthController;
use load_balancer::LoadBalancer;
use queue_processor::QueueProcessor;
use reqwest::Client;
use std::sync::Arc;

/// Shared across every handler invocation. Cloning is cheap: everything
/// of substance is already behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub runtime_config: Arc<RuntimeConfig>,
    pub http_client: Client,
    pub load_balancer: Arc<LoadBalancer>,
    pub queue_processor: Arc<QueueProcessor>,
    pub cache_manager: Arc<CacheManager>,
    pub health_controller: Arc<HealthController>,
    pub sender_pool: Arc<WhatsAppSenderPool>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        runtime_config: Arc<RuntimeConfig>,
        load_balancer: Arc<LoadBalancer>,
        queue_processor: Arc<QueueProcessor>,
        cache_manager: Arc<CacheManager>,
        health_controller: Arc<HealthController>,
        sender_pool: Arc<WhatsAppSenderPool>,
    ) -> Self {
        let http_client =
            Client::builder().timeout(std::time::Duration::from_secs(30)).build().expect("failed to build HTTP client");

        Self {
            config,
            runtime_config,
            http_client,
            load_balancer,
            queue_processor,
            cache_manager,
            health_controller,
            sender_pool,
        }
    }
}
