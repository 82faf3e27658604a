pub mod ai;
pub mod bootstrap;
pub mod config;
pub mod handlers;
pub mod outbound;
pub mod routes;
pub mod state;
pub mod types;

use std::sync::Arc;

use common::{InMemorySharedStore, RedisSharedStore, RuntimeConfig, SharedStore};
use health::{AlertEngine, HealthCheck, HealthController, LoggingNotifier, NoopInfrastructureRollback, SnapshotManager};

use ai::FallbackAiClient;
use handlers::processing::{register_conversational_handlers, ConversationalHandlerContext};
use outbound::{OutboundDefaults, WhatsAppSenderPool};

pub use routes::create_route;

pub async fn run_server() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::AppConfig::from_env();
    let runtime_config = Arc::new(RuntimeConfig::from_env());
    tracing::info!(api_version = %config.api_version, "configuration loaded");

    let store: Arc<dyn SharedStore> = match &runtime_config.redis_url {
        Some(url) => Arc::new(RedisSharedStore::connect(url).await?),
        None => {
            tracing::warn!("REDIS_URL not set, falling back to an in-process store (not durable across restarts)");
            Arc::new(InMemorySharedStore::new())
        }
    };

    let numbers = bootstrap::load_sending_number_pool();
    tracing::info!(count = numbers.len(), "sending number pool loaded");
    let load_balancer = Arc::new(load_balancer::LoadBalancer::new(numbers, Arc::clone(&store)));

    let cache_config = cache::CacheConfig::from_runtime(&runtime_config);
    let cache_manager = cache::CacheManager::new(cache_config, Arc::clone(&store));
    cache_manager.initialize().await?;

    let queue_processor = queue_processor::QueueProcessor::new((*runtime_config).clone(), Arc::clone(&store));
    queue_processor.initialize().await?;

    let sender_pool = Arc::new(WhatsAppSenderPool::new(OutboundDefaults::default()));

    let handler_ctx = ConversationalHandlerContext {
        cache: Arc::clone(&cache_manager),
        load_balancer: Arc::clone(&load_balancer),
        sender_pool: Arc::clone(&sender_pool),
        ai_client: Arc::new(FallbackAiClient),
    };
    register_conversational_handlers(&queue_processor, handler_ctx).await;
    queue_processor.start();

    let alerts =
        AlertEngine::new(Arc::clone(&store), Arc::new(LoggingNotifier), runtime_config.emergency_contacts.clone());
    alerts.seed_default_rules().await;
    let snapshots =
        SnapshotManager::new(Arc::clone(&store), Arc::new(NoopInfrastructureRollback), runtime_config.max_snapshots);

    let health_controller = HealthController::new(
        &runtime_config,
        Arc::clone(&store),
        alerts,
        snapshots,
        Arc::clone(&load_balancer),
        Arc::clone(&queue_processor),
        Arc::clone(&cache_manager),
    );
    health_controller
        .register_check(HealthCheck::new(
            "webhook_self",
            format!("http://127.0.0.1:{}/health", config.port),
            true,
        ))
        .await;

    Arc::clone(&cache_manager).spawn_sweep_loop();
    Arc::clone(&cache_manager).spawn_stats_loop();
    Arc::clone(&load_balancer).spawn_health_loop();
    Arc::clone(&health_controller).spawn_probe_loop(runtime_config.health_check_interval);
    Arc::clone(&health_controller).spawn_snapshot_loop(runtime_config.snapshot_interval);
    Arc::clone(&health_controller).spawn_cleanup_loop();
    Arc::clone(&health_controller).spawn_alert_feed_loop(std::time::Duration::from_secs(60));

    let state = state::AppState::new(
        config.clone(),
        Arc::clone(&runtime_config),
        load_balancer,
        Arc::clone(&queue_processor),
        cache_manager,
        health_controller,
        sender_pool,
    );

    let app = routes::create_route(state);
    let addr = config.listen_address();
    tracing::info!(%addr, "server starting");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal(queue_processor))
        .await?;
    Ok(())
}

async fn shutdown_signal(queue_processor: Arc<queue_processor::QueueProcessor>) {
    tokio::signal::ctrl_c().await.expect("failed to listen for ctrl-c");
    tracing::info!("shutdown signal received, flushing pending queue state");
    if let Err(e) = queue_processor.stop().await {
        tracing::error!(error = %e, "failed to flush queue state during shutdown");
    }
}
