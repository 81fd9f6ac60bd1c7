use axum::routing::{get, post};
use axum::Router;
use payment_relay::config::AppConfig;
use payment_relay::health::lock_redis::ProbeLock;
use payment_relay::health::monitor::{
    HealthCache, HealthMonitor, HEALTH_PROBE_LOCK_KEY, PROBE_LOCK_LEASE_MS,
};
use payment_relay::ledger::store_redis::LedgerStore;
use payment_relay::processors::http::HttpProcessorClient;
use payment_relay::queue::consumer::QueueConsumer;
use payment_relay::queue::store_redis::RetryQueue;
use payment_relay::service::payment_router::PaymentRouter;
use payment_relay::AppState;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let redis_client = redis::Client::open(cfg.redis_url.clone())?;
    let http_client = reqwest::Client::new();

    let ledger = LedgerStore::new(redis_client.clone());
    if let Err(err) = ledger.ensure_series().await {
        tracing::warn!("ledger series bootstrap failed: {}", err);
    }

    let health_cache = HealthCache::new();
    let monitor = HealthMonitor {
        redis_client: redis_client.clone(),
        http_client: http_client.clone(),
        cache: health_cache.clone(),
        lock: ProbeLock::new(redis_client.clone(), HEALTH_PROBE_LOCK_KEY, PROBE_LOCK_LEASE_MS),
        default_health_url: cfg.default_health_url.clone(),
        fallback_health_url: cfg.fallback_health_url.clone(),
        health_timeout_ms: cfg.health_timeout_ms,
    };
    tokio::spawn(monitor.clone().run_listener());
    tokio::spawn(monitor.run_probe_cycles());

    let queue = RetryQueue::new(redis_client.clone());
    let router = PaymentRouter {
        processors: Arc::new(HttpProcessorClient {
            client: http_client,
            default_payments_url: cfg.default_payments_url.clone(),
            fallback_payments_url: cfg.fallback_payments_url.clone(),
            timeout_ms: cfg.processor_timeout_ms,
        }),
        health: health_cache.clone(),
        queue: queue.clone(),
        ledger: ledger.clone(),
    };

    QueueConsumer {
        queue,
        router: router.clone(),
        health: health_cache,
        concurrency: cfg.consumer_concurrency,
    }
    .spawn();

    let state = AppState {
        router,
        ledger,
        summary_settle_ms: cfg.summary_settle_ms,
    };

    let app = Router::new()
        .route(
            "/payments",
            post(payment_relay::http::handlers::payments::create_payment),
        )
        .route(
            "/payments-summary",
            get(payment_relay::http::handlers::summary::payments_summary),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
