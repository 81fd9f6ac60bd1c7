#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub redis_url: String,
    pub default_payments_url: String,
    pub default_health_url: String,
    pub fallback_payments_url: String,
    pub fallback_health_url: String,
    pub processor_timeout_ms: u64,
    pub health_timeout_ms: u64,
    pub consumer_concurrency: usize,
    pub summary_settle_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let default_base = std::env::var("PROCESSOR_DEFAULT_URL")
            .unwrap_or_else(|_| "http://payment-processor-default:8080".to_string());
        let fallback_base = std::env::var("PROCESSOR_FALLBACK_URL")
            .unwrap_or_else(|_| "http://payment-processor-fallback:8080".to_string());

        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:9999".to_string()),
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379/".to_string()),
            default_payments_url: format!("{}/payments", default_base),
            default_health_url: format!("{}/payments/service-health", default_base),
            fallback_payments_url: format!("{}/payments", fallback_base),
            fallback_health_url: format!("{}/payments/service-health", fallback_base),
            processor_timeout_ms: std::env::var("PROCESSOR_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(2500),
            health_timeout_ms: std::env::var("HEALTH_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(800),
            consumer_concurrency: std::env::var("RETRY_CONSUMER_CONCURRENCY")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(4),
            summary_settle_ms: std::env::var("SUMMARY_SETTLE_MS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1111),
        }
    }
}
