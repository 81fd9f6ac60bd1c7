use payment_relay::health::lock_redis::ProbeLock;
use payment_relay::health::monitor::{
    HealthCache, HealthMonitor, HEALTH_PROBE_LOCK_KEY, PROBE_LOCK_LEASE_MS,
};

// Nothing listens on this port; every store call fails fast.
fn dead_store_monitor(cache: HealthCache) -> HealthMonitor {
    let client = redis::Client::open("redis://127.0.0.1:6399/").unwrap();
    HealthMonitor {
        redis_client: client.clone(),
        http_client: reqwest::Client::new(),
        cache,
        lock: ProbeLock::new(client, HEALTH_PROBE_LOCK_KEY, PROBE_LOCK_LEASE_MS),
        default_health_url: "http://127.0.0.1:6399/health".to_string(),
        fallback_health_url: "http://127.0.0.1:6399/health".to_string(),
        health_timeout_ms: 100,
    }
}

#[tokio::test]
async fn failed_sync_forces_both_flags_down() {
    let cache = HealthCache::new();
    cache.set(true, true);
    let monitor = dead_store_monitor(cache.clone());

    let synced = monitor.sync_from_store().await;

    assert!(synced.is_err());
    assert_eq!(cache.snapshot(), (false, false));
}

#[tokio::test]
async fn failed_publish_surfaces_the_error_after_the_failsafe_attempt() {
    let monitor = dead_store_monitor(HealthCache::new());

    // Primary write and the both-down failsafe both run against the dead
    // store; the cycle must come back as an error, never a silent success.
    let published = monitor.publish_with_failsafe(true, false).await;

    assert!(published.is_err());
}
