use payment_relay::domain::payment::{PaymentRequest, Processor};
use payment_relay::health::monitor::HealthCache;
use payment_relay::ledger::store_redis::LedgerStore;
use payment_relay::processors::mock::MockProcessorClient;
use payment_relay::queue::store_redis::RetryQueue;
use payment_relay::service::payment_router::{candidates, PaymentRouter, RouteOutcome};
use rust_decimal_macros::dec;
use std::sync::Arc;
use uuid::Uuid;

#[test]
fn both_available_prefers_default_then_fallback() {
    assert_eq!(
        candidates(true, true),
        vec![Processor::Default, Processor::Fallback]
    );
}

#[test]
fn single_processor_is_the_only_candidate() {
    assert_eq!(candidates(true, false), vec![Processor::Default]);
    assert_eq!(candidates(false, true), vec![Processor::Fallback]);
}

#[test]
fn neither_available_yields_no_candidates() {
    assert!(candidates(false, false).is_empty());
}

fn payment() -> PaymentRequest {
    PaymentRequest {
        correlation_id: Uuid::new_v4(),
        amount: dec!(10.00),
    }
}

// No store is listening here; anything the router tries to persist fails
// fast, which is exactly the absorbed-failure path under test.
fn router_with(mock: Arc<MockProcessorClient>, health: HealthCache) -> PaymentRouter {
    let client = redis::Client::open("redis://127.0.0.1:6399/").unwrap();
    PaymentRouter {
        processors: mock,
        health,
        queue: RetryQueue::new(client.clone()),
        ledger: LedgerStore::new(client),
    }
}

#[tokio::test]
async fn open_circuit_skips_all_network_attempts() {
    let mock = Arc::new(MockProcessorClient::new("ACCEPT", "ACCEPT"));
    let health = HealthCache::new();
    let router = router_with(mock.clone(), health);

    let outcome = router.process(payment()).await;

    assert_eq!(outcome, RouteOutcome::Requeued);
    assert!(mock.attempted().is_empty());
}

#[tokio::test]
async fn only_fallback_available_never_touches_default() {
    let mock = Arc::new(MockProcessorClient::new("ACCEPT", "DROP"));
    let health = HealthCache::new();
    health.set(false, true);
    let router = router_with(mock.clone(), health);

    let outcome = router.process(payment()).await;

    assert_eq!(outcome, RouteOutcome::Requeued);
    assert_eq!(mock.attempted(), vec![Processor::Fallback]);
}

#[tokio::test]
async fn default_rejection_falls_through_to_fallback_once() {
    let mock = Arc::new(MockProcessorClient::new("REJECT", "ACCEPT"));
    let health = HealthCache::new();
    health.set(true, true);
    let router = router_with(mock.clone(), health);

    router.process(payment()).await;

    // One attempt per processor in preference order, no same-processor retry
    // within the pass.
    assert_eq!(
        mock.attempted(),
        vec![Processor::Default, Processor::Fallback]
    );
}

#[tokio::test]
async fn transport_failure_routes_like_rejection() {
    let mock = Arc::new(MockProcessorClient::new("DROP", "DROP"));
    let health = HealthCache::new();
    health.set(true, true);
    let router = router_with(mock.clone(), health);

    let outcome = router.process(payment()).await;

    assert_eq!(outcome, RouteOutcome::Requeued);
    assert_eq!(
        mock.attempted(),
        vec![Processor::Default, Processor::Fallback]
    );
}

#[tokio::test]
async fn only_default_available_fails_straight_to_requeue() {
    let mock = Arc::new(MockProcessorClient::new("REJECT", "ACCEPT"));
    let health = HealthCache::new();
    health.set(true, false);
    let router = router_with(mock.clone(), health);

    let outcome = router.process(payment()).await;

    assert_eq!(outcome, RouteOutcome::Requeued);
    assert_eq!(mock.attempted(), vec![Processor::Default]);
}
