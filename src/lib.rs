pub mod config;
pub mod domain {
    pub mod payment;
}
pub mod processors;
pub mod health {
    pub mod lock_redis;
    pub mod monitor;
}
pub mod queue {
    pub mod codec;
    pub mod consumer;
    pub mod store_redis;
}
pub mod ledger {
    pub mod store_redis;
}
pub mod service {
    pub mod payment_router;
}
pub mod http {
    pub mod handlers {
        pub mod payments;
        pub mod summary;
    }
}

#[derive(Clone)]
pub struct AppState {
    pub router: service::payment_router::PaymentRouter,
    pub ledger: ledger::store_redis::LedgerStore,
    pub summary_settle_ms: u64,
}
