use crate::health::monitor::HealthCache;
use crate::queue::store_redis::RetryQueue;
use crate::service::payment_router::PaymentRouter;

const UNAVAILABLE_BACKOFF_MS: u64 = 100;
const POP_TIMEOUT_SECS: f64 = 1.0;

/// Pool of workers draining the retry queue back into the router. Runs for
/// the life of the process.
#[derive(Clone)]
pub struct QueueConsumer {
    pub queue: RetryQueue,
    pub router: PaymentRouter,
    pub health: HealthCache,
    pub concurrency: usize,
}

impl QueueConsumer {
    pub fn spawn(self) {
        for worker in 0..self.concurrency.max(1) {
            let consumer = self.clone();
            tokio::spawn(async move {
                consumer.worker_loop(worker).await;
            });
        }
    }

    async fn worker_loop(&self, worker: usize) {
        tracing::info!(worker, "retry consumer worker started");
        loop {
            let (default_up, fallback_up) = self.health.snapshot();
            if !default_up && !fallback_up {
                // Both processors down: draining now would only requeue
                // everything, so back off instead of hammering the store.
                tokio::time::sleep(std::time::Duration::from_millis(UNAVAILABLE_BACKOFF_MS))
                    .await;
                continue;
            }

            match self.queue.pop(POP_TIMEOUT_SECS).await {
                Ok(Some(payment)) => {
                    self.router.process(payment).await;
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(worker, "queue pop failed: {}", err);
                    tokio::time::sleep(std::time::Duration::from_millis(
                        UNAVAILABLE_BACKOFF_MS,
                    ))
                    .await;
                }
            }
        }
    }
}
