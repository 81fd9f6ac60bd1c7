use crate::domain::payment::{OutboundPayment, PaymentRequest, Processor};
use crate::health::monitor::HealthCache;
use crate::ledger::store_redis::LedgerStore;
use crate::processors::ProcessorClient;
use crate::queue::store_redis::RetryQueue;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    Delivered(Processor),
    Requeued,
}

/// Ordered delivery candidates for a health snapshot. Default is always
/// preferred; an unhealthy processor is never a candidate.
pub fn candidates(default_up: bool, fallback_up: bool) -> Vec<Processor> {
    let mut out = Vec::with_capacity(2);
    if default_up {
        out.push(Processor::Default);
    }
    if fallback_up {
        out.push(Processor::Fallback);
    }
    out
}

#[derive(Clone)]
pub struct PaymentRouter {
    pub processors: Arc<dyn ProcessorClient>,
    pub health: HealthCache,
    pub queue: RetryQueue,
    pub ledger: LedgerStore,
}

impl PaymentRouter {
    /// Folds the payment through the candidate list until a processor accepts
    /// it, then records the delivery. Exhausting the list (or an empty list)
    /// requeues the original request; no failure here reaches the caller.
    pub async fn process(&self, payment: PaymentRequest) -> RouteOutcome {
        let (default_up, fallback_up) = self.health.snapshot();
        let candidates = candidates(default_up, fallback_up);

        if candidates.is_empty() {
            // Open circuit: skip the network entirely.
            return self.requeue(&payment).await;
        }

        let outbound = OutboundPayment::new(&payment);
        for processor in candidates {
            if !self.try_deliver(processor, &outbound).await {
                continue;
            }
            return RouteOutcome::Delivered(processor);
        }

        self.requeue(&payment).await
    }

    async fn try_deliver(&self, processor: Processor, outbound: &OutboundPayment) -> bool {
        let outcome = self.processors.attempt(processor, outbound).await;
        if !outcome.is_accepted() {
            return false;
        }

        match self
            .ledger
            .record(processor, outbound.requested_at, outbound.amount)
            .await
        {
            Ok(()) => true,
            Err(err) => {
                // Accepted but not recorded: treat the attempt as failed so
                // the payment stays in the retry path rather than vanishing
                // from the summary. May double-deliver; see DESIGN.md.
                tracing::error!(
                    processor = processor.as_str(),
                    correlation_id = %outbound.correlation_id,
                    "ledger write failed after acceptance: {}",
                    err
                );
                false
            }
        }
    }

    async fn requeue(&self, payment: &PaymentRequest) -> RouteOutcome {
        if let Err(err) = self.queue.push(payment).await {
            tracing::error!(
                correlation_id = %payment.correlation_id,
                "requeue failed, payment lost to this instance: {}",
                err
            );
        }
        RouteOutcome::Requeued
    }
}
