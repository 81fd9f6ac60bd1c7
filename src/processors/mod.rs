use crate::domain::payment::{OutboundPayment, Processor};

pub mod http;
pub mod mock;

/// Outcome of a single delivery attempt against one processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Processor answered with a success status.
    Accepted,
    /// Processor answered with an error status; do not retry the same
    /// processor within this routing pass.
    Rejected,
    /// Network error, timeout, or unreadable response. Routed the same as a
    /// rejection.
    TransportFailure,
}

impl AttemptOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, AttemptOutcome::Accepted)
    }
}

#[async_trait::async_trait]
pub trait ProcessorClient: Send + Sync {
    /// Sends one payment to one processor. Never fails; every transport or
    /// protocol problem is folded into the outcome.
    async fn attempt(&self, processor: Processor, payment: &OutboundPayment) -> AttemptOutcome;
}
