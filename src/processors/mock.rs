use crate::domain::payment::{OutboundPayment, Processor};
use crate::processors::{AttemptOutcome, ProcessorClient};
use std::sync::Mutex;

/// Scripted processor pair for tests: behavior strings are "ACCEPT",
/// "REJECT", or "DROP" (transport failure). Records every attempt in order.
pub struct MockProcessorClient {
    pub default_behavior: String,
    pub fallback_behavior: String,
    pub attempts: Mutex<Vec<Processor>>,
}

impl MockProcessorClient {
    pub fn new(default_behavior: &str, fallback_behavior: &str) -> Self {
        Self {
            default_behavior: default_behavior.to_string(),
            fallback_behavior: fallback_behavior.to_string(),
            attempts: Mutex::new(Vec::new()),
        }
    }

    pub fn attempted(&self) -> Vec<Processor> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ProcessorClient for MockProcessorClient {
    async fn attempt(&self, processor: Processor, _payment: &OutboundPayment) -> AttemptOutcome {
        self.attempts.lock().unwrap().push(processor);
        let behavior = match processor {
            Processor::Default => self.default_behavior.as_str(),
            Processor::Fallback => self.fallback_behavior.as_str(),
        };
        match behavior {
            "REJECT" => AttemptOutcome::Rejected,
            "DROP" => AttemptOutcome::TransportFailure,
            _ => AttemptOutcome::Accepted,
        }
    }
}
