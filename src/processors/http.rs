use crate::domain::payment::{OutboundPayment, Processor};
use crate::processors::{AttemptOutcome, ProcessorClient};

pub struct HttpProcessorClient {
    pub client: reqwest::Client,
    pub default_payments_url: String,
    pub fallback_payments_url: String,
    pub timeout_ms: u64,
}

impl HttpProcessorClient {
    fn url_for(&self, processor: Processor) -> &str {
        match processor {
            Processor::Default => &self.default_payments_url,
            Processor::Fallback => &self.fallback_payments_url,
        }
    }
}

#[async_trait::async_trait]
impl ProcessorClient for HttpProcessorClient {
    async fn attempt(&self, processor: Processor, payment: &OutboundPayment) -> AttemptOutcome {
        let resp = self
            .client
            .post(self.url_for(processor))
            .json(payment)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await;

        match resp {
            Ok(r) if r.status().is_success() => AttemptOutcome::Accepted,
            Ok(r) => {
                tracing::debug!(
                    processor = processor.as_str(),
                    status = r.status().as_u16(),
                    "processor rejected payment"
                );
                AttemptOutcome::Rejected
            }
            Err(e) if e.is_timeout() => {
                tracing::debug!(processor = processor.as_str(), "processor call timed out");
                AttemptOutcome::TransportFailure
            }
            Err(e) => {
                tracing::debug!(processor = processor.as_str(), "processor call failed: {}", e);
                AttemptOutcome::TransportFailure
            }
        }
    }
}
