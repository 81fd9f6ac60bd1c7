use crate::domain::payment::PaymentRequest;
use crate::queue::codec;
use anyhow::Result;
use redis::AsyncCommands;

pub const PROCESSING_QUEUE_KEY: &str = "payments:processing-queue";

/// Durable retry FIFO in the shared store. Push at the head, pop from the
/// tail, so insertion order is retry order; BRPOP hands each entry to exactly
/// one worker.
#[derive(Clone)]
pub struct RetryQueue {
    pub client: redis::Client,
}

impl RetryQueue {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    pub async fn push(&self, payment: &PaymentRequest) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload = codec::encode(payment)?;
        let _: i64 = conn.lpush(PROCESSING_QUEUE_KEY, payload).await?;
        Ok(())
    }

    /// Blocking pop with a wait bound; `None` on timeout is polling, not an
    /// error.
    pub async fn pop(&self, timeout_secs: f64) -> Result<Option<PaymentRequest>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let popped: Option<(String, String)> =
            conn.brpop(PROCESSING_QUEUE_KEY, timeout_secs).await?;
        match popped {
            Some((_key, payload)) => match codec::decode(&payload) {
                Ok(payment) => Ok(Some(payment)),
                Err(err) => {
                    tracing::error!("dropping undecodable queue entry: {}", err);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }
}
