use crate::domain::payment::PaymentRequest;
use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Queue entries outlive the process that wrote them (restarts, rolling
/// deploys), so the shape on the wire is pinned here and versioned
/// explicitly. Decoding ignores unknown fields and tolerates a missing
/// version tag, so older writers stay readable.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueueEntry {
    #[serde(rename = "v", default = "current_version")]
    version: u32,
    correlation_id: Uuid,
    amount: Decimal,
}

fn current_version() -> u32 {
    SCHEMA_VERSION
}

pub fn encode(payment: &PaymentRequest) -> Result<String> {
    let entry = QueueEntry {
        version: SCHEMA_VERSION,
        correlation_id: payment.correlation_id,
        amount: payment.amount,
    };
    Ok(serde_json::to_string(&entry)?)
}

pub fn decode(raw: &str) -> Result<PaymentRequest> {
    let entry: QueueEntry = serde_json::from_str(raw)?;
    Ok(PaymentRequest {
        correlation_id: entry.correlation_id,
        amount: entry.amount,
    })
}
