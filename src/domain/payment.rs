use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The two external payment processors, in routing preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Processor {
    Default,
    Fallback,
}

impl Processor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Processor::Default => "default",
            Processor::Fallback => "fallback",
        }
    }
}

/// Inbound payment as accepted on POST /payments and as carried through the
/// retry queue. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub correlation_id: Uuid,
    pub amount: Decimal,
}

/// Wire payload sent to a processor. `requested_at` is stamped when the
/// payload is built, once per routing pass; a requeued payment gets a fresh
/// timestamp on its next pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundPayment {
    pub correlation_id: Uuid,
    pub amount: Decimal,
    pub requested_at: DateTime<Utc>,
}

impl OutboundPayment {
    pub fn new(payment: &PaymentRequest) -> Self {
        Self {
            correlation_id: payment.correlation_id,
            amount: payment.amount,
            requested_at: Utc::now(),
        }
    }
}

/// Ledger amounts are stored as integer minor units.
pub fn amount_to_cents(amount: Decimal) -> i64 {
    (amount * Decimal::ONE_HUNDRED).trunc().to_i64().unwrap_or(0)
}

pub fn amount_from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorSummary {
    pub total_requests: i64,
    pub total_amount: Decimal,
}

impl ProcessorSummary {
    pub fn from_cents(count: i64, amount_cents: i64) -> Self {
        Self {
            total_requests: count,
            total_amount: amount_from_cents(amount_cents),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SummaryResponse {
    #[serde(rename = "default")]
    pub default_summary: ProcessorSummary,
    #[serde(rename = "fallback")]
    pub fallback_summary: ProcessorSummary,
}
