use crate::domain::payment::{
    amount_to_cents, Processor, ProcessorSummary, SummaryResponse,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

const PAYMENTS_AMOUNT_TS_KEY: &str = "payments:amount:ts";
const PAYMENTS_COUNT_TS_KEY: &str = "payments:count:ts";

/// One MADD covering both series, so count and amount for a delivery become
/// visible together or not at all.
const PERSIST_PAYMENT_SCRIPT: &str =
    "redis.call('TS.MADD', KEYS[1], ARGV[1], ARGV[2], KEYS[2], ARGV[1], 1) return 1";

/// Single aggregation bucket wide enough to cover any practical range.
const AGGREGATION_BUCKET_MS: &str = "9999999999999";

/// Backend-split, time-indexed record of confirmed deliveries, stored as two
/// RedisTimeSeries per processor (count and amount in minor units).
/// Duplicate timestamps sum instead of overwriting.
#[derive(Clone)]
pub struct LedgerStore {
    pub client: redis::Client,
}

fn amount_key(processor: Processor) -> String {
    format!("{}:{}", PAYMENTS_AMOUNT_TS_KEY, processor.as_str())
}

fn count_key(processor: Processor) -> String {
    format!("{}:{}", PAYMENTS_COUNT_TS_KEY, processor.as_str())
}

impl LedgerStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    /// Creates the four series with their filter labels and a summing
    /// duplicate policy. Safe to run on every boot.
    pub async fn ensure_series(&self) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        for processor in [Processor::Default, Processor::Fallback] {
            for (key, metric) in [
                (amount_key(processor), "amount"),
                (count_key(processor), "count"),
            ] {
                let created: redis::RedisResult<()> = redis::cmd("TS.CREATE")
                    .arg(&key)
                    .arg("DUPLICATE_POLICY")
                    .arg("SUM")
                    .arg("LABELS")
                    .arg("processor")
                    .arg(processor.as_str())
                    .arg("type")
                    .arg(metric)
                    .query_async(&mut conn)
                    .await;
                if let Err(err) = created {
                    if !err.to_string().contains("already exists") {
                        return Err(err.into());
                    }
                }
            }
        }
        Ok(())
    }

    pub async fn record(
        &self,
        processor: Processor,
        requested_at: DateTime<Utc>,
        amount: Decimal,
    ) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: i64 = redis::Script::new(PERSIST_PAYMENT_SCRIPT)
            .key(amount_key(processor))
            .key(count_key(processor))
            .arg(requested_at.timestamp_millis())
            .arg(amount_to_cents(amount))
            .invoke_async(&mut conn)
            .await?;
        Ok(())
    }

    /// Range summary over both processors. Open bounds fall back to the
    /// store's earliest/latest markers.
    pub async fn summarize(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<SummaryResponse> {
        let from_arg = from
            .map(|t| t.timestamp_millis().to_string())
            .unwrap_or_else(|| "-".to_string());
        let to_arg = to
            .map(|t| t.timestamp_millis().to_string())
            .unwrap_or_else(|| "+".to_string());

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let reply: redis::Value = redis::cmd("TS.MRANGE")
            .arg(from_arg)
            .arg(to_arg)
            .arg("WITHLABELS")
            .arg("AGGREGATION")
            .arg("sum")
            .arg(AGGREGATION_BUCKET_MS)
            .arg("FILTER")
            .arg("processor=(default,fallback)")
            .query_async(&mut conn)
            .await?;

        Ok(parse_mrange(&reply))
    }
}

/// Parses a WITHLABELS MRANGE reply into per-processor totals. Series the
/// filter did not match (no data yet) simply stay at zero.
pub fn parse_mrange(reply: &redis::Value) -> SummaryResponse {
    let mut default_count = 0;
    let mut default_cents = 0;
    let mut fallback_count = 0;
    let mut fallback_cents = 0;

    if let redis::Value::Array(series_list) = reply {
        for series in series_list {
            let redis::Value::Array(parts) = series else {
                continue;
            };
            if parts.len() < 3 {
                continue;
            }
            let (processor, metric) = series_labels(&parts[1]);
            let total = sum_points(&parts[2]);

            match (processor.as_deref(), metric.as_deref()) {
                (Some("default"), Some("count")) => default_count = total,
                (Some("default"), Some("amount")) => default_cents = total,
                (Some("fallback"), Some("count")) => fallback_count = total,
                (Some("fallback"), Some("amount")) => fallback_cents = total,
                _ => {}
            }
        }
    }

    SummaryResponse {
        default_summary: ProcessorSummary::from_cents(default_count, default_cents),
        fallback_summary: ProcessorSummary::from_cents(fallback_count, fallback_cents),
    }
}

fn series_labels(labels: &redis::Value) -> (Option<String>, Option<String>) {
    let mut processor = None;
    let mut metric = None;
    if let redis::Value::Array(pairs) = labels {
        for pair in pairs {
            let redis::Value::Array(kv) = pair else {
                continue;
            };
            if kv.len() != 2 {
                continue;
            }
            match (value_as_str(&kv[0]).as_deref(), value_as_str(&kv[1])) {
                (Some("processor"), v @ Some(_)) => processor = v,
                (Some("type"), v @ Some(_)) => metric = v,
                _ => {}
            }
        }
    }
    (processor, metric)
}

fn sum_points(points: &redis::Value) -> i64 {
    let mut total = 0;
    if let redis::Value::Array(point_list) = points {
        for point in point_list {
            let redis::Value::Array(pair) = point else {
                continue;
            };
            if pair.len() != 2 {
                continue;
            }
            if let Some(raw) = value_as_str(&pair[1]) {
                total += raw.parse::<f64>().map(|v| v.round() as i64).unwrap_or(0);
            }
        }
    }
    total
}

fn value_as_str(value: &redis::Value) -> Option<String> {
    match value {
        redis::Value::BulkString(bytes) => String::from_utf8(bytes.clone()).ok(),
        redis::Value::SimpleString(s) => Some(s.clone()),
        redis::Value::Int(n) => Some(n.to_string()),
        redis::Value::Double(d) => Some(d.to_string()),
        _ => None,
    }
}
