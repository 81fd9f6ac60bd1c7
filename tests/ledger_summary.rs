use payment_relay::domain::payment::{amount_from_cents, amount_to_cents};
use payment_relay::ledger::store_redis::parse_mrange;
use redis::Value;
use rust_decimal_macros::dec;

fn bulk(s: &str) -> Value {
    Value::BulkString(s.as_bytes().to_vec())
}

fn label(name: &str, value: &str) -> Value {
    Value::Array(vec![bulk(name), bulk(value)])
}

fn series(processor: &str, metric: &str, points: Vec<(i64, &str)>) -> Value {
    Value::Array(vec![
        bulk(&format!("payments:{}:ts:{}", metric, processor)),
        Value::Array(vec![label("processor", processor), label("type", metric)]),
        Value::Array(
            points
                .into_iter()
                .map(|(ts, v)| Value::Array(vec![Value::Int(ts), bulk(v)]))
                .collect(),
        ),
    ])
}

#[test]
fn full_reply_splits_by_processor_and_metric() {
    let reply = Value::Array(vec![
        series("default", "count", vec![(0, "3")]),
        series("default", "amount", vec![(0, "3000")]),
        series("fallback", "count", vec![(0, "1")]),
        series("fallback", "amount", vec![(0, "550")]),
    ]);

    let summary = parse_mrange(&reply);

    assert_eq!(summary.default_summary.total_requests, 3);
    assert_eq!(summary.default_summary.total_amount, dec!(30.00));
    assert_eq!(summary.fallback_summary.total_requests, 1);
    assert_eq!(summary.fallback_summary.total_amount, dec!(5.50));
}

#[test]
fn empty_reply_yields_zeroed_summary() {
    let summary = parse_mrange(&Value::Array(vec![]));

    assert_eq!(summary.default_summary.total_requests, 0);
    assert_eq!(summary.default_summary.total_amount, dec!(0.00));
    assert_eq!(summary.fallback_summary.total_requests, 0);
    assert_eq!(summary.fallback_summary.total_amount, dec!(0.00));
}

#[test]
fn missing_processor_stays_at_zero() {
    let reply = Value::Array(vec![
        series("default", "count", vec![(0, "2")]),
        series("default", "amount", vec![(0, "1990")]),
    ]);

    let summary = parse_mrange(&reply);

    assert_eq!(summary.default_summary.total_requests, 2);
    assert_eq!(summary.default_summary.total_amount, dec!(19.90));
    assert_eq!(summary.fallback_summary.total_requests, 0);
    assert_eq!(summary.fallback_summary.total_amount, dec!(0.00));
}

#[test]
fn multiple_aggregation_buckets_are_summed() {
    let reply = Value::Array(vec![series(
        "default",
        "count",
        vec![(0, "2"), (9_999_999_999_999, "1")],
    )]);

    let summary = parse_mrange(&reply);

    assert_eq!(summary.default_summary.total_requests, 3);
}

#[test]
fn float_formatted_points_are_read_back_whole() {
    let reply = Value::Array(vec![series("fallback", "amount", vec![(0, "1000.0")])]);

    let summary = parse_mrange(&reply);

    assert_eq!(summary.fallback_summary.total_amount, dec!(10.00));
}

#[test]
fn cents_conversion_is_exact_for_two_decimal_amounts() {
    assert_eq!(amount_to_cents(dec!(10.00)), 1000);
    assert_eq!(amount_to_cents(dec!(19.90)), 1990);
    assert_eq!(amount_to_cents(dec!(0.01)), 1);
    assert_eq!(amount_from_cents(1990), dec!(19.90));
    assert_eq!(amount_from_cents(0), dec!(0.00));
}
