use payment_relay::domain::payment::PaymentRequest;
use payment_relay::queue::codec;
use rust_decimal_macros::dec;
use uuid::Uuid;

#[test]
fn round_trip_preserves_correlation_id_and_amount() {
    let payment = PaymentRequest {
        correlation_id: Uuid::new_v4(),
        amount: dec!(19.90),
    };

    let encoded = codec::encode(&payment).unwrap();
    let decoded = codec::decode(&encoded).unwrap();

    assert_eq!(decoded.correlation_id, payment.correlation_id);
    assert_eq!(decoded.amount, payment.amount);
}

#[test]
fn encoded_entry_carries_version_and_camel_case_fields() {
    let payment = PaymentRequest {
        correlation_id: Uuid::new_v4(),
        amount: dec!(1.00),
    };

    let encoded = codec::encode(&payment).unwrap();
    let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();

    assert_eq!(value["v"], codec::SCHEMA_VERSION);
    assert!(value.get("correlationId").is_some());
    assert!(value.get("amount").is_some());
}

#[test]
fn decode_tolerates_missing_version_tag() {
    let id = Uuid::new_v4();
    let raw = format!(r#"{{"correlationId":"{}","amount":5.50}}"#, id);

    let decoded = codec::decode(&raw).unwrap();

    assert_eq!(decoded.correlation_id, id);
    assert_eq!(decoded.amount, dec!(5.50));
}

#[test]
fn decode_ignores_fields_from_newer_writers() {
    let id = Uuid::new_v4();
    let raw = format!(
        r#"{{"v":2,"correlationId":"{}","amount":3.25,"priority":"high"}}"#,
        id
    );

    let decoded = codec::decode(&raw).unwrap();

    assert_eq!(decoded.correlation_id, id);
    assert_eq!(decoded.amount, dec!(3.25));
}

#[test]
fn garbage_payload_is_an_error_not_a_panic() {
    assert!(codec::decode("not json").is_err());
    assert!(codec::decode(r#"{"amount":1.0}"#).is_err());
}
