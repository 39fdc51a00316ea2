//! Wire codec round-trip tests.
//!
//! The three-state length convention (-1 / 0 / >0) for both properties and
//! attachments is the bit-exact contract with the peer runtime; every state
//! must survive a round trip distinguishably.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use bytes::Bytes;
use chrono::{TimeZone, Utc};

use flowgate_core::error::FlowgateError;
use flowgate_core::protocol::{MessageType, ProxyEnvelope};

fn round_trip(envelope: &ProxyEnvelope, allow_unspecified: bool) -> ProxyEnvelope {
    let encoded = envelope.encode(allow_unspecified).expect("encode");
    let mut buf = Bytes::from(encoded);
    let decoded = ProxyEnvelope::decode(&mut buf).expect("decode");
    assert_eq!(buf.len(), 0, "decode must consume the whole buffer");
    decoded
}

#[test]
fn empty_envelope_layout() {
    let envelope = ProxyEnvelope::new(MessageType::ConnectRequest);
    let encoded = envelope.encode(false).unwrap();
    // type=3, 0 properties, 0 attachments, all little-endian i32
    assert_eq!(hex::encode(encoded), "030000000000000000000000");
}

#[test]
fn single_property_layout() {
    let mut envelope = ProxyEnvelope::new(MessageType::ConnectRequest);
    envelope.set_string_property("K", Some("v"));
    let encoded = envelope.encode(false).unwrap();
    assert_eq!(
        hex::encode(encoded),
        // type, count=1, keyLen=1 'K', valLen=1 'v', attachments=0
        "0300000001000000010000004b010000007600000000"
    );
}

#[test]
fn property_three_states_survive_round_trip() {
    let mut envelope = ProxyEnvelope::new(MessageType::Unspecified);
    envelope.set_string_property("nil", None);
    envelope.set_string_property("empty", Some(""));
    envelope.set_string_property("value", Some("x"));

    let decoded = round_trip(&envelope, true);

    // key present with null
    assert!(decoded.has_property("nil"));
    assert_eq!(decoded.string_property("nil"), None);
    // key present with empty string
    assert!(decoded.has_property("empty"));
    assert_eq!(decoded.string_property("empty"), Some(""));
    // key present with value
    assert_eq!(decoded.string_property("value"), Some("x"));
    // absent key
    assert!(!decoded.has_property("absent"));
    assert_eq!(decoded.string_property("absent"), None);

    assert_eq!(decoded.property_count(), 3);
    assert_eq!(decoded, envelope);
}

#[test]
fn attachment_three_states_survive_round_trip_in_order() {
    let mut envelope = ProxyEnvelope::new(MessageType::Unspecified);
    envelope.push_attachment(None);
    envelope.push_attachment(Some(Vec::new()));
    envelope.push_attachment(Some(vec![1, 2, 3]));

    let decoded = round_trip(&envelope, true);

    assert_eq!(decoded.attachment_count(), 3);
    assert!(!decoded.has_attachment(0));
    assert_eq!(decoded.attachment(0), None);
    assert!(decoded.has_attachment(1));
    assert_eq!(decoded.attachment(1), Some(&[][..]));
    assert_eq!(decoded.attachment(2), Some(&[1u8, 2, 3][..]));
    assert_eq!(decoded, envelope);
}

#[test]
fn unspecified_type_rejected_unless_allowed() {
    let envelope = ProxyEnvelope::new(MessageType::Unspecified);

    let err = envelope.encode(false).expect_err("must fail");
    assert!(matches!(err, FlowgateError::Protocol(_)));

    envelope.encode(true).expect("allowed in diagnostic mode");
}

#[test]
fn truncated_buffers_error_without_panicking() {
    let mut envelope = ProxyEnvelope::new(MessageType::ConnectRequest);
    envelope.set_string_property("Endpoints", Some("1.1.1.1:555"));
    envelope.push_attachment(Some(vec![9; 32]));
    let encoded = envelope.encode(false).unwrap();

    for cut in 0..encoded.len() {
        let mut buf = Bytes::copy_from_slice(&encoded[..cut]);
        let result = ProxyEnvelope::decode(&mut buf);
        assert!(result.is_err(), "truncation at {cut} must error");
    }
}

#[test]
fn negative_counts_are_protocol_errors() {
    let mut raw = Vec::new();
    raw.extend_from_slice(&3i32.to_le_bytes());
    raw.extend_from_slice(&(-2i32).to_le_bytes());
    let err = ProxyEnvelope::decode(&mut Bytes::from(raw)).expect_err("must fail");
    assert!(matches!(err, FlowgateError::Protocol(_)));
}

#[test]
fn typed_properties_round_trip() {
    let mut envelope = ProxyEnvelope::new(MessageType::Unspecified);

    envelope.set_int_property("Int", -42);
    envelope.set_long_property("Long", 555_000_000_000);
    envelope.set_bool_property("Bool", true);
    envelope.set_double_property("Double", 3.5);
    envelope.set_timespan_property("Span", Duration::from_secs(30));
    let stamp = Utc.with_ymd_and_hms(2019, 7, 4, 12, 30, 45).unwrap();
    envelope.set_datetime_property("Stamp", stamp);
    envelope.set_bytes_property("Blob", Some(&[0xde, 0xad, 0xbe, 0xef]));

    let decoded = round_trip(&envelope, true);

    assert_eq!(decoded.int_property("Int", 0), -42);
    assert_eq!(decoded.long_property("Long", 0), 555_000_000_000);
    assert!(decoded.bool_property("Bool", false));
    assert_eq!(decoded.double_property("Double", 0.0), 3.5);
    assert_eq!(decoded.timespan_property("Span", Duration::ZERO), Duration::from_secs(30));
    assert_eq!(decoded.datetime_property("Stamp", Utc::now()), stamp);
    assert_eq!(
        decoded.bytes_property("Blob"),
        Some(vec![0xde, 0xad, 0xbe, 0xef])
    );
}

#[test]
fn duration_encodes_as_100ns_ticks() {
    let mut envelope = ProxyEnvelope::new(MessageType::Unspecified);
    envelope.set_timespan_property("Span", Duration::from_secs(30));
    // 30s = 300,000,000 ticks of 100ns
    assert_eq!(envelope.string_property("Span"), Some("300000000"));
}

#[test]
fn missing_and_malformed_values_yield_defaults() {
    let mut envelope = ProxyEnvelope::new(MessageType::Unspecified);
    envelope.set_string_property("Garbage", Some("not-a-number"));
    envelope.set_string_property("Nil", None);

    assert_eq!(envelope.int_property("Missing", 7), 7);
    assert_eq!(envelope.int_property("Garbage", 7), 7);
    assert_eq!(envelope.long_property("Nil", -1), -1);
    assert!(!envelope.bool_property("Garbage", false));
    assert_eq!(envelope.double_property("Garbage", 2.5), 2.5);
    assert_eq!(
        envelope.timespan_property("Missing", Duration::from_secs(9)),
        Duration::from_secs(9)
    );
    assert_eq!(envelope.bytes_property("Garbage!!!"), None);
    assert_eq!(envelope.json_property::<Vec<u32>>("Garbage"), None);
}

#[test]
fn negative_tick_counts_clamp_to_zero() {
    let mut envelope = ProxyEnvelope::new(MessageType::Unspecified);
    envelope.set_string_property("Span", Some("-500"));
    assert_eq!(
        envelope.timespan_property("Span", Duration::from_secs(1)),
        Duration::ZERO
    );
}
