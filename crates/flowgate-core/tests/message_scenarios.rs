//! Message hierarchy scenarios: registry resolution, typed accessors,
//! clone independence, and full serialize→deserialize→reserialize loops.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use flowgate_core::error::FlowgateError;
use flowgate_core::message::client::{CancelRequest, ConnectReply, ConnectRequest};
use flowgate_core::message::workflow::{WorkflowExecuteRequest, WorkflowOptions};
use flowgate_core::message::{
    self, DecodeFamily, EngineError, ErrorKind, MessageRegistry, ProxyMessage, Reply, Request,
};
use flowgate_core::protocol::MessageType;

fn echo(message: &dyn ProxyMessage, registry: &MessageRegistry) -> Box<dyn ProxyMessage> {
    let bytes = message::serialize(message, false).expect("serialize");
    message::deserialize(Bytes::from(bytes), registry).expect("deserialize")
}

#[test]
fn connect_request_round_trip() {
    let registry = MessageRegistry::with_builtin();

    let request = ConnectRequest::new();
    assert_eq!(request.reply_type(), MessageType::ConnectReply);

    // Defaults before any property is set.
    let decoded = echo(&request, &registry);
    let decoded = decoded.into_any().downcast::<ConnectRequest>().unwrap();
    assert_eq!(decoded.request_id(), 0);
    assert_eq!(decoded.endpoints(), None);
    assert_eq!(decoded.identity(), None);
    assert_eq!(decoded.client_timeout(), Duration::ZERO);
    assert!(!decoded.create_domain());
    assert_eq!(decoded.domain(), None);
    assert_eq!(decoded.retries(), 0);
    assert_eq!(decoded.retry_delay(), Duration::ZERO);

    // Round-trip with every field populated.
    let mut request = *decoded;
    request.set_request_id(555);
    request.set_endpoints(Some("1.1.1.1:555,2.2.2.2:5555"));
    request.set_identity(Some("my-identity"));
    request.set_client_timeout(Duration::from_secs(30));
    request.set_domain(Some("my-domain"));
    request.set_create_domain(true);
    request.set_retries(3);
    request.set_retry_delay(Duration::from_secs(30));

    let decoded = echo(&request, &registry);
    let decoded = decoded.into_any().downcast::<ConnectRequest>().unwrap();
    assert_eq!(decoded.request_id(), 555);
    assert_eq!(decoded.endpoints(), Some("1.1.1.1:555,2.2.2.2:5555"));
    assert_eq!(decoded.identity(), Some("my-identity"));
    assert_eq!(decoded.client_timeout(), Duration::from_secs(30));
    assert_eq!(decoded.domain(), Some("my-domain"));
    assert!(decoded.create_domain());
    assert_eq!(decoded.retries(), 3);
    assert_eq!(decoded.retry_delay(), Duration::from_secs(30));

    // Re-serializing the deserialized copy must still match.
    let again = echo(decoded.as_ref(), &registry);
    let again = again.into_any().downcast::<ConnectRequest>().unwrap();
    assert_eq!(again.request_id(), 555);
    assert_eq!(again.endpoints(), Some("1.1.1.1:555,2.2.2.2:5555"));
    assert_eq!(again.client_timeout(), Duration::from_secs(30));
    assert!(again.create_domain());
    assert_eq!(again.retries(), 3);
}

#[test]
fn reply_error_round_trip() {
    let registry = MessageRegistry::with_builtin();

    let mut reply = ConnectReply::new();
    assert_eq!(reply.error(), None);

    reply.set_request_id(555);
    let error = EngineError::new(ErrorKind::Custom, "foo").with_stack_trace("at bar()");
    reply.set_error(&error).unwrap();

    let decoded = echo(&reply, &registry);
    let decoded = decoded.into_any().downcast::<ConnectReply>().unwrap();
    assert!(decoded.is_reply());
    assert_eq!(decoded.request_id(), 555);
    assert_eq!(decoded.error(), Some(error));
}

#[test]
fn unknown_type_code_is_rejected() {
    let registry = MessageRegistry::with_builtin();

    let mut raw = Vec::new();
    raw.extend_from_slice(&999i32.to_le_bytes());
    raw.extend_from_slice(&0i32.to_le_bytes());
    raw.extend_from_slice(&0i32.to_le_bytes());

    let err = message::deserialize(Bytes::from(raw), &registry).expect_err("must fail");
    match err {
        FlowgateError::UnknownType(code) => assert_eq!(code, 999),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn registry_bypass_builds_generic_family() {
    // Empty registry: nothing resolvable, but the diagnostic bypass still
    // carries the raw envelope through.
    let registry = MessageRegistry::new();

    let mut raw = Vec::new();
    raw.extend_from_slice(&999i32.to_le_bytes());
    raw.extend_from_slice(&0i32.to_le_bytes());
    raw.extend_from_slice(&0i32.to_le_bytes());

    let message = message::deserialize_with(
        Bytes::from(raw),
        &registry,
        true,
        DecodeFamily::Message,
    )
    .expect("bypass decode");
    assert_eq!(message.type_code(), 999);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct RetryPolicy {
    attempts: u32,
    backoff_secs: u64,
}

#[test]
fn generic_envelope_scenario() {
    let registry = MessageRegistry::new();

    let mut raw = flowgate_core::protocol::ProxyEnvelope::new(MessageType::Unspecified);
    raw.set_string_property("One", Some("1"));
    raw.set_string_property("Two", Some("2"));
    raw.set_string_property("Empty", Some(""));
    raw.set_string_property("Nil", None);
    let policy = RetryPolicy {
        attempts: 3,
        backoff_secs: 30,
    };
    raw.set_json_property("Policy", &policy).unwrap();
    raw.push_attachment(Some(vec![5, 6, 7]));
    raw.push_attachment(Some(Vec::new()));
    raw.push_attachment(None);

    let bytes = raw.encode(true).expect("unspecified allowed");
    let message = message::deserialize_with(
        Bytes::from(bytes),
        &registry,
        true,
        DecodeFamily::Message,
    )
    .expect("decode");

    let envelope = message.envelope();
    assert_eq!(envelope.string_property("One"), Some("1"));
    assert_eq!(envelope.string_property("Two"), Some("2"));
    assert_eq!(envelope.string_property("Empty"), Some(""));
    assert!(envelope.has_property("Nil"));
    assert_eq!(envelope.string_property("Nil"), None);
    assert_eq!(envelope.json_property::<RetryPolicy>("Policy"), Some(policy));
    assert_eq!(envelope.attachment_count(), 3);
    assert_eq!(envelope.attachment(0), Some(&[5u8, 6, 7][..]));
    assert_eq!(envelope.attachment(1), Some(&[][..]));
    assert_eq!(envelope.attachment(2), None);
}

#[test]
fn clone_is_deeply_independent() {
    let mut original = WorkflowExecuteRequest::new();
    original.set_request_id(7);
    original.set_workflow(Some("order-flow"));
    original.set_args(Some(&[1, 2, 3]));
    original
        .set_options(&WorkflowOptions {
            workflow_id: Some("wf-1".into()),
            task_list: None,
            execution_timeout_ticks: 0,
        })
        .unwrap();

    let mut clone = original.clone_boxed();
    clone.set_request_id(99);
    clone
        .envelope_mut()
        .set_string_property("Workflow", Some("mutated"));
    clone.envelope_mut().set_bytes_property("Args", None);

    assert_eq!(original.request_id(), 7);
    assert_eq!(original.workflow(), Some("order-flow"));
    assert_eq!(original.args(), Some(vec![1, 2, 3]));
    assert_eq!(
        original.options().unwrap().workflow_id.as_deref(),
        Some("wf-1")
    );

    assert_eq!(clone.request_id(), 99);
}

#[test]
fn registry_produces_independent_instances() {
    let registry = MessageRegistry::with_builtin();

    let mut first = registry
        .produce(MessageType::CancelRequest.code())
        .unwrap();
    let second = registry
        .produce(MessageType::CancelRequest.code())
        .unwrap();

    first.set_request_id(42);
    first
        .envelope_mut()
        .set_long_property("TargetRequestId", 41);

    assert_eq!(second.request_id(), 0);
    assert!(!second.envelope().has_property("TargetRequestId"));

    let first = first.into_any().downcast::<CancelRequest>().unwrap();
    assert_eq!(first.target_request_id(), 41);
}

#[test]
fn every_registered_request_pairs_with_its_reply() {
    let registry = MessageRegistry::with_builtin();
    let mut codes = registry.registered_types();
    codes.sort_unstable();
    assert_eq!(codes.len(), 48);

    for code in codes {
        let message = registry.produce(code).unwrap();
        assert_eq!(message.type_code(), code);

        // Every produced message must survive an empty round trip.
        let bytes = message::serialize(message.as_ref(), false).unwrap();
        let decoded = message::deserialize(Bytes::from(bytes), &registry).unwrap();
        assert_eq!(decoded.type_code(), code);
    }
}
