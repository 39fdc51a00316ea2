//! End-to-end proxy flows over real HTTP.
//!
//! A stub "host library" server answers invoke callbacks the way the real
//! client library would: it receives proxy-initiated requests, and posts the
//! correlated reply back to the proxy as a separate exchange. Workflow and
//! activity types named `hold` are left pending so tests can exercise
//! contexts that stay alive.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::put;
use bytes::Bytes;

use flowgate_core::message::activity::{
    ActivityExecuteReply, ActivityExecuteRequest, ActivityInvokeReply, ActivityInvokeRequest,
    ActivityRegisterRequest,
};
use flowgate_core::message::client::{
    CancelReply, CancelRequest, ConnectReply, ConnectRequest, InitializeRequest, TerminateRequest,
};
use flowgate_core::message::workflow::{
    WorkflowCancelChildReply, WorkflowCancelChildRequest, WorkflowDescribeExecutionReply,
    WorkflowDescribeExecutionRequest, WorkflowExecuteChildReply, WorkflowExecuteChildRequest,
    WorkflowExecuteReply, WorkflowExecuteRequest, WorkflowInvokeReply, WorkflowInvokeRequest,
    WorkflowRegisterRequest, WorkflowStatus, WorkflowWaitForChildReply, WorkflowWaitForChildRequest,
};
use flowgate_core::message::{self, MessageRegistry, ProxyMessage, Reply, Request};
use flowgate_core::protocol::{MessageType, CONTENT_TYPE};
use flowgate_proxy::app_state::AppState;
use flowgate_proxy::{config, router};

const TEST_CONFIG: &str = r#"
version: 1
proxy:
  reply_timeout_secs: 5
engine:
  default_domain: "test-domain"
"#;

async fn start_proxy() -> (SocketAddr, AppState) {
    let cfg = config::load_from_str(TEST_CONFIG).unwrap();
    let state = AppState::new(cfg).unwrap();
    let app = router::build_router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, state)
}

/// Stub host library: replies to invoke callbacks unless the type is "hold".
async fn start_library_stub(proxy: SocketAddr) -> SocketAddr {
    let registry = Arc::new(MessageRegistry::with_builtin());
    let client = reqwest::Client::new();

    let app = axum::Router::new().route(
        "/",
        put(move |body: Bytes| {
            let registry = Arc::clone(&registry);
            let client = client.clone();
            async move {
                let inbound = message::deserialize(body, registry.as_ref()).unwrap();

                let reply: Option<Box<dyn ProxyMessage>> = if inbound.type_code()
                    == MessageType::WorkflowInvokeRequest.code()
                {
                    let request = inbound
                        .into_any()
                        .downcast::<WorkflowInvokeRequest>()
                        .unwrap();
                    if request.name() == Some("hold") {
                        None
                    } else {
                        let mut reply = WorkflowInvokeReply::new();
                        reply.set_request_id(request.request_id());
                        reply.set_context_id(request.context_id());
                        reply.set_result(Some(b"workflow-done"));
                        Some(Box::new(reply))
                    }
                } else if inbound.type_code() == MessageType::ActivityInvokeRequest.code() {
                    let request = inbound
                        .into_any()
                        .downcast::<ActivityInvokeRequest>()
                        .unwrap();
                    if request.activity() == Some("hold") {
                        None
                    } else {
                        let mut reply = ActivityInvokeReply::new();
                        reply.set_request_id(request.request_id());
                        reply.set_context_id(request.context_id());
                        reply.set_result(Some(b"activity-done"));
                        Some(Box::new(reply))
                    }
                } else {
                    None
                };

                if let Some(reply) = reply {
                    let body = message::serialize(reply.as_ref(), false).unwrap();
                    tokio::spawn(async move {
                        client
                            .put(format!("http://{proxy}/"))
                            .header("content-type", CONTENT_TYPE)
                            .body(body)
                            .send()
                            .await
                            .unwrap();
                    });
                }
                Vec::<u8>::new()
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn exchange(
    client: &reqwest::Client,
    addr: SocketAddr,
    message_ref: &dyn ProxyMessage,
) -> Vec<u8> {
    let body = message::serialize(message_ref, false).unwrap();
    let response = client
        .put(format!("http://{addr}/"))
        .header("content-type", CONTENT_TYPE)
        .body(body)
        .send()
        .await
        .unwrap();
    assert!(
        response.status().is_success(),
        "exchange failed: {}",
        response.status()
    );
    response.bytes().await.unwrap().to_vec()
}

fn decode<T: ProxyMessage>(bytes: Vec<u8>, registry: &MessageRegistry) -> Box<T> {
    message::deserialize(Bytes::from(bytes), registry)
        .unwrap()
        .into_any()
        .downcast::<T>()
        .unwrap()
}

/// Initialize + connect against a fresh proxy/stub pair; returns everything
/// a flow test needs.
async fn bootstrap() -> (reqwest::Client, SocketAddr, AppState, MessageRegistry) {
    let (proxy, state) = start_proxy().await;
    let library = start_library_stub(proxy).await;
    let client = reqwest::Client::new();
    let registry = MessageRegistry::with_builtin();

    let mut initialize = InitializeRequest::new();
    initialize.set_request_id(1);
    initialize.set_library_address(Some(&library.ip().to_string()));
    initialize.set_library_port(library.port() as i32);
    exchange(&client, proxy, &initialize).await;

    let mut connect = ConnectRequest::new();
    connect.set_request_id(2);
    connect.set_create_domain(true);
    let reply: Box<ConnectReply> = decode(exchange(&client, proxy, &connect).await, &registry);
    assert_eq!(reply.error(), None);
    assert_eq!(reply.request_id(), 2);

    (client, proxy, state, registry)
}

#[tokio::test(flavor = "multi_thread")]
async fn echo_round_trips_a_fully_populated_request() {
    let (proxy, _state) = start_proxy().await;
    let client = reqwest::Client::new();
    let registry = MessageRegistry::with_builtin();

    let mut request = ConnectRequest::new();
    request.set_request_id(555);
    request.set_endpoints(Some("1.1.1.1:555,2.2.2.2:5555"));
    request.set_identity(Some("my-identity"));
    request.set_client_timeout(Duration::from_secs(30));
    request.set_domain(Some("my-domain"));
    request.set_create_domain(true);
    request.set_retries(3);
    request.set_retry_delay(Duration::from_secs(30));

    let body = message::serialize(&request, false).unwrap();
    let response = client
        .put(format!("http://{proxy}/echo"))
        .header("content-type", CONTENT_TYPE)
        .body(body)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let echoed: Box<ConnectRequest> =
        decode(response.bytes().await.unwrap().to_vec(), &registry);
    assert_eq!(echoed.request_id(), 555);
    assert_eq!(echoed.endpoints(), Some("1.1.1.1:555,2.2.2.2:5555"));
    assert_eq!(echoed.identity(), Some("my-identity"));
    assert_eq!(echoed.client_timeout(), Duration::from_secs(30));
    assert_eq!(echoed.domain(), Some("my-domain"));
    assert!(echoed.create_domain());
    assert_eq!(echoed.retries(), 3);
    assert_eq!(echoed.retry_delay(), Duration::from_secs(30));
}

#[tokio::test(flavor = "multi_thread")]
async fn wrong_content_type_is_rejected_before_the_codec() {
    let (proxy, _state) = start_proxy().await;
    let client = reqwest::Client::new();

    let request = ConnectRequest::new();
    let body = message::serialize(&request, false).unwrap();
    let response = client
        .put(format!("http://{proxy}/"))
        .header("content-type", "text/plain")
        .body(body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test(flavor = "multi_thread")]
async fn wrong_method_is_rejected() {
    let (proxy, _state) = start_proxy().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{proxy}/"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 405);
}

#[tokio::test(flavor = "multi_thread")]
async fn cancel_for_unknown_operation_reports_not_cancelled() {
    let (client, proxy, _state, registry) = bootstrap().await;

    let mut cancel = CancelRequest::new();
    cancel.set_request_id(3);
    cancel.set_target_request_id(999);
    let reply: Box<CancelReply> = decode(exchange(&client, proxy, &cancel).await, &registry);
    assert!(!reply.was_cancelled());
}

#[tokio::test(flavor = "multi_thread")]
async fn workflow_executes_and_completes_through_the_invoke_loop() {
    let (client, proxy, state, registry) = bootstrap().await;

    let mut register = WorkflowRegisterRequest::new();
    register.set_request_id(3);
    register.set_name(Some("quick-flow"));
    exchange(&client, proxy, &register).await;

    let mut execute = WorkflowExecuteRequest::new();
    execute.set_request_id(4);
    execute.set_workflow(Some("quick-flow"));
    execute.set_args(Some(b"payload"));
    let reply: Box<WorkflowExecuteReply> =
        decode(exchange(&client, proxy, &execute).await, &registry);
    assert_eq!(reply.error(), None);
    assert!(reply.context_id() > 0);
    let execution = reply.execution().expect("execution handle");

    // The invoke loop completes the execution against the engine.
    let mut status = WorkflowStatus::Running;
    for _ in 0..50 {
        let mut describe = WorkflowDescribeExecutionRequest::new();
        describe.set_request_id(5);
        describe.set_workflow_id(Some(&execution.workflow_id));
        describe.set_run_id(Some(&execution.run_id));
        let reply: Box<WorkflowDescribeExecutionReply> =
            decode(exchange(&client, proxy, &describe).await, &registry);
        status = reply.details().expect("details").status;
        if status != WorkflowStatus::Running {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(status, WorkflowStatus::Completed);

    // Terminal contexts leave the table.
    for _ in 0..50 {
        if state.workflows().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(state.workflows().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn child_workflow_runs_in_the_parent_id_space() {
    let (client, proxy, _state, registry) = bootstrap().await;

    // Parent stays pending so its context outlives the child operations.
    let mut execute = WorkflowExecuteRequest::new();
    execute.set_request_id(3);
    execute.set_workflow(Some("hold"));
    let parent: Box<WorkflowExecuteReply> =
        decode(exchange(&client, proxy, &execute).await, &registry);
    assert_eq!(parent.error(), None);
    let parent_context = parent.context_id();

    let mut child = WorkflowExecuteChildRequest::new();
    child.set_request_id(4);
    child.set_context_id(parent_context);
    child.set_workflow(Some("child-flow"));
    let child_reply: Box<WorkflowExecuteChildReply> =
        decode(exchange(&client, proxy, &child).await, &registry);
    assert_eq!(child_reply.error(), None);
    assert_eq!(child_reply.child_id(), 1);
    assert!(child_reply.execution().is_some());

    let mut wait = WorkflowWaitForChildRequest::new();
    wait.set_request_id(5);
    wait.set_context_id(parent_context);
    wait.set_child_id(child_reply.child_id());
    let wait_reply: Box<WorkflowWaitForChildReply> =
        decode(exchange(&client, proxy, &wait).await, &registry);
    assert_eq!(wait_reply.error(), None);
    assert_eq!(wait_reply.result(), Some(b"workflow-done".to_vec()));
}

#[tokio::test(flavor = "multi_thread")]
async fn cancelling_a_child_is_idempotent() {
    let (client, proxy, _state, registry) = bootstrap().await;

    let mut execute = WorkflowExecuteRequest::new();
    execute.set_request_id(3);
    execute.set_workflow(Some("hold"));
    let parent: Box<WorkflowExecuteReply> =
        decode(exchange(&client, proxy, &execute).await, &registry);
    let parent_context = parent.context_id();

    let mut child = WorkflowExecuteChildRequest::new();
    child.set_request_id(4);
    child.set_context_id(parent_context);
    child.set_workflow(Some("hold"));
    let child_reply: Box<WorkflowExecuteChildReply> =
        decode(exchange(&client, proxy, &child).await, &registry);
    let child_id = child_reply.child_id();

    let mut cancel = WorkflowCancelChildRequest::new();
    cancel.set_request_id(5);
    cancel.set_context_id(parent_context);
    cancel.set_child_id(child_id);
    let reply: Box<WorkflowCancelChildReply> =
        decode(exchange(&client, proxy, &cancel).await, &registry);
    assert!(reply.was_cancelled());

    // The child entry is gone: cancelling again finds nothing.
    let mut cancel = WorkflowCancelChildRequest::new();
    cancel.set_request_id(6);
    cancel.set_context_id(parent_context);
    cancel.set_child_id(child_id);
    let reply: Box<WorkflowCancelChildReply> =
        decode(exchange(&client, proxy, &cancel).await, &registry);
    assert!(!reply.was_cancelled());
}

#[tokio::test(flavor = "multi_thread")]
async fn activity_executes_through_the_invoke_loop() {
    let (client, proxy, state, registry) = bootstrap().await;

    let mut execute = WorkflowExecuteRequest::new();
    execute.set_request_id(3);
    execute.set_workflow(Some("hold"));
    let parent: Box<WorkflowExecuteReply> =
        decode(exchange(&client, proxy, &execute).await, &registry);
    let parent_context = parent.context_id();

    let mut register = ActivityRegisterRequest::new();
    register.set_request_id(4);
    register.set_name(Some("send-email"));
    exchange(&client, proxy, &register).await;

    let mut activity = ActivityExecuteRequest::new();
    activity.set_request_id(5);
    activity.set_context_id(parent_context);
    activity.set_activity(Some("send-email"));
    activity.set_args(Some(b"to: someone"));
    let reply: Box<ActivityExecuteReply> =
        decode(exchange(&client, proxy, &activity).await, &registry);
    assert_eq!(reply.error(), None);
    assert_eq!(reply.result(), Some(b"activity-done".to_vec()));

    // Completed activity contexts leave the table.
    assert!(state.activities().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn cancellable_activity_aborts_on_cancel_request() {
    let (client, proxy, state, registry) = bootstrap().await;

    let mut execute = WorkflowExecuteRequest::new();
    execute.set_request_id(3);
    execute.set_workflow(Some("hold"));
    let parent: Box<WorkflowExecuteReply> =
        decode(exchange(&client, proxy, &execute).await, &registry);
    let parent_context = parent.context_id();

    // The stub never answers "hold" activities; only the cancel can finish
    // this exchange.
    let mut activity = ActivityExecuteRequest::new();
    activity.set_request_id(77);
    activity.set_context_id(parent_context);
    activity.set_activity(Some("hold"));
    activity.set_is_cancellable(true);

    let exec_client = client.clone();
    let body = message::serialize(&activity, false).unwrap();
    let pending = tokio::spawn(async move {
        exec_client
            .put(format!("http://{proxy}/"))
            .header("content-type", CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap()
            .to_vec()
    });

    // Wait for the cancellable registration to appear, then cancel it.
    for _ in 0..50 {
        if state.cancellables().contains(77) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(state.cancellables().contains(77));

    let mut cancel = CancelRequest::new();
    cancel.set_request_id(78);
    cancel.set_target_request_id(77);
    let cancel_reply: Box<CancelReply> =
        decode(exchange(&client, proxy, &cancel).await, &registry);
    assert!(cancel_reply.was_cancelled());

    let reply: Box<ActivityExecuteReply> = decode(pending.await.unwrap(), &registry);
    let error = reply.error().expect("cancelled outcome");
    assert_eq!(
        error.kind,
        flowgate_core::message::ErrorKind::Cancelled
    );
    assert!(!state.cancellables().contains(77));
}

#[tokio::test(flavor = "multi_thread")]
async fn terminate_starts_draining() {
    let (proxy, state) = start_proxy().await;
    let client = reqwest::Client::new();

    let ready = client
        .get(format!("http://{proxy}/readyz"))
        .send()
        .await
        .unwrap();
    assert_eq!(ready.status().as_u16(), 200);

    let mut terminate = TerminateRequest::new();
    terminate.set_request_id(1);
    exchange(&client, proxy, &terminate).await;
    assert!(state.is_draining());

    let ready = client
        .get(format!("http://{proxy}/readyz"))
        .send()
        .await
        .unwrap();
    assert_eq!(ready.status().as_u16(), 503);
}
