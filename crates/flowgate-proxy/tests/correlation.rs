//! Correlation table properties: id uniqueness under race, at-most-once
//! cancellation, and reply resolution.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use flowgate_core::message::client::ConnectReply;
use flowgate_core::message::{EngineError, ErrorKind, ProxyMessage, Reply};
use flowgate_proxy::correlate::{
    ActivityContextsMap, CancellablesMap, ChildContextsMap, OperationsMap, WorkflowContextsMap,
};

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn context_ids_are_unique_and_gapless_under_race() {
    const TASKS: usize = 32;
    const MINTS_PER_TASK: usize = 200;

    let map = Arc::new(WorkflowContextsMap::new());
    let mut handles = Vec::new();
    for _ in 0..TASKS {
        let map = Arc::clone(&map);
        handles.push(tokio::spawn(async move {
            (0..MINTS_PER_TASK)
                .map(|_| map.next_context_id())
                .collect::<Vec<_>>()
        }));
    }

    let mut all = Vec::new();
    for handle in handles {
        let ids = handle.await.unwrap();
        // Each minter sees its own sequence strictly increase.
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        all.extend(ids);
    }

    all.sort_unstable();
    let expected: Vec<i64> = (1..=(TASKS * MINTS_PER_TASK) as i64).collect();
    assert_eq!(all, expected, "no duplicates, no gaps");
}

#[test]
fn independent_id_spaces_start_at_one() {
    assert_eq!(WorkflowContextsMap::new().next_context_id(), 1);
    assert_eq!(ActivityContextsMap::new().next_context_id(), 1);
    assert_eq!(ChildContextsMap::new().next_child_id(), 1);
}

#[test]
fn cancel_of_live_registration_fires_once() {
    let map = CancellablesMap::new();
    let fired = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&fired);
    map.add(
        42,
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );

    assert!(map.cancel(42), "live registration must report WasCancelled");
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    // id 42 is gone: a second cancel finds nothing.
    assert!(!map.cancel(42));
    assert!(!map.contains(42));
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn cancel_after_completion_reports_not_cancelled() {
    let map = CancellablesMap::new();
    let fired = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&fired);
    map.add(
        7,
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );

    // Operation completes normally before the cancel arrives.
    assert!(map.remove(7));
    assert!(!map.cancel(7), "already completed: not cancelled");
    assert_eq!(fired.load(Ordering::SeqCst), 0, "callback never ran");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn racing_cancels_fire_the_callback_exactly_once() {
    for _ in 0..100 {
        let map = Arc::new(CancellablesMap::new());
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        map.add(
            1,
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        let mut handles = Vec::new();
        for _ in 0..8 {
            let map = Arc::clone(&map);
            handles.push(tokio::spawn(async move { map.cancel(1) }));
        }

        let mut won = 0;
        for handle in handles {
            if handle.await.unwrap() {
                won += 1;
            }
        }
        assert_eq!(won, 1, "exactly one cancel wins");
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}

#[tokio::test]
async fn reply_resolves_pending_operation() {
    let ops = OperationsMap::new();
    let rx = ops.add(5);
    assert!(ops.contains(5));

    let mut reply = ConnectReply::new();
    reply.set_request_id(5);
    assert!(ops.complete(5, Box::new(reply)));
    assert!(!ops.contains(5));

    let resolved = rx.await.unwrap().expect("success reply");
    assert_eq!(resolved.request_id(), 5);
}

#[tokio::test]
async fn reply_with_error_resolves_to_the_engine_error() {
    let ops = OperationsMap::new();
    let rx = ops.add(6);

    let mut reply = ConnectReply::new();
    reply.set_request_id(6);
    reply
        .set_error(&EngineError::new(ErrorKind::Custom, "boom"))
        .unwrap();
    assert!(ops.complete(6, Box::new(reply)));

    let err = rx.await.unwrap().expect_err("error reply");
    assert_eq!(err.kind, ErrorKind::Custom);
    assert_eq!(err.message, "boom");
}

#[test]
fn reply_for_unknown_id_is_reported_not_fatal() {
    let ops = OperationsMap::new();
    let reply = ConnectReply::new();
    assert!(!ops.complete(12345, Box::new(reply)));
}
