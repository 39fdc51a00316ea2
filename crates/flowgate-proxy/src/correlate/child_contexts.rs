//! Child workflow contexts, scoped per parent workflow context.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared};

use flowgate_core::message::workflow::WorkflowExecution;
use flowgate_core::message::EngineError;

use crate::correlate::cancellables::CancelFn;

/// Terminal outcome of a child execution.
pub type ChildResult = Result<Option<Vec<u8>>, EngineError>;

/// One child workflow spawned by a parent context.
///
/// Holds the engine execution handle, a shareable future for the child's
/// eventual result (multiple waiters may race on it), and a one-shot cancel
/// handle.
pub struct ChildContext {
    execution: WorkflowExecution,
    future: Shared<BoxFuture<'static, ChildResult>>,
    cancel: Mutex<Option<CancelFn>>,
}

impl ChildContext {
    pub fn new(
        execution: WorkflowExecution,
        future: BoxFuture<'static, ChildResult>,
        cancel: CancelFn,
    ) -> Self {
        Self {
            execution,
            future: future.shared(),
            cancel: Mutex::new(Some(cancel)),
        }
    }

    pub fn execution(&self) -> &WorkflowExecution {
        &self.execution
    }

    /// A clone of the child's result future. Awaiting it does not consume
    /// the context.
    pub fn result(&self) -> Shared<BoxFuture<'static, ChildResult>> {
        self.future.clone()
    }

    /// Fire the cancel handle. Returns false when the child was already
    /// cancelled; the handle can never fire twice.
    pub fn cancel(&self) -> bool {
        let taken = self.cancel.lock().ok().and_then(|mut slot| slot.take());
        match taken {
            Some(cancel) => {
                cancel();
                true
            }
            None => false,
        }
    }
}

/// ChildId → child context. Each parent workflow context owns one of these,
/// giving concurrent children of the same parent an independent id space.
#[derive(Default)]
pub struct ChildContextsMap {
    children: DashMap<i64, Arc<ChildContext>>,
    next_id: AtomicI64,
}

impl ChildContextsMap {
    pub fn new() -> Self {
        Self {
            children: DashMap::new(),
            next_id: AtomicI64::new(0),
        }
    }

    /// Mint the next child id (pre-incrementing, never reused).
    pub fn next_child_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn add(&self, child_id: i64, child: Arc<ChildContext>) -> i64 {
        self.children.insert(child_id, child);
        child_id
    }

    pub fn get(&self, child_id: i64) -> Option<Arc<ChildContext>> {
        self.children.get(&child_id).map(|e| Arc::clone(e.value()))
    }

    pub fn remove(&self, child_id: i64) -> Option<Arc<ChildContext>> {
        self.children.remove(&child_id).map(|(_, child)| child)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
