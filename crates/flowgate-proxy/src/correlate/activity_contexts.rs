//! Live activity execution contexts.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

/// One live activity invocation.
///
/// Holds the engine's opaque task token so completion and heartbeats can be
/// routed back, and the parent workflow context id for diagnostics.
pub struct ActivityContext {
    task_token: Vec<u8>,
    activity_type: String,
    workflow_context_id: i64,
}

impl ActivityContext {
    pub fn new(task_token: Vec<u8>, activity_type: String, workflow_context_id: i64) -> Self {
        Self {
            task_token,
            activity_type,
            workflow_context_id,
        }
    }

    pub fn task_token(&self) -> &[u8] {
        &self.task_token
    }

    pub fn activity_type(&self) -> &str {
        &self.activity_type
    }

    pub fn workflow_context_id(&self) -> i64 {
        self.workflow_context_id
    }
}

/// ContextId → live activity context. Same shape as the workflow table with
/// an independent id space.
#[derive(Default)]
pub struct ActivityContextsMap {
    contexts: DashMap<i64, Arc<ActivityContext>>,
    next_id: AtomicI64,
}

impl ActivityContextsMap {
    pub fn new() -> Self {
        Self {
            contexts: DashMap::new(),
            next_id: AtomicI64::new(0),
        }
    }

    /// Mint the next activity context id (pre-incrementing, never reused).
    pub fn next_context_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn add(&self, context_id: i64, context: Arc<ActivityContext>) -> i64 {
        self.contexts.insert(context_id, context);
        context_id
    }

    pub fn get(&self, context_id: i64) -> Option<Arc<ActivityContext>> {
        self.contexts.get(&context_id).map(|e| Arc::clone(e.value()))
    }

    pub fn remove(&self, context_id: i64) -> Option<Arc<ActivityContext>> {
        self.contexts.remove(&context_id).map(|(_, ctx)| ctx)
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}
