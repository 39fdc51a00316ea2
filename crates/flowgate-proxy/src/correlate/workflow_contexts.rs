//! Live workflow execution contexts.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use flowgate_core::message::workflow::WorkflowExecution;

use crate::correlate::child_contexts::ChildContextsMap;

/// One live workflow execution scope.
///
/// Created when a `WorkflowExecuteRequest` establishes the scope and removed
/// when the scope's disconnect request or terminal reply is processed. Child
/// workflows spawned by this execution live in the embedded
/// [`ChildContextsMap`] with their own id space.
pub struct WorkflowContext {
    execution: WorkflowExecution,
    domain: String,
    workflow_type: String,
    children: ChildContextsMap,
}

impl WorkflowContext {
    pub fn new(execution: WorkflowExecution, domain: String, workflow_type: String) -> Self {
        Self {
            execution,
            domain,
            workflow_type,
            children: ChildContextsMap::new(),
        }
    }

    pub fn execution(&self) -> &WorkflowExecution {
        &self.execution
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn workflow_type(&self) -> &str {
        &self.workflow_type
    }

    pub fn children(&self) -> &ChildContextsMap {
        &self.children
    }
}

/// ContextId → live workflow context, plus the process-wide context id mint.
#[derive(Default)]
pub struct WorkflowContextsMap {
    contexts: DashMap<i64, Arc<WorkflowContext>>,
    next_id: AtomicI64,
}

impl WorkflowContextsMap {
    pub fn new() -> Self {
        Self {
            contexts: DashMap::new(),
            next_id: AtomicI64::new(0),
        }
    }

    /// Mint the next context id. Pre-incrementing from zero, so the first id
    /// is 1; ids strictly increase for the process lifetime and are never
    /// reused.
    pub fn next_context_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn add(&self, context_id: i64, context: Arc<WorkflowContext>) -> i64 {
        self.contexts.insert(context_id, context);
        context_id
    }

    pub fn get(&self, context_id: i64) -> Option<Arc<WorkflowContext>> {
        self.contexts.get(&context_id).map(|e| Arc::clone(e.value()))
    }

    pub fn remove(&self, context_id: i64) -> Option<Arc<WorkflowContext>> {
        self.contexts.remove(&context_id).map(|(_, ctx)| ctx)
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}
