//! Correlation tables and context lifecycle.
//!
//! Five independent concurrent maps, each safe for unsynchronized access
//! from many in-flight request handlers:
//!
//! - [`OperationsMap`]: RequestId → pending-reply future
//! - [`CancellablesMap`]: RequestId → cancel callback
//! - [`WorkflowContextsMap`]: ContextId → workflow execution context
//! - [`ActivityContextsMap`]: ContextId → activity execution context
//! - [`ChildContextsMap`]: ChildId → child execution (per parent context)
//!
//! Every cross-reference between the proxy and the peer is by integer id
//! through one of these tables, never a direct object reference — the peer
//! only ever communicates ids. Id counters are pre-incrementing and only
//! ever increase for the process lifetime, so a stale reply can never land
//! on a recycled context.

pub mod activity_contexts;
pub mod cancellables;
pub mod child_contexts;
pub mod operations;
pub mod workflow_contexts;

pub use activity_contexts::{ActivityContext, ActivityContextsMap};
pub use cancellables::{CancelFn, CancellablesMap};
pub use child_contexts::{ChildContext, ChildContextsMap, ChildResult};
pub use operations::{OperationResult, OperationsMap};
pub use workflow_contexts::{WorkflowContext, WorkflowContextsMap};
