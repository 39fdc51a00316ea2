//! Pending proxy-initiated operations awaiting a reply from the library.

use dashmap::DashMap;
use tokio::sync::oneshot;

use flowgate_core::message::{EngineError, ProxyMessage};
use flowgate_core::protocol::keys;

/// How a pending operation resolves: the decoded reply, or the structured
/// error the reply carried.
pub type OperationResult = Result<Box<dyn ProxyMessage>, EngineError>;

/// RequestId → settable pending-reply future.
///
/// An entry is created when the proxy sends a request to the library and
/// removed when the matching reply arrives, the operation is abandoned, or
/// the caller times out.
#[derive(Default)]
pub struct OperationsMap {
    ops: DashMap<i64, oneshot::Sender<OperationResult>>,
}

impl OperationsMap {
    pub fn new() -> Self {
        Self {
            ops: DashMap::new(),
        }
    }

    /// Register a pending operation under `request_id` and hand back the
    /// future its reply will resolve.
    pub fn add(&self, request_id: i64) -> oneshot::Receiver<OperationResult> {
        let (tx, rx) = oneshot::channel();
        self.ops.insert(request_id, tx);
        rx
    }

    /// Resolve the pending operation matching `reply`'s request id.
    ///
    /// Returns false when no operation is registered under that id — a
    /// peer/proxy desync the caller reports, not a crash condition.
    pub fn complete(&self, request_id: i64, reply: Box<dyn ProxyMessage>) -> bool {
        let Some((_, tx)) = self.ops.remove(&request_id) else {
            return false;
        };

        let result = match reply.envelope().json_property::<EngineError>(keys::ERROR) {
            Some(error) => Err(error),
            None => Ok(reply),
        };

        // The waiter may have timed out and dropped its receiver.
        let _ = tx.send(result);
        true
    }

    /// Abandon a pending operation without resolving it.
    pub fn remove(&self, request_id: i64) -> bool {
        self.ops.remove(&request_id).is_some()
    }

    pub fn contains(&self, request_id: i64) -> bool {
        self.ops.contains_key(&request_id)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
