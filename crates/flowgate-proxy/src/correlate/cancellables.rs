//! In-flight cancellable operations.

use dashmap::DashMap;

/// Callback aborting one in-flight operation. Invoked at most once.
pub type CancelFn = Box<dyn FnOnce() + Send + Sync>;

/// RequestId → cancel callback.
///
/// An entry is created when a cancellable request begins executing and
/// removed either by a `CancelRequest` naming the id (which invokes the
/// callback) or on normal completion (which discards it). Removal and
/// invocation are a single atomic step, so a cancel racing a completion can
/// never fire the callback twice.
#[derive(Default)]
pub struct CancellablesMap {
    map: DashMap<i64, CancelFn>,
}

impl CancellablesMap {
    pub fn new() -> Self {
        Self {
            map: DashMap::new(),
        }
    }

    pub fn add(&self, request_id: i64, cancel: CancelFn) {
        self.map.insert(request_id, cancel);
    }

    /// Invoke and remove the callback registered under `request_id`.
    ///
    /// Returns whether a cancellable operation was actually found — false
    /// means the operation already completed or was never cancellable.
    pub fn cancel(&self, request_id: i64) -> bool {
        match self.map.remove(&request_id) {
            Some((_, cancel)) => {
                cancel();
                true
            }
            None => false,
        }
    }

    /// Discard the registration without invoking it (normal completion).
    pub fn remove(&self, request_id: i64) -> bool {
        self.map.remove(&request_id).is_some()
    }

    pub fn contains(&self, request_id: i64) -> bool {
        self.map.contains_key(&request_id)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
