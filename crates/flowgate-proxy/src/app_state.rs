//! Shared application state for the flowgate proxy.
//!
//! Built once at startup: config, message registry, dispatcher with the
//! built-in handlers, the five correlation tables, the outbound library
//! client, and the engine slot populated by `ConnectRequest`.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use dashmap::DashSet;
use tokio::sync::Notify;

use flowgate_core::error::{FlowgateError, Result};
use flowgate_core::message::{self, EngineError, MessageRegistry, ProxyMessage};

use crate::config::ProxyConfig;
use crate::correlate::{
    ActivityContextsMap, CancellablesMap, OperationsMap, WorkflowContextsMap,
};
use crate::dispatch::Dispatcher;
use crate::engine::EngineClient;
use crate::handlers;
use crate::library::LibraryClient;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Removes a pending operation when its waiter goes away. Removal after a
/// normal completion is a no-op (the entry is already gone).
struct OperationGuard<'a> {
    operations: &'a OperationsMap,
    request_id: i64,
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.operations.remove(self.request_id);
    }
}

struct AppStateInner {
    cfg: ProxyConfig,
    registry: MessageRegistry,
    dispatcher: Dispatcher,

    operations: OperationsMap,
    cancellables: CancellablesMap,
    workflows: WorkflowContextsMap,
    activities: ActivityContextsMap,

    library: LibraryClient,
    engine: RwLock<Option<Arc<dyn EngineClient>>>,

    workflow_types: DashSet<String>,
    activity_types: DashSet<String>,

    next_request_id: AtomicI64,
    draining: AtomicBool,
    shutdown: Notify,
}

impl AppState {
    /// Build application state. Returns Result so main can handle errors
    /// gracefully (no panic).
    pub fn new(cfg: ProxyConfig) -> Result<Self> {
        let registry = MessageRegistry::with_builtin();

        let dispatcher = Dispatcher::new();
        handlers::register_builtin(&dispatcher);

        // dispatcher <-> registry sanity check: a handler for a type the
        // registry cannot produce would never be reachable.
        for code in dispatcher.registered_types() {
            if !registry.is_registered(code) {
                return Err(FlowgateError::Internal(format!(
                    "handler registered for unknown message type {code}"
                )));
            }
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                registry,
                dispatcher,
                operations: OperationsMap::new(),
                cancellables: CancellablesMap::new(),
                workflows: WorkflowContextsMap::new(),
                activities: ActivityContextsMap::new(),
                library: LibraryClient::new()?,
                engine: RwLock::new(None),
                workflow_types: DashSet::new(),
                activity_types: DashSet::new(),
                next_request_id: AtomicI64::new(0),
                draining: AtomicBool::new(false),
                shutdown: Notify::new(),
            }),
        })
    }

    pub fn cfg(&self) -> &ProxyConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &MessageRegistry {
        &self.inner.registry
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner.dispatcher
    }

    pub fn operations(&self) -> &OperationsMap {
        &self.inner.operations
    }

    pub fn cancellables(&self) -> &CancellablesMap {
        &self.inner.cancellables
    }

    pub fn workflows(&self) -> &WorkflowContextsMap {
        &self.inner.workflows
    }

    pub fn activities(&self) -> &ActivityContextsMap {
        &self.inner.activities
    }

    pub fn library(&self) -> &LibraryClient {
        &self.inner.library
    }

    pub fn workflow_types(&self) -> &DashSet<String> {
        &self.inner.workflow_types
    }

    pub fn activity_types(&self) -> &DashSet<String> {
        &self.inner.activity_types
    }

    /// The connected engine client, or a correlation-style error when
    /// `ConnectRequest` has not been processed yet.
    pub fn engine(&self) -> Result<Arc<dyn EngineClient>> {
        self.inner
            .engine
            .read()
            .ok()
            .and_then(|slot| slot.clone())
            .ok_or_else(|| FlowgateError::Engine("engine not connected".into()))
    }

    pub fn set_engine(&self, engine: Arc<dyn EngineClient>) {
        if let Ok(mut slot) = self.inner.engine.write() {
            *slot = Some(engine);
        }
    }

    /// Mint the next outbound request id (pre-incrementing, never reused).
    pub fn next_request_id(&self) -> i64 {
        self.inner.next_request_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn reply_timeout(&self) -> Duration {
        Duration::from_secs(self.inner.cfg.proxy.reply_timeout_secs)
    }

    /// Send a request to the library and wait for its correlated reply.
    ///
    /// All failure modes collapse into `EngineError` so callers can embed
    /// them into the reply they owe their own peer. The operation record is
    /// dropped on every exit path, including the caller being cancelled
    /// mid-wait.
    pub async fn call_library(
        &self,
        mut request: Box<dyn ProxyMessage>,
    ) -> std::result::Result<Box<dyn ProxyMessage>, EngineError> {
        let request_id = self.next_request_id();
        request.set_request_id(request_id);

        let rx = self.operations().add(request_id);
        let _guard = OperationGuard {
            operations: self.operations(),
            request_id,
        };

        let body = message::serialize(request.as_ref(), false)
            .map_err(|e| EngineError::generic(format!("encode failed: {e}")))?;

        self.library()
            .send(body)
            .await
            .map_err(|e| EngineError::generic(e.to_string()))?;

        match tokio::time::timeout(self.reply_timeout(), rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(EngineError::generic("reply channel dropped")),
            Err(_) => Err(EngineError::generic(format!(
                "no reply from library within {:?}",
                self.reply_timeout()
            ))),
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle

    pub fn is_draining(&self) -> bool {
        self.inner.draining.load(Ordering::Relaxed)
    }

    /// Flip the draining flag and wake the shutdown waiter.
    pub fn begin_drain(&self) {
        self.inner.draining.store(true, Ordering::Relaxed);
        self.inner.shutdown.notify_waiters();
    }

    /// Resolves once a TerminateRequest has been accepted.
    pub async fn shutdown_requested(&self) {
        if self.is_draining() {
            return;
        }
        self.inner.shutdown.notified().await;
    }
}
