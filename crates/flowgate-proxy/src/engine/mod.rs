//! Workflow-engine client interface.
//!
//! The proxy consumes the engine through this narrow async trait only; the
//! engine's durability, history replay, and task scheduling are someone
//! else's problem. A production deployment substitutes an SDK-backed
//! implementation; [`local::LocalEngine`] is the in-process one used by the
//! shipped binary and the handler tests.

pub mod local;

use std::time::Duration;

use async_trait::async_trait;

use flowgate_core::message::activity::ActivityOptions;
use flowgate_core::message::workflow::{WorkflowDescription, WorkflowExecution, WorkflowOptions};
use flowgate_core::message::EngineError;

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Connection settings resolved from config defaults plus the
/// `ConnectRequest` overrides.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Comma-separated `host:port` pairs for the engine cluster.
    pub endpoints: String,
    /// Worker identity reported to the cluster.
    pub identity: String,
    /// Default domain for operations that do not name one.
    pub default_domain: Option<String>,
    /// Per-call timeout for engine operations.
    pub client_timeout: Duration,
}

/// Domain metadata returned by describe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainInfo {
    pub name: String,
    pub description: Option<String>,
    pub owner_email: Option<String>,
    pub status: String,
}

/// The request/response surface the proxy needs from the engine.
#[async_trait]
pub trait EngineClient: Send + Sync {
    /// The settings this client was connected with.
    fn settings(&self) -> &EngineSettings;

    async fn register_domain(
        &self,
        name: &str,
        description: Option<&str>,
        owner_email: Option<&str>,
        retention_days: i32,
    ) -> EngineResult<()>;

    async fn describe_domain(&self, name: &str) -> EngineResult<DomainInfo>;

    async fn start_workflow(
        &self,
        domain: &str,
        workflow_type: &str,
        args: Option<Vec<u8>>,
        options: WorkflowOptions,
    ) -> EngineResult<WorkflowExecution>;

    async fn signal_workflow(
        &self,
        domain: &str,
        workflow_id: &str,
        run_id: &str,
        signal_name: &str,
        args: Option<Vec<u8>>,
    ) -> EngineResult<()>;

    async fn cancel_workflow(&self, domain: &str, workflow_id: &str, run_id: &str)
        -> EngineResult<()>;

    async fn terminate_workflow(
        &self,
        domain: &str,
        workflow_id: &str,
        run_id: &str,
        reason: Option<&str>,
        details: Option<Vec<u8>>,
    ) -> EngineResult<()>;

    async fn describe_workflow(
        &self,
        domain: &str,
        workflow_id: &str,
        run_id: &str,
    ) -> EngineResult<WorkflowDescription>;

    /// Block until the execution reaches a terminal state and yield its
    /// result. Cancellation and termination surface as `Err`.
    async fn await_workflow(
        &self,
        domain: &str,
        workflow_id: &str,
        run_id: &str,
    ) -> EngineResult<Option<Vec<u8>>>;

    /// Record the terminal outcome of an execution (the proxy calls this
    /// after the library's workflow code finishes).
    async fn complete_workflow(
        &self,
        domain: &str,
        workflow_id: &str,
        run_id: &str,
        result: EngineResult<Option<Vec<u8>>>,
    ) -> EngineResult<()>;

    /// Schedule an activity task, returning its opaque task token.
    async fn schedule_activity(
        &self,
        domain: &str,
        activity_type: &str,
        options: ActivityOptions,
    ) -> EngineResult<Vec<u8>>;

    async fn complete_activity(
        &self,
        task_token: &[u8],
        result: EngineResult<Option<Vec<u8>>>,
    ) -> EngineResult<()>;

    async fn record_heartbeat(
        &self,
        task_token: &[u8],
        details: Option<Vec<u8>>,
    ) -> EngineResult<()>;
}
