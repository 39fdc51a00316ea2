//! In-process engine implementation.
//!
//! Tracks domains, executions, and activity tasks in concurrent maps with
//! watch channels for terminal outcomes. Good enough to run the proxy
//! end-to-end and to drive the handler tests; it makes no durability
//! promises.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::watch;

use flowgate_core::message::activity::ActivityOptions;
use flowgate_core::message::workflow::{
    WorkflowDescription, WorkflowExecution, WorkflowOptions, WorkflowStatus,
};
use flowgate_core::message::EngineError;

use crate::engine::{DomainInfo, EngineClient, EngineResult, EngineSettings};

type Outcome = EngineResult<Option<Vec<u8>>>;

struct ExecutionState {
    workflow_type: String,
    execution: WorkflowExecution,
    status: Mutex<WorkflowStatus>,
    outcome: watch::Sender<Option<Outcome>>,
    signals: Mutex<Vec<(String, Option<Vec<u8>>)>>,
}

impl ExecutionState {
    /// Move to a terminal state. First writer wins; later transitions are
    /// ignored so cancel/complete races stay quiet.
    fn close(&self, status: WorkflowStatus, outcome: Outcome) {
        let Ok(mut current) = self.status.lock() else {
            return;
        };
        if *current != WorkflowStatus::Running {
            return;
        }
        *current = status;
        let _ = self.outcome.send(Some(outcome));
    }

    fn status(&self) -> WorkflowStatus {
        self.status
            .lock()
            .map(|s| *s)
            .unwrap_or(WorkflowStatus::Running)
    }
}

struct ActivityState {
    activity_type: String,
    outcome: watch::Sender<Option<Outcome>>,
    heartbeats: Mutex<Vec<Option<Vec<u8>>>>,
}

/// DashMap-backed engine living inside the proxy process.
pub struct LocalEngine {
    settings: EngineSettings,
    domains: DashMap<String, DomainInfo>,
    executions: DashMap<String, Arc<ExecutionState>>,
    activities: DashMap<Vec<u8>, Arc<ActivityState>>,
    seq: AtomicU64,
}

impl LocalEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            domains: DashMap::new(),
            executions: DashMap::new(),
            activities: DashMap::new(),
            seq: AtomicU64::new(0),
        }
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn execution_key(workflow_id: &str, run_id: &str) -> String {
        format!("{workflow_id}/{run_id}")
    }

    fn execution(&self, workflow_id: &str, run_id: &str) -> EngineResult<Arc<ExecutionState>> {
        self.executions
            .get(&Self::execution_key(workflow_id, run_id))
            .map(|e| Arc::clone(e.value()))
            .ok_or_else(|| {
                EngineError::generic(format!("unknown execution {workflow_id}/{run_id}"))
            })
    }
}

#[async_trait]
impl EngineClient for LocalEngine {
    fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    async fn register_domain(
        &self,
        name: &str,
        description: Option<&str>,
        owner_email: Option<&str>,
        _retention_days: i32,
    ) -> EngineResult<()> {
        if name.is_empty() {
            return Err(EngineError::custom("domain name must not be empty"));
        }
        self.domains.insert(
            name.to_owned(),
            DomainInfo {
                name: name.to_owned(),
                description: description.map(str::to_owned),
                owner_email: owner_email.map(str::to_owned),
                status: "REGISTERED".to_owned(),
            },
        );
        Ok(())
    }

    async fn describe_domain(&self, name: &str) -> EngineResult<DomainInfo> {
        self.domains
            .get(name)
            .map(|e| e.value().clone())
            .ok_or_else(|| EngineError::custom(format!("domain not registered: {name}")))
    }

    async fn start_workflow(
        &self,
        domain: &str,
        workflow_type: &str,
        _args: Option<Vec<u8>>,
        options: WorkflowOptions,
    ) -> EngineResult<WorkflowExecution> {
        if !self.domains.contains_key(domain) {
            return Err(EngineError::custom(format!(
                "domain not registered: {domain}"
            )));
        }

        let seq = self.next_seq();
        let workflow_id = options
            .workflow_id
            .unwrap_or_else(|| format!("wf-{seq}"));
        let run_id = format!("run-{seq}");
        let execution = WorkflowExecution {
            workflow_id: workflow_id.clone(),
            run_id: run_id.clone(),
        };

        let (outcome, _) = watch::channel(None);
        let state = Arc::new(ExecutionState {
            workflow_type: workflow_type.to_owned(),
            execution: execution.clone(),
            status: Mutex::new(WorkflowStatus::Running),
            outcome,
            signals: Mutex::new(Vec::new()),
        });
        self.executions
            .insert(Self::execution_key(&workflow_id, &run_id), state);

        tracing::debug!(%domain, %workflow_type, %workflow_id, %run_id, "workflow started");
        Ok(execution)
    }

    async fn signal_workflow(
        &self,
        _domain: &str,
        workflow_id: &str,
        run_id: &str,
        signal_name: &str,
        args: Option<Vec<u8>>,
    ) -> EngineResult<()> {
        let state = self.execution(workflow_id, run_id)?;
        if state.status() != WorkflowStatus::Running {
            return Err(EngineError::custom("execution already closed"));
        }
        if let Ok(mut signals) = state.signals.lock() {
            signals.push((signal_name.to_owned(), args));
        }
        Ok(())
    }

    async fn cancel_workflow(
        &self,
        _domain: &str,
        workflow_id: &str,
        run_id: &str,
    ) -> EngineResult<()> {
        let state = self.execution(workflow_id, run_id)?;
        state.close(
            WorkflowStatus::Cancelled,
            Err(EngineError::cancelled("workflow cancelled")),
        );
        Ok(())
    }

    async fn terminate_workflow(
        &self,
        _domain: &str,
        workflow_id: &str,
        run_id: &str,
        reason: Option<&str>,
        _details: Option<Vec<u8>>,
    ) -> EngineResult<()> {
        let state = self.execution(workflow_id, run_id)?;
        state.close(
            WorkflowStatus::Terminated,
            Err(EngineError::custom(
                reason.unwrap_or("workflow terminated"),
            )),
        );
        Ok(())
    }

    async fn describe_workflow(
        &self,
        _domain: &str,
        workflow_id: &str,
        run_id: &str,
    ) -> EngineResult<WorkflowDescription> {
        let state = self.execution(workflow_id, run_id)?;
        Ok(WorkflowDescription {
            execution: state.execution.clone(),
            workflow_type: state.workflow_type.clone(),
            status: state.status(),
        })
    }

    async fn await_workflow(
        &self,
        _domain: &str,
        workflow_id: &str,
        run_id: &str,
    ) -> EngineResult<Option<Vec<u8>>> {
        let state = self.execution(workflow_id, run_id)?;
        let mut rx = state.outcome.subscribe();
        loop {
            {
                let current = rx.borrow_and_update().clone();
                if let Some(outcome) = current {
                    return outcome;
                }
            }
            if rx.changed().await.is_err() {
                return Err(EngineError::generic("execution state dropped"));
            }
        }
    }

    async fn complete_workflow(
        &self,
        _domain: &str,
        workflow_id: &str,
        run_id: &str,
        result: Outcome,
    ) -> EngineResult<()> {
        let state = self.execution(workflow_id, run_id)?;
        let status = match &result {
            Ok(_) => WorkflowStatus::Completed,
            Err(e) if e.kind == flowgate_core::message::ErrorKind::Cancelled => {
                WorkflowStatus::Cancelled
            }
            Err(_) => WorkflowStatus::Failed,
        };
        state.close(status, result);
        Ok(())
    }

    async fn schedule_activity(
        &self,
        domain: &str,
        activity_type: &str,
        _options: ActivityOptions,
    ) -> EngineResult<Vec<u8>> {
        if !self.domains.contains_key(domain) {
            return Err(EngineError::custom(format!(
                "domain not registered: {domain}"
            )));
        }
        let token = format!("atk-{}", self.next_seq()).into_bytes();
        let (outcome, _) = watch::channel(None);
        self.activities.insert(
            token.clone(),
            Arc::new(ActivityState {
                activity_type: activity_type.to_owned(),
                outcome,
                heartbeats: Mutex::new(Vec::new()),
            }),
        );
        Ok(token)
    }

    async fn complete_activity(
        &self,
        task_token: &[u8],
        result: Outcome,
    ) -> EngineResult<()> {
        let state = self
            .activities
            .get(task_token)
            .map(|e| Arc::clone(e.value()))
            .ok_or_else(|| EngineError::generic("unknown activity task token"))?;
        tracing::debug!(activity = %state.activity_type, "activity completed");
        let _ = state.outcome.send(Some(result));
        Ok(())
    }

    async fn record_heartbeat(
        &self,
        task_token: &[u8],
        details: Option<Vec<u8>>,
    ) -> EngineResult<()> {
        let state = self
            .activities
            .get(task_token)
            .map(|e| Arc::clone(e.value()))
            .ok_or_else(|| EngineError::generic("unknown activity task token"))?;
        if let Ok(mut beats) = state.heartbeats.lock() {
            beats.push(details);
        }
        Ok(())
    }
}
