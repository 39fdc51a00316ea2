//! Workflow operation handlers.
//!
//! Execute-style requests mint a workflow context, start the execution on
//! the engine, and spawn the invoke loop that drives the library's workflow
//! code and feeds its outcome back into the engine. Child operations run in
//! the parent context's child id space.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;

use flowgate_core::error::Result;
use flowgate_core::message::workflow::{
    WorkflowCancelChildReply, WorkflowCancelChildRequest, WorkflowCancelReply,
    WorkflowCancelRequest, WorkflowDescribeExecutionReply, WorkflowDescribeExecutionRequest,
    WorkflowDisconnectContextReply, WorkflowDisconnectContextRequest, WorkflowExecuteChildReply,
    WorkflowExecuteChildRequest, WorkflowExecuteReply, WorkflowExecuteRequest, WorkflowExecution,
    WorkflowInvokeReply, WorkflowInvokeRequest, WorkflowRegisterReply, WorkflowRegisterRequest,
    WorkflowSignalChildReply, WorkflowSignalChildRequest, WorkflowSignalReply,
    WorkflowSignalRequest, WorkflowTerminateReply, WorkflowTerminateRequest,
    WorkflowWaitForChildReply, WorkflowWaitForChildRequest,
};
use flowgate_core::message::{EngineError, ProxyMessage, Reply};
use flowgate_core::protocol::MessageType;

use crate::app_state::AppState;
use crate::correlate::{CancelFn, ChildContext, WorkflowContext};
use crate::dispatch::{downcast, MessageHandler};
use crate::engine::EngineClient;
use crate::handlers::finish;

/// Resolve the effective domain: the request's, falling back to the
/// connection default.
fn effective_domain(requested: Option<&str>, engine: &Arc<dyn EngineClient>) -> String {
    requested
        .filter(|d| !d.is_empty())
        .map(str::to_owned)
        .or_else(|| engine.settings().default_domain.clone())
        .unwrap_or_default()
}

/// Drive the library-side workflow code for a context and record the
/// terminal outcome with the engine. The context is torn down once the
/// execution closes.
async fn run_workflow_invoke(
    state: AppState,
    context_id: i64,
    execution: WorkflowExecution,
    domain: String,
    workflow_type: String,
    args: Option<Vec<u8>>,
) {
    let mut invoke = WorkflowInvokeRequest::new();
    invoke.set_context_id(context_id);
    invoke.set_name(Some(&workflow_type));
    invoke.set_domain(Some(&domain));
    invoke.set_args(args.as_deref());

    let outcome = match state.call_library(Box::new(invoke)).await {
        Ok(reply) => match reply.into_any().downcast::<WorkflowInvokeReply>() {
            Ok(reply) => Ok(reply.result()),
            Err(_) => Err(EngineError::generic(
                "unexpected reply type for workflow invoke",
            )),
        },
        Err(e) => Err(e),
    };

    if let Ok(engine) = state.engine() {
        if let Err(e) = engine
            .complete_workflow(&domain, &execution.workflow_id, &execution.run_id, outcome)
            .await
        {
            tracing::warn!(context_id, error = %e, "workflow completion failed");
        }
    }
    state.workflows().remove(context_id);
}

pub struct WorkflowRegisterHandler;

#[async_trait]
impl MessageHandler for WorkflowRegisterHandler {
    fn message_type(&self) -> MessageType {
        MessageType::WorkflowRegisterRequest
    }

    async fn handle(
        &self,
        state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>> {
        let request = downcast::<WorkflowRegisterRequest>(message)?;
        let request_id = request.request_id();

        let error = match request.name() {
            Some(name) if !name.is_empty() => {
                state.workflow_types().insert(name.to_owned());
                None
            }
            _ => Some(EngineError::custom("workflow name must not be empty")),
        };
        finish(WorkflowRegisterReply::new(), request_id, error)
    }
}

pub struct WorkflowExecuteHandler;

#[async_trait]
impl MessageHandler for WorkflowExecuteHandler {
    fn message_type(&self) -> MessageType {
        MessageType::WorkflowExecuteRequest
    }

    async fn handle(
        &self,
        state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>> {
        let request = downcast::<WorkflowExecuteRequest>(message)?;
        let request_id = request.request_id();
        let mut reply = WorkflowExecuteReply::new();
        reply.set_request_id(request_id);

        let engine = match state.engine() {
            Ok(engine) => engine,
            Err(e) => {
                reply.set_error(&EngineError::generic(e.to_string()))?;
                return Ok(Box::new(reply));
            }
        };

        let domain = effective_domain(request.domain(), &engine);
        let workflow_type = request.workflow().unwrap_or_default().to_owned();
        if !state.workflow_types().contains(&workflow_type) {
            tracing::warn!(%workflow_type, "executing unregistered workflow type");
        }
        let options = request.options().unwrap_or_default();

        match engine
            .start_workflow(&domain, &workflow_type, request.args(), options)
            .await
        {
            Ok(execution) => {
                let context_id = state.workflows().next_context_id();
                state.workflows().add(
                    context_id,
                    Arc::new(WorkflowContext::new(
                        execution.clone(),
                        domain.clone(),
                        workflow_type.clone(),
                    )),
                );

                tokio::spawn(run_workflow_invoke(
                    state.clone(),
                    context_id,
                    execution.clone(),
                    domain,
                    workflow_type,
                    request.args(),
                ));

                reply.set_context_id(context_id);
                reply.set_execution(&execution)?;
            }
            Err(e) => reply.set_error(&e)?,
        }
        Ok(Box::new(reply))
    }
}

pub struct WorkflowSignalHandler;

#[async_trait]
impl MessageHandler for WorkflowSignalHandler {
    fn message_type(&self) -> MessageType {
        MessageType::WorkflowSignalRequest
    }

    async fn handle(
        &self,
        state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>> {
        let request = downcast::<WorkflowSignalRequest>(message)?;
        let request_id = request.request_id();

        let error = match state.engine() {
            Ok(engine) => {
                let domain = effective_domain(request.domain(), &engine);
                engine
                    .signal_workflow(
                        &domain,
                        request.workflow_id().unwrap_or_default(),
                        request.run_id().unwrap_or_default(),
                        request.signal_name().unwrap_or_default(),
                        request.signal_args(),
                    )
                    .await
                    .err()
            }
            Err(e) => Some(EngineError::generic(e.to_string())),
        };
        finish(WorkflowSignalReply::new(), request_id, error)
    }
}

pub struct WorkflowCancelHandler;

#[async_trait]
impl MessageHandler for WorkflowCancelHandler {
    fn message_type(&self) -> MessageType {
        MessageType::WorkflowCancelRequest
    }

    async fn handle(
        &self,
        state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>> {
        let request = downcast::<WorkflowCancelRequest>(message)?;
        let request_id = request.request_id();

        let error = match state.engine() {
            Ok(engine) => {
                let domain = effective_domain(request.domain(), &engine);
                engine
                    .cancel_workflow(
                        &domain,
                        request.workflow_id().unwrap_or_default(),
                        request.run_id().unwrap_or_default(),
                    )
                    .await
                    .err()
            }
            Err(e) => Some(EngineError::generic(e.to_string())),
        };
        finish(WorkflowCancelReply::new(), request_id, error)
    }
}

pub struct WorkflowTerminateHandler;

#[async_trait]
impl MessageHandler for WorkflowTerminateHandler {
    fn message_type(&self) -> MessageType {
        MessageType::WorkflowTerminateRequest
    }

    async fn handle(
        &self,
        state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>> {
        let request = downcast::<WorkflowTerminateRequest>(message)?;
        let request_id = request.request_id();

        let error = match state.engine() {
            Ok(engine) => {
                let domain = effective_domain(request.domain(), &engine);
                engine
                    .terminate_workflow(
                        &domain,
                        request.workflow_id().unwrap_or_default(),
                        request.run_id().unwrap_or_default(),
                        request.reason(),
                        request.details(),
                    )
                    .await
                    .err()
            }
            Err(e) => Some(EngineError::generic(e.to_string())),
        };
        finish(WorkflowTerminateReply::new(), request_id, error)
    }
}

pub struct WorkflowDisconnectContextHandler;

#[async_trait]
impl MessageHandler for WorkflowDisconnectContextHandler {
    fn message_type(&self) -> MessageType {
        MessageType::WorkflowDisconnectContextRequest
    }

    async fn handle(
        &self,
        state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>> {
        let request = downcast::<WorkflowDisconnectContextRequest>(message)?;
        let request_id = request.request_id();
        let context_id = request.context_id();

        if state.workflows().remove(context_id).is_none() {
            // Peer referenced a context we no longer track — reported,
            // non-fatal.
            tracing::warn!(context_id, "disconnect for unknown workflow context");
        }
        finish(WorkflowDisconnectContextReply::new(), request_id, None)
    }
}

pub struct WorkflowDescribeExecutionHandler;

#[async_trait]
impl MessageHandler for WorkflowDescribeExecutionHandler {
    fn message_type(&self) -> MessageType {
        MessageType::WorkflowDescribeExecutionRequest
    }

    async fn handle(
        &self,
        state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>> {
        let request = downcast::<WorkflowDescribeExecutionRequest>(message)?;
        let request_id = request.request_id();
        let mut reply = WorkflowDescribeExecutionReply::new();
        reply.set_request_id(request_id);

        let outcome = match state.engine() {
            Ok(engine) => {
                let domain = effective_domain(request.domain(), &engine);
                engine
                    .describe_workflow(
                        &domain,
                        request.workflow_id().unwrap_or_default(),
                        request.run_id().unwrap_or_default(),
                    )
                    .await
            }
            Err(e) => Err(EngineError::generic(e.to_string())),
        };

        match outcome {
            Ok(description) => reply.set_details(&description)?,
            Err(e) => reply.set_error(&e)?,
        }
        Ok(Box::new(reply))
    }
}

pub struct WorkflowExecuteChildHandler;

#[async_trait]
impl MessageHandler for WorkflowExecuteChildHandler {
    fn message_type(&self) -> MessageType {
        MessageType::WorkflowExecuteChildRequest
    }

    async fn handle(
        &self,
        state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>> {
        let request = downcast::<WorkflowExecuteChildRequest>(message)?;
        let request_id = request.request_id();
        let mut reply = WorkflowExecuteChildReply::new();
        reply.set_request_id(request_id);

        let Some(parent) = state.workflows().get(request.context_id()) else {
            reply.set_error(&EngineError::generic(format!(
                "unknown workflow context {}",
                request.context_id()
            )))?;
            return Ok(Box::new(reply));
        };
        let engine = match state.engine() {
            Ok(engine) => engine,
            Err(e) => {
                reply.set_error(&EngineError::generic(e.to_string()))?;
                return Ok(Box::new(reply));
            }
        };

        let domain = parent.domain().to_owned();
        let workflow_type = request.workflow().unwrap_or_default().to_owned();
        let options = request.options().unwrap_or_default();

        match engine
            .start_workflow(&domain, &workflow_type, request.args(), options)
            .await
        {
            Ok(execution) => {
                // The child gets its own workflow context and invoke loop,
                // plus an entry in the parent's child id space.
                let child_context_id = state.workflows().next_context_id();
                state.workflows().add(
                    child_context_id,
                    Arc::new(WorkflowContext::new(
                        execution.clone(),
                        domain.clone(),
                        workflow_type.clone(),
                    )),
                );
                tokio::spawn(run_workflow_invoke(
                    state.clone(),
                    child_context_id,
                    execution.clone(),
                    domain.clone(),
                    workflow_type,
                    request.args(),
                ));

                let child_id = parent.children().next_child_id();

                let wait_engine = Arc::clone(&engine);
                let wait_domain = domain.clone();
                let wait_execution = execution.clone();
                let future = async move {
                    wait_engine
                        .await_workflow(
                            &wait_domain,
                            &wait_execution.workflow_id,
                            &wait_execution.run_id,
                        )
                        .await
                }
                .boxed();

                let cancel_engine = Arc::clone(&engine);
                let cancel_execution = execution.clone();
                let cancel: CancelFn = Box::new(move || {
                    tokio::spawn(async move {
                        let _ = cancel_engine
                            .cancel_workflow(
                                &domain,
                                &cancel_execution.workflow_id,
                                &cancel_execution.run_id,
                            )
                            .await;
                    });
                });

                parent.children().add(
                    child_id,
                    Arc::new(ChildContext::new(execution.clone(), future, cancel)),
                );

                reply.set_child_id(child_id);
                reply.set_execution(&execution)?;
            }
            Err(e) => reply.set_error(&e)?,
        }
        Ok(Box::new(reply))
    }
}

pub struct WorkflowWaitForChildHandler;

#[async_trait]
impl MessageHandler for WorkflowWaitForChildHandler {
    fn message_type(&self) -> MessageType {
        MessageType::WorkflowWaitForChildRequest
    }

    async fn handle(
        &self,
        state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>> {
        let request = downcast::<WorkflowWaitForChildRequest>(message)?;
        let request_id = request.request_id();
        let mut reply = WorkflowWaitForChildReply::new();
        reply.set_request_id(request_id);

        let child = state
            .workflows()
            .get(request.context_id())
            .and_then(|parent| parent.children().get(request.child_id()));
        let Some(child) = child else {
            reply.set_error(&EngineError::generic(format!(
                "unknown child {} in context {}",
                request.child_id(),
                request.context_id()
            )))?;
            return Ok(Box::new(reply));
        };

        match tokio::time::timeout(state.reply_timeout(), child.result()).await {
            Ok(result) => {
                // The child is done; its entry leaves the parent's table.
                if let Some(parent) = state.workflows().get(request.context_id()) {
                    parent.children().remove(request.child_id());
                }
                match result {
                    Ok(data) => reply.set_result(data.as_deref()),
                    Err(e) => reply.set_error(&e)?,
                }
            }
            Err(_) => reply.set_error(&EngineError::generic(format!(
                "timed out waiting for child {}",
                request.child_id()
            )))?,
        }
        Ok(Box::new(reply))
    }
}

pub struct WorkflowSignalChildHandler;

#[async_trait]
impl MessageHandler for WorkflowSignalChildHandler {
    fn message_type(&self) -> MessageType {
        MessageType::WorkflowSignalChildRequest
    }

    async fn handle(
        &self,
        state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>> {
        let request = downcast::<WorkflowSignalChildRequest>(message)?;
        let request_id = request.request_id();

        let parent = state.workflows().get(request.context_id());
        let child = parent
            .as_ref()
            .and_then(|p| p.children().get(request.child_id()));

        let error = match (parent, child, state.engine()) {
            (Some(parent), Some(child), Ok(engine)) => {
                let execution = child.execution().clone();
                engine
                    .signal_workflow(
                        parent.domain(),
                        &execution.workflow_id,
                        &execution.run_id,
                        request.signal_name().unwrap_or_default(),
                        request.signal_args(),
                    )
                    .await
                    .err()
            }
            (_, _, Err(e)) => Some(EngineError::generic(e.to_string())),
            _ => Some(EngineError::generic(format!(
                "unknown child {} in context {}",
                request.child_id(),
                request.context_id()
            ))),
        };
        finish(WorkflowSignalChildReply::new(), request_id, error)
    }
}

pub struct WorkflowCancelChildHandler;

#[async_trait]
impl MessageHandler for WorkflowCancelChildHandler {
    fn message_type(&self) -> MessageType {
        MessageType::WorkflowCancelChildRequest
    }

    async fn handle(
        &self,
        state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>> {
        let request = downcast::<WorkflowCancelChildRequest>(message)?;
        let request_id = request.request_id();
        let mut reply = WorkflowCancelChildReply::new();
        reply.set_request_id(request_id);

        let was_cancelled = state
            .workflows()
            .get(request.context_id())
            .and_then(|parent| parent.children().remove(request.child_id()))
            .map(|child| child.cancel())
            .unwrap_or(false);

        reply.set_was_cancelled(was_cancelled);
        Ok(Box::new(reply))
    }
}
