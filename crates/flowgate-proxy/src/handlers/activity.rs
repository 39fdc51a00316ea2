//! Activity operation handlers.
//!
//! `ActivityExecuteRequest` schedules a task with the engine, mints an
//! activity context, and drives the library's activity code through
//! `ActivityInvokeRequest`. Cancellable executions register a cancel handle
//! under their request id so a later `CancelRequest` can abort the wait.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::oneshot;

use flowgate_core::error::Result;
use flowgate_core::message::activity::{
    ActivityCompleteReply, ActivityCompleteRequest, ActivityExecuteReply, ActivityExecuteRequest,
    ActivityInvokeReply, ActivityInvokeRequest, ActivityRecordHeartbeatReply,
    ActivityRecordHeartbeatRequest, ActivityRegisterReply, ActivityRegisterRequest,
};
use flowgate_core::message::{EngineError, ProxyMessage, Reply, Request};
use flowgate_core::protocol::MessageType;

use crate::app_state::AppState;
use crate::correlate::ActivityContext;
use crate::dispatch::{downcast, MessageHandler};
use crate::engine::EngineResult;
use crate::handlers::finish;

pub struct ActivityRegisterHandler;

#[async_trait]
impl MessageHandler for ActivityRegisterHandler {
    fn message_type(&self) -> MessageType {
        MessageType::ActivityRegisterRequest
    }

    async fn handle(
        &self,
        state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>> {
        let request = downcast::<ActivityRegisterRequest>(message)?;
        let request_id = request.request_id();

        let error = match request.name() {
            Some(name) if !name.is_empty() => {
                state.activity_types().insert(name.to_owned());
                None
            }
            _ => Some(EngineError::custom("activity name must not be empty")),
        };
        finish(ActivityRegisterReply::new(), request_id, error)
    }
}

pub struct ActivityExecuteHandler;

#[async_trait]
impl MessageHandler for ActivityExecuteHandler {
    fn message_type(&self) -> MessageType {
        MessageType::ActivityExecuteRequest
    }

    async fn handle(
        &self,
        state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>> {
        let request = downcast::<ActivityExecuteRequest>(message)?;
        let request_id = request.request_id();
        let mut reply = ActivityExecuteReply::new();
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

        let activity_type = request.activity().unwrap_or_default().to_owned();
        if !state.activity_types().contains(&activity_type) {
            tracing::warn!(%activity_type, "executing unregistered activity type");
        }
        let options = request.options().unwrap_or_default();

        let task_token = match engine
            .schedule_activity(parent.domain(), &activity_type, options)
            .await
        {
            Ok(token) => token,
            Err(e) => {
                reply.set_error(&e)?;
                return Ok(Box::new(reply));
            }
        };

        let context_id = state.activities().next_context_id();
        state.activities().add(
            context_id,
            Arc::new(ActivityContext::new(
                task_token.clone(),
                activity_type.clone(),
                request.context_id(),
            )),
        );

        let mut invoke = ActivityInvokeRequest::new();
        invoke.set_context_id(context_id);
        invoke.set_activity(Some(&activity_type));
        invoke.set_args(request.args().as_deref());

        let outcome = if request.is_cancellable() {
            let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
            state
                .cancellables()
                .add(request_id, Box::new(move || {
                    let _ = cancel_tx.send(());
                }));

            tokio::select! {
                result = state.call_library(Box::new(invoke)) => {
                    // Completed first: the registration must go quietly.
                    state.cancellables().remove(request_id);
                    result
                }
                _ = cancel_rx => Err(EngineError::cancelled("activity cancelled")),
            }
        } else {
            state.call_library(Box::new(invoke)).await
        };

        let outcome: EngineResult<Option<Vec<u8>>> = match outcome {
            Ok(invoke_reply) => match invoke_reply.into_any().downcast::<ActivityInvokeReply>() {
                Ok(invoke_reply) => Ok(invoke_reply.result()),
                Err(_) => Err(EngineError::generic(
                    "unexpected reply type for activity invoke",
                )),
            },
            Err(e) => Err(e),
        };

        if let Err(e) = engine.complete_activity(&task_token, outcome.clone()).await {
            tracing::warn!(context_id, error = %e, "activity completion failed");
        }
        state.activities().remove(context_id);

        match outcome {
            Ok(result) => reply.set_result(result.as_deref()),
            Err(e) => reply.set_error(&e)?,
        }
        Ok(Box::new(reply))
    }
}

/// Completes an activity task externally by its task token.
pub struct ActivityCompleteHandler;

#[async_trait]
impl MessageHandler for ActivityCompleteHandler {
    fn message_type(&self) -> MessageType {
        MessageType::ActivityCompleteRequest
    }

    async fn handle(
        &self,
        state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>> {
        let request = downcast::<ActivityCompleteRequest>(message)?;
        let request_id = request.request_id();

        let error = match (request.task_token(), state.engine()) {
            (Some(token), Ok(engine)) => engine
                .complete_activity(&token, Ok(request.result()))
                .await
                .err(),
            (None, _) => Some(EngineError::custom("task token missing")),
            (_, Err(e)) => Some(EngineError::generic(e.to_string())),
        };
        finish(ActivityCompleteReply::new(), request_id, error)
    }
}

pub struct ActivityRecordHeartbeatHandler;

#[async_trait]
impl MessageHandler for ActivityRecordHeartbeatHandler {
    fn message_type(&self) -> MessageType {
        MessageType::ActivityRecordHeartbeatRequest
    }

    async fn handle(
        &self,
        state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>> {
        let request = downcast::<ActivityRecordHeartbeatRequest>(message)?;
        let request_id = request.request_id();

        let error = match (request.task_token(), state.engine()) {
            (Some(token), Ok(engine)) => engine
                .record_heartbeat(&token, request.details())
                .await
                .err(),
            (None, _) => Some(EngineError::custom("task token missing")),
            (_, Err(e)) => Some(EngineError::generic(e.to_string())),
        };
        finish(ActivityRecordHeartbeatReply::new(), request_id, error)
    }
}
