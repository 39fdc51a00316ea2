//! Client/connection lifecycle handlers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use flowgate_core::error::Result;
use flowgate_core::message::client::{
    CancelReply, CancelRequest, ConnectReply, ConnectRequest, HeartbeatReply, HeartbeatRequest,
    InitializeReply, InitializeRequest, TerminateReply, TerminateRequest,
};
use flowgate_core::message::{EngineError, ProxyMessage};
use flowgate_core::protocol::MessageType;

use crate::app_state::AppState;
use crate::dispatch::{downcast, MessageHandler};
use crate::engine::local::LocalEngine;
use crate::engine::{EngineClient, EngineSettings};
use crate::handlers::finish;

/// Records the library's reply endpoint announced at startup.
pub struct InitializeHandler;

#[async_trait]
impl MessageHandler for InitializeHandler {
    fn message_type(&self) -> MessageType {
        MessageType::InitializeRequest
    }

    async fn handle(
        &self,
        state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>> {
        let request = downcast::<InitializeRequest>(message)?;
        let request_id = request.request_id();

        let error = match request.library_address() {
            Some(addr) if !addr.is_empty() => {
                let address = format!("{addr}:{}", request.library_port());
                tracing::info!(%address, "library endpoint initialized");
                state.library().set_address(address);
                None
            }
            _ => Some(EngineError::custom("library address missing")),
        };

        finish(InitializeReply::new(), request_id, error)
    }
}

/// Establishes the engine connection, optionally registering the default
/// domain.
pub struct ConnectHandler;

#[async_trait]
impl MessageHandler for ConnectHandler {
    fn message_type(&self) -> MessageType {
        MessageType::ConnectRequest
    }

    async fn handle(
        &self,
        state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>> {
        let request = downcast::<ConnectRequest>(message)?;
        let request_id = request.request_id();
        let defaults = &state.cfg().engine;

        let settings = EngineSettings {
            endpoints: request
                .endpoints()
                .filter(|e| !e.is_empty())
                .map(str::to_owned)
                .unwrap_or_else(|| defaults.endpoints.clone()),
            identity: request
                .identity()
                .filter(|i| !i.is_empty())
                .map(str::to_owned)
                .unwrap_or_else(|| defaults.identity.clone()),
            default_domain: request
                .domain()
                .map(str::to_owned)
                .or_else(|| defaults.default_domain.clone()),
            client_timeout: if request.client_timeout() == Duration::ZERO {
                Duration::from_secs(60)
            } else {
                request.client_timeout()
            },
        };
        // Retry policy belongs to the engine client configuration; the proxy
        // itself never retries.
        tracing::info!(
            endpoints = %settings.endpoints,
            identity = %settings.identity,
            retries = request.retries(),
            retry_delay = ?request.retry_delay(),
            "connecting engine client"
        );

        let engine: Arc<dyn EngineClient> = Arc::new(LocalEngine::new(settings.clone()));

        let mut error = None;
        if request.create_domain() {
            match &settings.default_domain {
                Some(domain) => {
                    if let Err(e) = engine.register_domain(domain, None, None, 0).await {
                        error = Some(e);
                    }
                }
                None => {
                    error = Some(EngineError::custom(
                        "create_domain requires a domain name",
                    ));
                }
            }
        }

        state.set_engine(engine);
        finish(ConnectReply::new(), request_id, error)
    }
}

pub struct HeartbeatHandler;

#[async_trait]
impl MessageHandler for HeartbeatHandler {
    fn message_type(&self) -> MessageType {
        MessageType::HeartbeatRequest
    }

    async fn handle(
        &self,
        _state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>> {
        let request = downcast::<HeartbeatRequest>(message)?;
        finish(HeartbeatReply::new(), request.request_id(), None)
    }
}

/// Aborts an in-flight cancellable operation by its request id.
pub struct CancelHandler;

#[async_trait]
impl MessageHandler for CancelHandler {
    fn message_type(&self) -> MessageType {
        MessageType::CancelRequest
    }

    async fn handle(
        &self,
        state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>> {
        let request = downcast::<CancelRequest>(message)?;
        let target = request.target_request_id();

        let was_cancelled = state.cancellables().cancel(target);
        if !was_cancelled {
            // Already completed or never cancellable — reported, not fatal.
            tracing::debug!(target, "cancel found no registered operation");
        }

        let mut reply = CancelReply::new();
        reply.set_request_id(request.request_id());
        reply.set_was_cancelled(was_cancelled);
        Ok(Box::new(reply))
    }
}

/// Starts a graceful shutdown after the reply is written.
pub struct TerminateHandler;

#[async_trait]
impl MessageHandler for TerminateHandler {
    fn message_type(&self) -> MessageType {
        MessageType::TerminateRequest
    }

    async fn handle(
        &self,
        state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>> {
        let request = downcast::<TerminateRequest>(message)?;
        tracing::info!("terminate requested, draining");
        state.begin_drain();
        finish(TerminateReply::new(), request.request_id(), None)
    }
}
