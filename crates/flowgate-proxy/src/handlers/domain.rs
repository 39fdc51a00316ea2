//! Domain management handlers.

use async_trait::async_trait;

use flowgate_core::error::Result;
use flowgate_core::message::domain::{
    DomainDescribeReply, DomainDescribeRequest, DomainRegisterReply, DomainRegisterRequest,
};
use flowgate_core::message::{EngineError, ProxyMessage, Reply};
use flowgate_core::protocol::MessageType;

use crate::app_state::AppState;
use crate::dispatch::{downcast, MessageHandler};
use crate::handlers::finish;

pub struct DomainRegisterHandler;

#[async_trait]
impl MessageHandler for DomainRegisterHandler {
    fn message_type(&self) -> MessageType {
        MessageType::DomainRegisterRequest
    }

    async fn handle(
        &self,
        state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>> {
        let request = downcast::<DomainRegisterRequest>(message)?;
        let request_id = request.request_id();

        let error = match state.engine() {
            Ok(engine) => engine
                .register_domain(
                    request.name().unwrap_or_default(),
                    request.description(),
                    request.owner_email(),
                    request.retention_days(),
                )
                .await
                .err(),
            Err(e) => Some(EngineError::generic(e.to_string())),
        };

        finish(DomainRegisterReply::new(), request_id, error)
    }
}

pub struct DomainDescribeHandler;

#[async_trait]
impl MessageHandler for DomainDescribeHandler {
    fn message_type(&self) -> MessageType {
        MessageType::DomainDescribeRequest
    }

    async fn handle(
        &self,
        state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>> {
        let request = downcast::<DomainDescribeRequest>(message)?;
        let request_id = request.request_id();
        let mut reply = DomainDescribeReply::new();
        reply.set_request_id(request_id);

        let outcome = match state.engine() {
            Ok(engine) => engine
                .describe_domain(request.name().unwrap_or_default())
                .await,
            Err(e) => Err(EngineError::generic(e.to_string())),
        };

        match outcome {
            Ok(info) => {
                reply.set_domain_name(Some(&info.name));
                reply.set_domain_description(info.description.as_deref());
                reply.set_domain_owner_email(info.owner_email.as_deref());
                reply.set_domain_status(Some(&info.status));
            }
            Err(e) => reply.set_error(&e)?,
        }
        Ok(Box::new(reply))
    }
}
