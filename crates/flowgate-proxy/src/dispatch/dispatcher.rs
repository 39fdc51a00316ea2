use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use flowgate_core::error::{FlowgateError, Result};
use flowgate_core::message::ProxyMessage;
use flowgate_core::protocol::MessageType;

use crate::app_state::AppState;

/// One handler per inbound request type.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    fn message_type(&self) -> MessageType;
    async fn handle(
        &self,
        state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>>;
}

/// Registry and dispatcher for inbound request handlers.
#[derive(Default)]
pub struct Dispatcher {
    handlers: DashMap<i32, Arc<dyn MessageHandler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    pub fn register(&self, handler: Arc<dyn MessageHandler>) {
        self.handlers.insert(handler.message_type().code(), handler);
    }

    pub fn registered_types(&self) -> Vec<i32> {
        self.handlers.iter().map(|e| *e.key()).collect()
    }

    pub async fn dispatch(
        &self,
        state: AppState,
        message: Box<dyn ProxyMessage>,
    ) -> Result<Box<dyn ProxyMessage>> {
        let code = message.type_code();
        let handler = self
            .handlers
            .get(&code)
            .ok_or(FlowgateError::UnknownType(code))?
            .value()
            .clone();
        handler.handle(state, message).await
    }
}
