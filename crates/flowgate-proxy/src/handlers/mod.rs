//! Built-in message handlers, one per inbound request type.
//!
//! Handlers never abort the exchange on engine failures: the error is
//! embedded into the reply's `Error` property and the transport delivers it
//! as a normal reply. Only protocol-level problems (bad dispatch wiring,
//! encode bugs) surface as `Err` and abort.

use std::sync::Arc;

use flowgate_core::error::Result;
use flowgate_core::message::{EngineError, ProxyMessage, Reply};

use crate::dispatch::Dispatcher;

pub mod activity;
pub mod client;
pub mod domain;
pub mod workflow;

/// Register every built-in handler. Invoke-style messages
/// (`WorkflowInvokeRequest`, `ActivityInvokeRequest`) are proxy→library only
/// and have no inbound handler; their replies resolve the operations map.
pub fn register_builtin(dispatcher: &Dispatcher) {
    dispatcher.register(Arc::new(client::InitializeHandler));
    dispatcher.register(Arc::new(client::ConnectHandler));
    dispatcher.register(Arc::new(client::HeartbeatHandler));
    dispatcher.register(Arc::new(client::CancelHandler));
    dispatcher.register(Arc::new(client::TerminateHandler));

    dispatcher.register(Arc::new(domain::DomainRegisterHandler));
    dispatcher.register(Arc::new(domain::DomainDescribeHandler));

    dispatcher.register(Arc::new(workflow::WorkflowRegisterHandler));
    dispatcher.register(Arc::new(workflow::WorkflowExecuteHandler));
    dispatcher.register(Arc::new(workflow::WorkflowSignalHandler));
    dispatcher.register(Arc::new(workflow::WorkflowCancelHandler));
    dispatcher.register(Arc::new(workflow::WorkflowTerminateHandler));
    dispatcher.register(Arc::new(workflow::WorkflowDisconnectContextHandler));
    dispatcher.register(Arc::new(workflow::WorkflowDescribeExecutionHandler));
    dispatcher.register(Arc::new(workflow::WorkflowExecuteChildHandler));
    dispatcher.register(Arc::new(workflow::WorkflowWaitForChildHandler));
    dispatcher.register(Arc::new(workflow::WorkflowSignalChildHandler));
    dispatcher.register(Arc::new(workflow::WorkflowCancelChildHandler));

    dispatcher.register(Arc::new(activity::ActivityRegisterHandler));
    dispatcher.register(Arc::new(activity::ActivityExecuteHandler));
    dispatcher.register(Arc::new(activity::ActivityCompleteHandler));
    dispatcher.register(Arc::new(activity::ActivityRecordHeartbeatHandler));
}

/// Stamp the correlation id and optional error onto a reply and box it.
pub(crate) fn finish<R>(
    mut reply: R,
    request_id: i64,
    error: Option<EngineError>,
) -> Result<Box<dyn ProxyMessage>>
where
    R: Reply + 'static,
{
    reply.set_request_id(request_id);
    if let Some(error) = &error {
        reply.set_error(error)?;
    }
    Ok(Box::new(reply))
}
