//! Message dispatch.
//!
//! Maps decoded inbound requests to their registered handler by wire type
//! code. Replies never reach the dispatcher — the transport routes them into
//! the operations map first.

pub mod dispatcher;

pub use dispatcher::{Dispatcher, MessageHandler};

use flowgate_core::error::{FlowgateError, Result};
use flowgate_core::message::ProxyMessage;

/// Recover the concrete message type a handler registered for.
///
/// A mismatch means the dispatcher table and the message registry disagree —
/// an internal bug, not peer input.
pub fn downcast<T: ProxyMessage>(message: Box<dyn ProxyMessage>) -> Result<Box<T>> {
    message
        .into_any()
        .downcast::<T>()
        .map_err(|_| FlowgateError::Internal("message type mismatch in dispatch".into()))
}
