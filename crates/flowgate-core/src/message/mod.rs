//! Proxy message hierarchy.
//!
//! Three layers, composed rather than inherited:
//! 1. the envelope ([`ProxyEnvelope`]) with its typed property surface,
//! 2. the request/reply bases (request id, cancellability, reply pairing,
//!    structured errors),
//! 3. concrete leaves per domain family (client, domain, workflow, activity),
//!    each a thin set of typed accessors over well-known property keys.
//!
//! Every concrete leaf is a tagged variant distinguished by its wire type
//! code; the [`registry::MessageRegistry`] maps codes back to fresh instances
//! during decode.

use std::any::Any;
use std::fmt::Debug;

use bytes::Bytes;

use crate::error::Result;
use crate::protocol::{keys, MessageType, ProxyEnvelope};

pub mod activity;
pub mod base;
pub mod client;
pub mod domain;
pub mod engine_error;
pub mod registry;
pub mod workflow;

pub use base::{GenericMessage, GenericRequest, GenericReply};
pub use engine_error::{EngineError, ErrorKind};
pub use registry::MessageRegistry;

/// Capability surface shared by every proxy message.
///
/// `clone_boxed` is a deep copy: the envelope owns all of its strings and
/// buffers, so a clone never aliases the original's data.
pub trait ProxyMessage: Send + Any + Debug {
    fn envelope(&self) -> &ProxyEnvelope;
    fn envelope_mut(&mut self) -> &mut ProxyEnvelope;
    fn clone_boxed(&self) -> Box<dyn ProxyMessage>;
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Raw wire type code (may be unregistered for generic messages).
    fn type_code(&self) -> i32 {
        self.envelope().type_code()
    }

    /// Whether this message is a reply to a proxy- or library-initiated
    /// request. Drives correlation-table routing in the transport.
    fn is_reply(&self) -> bool {
        false
    }

    /// Correlation id, carried as the regular `"RequestId"` property.
    /// Zero means unset.
    fn request_id(&self) -> i64 {
        self.envelope().long_property(keys::REQUEST_ID, 0)
    }

    fn set_request_id(&mut self, value: i64) {
        self.envelope_mut().set_long_property(keys::REQUEST_ID, value);
    }
}

/// Request-side additions: the expected reply type (fixed per concrete type,
/// never serialized) and the cancellability flag.
pub trait Request: ProxyMessage {
    fn reply_type(&self) -> MessageType;

    fn is_cancellable(&self) -> bool {
        self.envelope().bool_property(keys::IS_CANCELLABLE, false)
    }

    fn set_is_cancellable(&mut self, value: bool) {
        self.envelope_mut()
            .set_bool_property(keys::IS_CANCELLABLE, value);
    }
}

/// Reply-side additions: the structured error slot, JSON-boxed into the
/// `"Error"` property. `None` means success.
pub trait Reply: ProxyMessage {
    fn error(&self) -> Option<EngineError> {
        self.envelope().json_property(keys::ERROR)
    }

    fn set_error(&mut self, error: &EngineError) -> Result<()> {
        self.envelope_mut().set_json_property(keys::ERROR, error)
    }
}

/// Family to fall back to when decoding with the registry bypassed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeFamily {
    #[default]
    Message,
    Request,
    Reply,
}

/// Serialize a message for the wire.
pub fn serialize(message: &dyn ProxyMessage, allow_unspecified: bool) -> Result<Vec<u8>> {
    message.envelope().encode(allow_unspecified)
}

/// Decode wire bytes into the registered concrete message type.
pub fn deserialize(bytes: Bytes, registry: &MessageRegistry) -> Result<Box<dyn ProxyMessage>> {
    deserialize_with(bytes, registry, false, DecodeFamily::Message)
}

/// Decode wire bytes. With `allow_unspecified` set the registry is bypassed
/// and a generic instance of the requested family carries the raw envelope —
/// a diagnostic/test mode, mirrored by `encode(allow_unspecified)`.
pub fn deserialize_with(
    bytes: Bytes,
    registry: &MessageRegistry,
    allow_unspecified: bool,
    family: DecodeFamily,
) -> Result<Box<dyn ProxyMessage>> {
    let mut buf = bytes;
    let envelope = ProxyEnvelope::decode(&mut buf)?;
    tracing::trace!(type_code = envelope.type_code(), "decoded envelope");

    let mut message: Box<dyn ProxyMessage> = if allow_unspecified {
        match family {
            DecodeFamily::Message => Box::new(GenericMessage::new()),
            DecodeFamily::Request => Box::new(GenericRequest::new()),
            DecodeFamily::Reply => Box::new(GenericReply::new()),
        }
    } else {
        registry.produce(envelope.type_code())?
    };

    *message.envelope_mut() = envelope;
    Ok(message)
}

/// Implements the `ProxyMessage` + `Request` plumbing for a request leaf
/// with a `base: ProxyRequestBase` field, pairing it with its reply type.
macro_rules! request_message {
    ($ty:ident => $reply:ident) => {
        impl $ty {
            pub fn new() -> Self {
                Self {
                    base: $crate::message::base::ProxyRequestBase::new(
                        $crate::protocol::MessageType::$ty,
                        $crate::protocol::MessageType::$reply,
                    ),
                }
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $crate::message::ProxyMessage for $ty {
            fn envelope(&self) -> &$crate::protocol::ProxyEnvelope {
                &self.base.envelope
            }
            fn envelope_mut(&mut self) -> &mut $crate::protocol::ProxyEnvelope {
                &mut self.base.envelope
            }
            fn clone_boxed(&self) -> Box<dyn $crate::message::ProxyMessage> {
                Box::new(self.clone())
            }
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
            fn into_any(self: Box<Self>) -> Box<dyn std::any::Any> {
                self
            }
        }

        impl $crate::message::Request for $ty {
            fn reply_type(&self) -> $crate::protocol::MessageType {
                self.base.reply_type
            }
        }
    };
}

/// Implements the `ProxyMessage` + `Reply` plumbing for a reply leaf with a
/// `base: ProxyReplyBase` field.
macro_rules! reply_message {
    ($ty:ident) => {
        impl $ty {
            pub fn new() -> Self {
                Self {
                    base: $crate::message::base::ProxyReplyBase::new(
                        $crate::protocol::MessageType::$ty,
                    ),
                }
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $crate::message::ProxyMessage for $ty {
            fn envelope(&self) -> &$crate::protocol::ProxyEnvelope {
                &self.base.envelope
            }
            fn envelope_mut(&mut self) -> &mut $crate::protocol::ProxyEnvelope {
                &mut self.base.envelope
            }
            fn clone_boxed(&self) -> Box<dyn $crate::message::ProxyMessage> {
                Box::new(self.clone())
            }
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
            fn into_any(self: Box<Self>) -> Box<dyn std::any::Any> {
                self
            }
            fn is_reply(&self) -> bool {
                true
            }
        }

        impl $crate::message::Reply for $ty {}
    };
}

pub(crate) use reply_message;
pub(crate) use request_message;
