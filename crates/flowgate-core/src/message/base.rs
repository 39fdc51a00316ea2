//! Request/reply bases and the generic fallback family.

use std::any::Any;

use crate::message::{ProxyMessage, Reply, Request};
use crate::protocol::{MessageType, ProxyEnvelope};

/// State embedded by every concrete request: the envelope plus the expected
/// reply type. The reply type is an in-memory pairing, never serialized.
#[derive(Debug, Clone)]
pub struct ProxyRequestBase {
    pub envelope: ProxyEnvelope,
    pub reply_type: MessageType,
}

impl ProxyRequestBase {
    pub fn new(ty: MessageType, reply_type: MessageType) -> Self {
        Self {
            envelope: ProxyEnvelope::new(ty),
            reply_type,
        }
    }
}

/// State embedded by every concrete reply.
#[derive(Debug, Clone)]
pub struct ProxyReplyBase {
    pub envelope: ProxyEnvelope,
}

impl ProxyReplyBase {
    pub fn new(ty: MessageType) -> Self {
        Self {
            envelope: ProxyEnvelope::new(ty),
        }
    }
}

/// Untyped envelope carrier used when decoding with the registry bypassed.
#[derive(Debug, Clone, Default)]
pub struct GenericMessage {
    envelope: ProxyEnvelope,
}

impl GenericMessage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProxyMessage for GenericMessage {
    fn envelope(&self) -> &ProxyEnvelope {
        &self.envelope
    }
    fn envelope_mut(&mut self) -> &mut ProxyEnvelope {
        &mut self.envelope
    }
    fn clone_boxed(&self) -> Box<dyn ProxyMessage> {
        Box::new(self.clone())
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Generic request carrier for registry-bypass decoding.
#[derive(Debug, Clone)]
pub struct GenericRequest {
    base: ProxyRequestBase,
}

impl GenericRequest {
    pub fn new() -> Self {
        Self {
            base: ProxyRequestBase::new(MessageType::Unspecified, MessageType::Unspecified),
        }
    }
}

impl Default for GenericRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl ProxyMessage for GenericRequest {
    fn envelope(&self) -> &ProxyEnvelope {
        &self.base.envelope
    }
    fn envelope_mut(&mut self) -> &mut ProxyEnvelope {
        &mut self.base.envelope
    }
    fn clone_boxed(&self) -> Box<dyn ProxyMessage> {
        Box::new(self.clone())
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl Request for GenericRequest {
    fn reply_type(&self) -> MessageType {
        self.base.reply_type
    }
}

/// Generic reply carrier for registry-bypass decoding.
#[derive(Debug, Clone)]
pub struct GenericReply {
    base: ProxyReplyBase,
}

impl GenericReply {
    pub fn new() -> Self {
        Self {
            base: ProxyReplyBase::new(MessageType::Unspecified),
        }
    }
}

impl Default for GenericReply {
    fn default() -> Self {
        Self::new()
    }
}

impl ProxyMessage for GenericReply {
    fn envelope(&self) -> &ProxyEnvelope {
        &self.base.envelope
    }
    fn envelope_mut(&mut self) -> &mut ProxyEnvelope {
        &mut self.base.envelope
    }
    fn clone_boxed(&self) -> Box<dyn ProxyMessage> {
        Box::new(self.clone())
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
    fn is_reply(&self) -> bool {
        true
    }
}

impl Reply for GenericReply {}
