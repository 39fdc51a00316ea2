//! Structured engine errors carried in reply messages.
//!
//! An engine failure never aborts the HTTP exchange; it travels back to the
//! peer inside the reply's JSON-boxed `"Error"` property, tagged with one of
//! the engine's error kinds.

use serde::{Deserialize, Serialize};

/// Engine-side error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The operation was cancelled before completion.
    Cancelled,
    /// An application-defined error raised by user code.
    Custom,
    /// Any other engine failure.
    Generic,
    /// User code panicked/crashed while executing.
    Panic,
}

/// Error payload serialized into a reply's `"Error"` property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineError {
    #[serde(rename = "Kind")]
    pub kind: ErrorKind,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "StackTrace", default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
}

impl EngineError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            stack_trace: None,
        }
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Generic, message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cancelled, message)
    }

    pub fn custom(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Custom, message)
    }

    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for EngineError {}
