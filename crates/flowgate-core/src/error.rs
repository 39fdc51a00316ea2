//! Shared error type across flowgate crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Malformed or truncated wire bytes, wrong method or content type.
    Protocol,
    /// Wire type code not present in the message registry.
    UnknownType,
    /// Reply or cancel referencing an unknown request id.
    Correlation,
    /// The workflow-engine client call failed.
    Engine,
    /// Internal programming error (e.g. JSON encode of an outbound property).
    Internal,
}

impl ClientCode {
    /// String representation used in error responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::Protocol => "PROTOCOL_ERROR",
            ClientCode::UnknownType => "UNKNOWN_TYPE",
            ClientCode::Correlation => "CORRELATION_ERROR",
            ClientCode::Engine => "ENGINE_ERROR",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, FlowgateError>;

/// Unified error type used by core and proxy.
#[derive(Debug, Error)]
pub enum FlowgateError {
    #[error("protocol: {0}")]
    Protocol(String),
    #[error("unexpected message type {0}")]
    UnknownType(i32),
    #[error("correlation: {0}")]
    Correlation(String),
    #[error("engine: {0}")]
    Engine(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl FlowgateError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            FlowgateError::Protocol(_) => ClientCode::Protocol,
            FlowgateError::UnknownType(_) => ClientCode::UnknownType,
            FlowgateError::Correlation(_) => ClientCode::Correlation,
            FlowgateError::Engine(_) => ClientCode::Engine,
            FlowgateError::Internal(_) => ClientCode::Internal,
        }
    }
}
