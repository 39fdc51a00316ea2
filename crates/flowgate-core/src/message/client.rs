//! Client/connection message family.
//!
//! These messages manage the proxy lifecycle itself: the library announces
//! its reply endpoint (`InitializeRequest`), establishes the engine
//! connection (`ConnectRequest`), keeps the channel alive
//! (`HeartbeatRequest`), aborts in-flight cancellable operations
//! (`CancelRequest`), and shuts the proxy down (`TerminateRequest`).

use std::time::Duration;

use crate::message::{reply_message, request_message};

/// Announces the address and port the host library listens on for
/// proxy-initiated requests.
#[derive(Debug, Clone)]
pub struct InitializeRequest {
    base: crate::message::base::ProxyRequestBase,
}

impl InitializeRequest {
    pub fn library_address(&self) -> Option<&str> {
        self.base.envelope.string_property("LibraryAddress")
    }

    pub fn set_library_address(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("LibraryAddress", value);
    }

    pub fn library_port(&self) -> i32 {
        self.base.envelope.int_property("LibraryPort", 0)
    }

    pub fn set_library_port(&mut self, value: i32) {
        self.base.envelope.set_int_property("LibraryPort", value);
    }
}

request_message!(InitializeRequest => InitializeReply);

#[derive(Debug, Clone)]
pub struct InitializeReply {
    base: crate::message::base::ProxyReplyBase,
}

reply_message!(InitializeReply);

/// Establishes (or re-establishes) the connection to the engine cluster.
#[derive(Debug, Clone)]
pub struct ConnectRequest {
    base: crate::message::base::ProxyRequestBase,
}

impl ConnectRequest {
    /// Comma-separated `host:port` pairs for the engine cluster.
    pub fn endpoints(&self) -> Option<&str> {
        self.base.envelope.string_property("Endpoints")
    }

    pub fn set_endpoints(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("Endpoints", value);
    }

    pub fn identity(&self) -> Option<&str> {
        self.base.envelope.string_property("Identity")
    }

    pub fn set_identity(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("Identity", value);
    }

    pub fn client_timeout(&self) -> Duration {
        self.base
            .envelope
            .timespan_property("ClientTimeout", Duration::ZERO)
    }

    pub fn set_client_timeout(&mut self, value: Duration) {
        self.base.envelope.set_timespan_property("ClientTimeout", value);
    }

    pub fn domain(&self) -> Option<&str> {
        self.base.envelope.string_property("Domain")
    }

    pub fn set_domain(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("Domain", value);
    }

    /// Register the default domain during connect when it does not exist.
    pub fn create_domain(&self) -> bool {
        self.base.envelope.bool_property("CreateDomain", false)
    }

    pub fn set_create_domain(&mut self, value: bool) {
        self.base.envelope.set_bool_property("CreateDomain", value);
    }

    pub fn retries(&self) -> i32 {
        self.base.envelope.int_property("Retries", 0)
    }

    pub fn set_retries(&mut self, value: i32) {
        self.base.envelope.set_int_property("Retries", value);
    }

    pub fn retry_delay(&self) -> Duration {
        self.base
            .envelope
            .timespan_property("RetryDelay", Duration::ZERO)
    }

    pub fn set_retry_delay(&mut self, value: Duration) {
        self.base.envelope.set_timespan_property("RetryDelay", value);
    }
}

request_message!(ConnectRequest => ConnectReply);

#[derive(Debug, Clone)]
pub struct ConnectReply {
    base: crate::message::base::ProxyReplyBase,
}

reply_message!(ConnectReply);

#[derive(Debug, Clone)]
pub struct HeartbeatRequest {
    base: crate::message::base::ProxyRequestBase,
}

request_message!(HeartbeatRequest => HeartbeatReply);

#[derive(Debug, Clone)]
pub struct HeartbeatReply {
    base: crate::message::base::ProxyReplyBase,
}

reply_message!(HeartbeatReply);

/// Cancels an in-flight cancellable operation by its request id.
#[derive(Debug, Clone)]
pub struct CancelRequest {
    base: crate::message::base::ProxyRequestBase,
}

impl CancelRequest {
    pub fn target_request_id(&self) -> i64 {
        self.base.envelope.long_property("TargetRequestId", 0)
    }

    pub fn set_target_request_id(&mut self, value: i64) {
        self.base
            .envelope
            .set_long_property("TargetRequestId", value);
    }
}

request_message!(CancelRequest => CancelReply);

#[derive(Debug, Clone)]
pub struct CancelReply {
    base: crate::message::base::ProxyReplyBase,
}

impl CancelReply {
    /// False when the target had already completed or was never registered.
    pub fn was_cancelled(&self) -> bool {
        self.base.envelope.bool_property("WasCancelled", false)
    }

    pub fn set_was_cancelled(&mut self, value: bool) {
        self.base.envelope.set_bool_property("WasCancelled", value);
    }
}

reply_message!(CancelReply);

/// Asks the proxy to finish in-flight work and shut down gracefully.
#[derive(Debug, Clone)]
pub struct TerminateRequest {
    base: crate::message::base::ProxyRequestBase,
}

request_message!(TerminateRequest => TerminateReply);

#[derive(Debug, Clone)]
pub struct TerminateReply {
    base: crate::message::base::ProxyReplyBase,
}

reply_message!(TerminateReply);
