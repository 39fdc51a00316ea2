//! Activity message family.
//!
//! Execute asks the proxy to schedule an activity under a workflow context;
//! invoke is the proxy→library callback that runs the activity code;
//! complete and heartbeat act on an activity task by its opaque task token.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::{reply_message, request_message};

/// Options for scheduling an activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityOptions {
    /// Schedule-to-close timeout as 100-ns ticks; zero means engine default.
    #[serde(rename = "ScheduleToCloseTimeout", default)]
    pub schedule_to_close_ticks: i64,
    /// Heartbeat timeout as 100-ns ticks; zero disables heartbeating.
    #[serde(rename = "HeartbeatTimeout", default)]
    pub heartbeat_ticks: i64,
}

/// Registers an activity type name the library can execute.
#[derive(Debug, Clone)]
pub struct ActivityRegisterRequest {
    base: crate::message::base::ProxyRequestBase,
}

impl ActivityRegisterRequest {
    pub fn name(&self) -> Option<&str> {
        self.base.envelope.string_property("Name")
    }

    pub fn set_name(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("Name", value);
    }
}

request_message!(ActivityRegisterRequest => ActivityRegisterReply);

#[derive(Debug, Clone)]
pub struct ActivityRegisterReply {
    base: crate::message::base::ProxyReplyBase,
}

reply_message!(ActivityRegisterReply);

/// Library→proxy: schedule and run an activity under a workflow context.
#[derive(Debug, Clone)]
pub struct ActivityExecuteRequest {
    base: crate::message::base::ProxyRequestBase,
}

impl ActivityExecuteRequest {
    /// Parent workflow context id.
    pub fn context_id(&self) -> i64 {
        self.base.envelope.long_property("ContextId", 0)
    }

    pub fn set_context_id(&mut self, value: i64) {
        self.base.envelope.set_long_property("ContextId", value);
    }

    /// Activity type name.
    pub fn activity(&self) -> Option<&str> {
        self.base.envelope.string_property("Activity")
    }

    pub fn set_activity(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("Activity", value);
    }

    pub fn args(&self) -> Option<Vec<u8>> {
        self.base.envelope.bytes_property("Args")
    }

    pub fn set_args(&mut self, value: Option<&[u8]>) {
        self.base.envelope.set_bytes_property("Args", value);
    }

    pub fn options(&self) -> Option<ActivityOptions> {
        self.base.envelope.json_property("Options")
    }

    pub fn set_options(&mut self, value: &ActivityOptions) -> Result<()> {
        self.base.envelope.set_json_property("Options", value)
    }
}

request_message!(ActivityExecuteRequest => ActivityExecuteReply);

#[derive(Debug, Clone)]
pub struct ActivityExecuteReply {
    base: crate::message::base::ProxyReplyBase,
}

impl ActivityExecuteReply {
    pub fn result(&self) -> Option<Vec<u8>> {
        self.base.envelope.bytes_property("Result")
    }

    pub fn set_result(&mut self, value: Option<&[u8]>) {
        self.base.envelope.set_bytes_property("Result", value);
    }
}

reply_message!(ActivityExecuteReply);

/// Proxy→library: run the activity code for a minted activity context.
#[derive(Debug, Clone)]
pub struct ActivityInvokeRequest {
    base: crate::message::base::ProxyRequestBase,
}

impl ActivityInvokeRequest {
    /// Activity context id.
    pub fn context_id(&self) -> i64 {
        self.base.envelope.long_property("ContextId", 0)
    }

    pub fn set_context_id(&mut self, value: i64) {
        self.base.envelope.set_long_property("ContextId", value);
    }

    pub fn activity(&self) -> Option<&str> {
        self.base.envelope.string_property("Activity")
    }

    pub fn set_activity(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("Activity", value);
    }

    pub fn args(&self) -> Option<Vec<u8>> {
        self.base.envelope.bytes_property("Args")
    }

    pub fn set_args(&mut self, value: Option<&[u8]>) {
        self.base.envelope.set_bytes_property("Args", value);
    }
}

request_message!(ActivityInvokeRequest => ActivityInvokeReply);

#[derive(Debug, Clone)]
pub struct ActivityInvokeReply {
    base: crate::message::base::ProxyReplyBase,
}

impl ActivityInvokeReply {
    pub fn context_id(&self) -> i64 {
        self.base.envelope.long_property("ContextId", 0)
    }

    pub fn set_context_id(&mut self, value: i64) {
        self.base.envelope.set_long_property("ContextId", value);
    }

    pub fn result(&self) -> Option<Vec<u8>> {
        self.base.envelope.bytes_property("Result")
    }

    pub fn set_result(&mut self, value: Option<&[u8]>) {
        self.base.envelope.set_bytes_property("Result", value);
    }
}

reply_message!(ActivityInvokeReply);

/// Completes an activity task externally by its task token.
#[derive(Debug, Clone)]
pub struct ActivityCompleteRequest {
    base: crate::message::base::ProxyRequestBase,
}

impl ActivityCompleteRequest {
    pub fn task_token(&self) -> Option<Vec<u8>> {
        self.base.envelope.bytes_property("TaskToken")
    }

    pub fn set_task_token(&mut self, value: Option<&[u8]>) {
        self.base.envelope.set_bytes_property("TaskToken", value);
    }

    pub fn result(&self) -> Option<Vec<u8>> {
        self.base.envelope.bytes_property("Result")
    }

    pub fn set_result(&mut self, value: Option<&[u8]>) {
        self.base.envelope.set_bytes_property("Result", value);
    }
}

request_message!(ActivityCompleteRequest => ActivityCompleteReply);

#[derive(Debug, Clone)]
pub struct ActivityCompleteReply {
    base: crate::message::base::ProxyReplyBase,
}

reply_message!(ActivityCompleteReply);

/// Records liveness for a long-running activity task.
#[derive(Debug, Clone)]
pub struct ActivityRecordHeartbeatRequest {
    base: crate::message::base::ProxyRequestBase,
}

impl ActivityRecordHeartbeatRequest {
    pub fn task_token(&self) -> Option<Vec<u8>> {
        self.base.envelope.bytes_property("TaskToken")
    }

    pub fn set_task_token(&mut self, value: Option<&[u8]>) {
        self.base.envelope.set_bytes_property("TaskToken", value);
    }

    pub fn details(&self) -> Option<Vec<u8>> {
        self.base.envelope.bytes_property("Details")
    }

    pub fn set_details(&mut self, value: Option<&[u8]>) {
        self.base.envelope.set_bytes_property("Details", value);
    }
}

request_message!(ActivityRecordHeartbeatRequest => ActivityRecordHeartbeatReply);

#[derive(Debug, Clone)]
pub struct ActivityRecordHeartbeatReply {
    base: crate::message::base::ProxyReplyBase,
}

reply_message!(ActivityRecordHeartbeatReply);
