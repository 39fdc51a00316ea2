//! Workflow message family.
//!
//! Execute/signal/cancel/terminate run against the engine directly;
//! invoke/disconnect manage the proxy-minted workflow contexts; the child
//! messages operate on the per-parent child-context id space. Binary
//! arguments and results travel as base64 byte properties; option structs
//! and execution handles are JSON-boxed.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::{reply_message, request_message};

/// Engine-side handle to a started workflow execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowExecution {
    #[serde(rename = "Id")]
    pub workflow_id: String,
    #[serde(rename = "RunId")]
    pub run_id: String,
}

/// Options for starting a workflow (top-level or child).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowOptions {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    #[serde(rename = "TaskList", default, skip_serializing_if = "Option::is_none")]
    pub task_list: Option<String>,
    /// Start-to-close timeout as 100-ns ticks; zero means engine default.
    #[serde(rename = "ExecutionStartToCloseTimeout", default)]
    pub execution_timeout_ticks: i64,
}

/// Lifecycle state reported by describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowStatus {
    Running,
    Completed,
    Failed,
    Cancelled,
    Terminated,
}

/// Snapshot of an execution returned by describe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDescription {
    #[serde(rename = "Execution")]
    pub execution: WorkflowExecution,
    #[serde(rename = "WorkflowType")]
    pub workflow_type: String,
    #[serde(rename = "Status")]
    pub status: WorkflowStatus,
}

/// Registers a workflow type name the library can execute.
#[derive(Debug, Clone)]
pub struct WorkflowRegisterRequest {
    base: crate::message::base::ProxyRequestBase,
}

impl WorkflowRegisterRequest {
    pub fn name(&self) -> Option<&str> {
        self.base.envelope.string_property("Name")
    }

    pub fn set_name(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("Name", value);
    }
}

request_message!(WorkflowRegisterRequest => WorkflowRegisterReply);

#[derive(Debug, Clone)]
pub struct WorkflowRegisterReply {
    base: crate::message::base::ProxyReplyBase,
}

reply_message!(WorkflowRegisterReply);

/// Starts a workflow execution on the engine.
#[derive(Debug, Clone)]
pub struct WorkflowExecuteRequest {
    base: crate::message::base::ProxyRequestBase,
}

impl WorkflowExecuteRequest {
    pub fn domain(&self) -> Option<&str> {
        self.base.envelope.string_property("Domain")
    }

    pub fn set_domain(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("Domain", value);
    }

    /// Workflow type name.
    pub fn workflow(&self) -> Option<&str> {
        self.base.envelope.string_property("Workflow")
    }

    pub fn set_workflow(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("Workflow", value);
    }

    pub fn args(&self) -> Option<Vec<u8>> {
        self.base.envelope.bytes_property("Args")
    }

    pub fn set_args(&mut self, value: Option<&[u8]>) {
        self.base.envelope.set_bytes_property("Args", value);
    }

    pub fn options(&self) -> Option<WorkflowOptions> {
        self.base.envelope.json_property("Options")
    }

    pub fn set_options(&mut self, value: &WorkflowOptions) -> Result<()> {
        self.base.envelope.set_json_property("Options", value)
    }
}

request_message!(WorkflowExecuteRequest => WorkflowExecuteReply);

#[derive(Debug, Clone)]
pub struct WorkflowExecuteReply {
    base: crate::message::base::ProxyReplyBase,
}

impl WorkflowExecuteReply {
    pub fn execution(&self) -> Option<WorkflowExecution> {
        self.base.envelope.json_property("Execution")
    }

    pub fn set_execution(&mut self, value: &WorkflowExecution) -> Result<()> {
        self.base.envelope.set_json_property("Execution", value)
    }

    /// Proxy-minted context id for the new execution scope.
    pub fn context_id(&self) -> i64 {
        self.base.envelope.long_property("ContextId", 0)
    }

    pub fn set_context_id(&mut self, value: i64) {
        self.base.envelope.set_long_property("ContextId", value);
    }
}

reply_message!(WorkflowExecuteReply);

/// Proxy→library: run the workflow code for a context.
#[derive(Debug, Clone)]
pub struct WorkflowInvokeRequest {
    base: crate::message::base::ProxyRequestBase,
}

impl WorkflowInvokeRequest {
    pub fn context_id(&self) -> i64 {
        self.base.envelope.long_property("ContextId", 0)
    }

    pub fn set_context_id(&mut self, value: i64) {
        self.base.envelope.set_long_property("ContextId", value);
    }

    /// Workflow type name.
    pub fn name(&self) -> Option<&str> {
        self.base.envelope.string_property("Name")
    }

    pub fn set_name(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("Name", value);
    }

    pub fn domain(&self) -> Option<&str> {
        self.base.envelope.string_property("Domain")
    }

    pub fn set_domain(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("Domain", value);
    }

    pub fn args(&self) -> Option<Vec<u8>> {
        self.base.envelope.bytes_property("Args")
    }

    pub fn set_args(&mut self, value: Option<&[u8]>) {
        self.base.envelope.set_bytes_property("Args", value);
    }
}

request_message!(WorkflowInvokeRequest => WorkflowInvokeReply);

#[derive(Debug, Clone)]
pub struct WorkflowInvokeReply {
    base: crate::message::base::ProxyReplyBase,
}

impl WorkflowInvokeReply {
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

reply_message!(WorkflowInvokeReply);

/// Delivers a signal to a running execution.
#[derive(Debug, Clone)]
pub struct WorkflowSignalRequest {
    base: crate::message::base::ProxyRequestBase,
}

impl WorkflowSignalRequest {
    pub fn domain(&self) -> Option<&str> {
        self.base.envelope.string_property("Domain")
    }

    pub fn set_domain(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("Domain", value);
    }

    pub fn workflow_id(&self) -> Option<&str> {
        self.base.envelope.string_property("WorkflowId")
    }

    pub fn set_workflow_id(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("WorkflowId", value);
    }

    pub fn run_id(&self) -> Option<&str> {
        self.base.envelope.string_property("RunId")
    }

    pub fn set_run_id(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("RunId", value);
    }

    pub fn signal_name(&self) -> Option<&str> {
        self.base.envelope.string_property("SignalName")
    }

    pub fn set_signal_name(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("SignalName", value);
    }

    pub fn signal_args(&self) -> Option<Vec<u8>> {
        self.base.envelope.bytes_property("SignalArgs")
    }

    pub fn set_signal_args(&mut self, value: Option<&[u8]>) {
        self.base.envelope.set_bytes_property("SignalArgs", value);
    }
}

request_message!(WorkflowSignalRequest => WorkflowSignalReply);

#[derive(Debug, Clone)]
pub struct WorkflowSignalReply {
    base: crate::message::base::ProxyReplyBase,
}

reply_message!(WorkflowSignalReply);

/// Requests cooperative cancellation of an execution.
#[derive(Debug, Clone)]
pub struct WorkflowCancelRequest {
    base: crate::message::base::ProxyRequestBase,
}

impl WorkflowCancelRequest {
    pub fn domain(&self) -> Option<&str> {
        self.base.envelope.string_property("Domain")
    }

    pub fn set_domain(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("Domain", value);
    }

    pub fn workflow_id(&self) -> Option<&str> {
        self.base.envelope.string_property("WorkflowId")
    }

    pub fn set_workflow_id(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("WorkflowId", value);
    }

    pub fn run_id(&self) -> Option<&str> {
        self.base.envelope.string_property("RunId")
    }

    pub fn set_run_id(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("RunId", value);
    }
}

request_message!(WorkflowCancelRequest => WorkflowCancelReply);

#[derive(Debug, Clone)]
pub struct WorkflowCancelReply {
    base: crate::message::base::ProxyReplyBase,
}

reply_message!(WorkflowCancelReply);

/// Forcibly terminates an execution.
#[derive(Debug, Clone)]
pub struct WorkflowTerminateRequest {
    base: crate::message::base::ProxyRequestBase,
}

impl WorkflowTerminateRequest {
    pub fn domain(&self) -> Option<&str> {
        self.base.envelope.string_property("Domain")
    }

    pub fn set_domain(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("Domain", value);
    }

    pub fn workflow_id(&self) -> Option<&str> {
        self.base.envelope.string_property("WorkflowId")
    }

    pub fn set_workflow_id(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("WorkflowId", value);
    }

    pub fn run_id(&self) -> Option<&str> {
        self.base.envelope.string_property("RunId")
    }

    pub fn set_run_id(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("RunId", value);
    }

    pub fn reason(&self) -> Option<&str> {
        self.base.envelope.string_property("Reason")
    }

    pub fn set_reason(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("Reason", value);
    }

    pub fn details(&self) -> Option<Vec<u8>> {
        self.base.envelope.bytes_property("Details")
    }

    pub fn set_details(&mut self, value: Option<&[u8]>) {
        self.base.envelope.set_bytes_property("Details", value);
    }
}

request_message!(WorkflowTerminateRequest => WorkflowTerminateReply);

#[derive(Debug, Clone)]
pub struct WorkflowTerminateReply {
    base: crate::message::base::ProxyReplyBase,
}

reply_message!(WorkflowTerminateReply);

/// Tears down a proxy-minted workflow context.
#[derive(Debug, Clone)]
pub struct WorkflowDisconnectContextRequest {
    base: crate::message::base::ProxyRequestBase,
}

impl WorkflowDisconnectContextRequest {
    pub fn context_id(&self) -> i64 {
        self.base.envelope.long_property("ContextId", 0)
    }

    pub fn set_context_id(&mut self, value: i64) {
        self.base.envelope.set_long_property("ContextId", value);
    }
}

request_message!(WorkflowDisconnectContextRequest => WorkflowDisconnectContextReply);

#[derive(Debug, Clone)]
pub struct WorkflowDisconnectContextReply {
    base: crate::message::base::ProxyReplyBase,
}

reply_message!(WorkflowDisconnectContextReply);

#[derive(Debug, Clone)]
pub struct WorkflowDescribeExecutionRequest {
    base: crate::message::base::ProxyRequestBase,
}

impl WorkflowDescribeExecutionRequest {
    pub fn domain(&self) -> Option<&str> {
        self.base.envelope.string_property("Domain")
    }

    pub fn set_domain(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("Domain", value);
    }

    pub fn workflow_id(&self) -> Option<&str> {
        self.base.envelope.string_property("WorkflowId")
    }

    pub fn set_workflow_id(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("WorkflowId", value);
    }

    pub fn run_id(&self) -> Option<&str> {
        self.base.envelope.string_property("RunId")
    }

    pub fn set_run_id(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("RunId", value);
    }
}

request_message!(WorkflowDescribeExecutionRequest => WorkflowDescribeExecutionReply);

#[derive(Debug, Clone)]
pub struct WorkflowDescribeExecutionReply {
    base: crate::message::base::ProxyReplyBase,
}

impl WorkflowDescribeExecutionReply {
    pub fn details(&self) -> Option<WorkflowDescription> {
        self.base.envelope.json_property("Details")
    }

    pub fn set_details(&mut self, value: &WorkflowDescription) -> Result<()> {
        self.base.envelope.set_json_property("Details", value)
    }
}

reply_message!(WorkflowDescribeExecutionReply);

/// Starts a child workflow under a parent context.
#[derive(Debug, Clone)]
pub struct WorkflowExecuteChildRequest {
    base: crate::message::base::ProxyRequestBase,
}

impl WorkflowExecuteChildRequest {
    /// Parent workflow context id.
    pub fn context_id(&self) -> i64 {
        self.base.envelope.long_property("ContextId", 0)
    }

    pub fn set_context_id(&mut self, value: i64) {
        self.base.envelope.set_long_property("ContextId", value);
    }

    pub fn workflow(&self) -> Option<&str> {
        self.base.envelope.string_property("Workflow")
    }

    pub fn set_workflow(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("Workflow", value);
    }

    pub fn args(&self) -> Option<Vec<u8>> {
        self.base.envelope.bytes_property("Args")
    }

    pub fn set_args(&mut self, value: Option<&[u8]>) {
        self.base.envelope.set_bytes_property("Args", value);
    }

    pub fn options(&self) -> Option<WorkflowOptions> {
        self.base.envelope.json_property("Options")
    }

    pub fn set_options(&mut self, value: &WorkflowOptions) -> Result<()> {
        self.base.envelope.set_json_property("Options", value)
    }
}

request_message!(WorkflowExecuteChildRequest => WorkflowExecuteChildReply);

#[derive(Debug, Clone)]
pub struct WorkflowExecuteChildReply {
    base: crate::message::base::ProxyReplyBase,
}

impl WorkflowExecuteChildReply {
    /// Child id within the parent context's id space.
    pub fn child_id(&self) -> i64 {
        self.base.envelope.long_property("ChildId", 0)
    }

    pub fn set_child_id(&mut self, value: i64) {
        self.base.envelope.set_long_property("ChildId", value);
    }

    pub fn execution(&self) -> Option<WorkflowExecution> {
        self.base.envelope.json_property("Execution")
    }

    pub fn set_execution(&mut self, value: &WorkflowExecution) -> Result<()> {
        self.base.envelope.set_json_property("Execution", value)
    }
}

reply_message!(WorkflowExecuteChildReply);

/// Blocks until a child completes, yielding its result.
#[derive(Debug, Clone)]
pub struct WorkflowWaitForChildRequest {
    base: crate::message::base::ProxyRequestBase,
}

impl WorkflowWaitForChildRequest {
    pub fn context_id(&self) -> i64 {
        self.base.envelope.long_property("ContextId", 0)
    }

    pub fn set_context_id(&mut self, value: i64) {
        self.base.envelope.set_long_property("ContextId", value);
    }

    pub fn child_id(&self) -> i64 {
        self.base.envelope.long_property("ChildId", 0)
    }

    pub fn set_child_id(&mut self, value: i64) {
        self.base.envelope.set_long_property("ChildId", value);
    }
}

request_message!(WorkflowWaitForChildRequest => WorkflowWaitForChildReply);

#[derive(Debug, Clone)]
pub struct WorkflowWaitForChildReply {
    base: crate::message::base::ProxyReplyBase,
}

impl WorkflowWaitForChildReply {
    pub fn result(&self) -> Option<Vec<u8>> {
        self.base.envelope.bytes_property("Result")
    }

    pub fn set_result(&mut self, value: Option<&[u8]>) {
        self.base.envelope.set_bytes_property("Result", value);
    }
}

reply_message!(WorkflowWaitForChildReply);

#[derive(Debug, Clone)]
pub struct WorkflowSignalChildRequest {
    base: crate::message::base::ProxyRequestBase,
}

impl WorkflowSignalChildRequest {
    pub fn context_id(&self) -> i64 {
        self.base.envelope.long_property("ContextId", 0)
    }

    pub fn set_context_id(&mut self, value: i64) {
        self.base.envelope.set_long_property("ContextId", value);
    }

    pub fn child_id(&self) -> i64 {
        self.base.envelope.long_property("ChildId", 0)
    }

    pub fn set_child_id(&mut self, value: i64) {
        self.base.envelope.set_long_property("ChildId", value);
    }

    pub fn signal_name(&self) -> Option<&str> {
        self.base.envelope.string_property("SignalName")
    }

    pub fn set_signal_name(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("SignalName", value);
    }

    pub fn signal_args(&self) -> Option<Vec<u8>> {
        self.base.envelope.bytes_property("SignalArgs")
    }

    pub fn set_signal_args(&mut self, value: Option<&[u8]>) {
        self.base.envelope.set_bytes_property("SignalArgs", value);
    }
}

request_message!(WorkflowSignalChildRequest => WorkflowSignalChildReply);

#[derive(Debug, Clone)]
pub struct WorkflowSignalChildReply {
    base: crate::message::base::ProxyReplyBase,
}

reply_message!(WorkflowSignalChildReply);

#[derive(Debug, Clone)]
pub struct WorkflowCancelChildRequest {
    base: crate::message::base::ProxyRequestBase,
}

impl WorkflowCancelChildRequest {
    pub fn context_id(&self) -> i64 {
        self.base.envelope.long_property("ContextId", 0)
    }

    pub fn set_context_id(&mut self, value: i64) {
        self.base.envelope.set_long_property("ContextId", value);
    }

    pub fn child_id(&self) -> i64 {
        self.base.envelope.long_property("ChildId", 0)
    }

    pub fn set_child_id(&mut self, value: i64) {
        self.base.envelope.set_long_property("ChildId", value);
    }
}

request_message!(WorkflowCancelChildRequest => WorkflowCancelChildReply);

#[derive(Debug, Clone)]
pub struct WorkflowCancelChildReply {
    base: crate::message::base::ProxyReplyBase,
}

impl WorkflowCancelChildReply {
    pub fn was_cancelled(&self) -> bool {
        self.base.envelope.bool_property("WasCancelled", false)
    }

    pub fn set_was_cancelled(&mut self, value: bool) {
        self.base.envelope.set_bool_property("WasCancelled", value);
    }
}

reply_message!(WorkflowCancelChildReply);
