//! Wire type codes for proxy messages.
//!
//! Codes are banded by family so a dump of raw traffic is easy to eyeball:
//! client/connection messages start at 1, domain management at 50, workflow
//! operations at 100, activity operations at 200. Code 0 is reserved for
//! unspecified/invalid and is rejected by the codec unless explicitly allowed.

/// Wire discriminant for every concrete proxy message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum MessageType {
    Unspecified = 0,

    // client / connection
    InitializeRequest = 1,
    InitializeReply = 2,
    ConnectRequest = 3,
    ConnectReply = 4,
    HeartbeatRequest = 5,
    HeartbeatReply = 6,
    CancelRequest = 7,
    CancelReply = 8,
    TerminateRequest = 9,
    TerminateReply = 10,

    // domain management
    DomainRegisterRequest = 50,
    DomainRegisterReply = 51,
    DomainDescribeRequest = 52,
    DomainDescribeReply = 53,

    // workflow
    WorkflowRegisterRequest = 100,
    WorkflowRegisterReply = 101,
    WorkflowExecuteRequest = 102,
    WorkflowExecuteReply = 103,
    WorkflowInvokeRequest = 104,
    WorkflowInvokeReply = 105,
    WorkflowSignalRequest = 106,
    WorkflowSignalReply = 107,
    WorkflowCancelRequest = 108,
    WorkflowCancelReply = 109,
    WorkflowTerminateRequest = 110,
    WorkflowTerminateReply = 111,
    WorkflowDisconnectContextRequest = 112,
    WorkflowDisconnectContextReply = 113,
    WorkflowDescribeExecutionRequest = 114,
    WorkflowDescribeExecutionReply = 115,
    WorkflowExecuteChildRequest = 116,
    WorkflowExecuteChildReply = 117,
    WorkflowWaitForChildRequest = 118,
    WorkflowWaitForChildReply = 119,
    WorkflowSignalChildRequest = 120,
    WorkflowSignalChildReply = 121,
    WorkflowCancelChildRequest = 122,
    WorkflowCancelChildReply = 123,

    // activity
    ActivityRegisterRequest = 200,
    ActivityRegisterReply = 201,
    ActivityExecuteRequest = 202,
    ActivityExecuteReply = 203,
    ActivityInvokeRequest = 204,
    ActivityInvokeReply = 205,
    ActivityCompleteRequest = 206,
    ActivityCompleteReply = 207,
    ActivityRecordHeartbeatRequest = 208,
    ActivityRecordHeartbeatReply = 209,
}

impl MessageType {
    /// Resolve a raw wire code. Unknown codes return `None`; the caller
    /// decides whether that is a protocol error or a diagnostic bypass.
    pub fn from_code(code: i32) -> Option<MessageType> {
        use MessageType::*;
        let ty = match code {
            0 => Unspecified,
            1 => InitializeRequest,
            2 => InitializeReply,
            3 => ConnectRequest,
            4 => ConnectReply,
            5 => HeartbeatRequest,
            6 => HeartbeatReply,
            7 => CancelRequest,
            8 => CancelReply,
            9 => TerminateRequest,
            10 => TerminateReply,
            50 => DomainRegisterRequest,
            51 => DomainRegisterReply,
            52 => DomainDescribeRequest,
            53 => DomainDescribeReply,
            100 => WorkflowRegisterRequest,
            101 => WorkflowRegisterReply,
            102 => WorkflowExecuteRequest,
            103 => WorkflowExecuteReply,
            104 => WorkflowInvokeRequest,
            105 => WorkflowInvokeReply,
            106 => WorkflowSignalRequest,
            107 => WorkflowSignalReply,
            108 => WorkflowCancelRequest,
            109 => WorkflowCancelReply,
            110 => WorkflowTerminateRequest,
            111 => WorkflowTerminateReply,
            112 => WorkflowDisconnectContextRequest,
            113 => WorkflowDisconnectContextReply,
            114 => WorkflowDescribeExecutionRequest,
            115 => WorkflowDescribeExecutionReply,
            116 => WorkflowExecuteChildRequest,
            117 => WorkflowExecuteChildReply,
            118 => WorkflowWaitForChildRequest,
            119 => WorkflowWaitForChildReply,
            120 => WorkflowSignalChildRequest,
            121 => WorkflowSignalChildReply,
            122 => WorkflowCancelChildRequest,
            123 => WorkflowCancelChildReply,
            200 => ActivityRegisterRequest,
            201 => ActivityRegisterReply,
            202 => ActivityExecuteRequest,
            203 => ActivityExecuteReply,
            204 => ActivityInvokeRequest,
            205 => ActivityInvokeReply,
            206 => ActivityCompleteRequest,
            207 => ActivityCompleteReply,
            208 => ActivityRecordHeartbeatRequest,
            209 => ActivityRecordHeartbeatReply,
            _ => return None,
        };
        Some(ty)
    }

    /// Raw wire code.
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}
