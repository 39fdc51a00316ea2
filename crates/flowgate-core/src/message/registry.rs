//! Registry mapping wire type codes to concrete message factories.
//!
//! The registry is an explicit object populated once at process start
//! (`MessageRegistry::with_builtin`) and injected into the codec — never
//! ambient global state with import-order side effects. Factories always
//! build fresh instances, so concurrent decodes of the same type share no
//! mutable state.

use dashmap::DashMap;

use crate::error::{FlowgateError, Result};
use crate::message::{activity, client, domain, workflow, ProxyMessage};
use crate::protocol::MessageType;

type Factory = fn() -> Box<dyn ProxyMessage>;

#[derive(Default)]
pub struct MessageRegistry {
    factories: DashMap<i32, Factory>,
}

impl MessageRegistry {
    /// An empty registry. Useful in tests exercising unknown-type handling.
    pub fn new() -> Self {
        Self {
            factories: DashMap::new(),
        }
    }

    /// A registry with every concrete message type registered.
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        registry.register_builtin();
        registry
    }

    pub fn register(&self, ty: MessageType, factory: Factory) {
        self.factories.insert(ty.code(), factory);
    }

    /// Build a fresh, empty instance of the message registered under `code`.
    pub fn produce(&self, code: i32) -> Result<Box<dyn ProxyMessage>> {
        let factory = *self
            .factories
            .get(&code)
            .ok_or(FlowgateError::UnknownType(code))?;
        Ok(factory())
    }

    pub fn is_registered(&self, code: i32) -> bool {
        self.factories.contains_key(&code)
    }

    pub fn registered_types(&self) -> Vec<i32> {
        self.factories.iter().map(|e| *e.key()).collect()
    }

    fn register_builtin(&self) {
        use MessageType as T;

        // client / connection
        self.register(T::InitializeRequest, || {
            Box::new(client::InitializeRequest::new())
        });
        self.register(T::InitializeReply, || {
            Box::new(client::InitializeReply::new())
        });
        self.register(T::ConnectRequest, || Box::new(client::ConnectRequest::new()));
        self.register(T::ConnectReply, || Box::new(client::ConnectReply::new()));
        self.register(T::HeartbeatRequest, || {
            Box::new(client::HeartbeatRequest::new())
        });
        self.register(T::HeartbeatReply, || Box::new(client::HeartbeatReply::new()));
        self.register(T::CancelRequest, || Box::new(client::CancelRequest::new()));
        self.register(T::CancelReply, || Box::new(client::CancelReply::new()));
        self.register(T::TerminateRequest, || {
            Box::new(client::TerminateRequest::new())
        });
        self.register(T::TerminateReply, || Box::new(client::TerminateReply::new()));

        // domain management
        self.register(T::DomainRegisterRequest, || {
            Box::new(domain::DomainRegisterRequest::new())
        });
        self.register(T::DomainRegisterReply, || {
            Box::new(domain::DomainRegisterReply::new())
        });
        self.register(T::DomainDescribeRequest, || {
            Box::new(domain::DomainDescribeRequest::new())
        });
        self.register(T::DomainDescribeReply, || {
            Box::new(domain::DomainDescribeReply::new())
        });

        // workflow
        self.register(T::WorkflowRegisterRequest, || {
            Box::new(workflow::WorkflowRegisterRequest::new())
        });
        self.register(T::WorkflowRegisterReply, || {
            Box::new(workflow::WorkflowRegisterReply::new())
        });
        self.register(T::WorkflowExecuteRequest, || {
            Box::new(workflow::WorkflowExecuteRequest::new())
        });
        self.register(T::WorkflowExecuteReply, || {
            Box::new(workflow::WorkflowExecuteReply::new())
        });
        self.register(T::WorkflowInvokeRequest, || {
            Box::new(workflow::WorkflowInvokeRequest::new())
        });
        self.register(T::WorkflowInvokeReply, || {
            Box::new(workflow::WorkflowInvokeReply::new())
        });
        self.register(T::WorkflowSignalRequest, || {
            Box::new(workflow::WorkflowSignalRequest::new())
        });
        self.register(T::WorkflowSignalReply, || {
            Box::new(workflow::WorkflowSignalReply::new())
        });
        self.register(T::WorkflowCancelRequest, || {
            Box::new(workflow::WorkflowCancelRequest::new())
        });
        self.register(T::WorkflowCancelReply, || {
            Box::new(workflow::WorkflowCancelReply::new())
        });
        self.register(T::WorkflowTerminateRequest, || {
            Box::new(workflow::WorkflowTerminateRequest::new())
        });
        self.register(T::WorkflowTerminateReply, || {
            Box::new(workflow::WorkflowTerminateReply::new())
        });
        self.register(T::WorkflowDisconnectContextRequest, || {
            Box::new(workflow::WorkflowDisconnectContextRequest::new())
        });
        self.register(T::WorkflowDisconnectContextReply, || {
            Box::new(workflow::WorkflowDisconnectContextReply::new())
        });
        self.register(T::WorkflowDescribeExecutionRequest, || {
            Box::new(workflow::WorkflowDescribeExecutionRequest::new())
        });
        self.register(T::WorkflowDescribeExecutionReply, || {
            Box::new(workflow::WorkflowDescribeExecutionReply::new())
        });
        self.register(T::WorkflowExecuteChildRequest, || {
            Box::new(workflow::WorkflowExecuteChildRequest::new())
        });
        self.register(T::WorkflowExecuteChildReply, || {
            Box::new(workflow::WorkflowExecuteChildReply::new())
        });
        self.register(T::WorkflowWaitForChildRequest, || {
            Box::new(workflow::WorkflowWaitForChildRequest::new())
        });
        self.register(T::WorkflowWaitForChildReply, || {
            Box::new(workflow::WorkflowWaitForChildReply::new())
        });
        self.register(T::WorkflowSignalChildRequest, || {
            Box::new(workflow::WorkflowSignalChildRequest::new())
        });
        self.register(T::WorkflowSignalChildReply, || {
            Box::new(workflow::WorkflowSignalChildReply::new())
        });
        self.register(T::WorkflowCancelChildRequest, || {
            Box::new(workflow::WorkflowCancelChildRequest::new())
        });
        self.register(T::WorkflowCancelChildReply, || {
            Box::new(workflow::WorkflowCancelChildReply::new())
        });

        // activity
        self.register(T::ActivityRegisterRequest, || {
            Box::new(activity::ActivityRegisterRequest::new())
        });
        self.register(T::ActivityRegisterReply, || {
            Box::new(activity::ActivityRegisterReply::new())
        });
        self.register(T::ActivityExecuteRequest, || {
            Box::new(activity::ActivityExecuteRequest::new())
        });
        self.register(T::ActivityExecuteReply, || {
            Box::new(activity::ActivityExecuteReply::new())
        });
        self.register(T::ActivityInvokeRequest, || {
            Box::new(activity::ActivityInvokeRequest::new())
        });
        self.register(T::ActivityInvokeReply, || {
            Box::new(activity::ActivityInvokeReply::new())
        });
        self.register(T::ActivityCompleteRequest, || {
            Box::new(activity::ActivityCompleteRequest::new())
        });
        self.register(T::ActivityCompleteReply, || {
            Box::new(activity::ActivityCompleteReply::new())
        });
        self.register(T::ActivityRecordHeartbeatRequest, || {
            Box::new(activity::ActivityRecordHeartbeatRequest::new())
        });
        self.register(T::ActivityRecordHeartbeatReply, || {
            Box::new(activity::ActivityRecordHeartbeatReply::new())
        });
    }
}
