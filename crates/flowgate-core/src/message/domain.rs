//! Domain management message family.

use crate::message::{reply_message, request_message};

/// Registers a new domain with the engine cluster.
#[derive(Debug, Clone)]
pub struct DomainRegisterRequest {
    base: crate::message::base::ProxyRequestBase,
}

impl DomainRegisterRequest {
    pub fn name(&self) -> Option<&str> {
        self.base.envelope.string_property("Name")
    }

    pub fn set_name(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("Name", value);
    }

    pub fn description(&self) -> Option<&str> {
        self.base.envelope.string_property("Description")
    }

    pub fn set_description(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("Description", value);
    }

    pub fn owner_email(&self) -> Option<&str> {
        self.base.envelope.string_property("OwnerEmail")
    }

    pub fn set_owner_email(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("OwnerEmail", value);
    }

    pub fn retention_days(&self) -> i32 {
        self.base.envelope.int_property("RetentionDays", 0)
    }

    pub fn set_retention_days(&mut self, value: i32) {
        self.base.envelope.set_int_property("RetentionDays", value);
    }
}

request_message!(DomainRegisterRequest => DomainRegisterReply);

#[derive(Debug, Clone)]
pub struct DomainRegisterReply {
    base: crate::message::base::ProxyReplyBase,
}

reply_message!(DomainRegisterReply);

#[derive(Debug, Clone)]
pub struct DomainDescribeRequest {
    base: crate::message::base::ProxyRequestBase,
}

impl DomainDescribeRequest {
    pub fn name(&self) -> Option<&str> {
        self.base.envelope.string_property("Name")
    }

    pub fn set_name(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("Name", value);
    }
}

request_message!(DomainDescribeRequest => DomainDescribeReply);

#[derive(Debug, Clone)]
pub struct DomainDescribeReply {
    base: crate::message::base::ProxyReplyBase,
}

impl DomainDescribeReply {
    pub fn domain_name(&self) -> Option<&str> {
        self.base.envelope.string_property("DomainName")
    }

    pub fn set_domain_name(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("DomainName", value);
    }

    pub fn domain_description(&self) -> Option<&str> {
        self.base.envelope.string_property("DomainDescription")
    }

    pub fn set_domain_description(&mut self, value: Option<&str>) {
        self.base
            .envelope
            .set_string_property("DomainDescription", value);
    }

    pub fn domain_owner_email(&self) -> Option<&str> {
        self.base.envelope.string_property("DomainOwnerEmail")
    }

    pub fn set_domain_owner_email(&mut self, value: Option<&str>) {
        self.base
            .envelope
            .set_string_property("DomainOwnerEmail", value);
    }

    pub fn domain_status(&self) -> Option<&str> {
        self.base.envelope.string_property("DomainStatus")
    }

    pub fn set_domain_status(&mut self, value: Option<&str>) {
        self.base.envelope.set_string_property("DomainStatus", value);
    }
}

reply_message!(DomainDescribeReply);
