use serde::Deserialize;

use flowgate_core::error::{FlowgateError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProxyConfig {
    pub version: u32,

    #[serde(default)]
    pub proxy: ProxySection,

    #[serde(default)]
    pub engine: EngineSection,
}

impl ProxyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(FlowgateError::Protocol(format!(
                "unsupported config version {}",
                self.version
            )));
        }
        self.proxy.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProxySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// How long a proxy-initiated request waits for the library's reply.
    #[serde(default = "default_reply_timeout_secs")]
    pub reply_timeout_secs: u64,

    /// Upper bound on an inbound message body.
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ProxySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            reply_timeout_secs: default_reply_timeout_secs(),
            max_message_bytes: default_max_message_bytes(),
            log_level: default_log_level(),
        }
    }
}

impl ProxySection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=600).contains(&self.reply_timeout_secs) {
            return Err(FlowgateError::Protocol(
                "proxy.reply_timeout_secs must be between 1 and 600".into(),
            ));
        }
        if !(1024..=64 * 1024 * 1024).contains(&self.max_message_bytes) {
            return Err(FlowgateError::Protocol(
                "proxy.max_message_bytes must be between 1KiB and 64MiB".into(),
            ));
        }
        match self.log_level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => Ok(()),
            other => Err(FlowgateError::Protocol(format!(
                "proxy.log_level must be a tracing level, got {other}"
            ))),
        }
    }
}

fn default_listen() -> String {
    "127.0.0.1:5000".into()
}
fn default_reply_timeout_secs() -> u64 {
    60
}
fn default_max_message_bytes() -> usize {
    4 * 1024 * 1024
}
fn default_log_level() -> String {
    "info".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    /// Comma-separated `host:port` pairs, overridable per ConnectRequest.
    #[serde(default = "default_endpoints")]
    pub endpoints: String,

    #[serde(default = "default_identity")]
    pub identity: String,

    #[serde(default)]
    pub default_domain: Option<String>,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            endpoints: default_endpoints(),
            identity: default_identity(),
            default_domain: None,
        }
    }
}

fn default_endpoints() -> String {
    "127.0.0.1:7933".into()
}
fn default_identity() -> String {
    "flowgate-proxy".into()
}
