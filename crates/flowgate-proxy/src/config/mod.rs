//! Proxy config loader (strict parsing).

pub mod schema;

use std::fs;

use flowgate_core::error::{FlowgateError, Result};

pub use schema::{EngineSection, ProxyConfig, ProxySection};

pub fn load_from_file(path: &str) -> Result<ProxyConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| FlowgateError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ProxyConfig> {
    let cfg: ProxyConfig = serde_yaml::from_str(s)
        .map_err(|e| FlowgateError::Protocol(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
