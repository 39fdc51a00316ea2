//! Wire protocol primitives.
//!
//! This module hosts the binary envelope format exchanged with the host
//! client library: a type code, a three-valued property dictionary, and a
//! three-valued attachment list, all length-prefixed little-endian.
//!
//! All parsers are panic-free: malformed input is reported as
//! `FlowgateError` instead of panicking or indexing raw buffers, keeping the
//! proxy resilient to truncated or hostile traffic.

pub mod envelope;
pub mod types;

pub use envelope::{keys, ProxyEnvelope};
pub use types::MessageType;

/// Media type required on every proxy HTTP exchange, in both directions.
pub const CONTENT_TYPE: &str = "application/x-flowgate-message";
