//! HTTP transport.
//!
//! Every message exchange is a single `PUT` with the proxy media type; the
//! routing table only registers PUT on the message endpoints, so other
//! methods are rejected (405) before the codec ever runs.

pub mod http;
