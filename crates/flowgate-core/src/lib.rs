//! flowgate core: wire-level protocol primitives, the message hierarchy, and
//! the message type registry.
//!
//! This crate defines the binary envelope exchanged between the proxy and the
//! host client library, the typed property layer on top of it, and the
//! polymorphic message types reconstructed from wire type codes. It carries no
//! transport or runtime dependencies so the proxy, tooling, and tests can all
//! share it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `FlowgateError`/`Result` so a malformed
//! or truncated message can never crash the proxy process.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod message;
pub mod protocol;

pub use error::{ClientCode, FlowgateError, Result};
