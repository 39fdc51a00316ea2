//! Top-level facade crate for flowgate.
//!
//! Re-exports the core protocol types and the proxy library so users can
//! depend on a single crate.

pub mod core {
    pub use flowgate_core::*;
}

pub mod proxy {
    pub use flowgate_proxy::*;
}
