//! Axum router wiring.
//!
//! `PUT /` carries the message exchange, `PUT /echo` the diagnostic
//! round-trip; `/healthz` and `/readyz` are operational probes.

use axum::{
    routing::{get, put},
    Router,
};

use crate::{app_state::AppState, ops, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", put(transport::http::handle_message))
        .route("/echo", put(transport::http::handle_echo))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .with_state(state)
}
