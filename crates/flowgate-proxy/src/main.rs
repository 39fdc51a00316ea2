//! flowgate proxy binary.
//!
//! Boot sequence: config (strict parsing + validate) → tracing → state
//! (registry, dispatcher, tables, library client) → axum serve. The server
//! drains gracefully on TerminateRequest or ctrl-c.

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use flowgate_proxy::{app_state, config, router};

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "flowgate.yaml".to_string());
    let cfg = config::load_from_file(&config_path).expect("config load failed");

    // RUST_LOG wins over the configured level when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.proxy.log_level.clone()));
    fmt().with_env_filter(filter).init();

    let listen: SocketAddr = cfg
        .proxy
        .listen
        .parse()
        .expect("proxy.listen must be a valid SocketAddr");

    let state = app_state::AppState::new(cfg).expect("state build failed");
    let app = router::build_router(state.clone());

    tracing::info!(%listen, "flowgate-proxy starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .expect("failed to bind");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = state.shutdown_requested() => {}
                _ = tokio::signal::ctrl_c() => {}
            }
            tracing::info!("shutting down");
        })
        .await
        .expect("server failed");
}
