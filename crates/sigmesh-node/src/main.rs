//! sigmesh node binary.
//!
//! Wires the broker consumption loops and the client signal surface:
//! - WebSocket endpoint: /v1/ws?room=...&peer=...
//! - RPC + broadcast routers spawned before serving traffic

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use sigmesh_node::{broker::mem::MemBroker, config, signal, state::AppState};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cfg = config::load_from_file("sigmesh.yaml").expect("config load failed");
    let listen: SocketAddr = cfg
        .node
        .listen
        .parse()
        .expect("node.listen must be a valid SocketAddr");

    // The transport is pluggable behind the Broker trait; the in-process
    // broker serves single-process deployments.
    let broker = Arc::new(MemBroker::new());
    let state = AppState::new(cfg, broker);

    state
        .start_routers()
        .await
        .expect("broker delivery streams unavailable");

    let app = signal::ws::http_router(state.clone());

    tracing::info!(%listen, node = %state.node_id(), "sigmesh-node starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");
}
