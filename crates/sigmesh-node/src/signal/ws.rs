//! WebSocket endpoint for client signaling sessions.
//!
//! Responsibilities:
//! - Upgrade HTTP -> WS, extract room/peer from the query string
//! - Register the session and join the room
//! - Announce membership changes on the broadcast channel
//! - Pump the outbound notification queue into the socket

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use sigmesh_core::protocol::{methods, payload, Payload};

use crate::signal::Connection;
use crate::state::AppState;

const OUTBOUND_QUEUE: usize = 1024;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub room: String,
    pub peer: String,
}

pub fn http_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/ws", get(ws_upgrade))
        .with_state(state)
}

async fn ws_upgrade(
    State(app): State<AppState>,
    ws: WebSocketUpgrade,
    Query(q): Query<WsQuery>,
) -> Response {
    ws.on_upgrade(move |socket| run_session(app, q, socket))
}

async fn run_session(app: AppState, q: WsQuery, socket: WebSocket) {
    let (out_tx, mut out_rx) = mpsc::channel::<Message>(OUTBOUND_QUEUE);
    let (mut ws_tx, mut ws_rx) = socket.split();

    app.sessions()
        .insert(q.peer.clone(), Connection { tx: out_tx.clone() });
    app.rooms().join(&q.room, &q.peer);

    // announce on the bus; every node, this one included, notifies its members
    let joined = payload::from_pairs([
        (methods::FIELD_METHOD, methods::CLIENT_JOINED),
        ("rid", q.room.as_str()),
        ("id", q.peer.as_str()),
    ]);
    if let Err(e) = app.broker().publish_event(&joined).await {
        warn!(peer = %q.peer, error = %e, "join announcement failed");
    }

    loop {
        tokio::select! {
            maybe_out = out_rx.recv() => {
                match maybe_out {
                    Some(m) => {
                        if ws_tx.send(m).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }

            incoming = ws_rx.next() => {
                let Some(incoming) = incoming else { break; };
                let Ok(msg) = incoming else { break; };
                match msg {
                    Message::Text(s) => handle_client_frame(&app, &q, &s).await,
                    Message::Ping(v) => {
                        let _ = out_tx.send(Message::Pong(v)).await;
                    }
                    Message::Pong(_) => {}
                    Message::Close(_) => break,
                    Message::Binary(_) => {}
                }
            }
        }
    }

    app.sessions().remove(&q.peer);
    app.rooms().cleanup_peer(&q.peer);

    let left = payload::from_pairs([
        (methods::FIELD_METHOD, methods::CLIENT_LEFT),
        ("rid", q.room.as_str()),
        ("id", q.peer.as_str()),
    ]);
    if let Err(e) = app.broker().publish_event(&left).await {
        warn!(peer = %q.peer, error = %e, "leave announcement failed");
    }
}

/// Client frames carry the same payload shape as the bus. Only room
/// broadcasts are accepted from this side; lifecycle events come from the
/// directory role.
async fn handle_client_frame(app: &AppState, q: &WsQuery, frame: &str) {
    let mut msg: Payload = match payload::decode(frame.as_bytes()) {
        Ok(msg) => msg,
        Err(e) => {
            debug!(peer = %q.peer, error = %e, "unparseable client frame");
            return;
        }
    };

    match payload::text(&msg, methods::FIELD_METHOD) {
        Some(methods::ROOM_BROADCAST) => {
            // stamp sender identity; clients do not get to spoof it
            msg.insert("rid".to_string(), q.room.clone().into());
            msg.insert("uid".to_string(), q.peer.clone().into());
            if let Err(e) = app.broker().publish_event(&msg).await {
                warn!(peer = %q.peer, error = %e, "broadcast publish failed");
            }
        }
        Some(other) => debug!(peer = %q.peer, method = other, "unsupported client method"),
        None => debug!(peer = %q.peer, "client frame without method"),
    }
}
