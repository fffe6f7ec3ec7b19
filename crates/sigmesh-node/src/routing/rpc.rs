//! RPC channel router.
//!
//! Consumes the point-to-point delivery stream and splits it into method
//! invocations (dispatched to the method table) and method responses
//! (dispatched to the response correlator). The shared bus reflects a node's
//! own outbound traffic back at it, so self-origin deliveries are discarded
//! before anything observable happens.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use sigmesh_core::protocol::{methods, payload, Payload, RpcEnvelope};

use super::RouterDeps;

pub struct RpcRouter {
    deps: RouterDeps,
}

impl RpcRouter {
    pub fn new(deps: RouterDeps) -> Self {
        Self { deps }
    }

    /// Run the consumption loop until the delivery stream closes.
    pub fn spawn(self, rx: mpsc::Receiver<RpcEnvelope>) -> JoinHandle<()> {
        tokio::spawn(self.run(rx))
    }

    async fn run(self, mut rx: mpsc::Receiver<RpcEnvelope>) {
        while let Some(envelope) = rx.recv().await {
            self.handle(envelope);
        }
        info!("rpc delivery stream closed");
    }

    /// Route one delivery. Per-envelope errors are contained here; the loop
    /// never dies on a bad message.
    pub fn handle(&self, envelope: RpcEnvelope) {
        let mut msg = match payload::decode(&envelope.body) {
            Ok(msg) => msg,
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "dropping undecodable rpc envelope");
                return;
            }
        };

        if envelope.origin == *self.deps.node_id {
            return;
        }

        if let Some(method) = payload::text(&msg, methods::FIELD_METHOD) {
            let method = method.to_string();
            self.handle_request(&envelope.origin, &method, &msg);
            return;
        }

        if payload::text(&msg, methods::FIELD_RESPONSE).is_some() {
            if let Err(e) = payload::normalize(&mut msg, methods::FIELD_INFO) {
                warn!(kind = e.kind(), error = %e, "dropping response with malformed info");
                return;
            }
            let response = match payload::text(&msg, methods::FIELD_RESPONSE) {
                Some(name) => name.to_string(),
                None => return,
            };
            self.handle_response(envelope.correlation.as_deref(), &envelope.origin, &response, msg);
            return;
        }

        debug!(from = %envelope.origin, "rpc envelope with neither method nor response");
    }

    /// Method invocations from the directory role. The method set is closed;
    /// unknown names fall through without effect.
    fn handle_request(&self, from: &str, method: &str, msg: &Payload) {
        debug!(from, method, "rpc method invocation");
        match method {
            methods::STREAM_ADDED => {
                let (Some(id), Some(rid)) =
                    (payload::text(msg, "id"), payload::text(msg, "rid"))
                else {
                    warn!(from, "stream-added without id/rid");
                    return;
                };
                let event = payload::from_pairs([("rid", rid), ("pid", id)]);
                self.deps
                    .notifier
                    .notify_room(rid, methods::STREAM_ADDED, &event);
            }
            methods::RELAY_ADD => {
                let (Some(sid), Some(mid)) =
                    (payload::text(msg, "sid"), payload::text(msg, "mid"))
                else {
                    warn!(from, "relay-add without sid/mid");
                    return;
                };
                // the wire carries the session id as the destination as well
                self.deps.relay.add_subscription(mid, sid, sid);
            }
            methods::RELAY_REMOVE => {
                let (Some(mid), Some(sid)) =
                    (payload::text(msg, "mid"), payload::text(msg, "sid"))
                else {
                    warn!(from, "relay-remove without mid/sid");
                    return;
                };
                self.deps.relay.remove_subscription(mid, sid);
            }
            _ => {}
        }
    }

    /// Method responses complete a waiting caller, but only names on the
    /// allow-list may do so; anything else is protocol drift and must not
    /// reach a waiter.
    fn handle_response(&self, correlation: Option<&str>, from: &str, response: &str, msg: Payload) {
        debug!(from, response, "rpc method response");
        if !methods::is_forwardable_response(response) {
            warn!(from, response, "response name outside the allow-list");
            return;
        }
        let Some(token) = correlation else {
            warn!(from, response, "response without correlation token");
            return;
        };
        if !self.deps.pending.complete(token, msg) {
            debug!(token, "no caller waiting on token");
        }
    }
}
