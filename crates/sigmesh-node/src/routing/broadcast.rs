//! Broadcast channel router.
//!
//! Consumes the fan-out delivery stream of room and stream lifecycle events.
//! No correlation state and no responses here; exclusion happens per event,
//! keyed by the publishing peer's id inside the payload.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use sigmesh_core::protocol::{methods, payload, EventEnvelope, Payload};

use super::RouterDeps;

pub struct BroadcastRouter {
    deps: RouterDeps,
}

impl BroadcastRouter {
    pub fn new(deps: RouterDeps) -> Self {
        Self { deps }
    }

    /// Run the consumption loop until the delivery stream closes.
    pub fn spawn(self, rx: mpsc::Receiver<EventEnvelope>) -> JoinHandle<()> {
        tokio::spawn(self.run(rx))
    }

    async fn run(self, mut rx: mpsc::Receiver<EventEnvelope>) {
        while let Some(envelope) = rx.recv().await {
            self.handle(envelope);
        }
        info!("broadcast delivery stream closed");
    }

    /// Route one delivery. Per-envelope errors are contained here.
    pub fn handle(&self, envelope: EventEnvelope) {
        let mut msg = match payload::decode(&envelope.body) {
            Ok(msg) => msg,
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "dropping undecodable broadcast envelope");
                return;
            }
        };

        // this channel carries events only
        let Some(method) = payload::text(&msg, methods::FIELD_METHOD) else {
            return;
        };
        let method = method.to_string();

        // clients must see "info" as a structured object, not a re-encoded string
        if let Err(e) = payload::normalize(&mut msg, methods::FIELD_INFO) {
            warn!(kind = e.kind(), error = %e, method, "dropping event with malformed info");
            return;
        }

        self.dispatch(&method, &msg);
    }

    /// The event set is closed; unknown names fall through without effect.
    /// Where a handler both notifies and mutates, members hear the event
    /// before the media path changes underneath them.
    fn dispatch(&self, method: &str, msg: &Payload) {
        debug!(method, "broadcast event");
        match method {
            methods::STREAM_ADDED => {
                let (Some(rid), Some(pid)) =
                    (payload::text(msg, "rid"), payload::text(msg, "pid"))
                else {
                    warn!(method, "event without rid/pid");
                    return;
                };
                self.deps
                    .notifier
                    .notify_room_except(rid, pid, methods::STREAM_ADDED, msg);
            }
            methods::STREAM_REMOVED => {
                let (Some(rid), Some(pid), Some(mid)) = (
                    payload::text(msg, "rid"),
                    payload::text(msg, "pid"),
                    payload::text(msg, "mid"),
                ) else {
                    warn!(method, "event without rid/pid/mid");
                    return;
                };
                self.deps
                    .notifier
                    .notify_room_except(rid, pid, methods::STREAM_REMOVED, msg);
                self.deps.relay.remove_stream(mid);
            }
            methods::CLIENT_JOINED => {
                let (Some(rid), Some(id)) =
                    (payload::text(msg, "rid"), payload::text(msg, "id"))
                else {
                    warn!(method, "event without rid/id");
                    return;
                };
                self.deps
                    .notifier
                    .notify_room_except(rid, id, methods::CLIENT_JOINED, msg);
            }
            methods::CLIENT_LEFT => {
                let (Some(rid), Some(id)) =
                    (payload::text(msg, "rid"), payload::text(msg, "id"))
                else {
                    warn!(method, "event without rid/id");
                    return;
                };
                self.deps
                    .notifier
                    .notify_room_except(rid, id, methods::CLIENT_LEFT, msg);
                self.deps.relay.remove_subscriptions_by_prefix(id);
            }
            methods::ROOM_BROADCAST => {
                let (Some(rid), Some(uid)) =
                    (payload::text(msg, "rid"), payload::text(msg, "uid"))
                else {
                    warn!(method, "event without rid/uid");
                    return;
                };
                self.deps
                    .notifier
                    .notify_room_except(rid, uid, methods::ROOM_BROADCAST, msg);
            }
            _ => {}
        }
    }
}
