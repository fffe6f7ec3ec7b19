//! Room notification fan-out.

use std::sync::Arc;

use axum::extract::ws::Message;
use serde_json::json;
use tracing::trace;

use sigmesh_core::protocol::Payload;

use super::{RoomRoster, SessionRegistry};

/// Client notification delivery, scoped to a room. Implementations must be
/// safe for concurrent use from both consumption loops.
pub trait RoomNotifier: Send + Sync {
    /// Fan out to every member of `rid`, no exclusion.
    fn notify_room(&self, rid: &str, event: &str, payload: &Payload);

    /// Fan out to every member of `rid` except `excluded`.
    fn notify_room_except(&self, rid: &str, excluded: &str, event: &str, payload: &Payload);
}

/// Delivers notifications over the peers' WebSocket outbound queues.
///
/// Delivery is lossy: serialize once, `try_send` per member, drop when a
/// member's queue is full.
pub struct SessionNotifier {
    rooms: Arc<RoomRoster>,
    sessions: Arc<SessionRegistry>,
}

impl SessionNotifier {
    pub fn new(rooms: Arc<RoomRoster>, sessions: Arc<SessionRegistry>) -> Self {
        Self { rooms, sessions }
    }

    fn fan_out(&self, rid: &str, excluded: Option<&str>, event: &str, payload: &Payload) {
        let frame = json!({ "method": event, "data": payload }).to_string();
        for peer in self.rooms.peers_in(rid) {
            if excluded == Some(peer.as_str()) {
                continue;
            }
            if let Some(conn) = self.sessions.get(&peer) {
                let _ = conn.tx.try_send(Message::Text(frame.clone()));
            }
        }
        trace!(room = rid, event, "room notified");
    }
}

impl RoomNotifier for SessionNotifier {
    fn notify_room(&self, rid: &str, event: &str, payload: &Payload) {
        self.fan_out(rid, None, event, payload);
    }

    fn notify_room_except(&self, rid: &str, excluded: &str, event: &str, payload: &Payload) {
        self.fan_out(rid, Some(excluded), event, payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Connection;
    use sigmesh_core::protocol::payload;
    use tokio::sync::mpsc;

    fn wire_peer(
        sessions: &SessionRegistry,
        rooms: &RoomRoster,
        rid: &str,
        peer: &str,
    ) -> mpsc::Receiver<Message> {
        let (tx, rx) = mpsc::channel(8);
        sessions.insert(peer.to_string(), Connection { tx });
        rooms.join(rid, peer);
        rx
    }

    #[test]
    fn excluded_peer_hears_nothing() {
        let rooms = Arc::new(RoomRoster::new());
        let sessions = Arc::new(SessionRegistry::new());
        let mut rx_a = wire_peer(&sessions, &rooms, "room1", "peerA");
        let mut rx_b = wire_peer(&sessions, &rooms, "room1", "peerB");

        let notifier = SessionNotifier::new(Arc::clone(&rooms), Arc::clone(&sessions));
        let event = payload::from_pairs([("rid", "room1"), ("pid", "peerA")]);
        notifier.notify_room_except("room1", "peerA", "stream-added", &event);

        assert!(rx_a.try_recv().is_err());
        let Ok(Message::Text(frame)) = rx_b.try_recv() else {
            panic!("peerB should have been notified");
        };
        assert!(frame.contains("stream-added"));
        assert!(frame.contains("peerA"));
    }

    #[test]
    fn include_all_reaches_the_publisher_too() {
        let rooms = Arc::new(RoomRoster::new());
        let sessions = Arc::new(SessionRegistry::new());
        let mut rx_a = wire_peer(&sessions, &rooms, "room1", "peerA");
        let mut rx_b = wire_peer(&sessions, &rooms, "room1", "peerB");

        let notifier = SessionNotifier::new(rooms, sessions);
        let event = payload::from_pairs([("rid", "room1"), ("pid", "peerA")]);
        notifier.notify_room("room1", "stream-added", &event);

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_ok());
    }
}
