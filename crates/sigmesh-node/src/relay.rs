//! Relay topology table.
//!
//! Tracks which sessions each published stream is routed to. The routing core
//! mutates this table; the media engine consumes it elsewhere.

use dashmap::DashMap;
use tracing::debug;

/// Relay-topology mutations driven by the routing core. Implementations must
/// be safe for concurrent use from both consumption loops.
pub trait RelayTopology: Send + Sync {
    /// Route `stream_id` to `session_id`, delivered at `destination`.
    ///
    /// The coordination protocol currently puts the session id on the wire as
    /// the destination too; both parameters are kept so the table stays
    /// honest about what the wire said.
    fn add_subscription(&self, stream_id: &str, session_id: &str, destination: &str);

    /// Tear one stream-to-session route down.
    fn remove_subscription(&self, stream_id: &str, session_id: &str);

    /// Tear down a publisher's stream and every route hanging off it.
    fn remove_stream(&self, stream_id: &str);

    /// Remove every subscription held by sessions whose id starts with
    /// `peer_prefix` (session ids are prefixed by their peer's id).
    fn remove_subscriptions_by_prefix(&self, peer_prefix: &str);
}

/// stream id -> session id -> destination.
#[derive(Default)]
pub struct RelayTable {
    routes: DashMap<String, DashMap<String, String>>,
}

impl RelayTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sessions_for(&self, stream_id: &str) -> Vec<String> {
        self.routes
            .get(stream_id)
            .map(|subs| subs.iter().map(|e| e.key().clone()).collect())
            .unwrap_or_default()
    }

    pub fn stream_count(&self) -> usize {
        self.routes.len()
    }
}

impl RelayTopology for RelayTable {
    fn add_subscription(&self, stream_id: &str, session_id: &str, destination: &str) {
        debug!(stream = stream_id, session = session_id, "subscription added");
        self.routes
            .entry(stream_id.to_string())
            .or_default()
            .insert(session_id.to_string(), destination.to_string());
    }

    fn remove_subscription(&self, stream_id: &str, session_id: &str) {
        debug!(stream = stream_id, session = session_id, "subscription removed");
        if let Some(subs) = self.routes.get(stream_id) {
            subs.remove(session_id);
            if subs.is_empty() {
                drop(subs);
                self.routes.remove(stream_id);
            }
        }
    }

    fn remove_stream(&self, stream_id: &str) {
        debug!(stream = stream_id, "stream removed");
        self.routes.remove(stream_id);
    }

    fn remove_subscriptions_by_prefix(&self, peer_prefix: &str) {
        debug!(prefix = peer_prefix, "pruning subscriptions by peer prefix");
        let mut emptied = Vec::new();
        for subs in self.routes.iter() {
            let doomed: Vec<String> = subs
                .iter()
                .filter(|e| e.key().starts_with(peer_prefix))
                .map(|e| e.key().clone())
                .collect();
            for session in doomed {
                subs.remove(&session);
            }
            if subs.is_empty() {
                emptied.push(subs.key().clone());
            }
        }
        for stream in emptied {
            // re-check under the entry lock; a subscriber may have landed since
            if let Some(subs) = self.routes.get(&stream) {
                if subs.is_empty() {
                    drop(subs);
                    self.routes.remove(&stream);
                }
            }
        }
    }
}
