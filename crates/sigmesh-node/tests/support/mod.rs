//! Recording doubles for the router collaborators.
//!
//! All doubles write into one shared chronological log so tests can assert
//! ordering across collaborators, not just per-collaborator counts.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)] // not every test binary uses every helper

use std::sync::{Arc, Mutex};

use bytes::Bytes;

use sigmesh_core::protocol::{EventEnvelope, Payload, RpcEnvelope};
use sigmesh_node::correlator::PendingRequests;
use sigmesh_node::relay::RelayTopology;
use sigmesh_node::routing::RouterDeps;
use sigmesh_node::signal::RoomNotifier;

#[derive(Default)]
pub struct CallLog {
    calls: Mutex<Vec<String>>,
}

impl CallLog {
    pub fn push(&self, entry: String) {
        self.calls.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

pub struct RecordingNotifier {
    pub log: Arc<CallLog>,
    pub payloads: Mutex<Vec<Payload>>,
}

impl RoomNotifier for RecordingNotifier {
    fn notify_room(&self, rid: &str, event: &str, payload: &Payload) {
        self.log.push(format!("notify_room:{rid}:{event}"));
        self.payloads.lock().unwrap().push(payload.clone());
    }

    fn notify_room_except(&self, rid: &str, excluded: &str, event: &str, payload: &Payload) {
        self.log
            .push(format!("notify_room_except:{rid}:{excluded}:{event}"));
        self.payloads.lock().unwrap().push(payload.clone());
    }
}

pub struct RecordingRelay {
    pub log: Arc<CallLog>,
}

impl RelayTopology for RecordingRelay {
    fn add_subscription(&self, stream_id: &str, session_id: &str, destination: &str) {
        self.log
            .push(format!("add_subscription:{stream_id}:{session_id}:{destination}"));
    }

    fn remove_subscription(&self, stream_id: &str, session_id: &str) {
        self.log
            .push(format!("remove_subscription:{stream_id}:{session_id}"));
    }

    fn remove_stream(&self, stream_id: &str) {
        self.log.push(format!("remove_stream:{stream_id}"));
    }

    fn remove_subscriptions_by_prefix(&self, peer_prefix: &str) {
        self.log
            .push(format!("remove_subscriptions_by_prefix:{peer_prefix}"));
    }
}

pub struct Doubles {
    pub deps: RouterDeps,
    pub log: Arc<CallLog>,
    pub pending: Arc<PendingRequests>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn doubles(node_id: &str) -> Doubles {
    let log = Arc::new(CallLog::default());
    let pending = Arc::new(PendingRequests::new());
    let notifier = Arc::new(RecordingNotifier {
        log: Arc::clone(&log),
        payloads: Mutex::new(Vec::new()),
    });
    let deps = RouterDeps {
        node_id: Arc::from(node_id),
        notifier: notifier.clone(),
        relay: Arc::new(RecordingRelay {
            log: Arc::clone(&log),
        }),
        pending: Arc::clone(&pending),
    };
    Doubles {
        deps,
        log,
        pending,
        notifier,
    }
}

pub fn rpc_envelope(body: &str, origin: &str, correlation: Option<&str>) -> RpcEnvelope {
    RpcEnvelope {
        body: Bytes::copy_from_slice(body.as_bytes()),
        origin: origin.to_string(),
        correlation: correlation.map(str::to_string),
    }
}

pub fn event_envelope(body: &str) -> EventEnvelope {
    EventEnvelope {
        body: Bytes::copy_from_slice(body.as_bytes()),
    }
}
