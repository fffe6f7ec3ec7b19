//! Broker-facing routing core.
//!
//! Two independent consumption loops, one per delivery stream, translate
//! inbound coordination traffic into client notifications and relay-topology
//! mutations. The loops share nothing mutable beyond the injected
//! collaborators, each of which is individually safe for concurrent use.

pub mod broadcast;
pub mod rpc;

pub use broadcast::BroadcastRouter;
pub use rpc::RpcRouter;

use std::sync::Arc;

use crate::correlator::PendingRequests;
use crate::relay::RelayTopology;
use crate::signal::RoomNotifier;

/// Collaborator handles shared by both routers. Cheap to clone.
#[derive(Clone)]
pub struct RouterDeps {
    /// This process's identity on the bus, constant for its lifetime.
    pub node_id: Arc<str>,
    pub notifier: Arc<dyn RoomNotifier>,
    pub relay: Arc<dyn RelayTopology>,
    pub pending: Arc<PendingRequests>,
}
