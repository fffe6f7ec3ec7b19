//! Shared application state wiring the node together.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use uuid::Uuid;

use sigmesh_core::error::Result;

use crate::broker::Broker;
use crate::config::NodeConfig;
use crate::correlator::PendingRequests;
use crate::directory::DirectoryClient;
use crate::relay::RelayTable;
use crate::routing::{BroadcastRouter, RouterDeps, RpcRouter};
use crate::signal::{RoomRoster, SessionNotifier, SessionRegistry};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: NodeConfig,
    node_id: Arc<str>,
    broker: Arc<dyn Broker>,
    rooms: Arc<RoomRoster>,
    sessions: Arc<SessionRegistry>,
    relay: Arc<RelayTable>,
    pending: Arc<PendingRequests>,
    notifier: Arc<SessionNotifier>,
    directory: DirectoryClient,
}

impl AppState {
    pub fn new(cfg: NodeConfig, broker: Arc<dyn Broker>) -> Self {
        let node_id: Arc<str> = cfg
            .node
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
            .into();

        let rooms = Arc::new(RoomRoster::new());
        let sessions = Arc::new(SessionRegistry::new());
        let relay = Arc::new(RelayTable::new());
        let pending = Arc::new(PendingRequests::new());
        let notifier = Arc::new(SessionNotifier::new(
            Arc::clone(&rooms),
            Arc::clone(&sessions),
        ));
        let directory = DirectoryClient::new(
            Arc::clone(&broker),
            Arc::clone(&pending),
            Arc::clone(&node_id),
            Duration::from_millis(cfg.broker.request_timeout_ms),
        );

        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                node_id,
                broker,
                rooms,
                sessions,
                relay,
                pending,
                notifier,
                directory,
            }),
        }
    }

    /// Establish both delivery streams and start the consumption loops.
    ///
    /// Stream establishment failures surface here, once, at startup; they are
    /// fatal to the routing function but the caller decides process fate.
    pub async fn start_routers(&self) -> Result<(JoinHandle<()>, JoinHandle<()>)> {
        let rpc_rx = self.inner.broker.consume_rpc().await?;
        let broadcast_rx = self.inner.broker.consume_broadcast().await?;

        let deps = self.router_deps();
        let rpc = RpcRouter::new(deps.clone()).spawn(rpc_rx);
        let broadcast = BroadcastRouter::new(deps).spawn(broadcast_rx);
        Ok((rpc, broadcast))
    }

    pub fn router_deps(&self) -> RouterDeps {
        RouterDeps {
            node_id: Arc::clone(&self.inner.node_id),
            notifier: self.inner.notifier.clone(),
            relay: self.inner.relay.clone(),
            pending: Arc::clone(&self.inner.pending),
        }
    }

    pub fn cfg(&self) -> &NodeConfig {
        &self.inner.cfg
    }

    pub fn node_id(&self) -> &str {
        &self.inner.node_id
    }

    pub fn broker(&self) -> &dyn Broker {
        self.inner.broker.as_ref()
    }

    pub fn rooms(&self) -> &RoomRoster {
        &self.inner.rooms
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.inner.sessions
    }

    pub fn relay(&self) -> &RelayTable {
        &self.inner.relay
    }

    pub fn directory(&self) -> &DirectoryClient {
        &self.inner.directory
    }
}
