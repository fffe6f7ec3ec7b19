use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc;

/// One peer's outbound queue sender.
#[derive(Clone)]
pub struct Connection {
    pub tx: mpsc::Sender<Message>,
}

/// peer id -> live connection. A reconnect replaces the previous entry.
#[derive(Default)]
pub struct SessionRegistry {
    peers: DashMap<String, Connection>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, peer: String, conn: Connection) -> Option<Connection> {
        self.peers.insert(peer, conn)
    }

    pub fn remove(&self, peer: &str) -> Option<Connection> {
        self.peers.remove(peer).map(|(_, conn)| conn)
    }

    pub fn get(&self, peer: &str) -> Option<Connection> {
        self.peers.get(peer).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
