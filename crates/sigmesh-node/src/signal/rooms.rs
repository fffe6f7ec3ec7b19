use dashmap::{DashMap, DashSet};

/// Room membership: room -> peers plus the reverse index used at teardown.
#[derive(Default)]
pub struct RoomRoster {
    room_to_peers: DashMap<String, DashSet<String>>,
    peer_to_rooms: DashMap<String, DashSet<String>>,
}

fn insert(index: &DashMap<String, DashSet<String>>, key: &str, member: &str) {
    index
        .entry(key.to_string())
        .or_default()
        .insert(member.to_string());
}

fn discard(index: &DashMap<String, DashSet<String>>, key: &str, member: &str) {
    if let Some(set) = index.get(key) {
        set.remove(member);
        if set.is_empty() {
            drop(set);
            index.remove(key);
        }
    }
}

impl RoomRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&self, rid: &str, peer: &str) {
        insert(&self.room_to_peers, rid, peer);
        insert(&self.peer_to_rooms, peer, rid);
    }

    pub fn leave(&self, rid: &str, peer: &str) {
        discard(&self.room_to_peers, rid, peer);
        discard(&self.peer_to_rooms, peer, rid);
    }

    pub fn peers_in(&self, rid: &str) -> Vec<String> {
        self.room_to_peers
            .get(rid)
            .map(|set| set.iter().map(|p| p.key().to_string()).collect())
            .unwrap_or_default()
    }

    /// Drop a peer from every room it joined.
    pub fn cleanup_peer(&self, peer: &str) {
        if let Some((_, rooms)) = self.peer_to_rooms.remove(peer) {
            for rid in rooms.iter() {
                discard(&self.room_to_peers, rid.key(), peer);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_leave_round_trip() {
        let roster = RoomRoster::new();
        roster.join("room1", "peerA");
        roster.join("room1", "peerB");

        let mut peers = roster.peers_in("room1");
        peers.sort();
        assert_eq!(peers, vec!["peerA".to_string(), "peerB".to_string()]);

        roster.leave("room1", "peerA");
        assert_eq!(roster.peers_in("room1"), vec!["peerB".to_string()]);
    }

    #[test]
    fn cleanup_removes_peer_everywhere() {
        let roster = RoomRoster::new();
        roster.join("room1", "peerA");
        roster.join("room2", "peerA");
        roster.join("room2", "peerB");

        roster.cleanup_peer("peerA");
        assert!(roster.peers_in("room1").is_empty());
        assert_eq!(roster.peers_in("room2"), vec!["peerB".to_string()]);
    }
}
