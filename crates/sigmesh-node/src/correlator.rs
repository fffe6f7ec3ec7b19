//! Response correlator registry.
//!
//! The one piece of shared mutable state between the outbound request path
//! and the RPC consumption loop, kept behind explicit register, complete, and
//! expire operations.

use dashmap::DashMap;
use tokio::sync::oneshot;
use uuid::Uuid;

use sigmesh_core::protocol::Payload;

/// Token-to-waiter map for outstanding requests.
#[derive(Default)]
pub struct PendingRequests {
    waiters: DashMap<String, oneshot::Sender<Payload>>,
}

impl PendingRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh correlation token and record the waiter.
    pub fn register(&self) -> (String, oneshot::Receiver<Payload>) {
        let token = Uuid::new_v4().to_string();
        let (tx, rx) = oneshot::channel();
        self.waiters.insert(token.clone(), tx);
        (token, rx)
    }

    /// Deliver a response to whoever is waiting on `token`.
    ///
    /// Unknown tokens (already completed, expired, or never registered) are a
    /// no-op; the return value lets the caller report it.
    pub fn complete(&self, token: &str, payload: Payload) -> bool {
        match self.waiters.remove(token) {
            Some((_, tx)) => tx.send(payload).is_ok(),
            None => false,
        }
    }

    /// Drop the waiter for `token`; a late response becomes a no-op.
    pub fn expire(&self, token: &str) {
        self.waiters.remove(token);
    }

    pub fn outstanding(&self) -> usize {
        self.waiters.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigmesh_core::protocol::payload;

    #[test]
    fn complete_delivers_exactly_once() {
        let pending = PendingRequests::new();
        let (token, mut rx) = pending.register();

        assert!(pending.complete(&token, payload::from_pairs([("k", "v")])));
        let got = rx.try_recv().unwrap();
        assert_eq!(payload::text(&got, "k"), Some("v"));

        // second completion finds no waiter
        assert!(!pending.complete(&token, Payload::new()));
        assert_eq!(pending.outstanding(), 0);
    }

    #[test]
    fn unknown_token_is_a_noop() {
        let pending = PendingRequests::new();
        assert!(!pending.complete("ghost", Payload::new()));
    }

    #[test]
    fn expired_token_no_longer_completes() {
        let pending = PendingRequests::new();
        let (token, mut rx) = pending.register();
        pending.expire(&token);

        assert!(!pending.complete(&token, Payload::new()));
        assert!(rx.try_recv().is_err());
    }
}
