//! Method and field names of the coordination protocol.
//!
//! The method set is closed: routers dispatch on these names only and ignore
//! anything else. Exactly one of [`FIELD_METHOD`] or [`FIELD_RESPONSE`] is
//! present per RPC envelope; broadcast envelopes always carry
//! [`FIELD_METHOD`].

/// Discriminator field carried by requests and events.
pub const FIELD_METHOD: &str = "method";
/// Discriminator field carried by responses.
pub const FIELD_RESPONSE: &str = "response";
/// Nested field delivered to clients as a structured object.
pub const FIELD_INFO: &str = "info";

/// A peer published a new media stream.
pub const STREAM_ADDED: &str = "stream-added";
/// A published stream went away.
pub const STREAM_REMOVED: &str = "stream-removed";
/// A peer joined a room.
pub const CLIENT_JOINED: &str = "client-joined";
/// A peer left a room.
pub const CLIENT_LEFT: &str = "client-left";
/// Route a stream to a subscribing session.
pub const RELAY_ADD: &str = "relay-add";
/// Tear one stream-to-session route down.
pub const RELAY_REMOVE: &str = "relay-remove";
/// Application-defined room broadcast, forwarded verbatim.
pub const ROOM_BROADCAST: &str = "broadcast";

/// Directory lookup of a room's current publishers.
pub const GET_PUBS: &str = "get-pubs";
/// Directory lookup of media details for one stream.
pub const GET_MEDIA_INFO: &str = "get-media-info";

/// Response names forwarded to waiting callers. Anything else arriving in
/// response position is protocol drift and must not complete a token.
pub fn is_forwardable_response(name: &str) -> bool {
    matches!(name, GET_PUBS | GET_MEDIA_INFO | RELAY_REMOVE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_is_closed() {
        assert!(is_forwardable_response(GET_PUBS));
        assert!(is_forwardable_response(GET_MEDIA_INFO));
        assert!(is_forwardable_response(RELAY_REMOVE));
        assert!(!is_forwardable_response(RELAY_ADD));
        assert!(!is_forwardable_response("made-up"));
        assert!(!is_forwardable_response(""));
    }
}
