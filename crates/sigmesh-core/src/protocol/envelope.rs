//! Broker delivery envelopes.
//!
//! Produced by the broker client, consumed exactly once per delivery. The
//! body stays opaque bytes until a router decodes it.

use bytes::Bytes;

/// One delivery from the point-to-point RPC channel.
#[derive(Debug, Clone)]
pub struct RpcEnvelope {
    /// Serialized key/value payload.
    pub body: Bytes,
    /// Identity of the node that published the message (its reply-to).
    pub origin: String,
    /// Correlation token echoed back by responders, when present.
    pub correlation: Option<String>,
}

/// One delivery from the fan-out broadcast channel. Broadcast traffic carries
/// no origin or correlation metadata; exclusion happens per event, keyed by
/// the ids inside the payload.
#[derive(Debug, Clone)]
pub struct EventEnvelope {
    pub body: Bytes,
}
