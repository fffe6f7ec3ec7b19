//! Broker boundary.
//!
//! The transport (connection, queue declaration, acknowledgment) lives behind
//! [`Broker`]; the routing core only consumes delivery streams and publishes
//! finished payloads.

pub mod mem;

use async_trait::async_trait;
use tokio::sync::mpsc;

use sigmesh_core::error::Result;
use sigmesh_core::protocol::{EventEnvelope, Payload, RpcEnvelope};

/// Handle to the message broker. Implementations must be safe for concurrent
/// use from the consumption loops and the signal surface.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Open the point-to-point RPC delivery stream.
    ///
    /// Fails with `StreamUnavailable` when the stream cannot be established.
    /// Retry and backoff belong to the caller's supervisor, not this layer.
    async fn consume_rpc(&self) -> Result<mpsc::Receiver<RpcEnvelope>>;

    /// Open the fan-out broadcast delivery stream.
    async fn consume_broadcast(&self) -> Result<mpsc::Receiver<EventEnvelope>>;

    /// Publish a request or response on the RPC channel.
    async fn publish_rpc(
        &self,
        origin: &str,
        correlation: Option<&str>,
        payload: &Payload,
    ) -> Result<()>;

    /// Publish an event on the broadcast channel.
    async fn publish_event(&self, payload: &Payload) -> Result<()>;
}
