//! In-process broker.
//!
//! Serves tests and single-process deployments. It mirrors the shared-bus
//! behavior of the production transport: a published RPC message is delivered
//! to every consumer, the publisher included, so the router's self-echo
//! suppression gets exercised for real.

use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

use sigmesh_core::error::{Result, SigmeshError};
use sigmesh_core::protocol::{EventEnvelope, Payload, RpcEnvelope};

use super::Broker;

const DELIVERY_BUFFER: usize = 256;

#[derive(Default)]
pub struct MemBroker {
    rpc: Mutex<Vec<mpsc::Sender<RpcEnvelope>>>,
    broadcast: Mutex<Vec<mpsc::Sender<EventEnvelope>>>,
}

impl MemBroker {
    pub fn new() -> Self {
        Self::default()
    }

    fn encode(payload: &Payload) -> Result<Bytes> {
        let body = serde_json::to_vec(payload)
            .map_err(|e| SigmeshError::Internal(format!("encode payload: {e}")))?;
        Ok(Bytes::from(body))
    }

    fn rpc_consumers(&self) -> Result<Vec<mpsc::Sender<RpcEnvelope>>> {
        Ok(self
            .rpc
            .lock()
            .map_err(|_| SigmeshError::Internal("rpc consumer registry poisoned".into()))?
            .clone())
    }

    fn broadcast_consumers(&self) -> Result<Vec<mpsc::Sender<EventEnvelope>>> {
        Ok(self
            .broadcast
            .lock()
            .map_err(|_| SigmeshError::Internal("broadcast consumer registry poisoned".into()))?
            .clone())
    }
}

#[async_trait]
impl Broker for MemBroker {
    async fn consume_rpc(&self) -> Result<mpsc::Receiver<RpcEnvelope>> {
        let (tx, rx) = mpsc::channel(DELIVERY_BUFFER);
        self.rpc
            .lock()
            .map_err(|_| SigmeshError::StreamUnavailable("rpc consumer registry poisoned".into()))?
            .push(tx);
        Ok(rx)
    }

    async fn consume_broadcast(&self) -> Result<mpsc::Receiver<EventEnvelope>> {
        let (tx, rx) = mpsc::channel(DELIVERY_BUFFER);
        self.broadcast
            .lock()
            .map_err(|_| {
                SigmeshError::StreamUnavailable("broadcast consumer registry poisoned".into())
            })?
            .push(tx);
        Ok(rx)
    }

    async fn publish_rpc(
        &self,
        origin: &str,
        correlation: Option<&str>,
        payload: &Payload,
    ) -> Result<()> {
        let body = Self::encode(payload)?;
        // snapshot before awaiting; the guard must not cross a suspension point
        let consumers = self.rpc_consumers()?;
        for tx in consumers {
            let envelope = RpcEnvelope {
                body: body.clone(),
                origin: origin.to_string(),
                correlation: correlation.map(str::to_string),
            };
            let _ = tx.send(envelope).await;
        }
        Ok(())
    }

    async fn publish_event(&self, payload: &Payload) -> Result<()> {
        let body = Self::encode(payload)?;
        let consumers = self.broadcast_consumers()?;
        for tx in consumers {
            let _ = tx.send(EventEnvelope { body: body.clone() }).await;
        }
        Ok(())
    }
}
