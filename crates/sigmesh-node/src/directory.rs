//! Outbound requests to the directory/balancer role.
//!
//! Issues correlated RPC over the broker and parks the caller on the
//! correlator until the response router completes the token.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use sigmesh_core::error::{Result, SigmeshError};
use sigmesh_core::protocol::{methods, Payload};

use crate::broker::Broker;
use crate::correlator::PendingRequests;

pub struct DirectoryClient {
    broker: Arc<dyn Broker>,
    pending: Arc<PendingRequests>,
    node_id: Arc<str>,
    timeout: Duration,
}

impl DirectoryClient {
    pub fn new(
        broker: Arc<dyn Broker>,
        pending: Arc<PendingRequests>,
        node_id: Arc<str>,
        timeout: Duration,
    ) -> Self {
        Self {
            broker,
            pending,
            node_id,
            timeout,
        }
    }

    /// Send `method` with `fields` and wait for the correlated response.
    ///
    /// The waiter is expired on publish failure and on timeout so a late
    /// response finds nobody and stays a no-op.
    pub async fn request(&self, method: &str, mut fields: Payload) -> Result<Payload> {
        let (token, rx) = self.pending.register();
        fields.insert(
            methods::FIELD_METHOD.to_string(),
            Value::String(method.to_string()),
        );
        debug!(method, token = %token, "directory request");

        if let Err(e) = self
            .broker
            .publish_rpc(&self.node_id, Some(&token), &fields)
            .await
        {
            self.pending.expire(&token);
            return Err(e);
        }

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(SigmeshError::Internal(format!(
                "waiter dropped for {method}"
            ))),
            Err(_) => {
                self.pending.expire(&token);
                Err(SigmeshError::RequestTimeout(method.to_string()))
            }
        }
    }
}
