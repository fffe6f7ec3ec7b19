use serde::Deserialize;
use sigmesh_core::error::{Result, SigmeshError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    pub version: u32,

    #[serde(default)]
    pub node: NodeSection,

    #[serde(default)]
    pub broker: BrokerSection,
}

impl NodeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(SigmeshError::Protocol(format!(
                "unsupported config version {}",
                self.version
            )));
        }
        self.broker.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Stable node identity on the bus. Generated at startup when unset.
    #[serde(default)]
    pub id: Option<String>,
}

impl Default for NodeSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            id: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrokerSection {
    #[serde(default = "default_rpc_channel")]
    pub rpc_channel: String,

    #[serde(default = "default_broadcast_channel")]
    pub broadcast_channel: String,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for BrokerSection {
    fn default() -> Self {
        Self {
            rpc_channel: default_rpc_channel(),
            broadcast_channel: default_broadcast_channel(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl BrokerSection {
    pub fn validate(&self) -> Result<()> {
        if self.rpc_channel.is_empty() {
            return Err(SigmeshError::Protocol(
                "broker.rpc_channel must not be empty".into(),
            ));
        }
        if self.broadcast_channel.is_empty() {
            return Err(SigmeshError::Protocol(
                "broker.broadcast_channel must not be empty".into(),
            ));
        }
        if !(500..=60000).contains(&self.request_timeout_ms) {
            return Err(SigmeshError::Protocol(
                "broker.request_timeout_ms must be between 500 and 60000".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_rpc_channel() -> String {
    "sigmesh:rpc".into()
}
fn default_broadcast_channel() -> String {
    "sigmesh:broadcast".into()
}
fn default_request_timeout_ms() -> u64 {
    5000
}
