//! Node config loader (strict parsing).

pub mod schema;

use std::fs;

use sigmesh_core::error::{Result, SigmeshError};

pub use schema::{BrokerSection, NodeConfig, NodeSection};

pub fn load_from_file(path: &str) -> Result<NodeConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| SigmeshError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<NodeConfig> {
    let cfg: NodeConfig = serde_yaml::from_str(s)
        .map_err(|e| SigmeshError::Decode(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
