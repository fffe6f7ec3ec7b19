//! Wire-level contracts of the coordination protocol.

pub mod envelope;
pub mod methods;
pub mod payload;

pub use envelope::{EventEnvelope, RpcEnvelope};
pub use payload::Payload;
