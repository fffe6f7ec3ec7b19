//! Shared error type across sigmesh crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, SigmeshError>;

/// Unified error type used by core and node.
#[derive(Debug, Error)]
pub enum SigmeshError {
    /// Malformed envelope body or nested field.
    #[error("decode failed: {0}")]
    Decode(String),
    /// Envelope violates the coordination protocol (missing discriminator,
    /// response name outside the allow-list).
    #[error("protocol violation: {0}")]
    Protocol(String),
    /// A broker delivery stream could not be established.
    #[error("stream unavailable: {0}")]
    StreamUnavailable(String),
    /// An outbound request was not answered in time.
    #[error("request timed out: {0}")]
    RequestTimeout(String),
    /// Internal error.
    #[error("internal: {0}")]
    Internal(String),
}

impl SigmeshError {
    /// Stable token for log fields and operator tooling.
    pub fn kind(&self) -> &'static str {
        match self {
            SigmeshError::Decode(_) => "DECODE",
            SigmeshError::Protocol(_) => "PROTOCOL",
            SigmeshError::StreamUnavailable(_) => "STREAM_UNAVAILABLE",
            SigmeshError::RequestTimeout(_) => "REQUEST_TIMEOUT",
            SigmeshError::Internal(_) => "INTERNAL",
        }
    }
}
