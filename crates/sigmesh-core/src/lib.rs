//! sigmesh core: transport-agnostic protocol primitives and error types.
//!
//! This crate defines the coordination-protocol contracts and error surface
//! shared by the node, tooling, and tests. It intentionally carries no
//! transport or runtime dependencies so it can be reused in multiple contexts.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `SigmeshError`/`Result` so a node never
//! crashes on malformed bus traffic.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{Result, SigmeshError};
