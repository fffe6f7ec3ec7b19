//! Top-level facade crate for sigmesh.
//!
//! Re-exports core types and the node library so users can depend on a single
//! crate.

pub mod core {
    pub use sigmesh_core::*;
}

pub mod node {
    pub use sigmesh_node::*;
}
