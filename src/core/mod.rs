//! Core traits and types for the pipeweld library.
//!
//! This module contains the node contract, the scoped lifecycle every call
//! runs under, and the error types shared by every node.

pub mod error;
pub mod lifecycle;
pub mod traits;

// Re-export core items
pub use error::{Error, IntoError, Result};
pub use lifecycle::{Exit, Scope};
pub use traits::{
    ConsumerRole, IterableNode, Node, NodeExt, ProducerRole, Role, RoleMarker, TransformerRole,
};
