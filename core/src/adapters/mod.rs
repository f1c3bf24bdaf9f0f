//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod memory;
pub mod rest;

pub use memory::{InMemoryCommentStore, InMemoryImageStore, InMemoryPostStore, InMemoryProfileStore};
pub use rest::{DocumentClient, RestCommentStore, RestImageStore, RestPostStore, RestProfileStore};
