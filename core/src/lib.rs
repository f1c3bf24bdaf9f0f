//! Catchu core
//!
//! Client-side feed engine for a fashion community app: a live top-K
//! subscription merged with cursor pagination, plus post, comment and
//! account use cases. Uses hexagonal (ports & adapters) architecture so the
//! same logic runs over the in-memory store and the REST document backend.

pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;

#[cfg(test)]
mod test_utils;

pub use config::{BackendKind, Config, FeedConfig};
pub use error::{DomainError, ErrorKind, ErrorSource, FeedError, StoreError};
