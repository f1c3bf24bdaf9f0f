//! REST adapter
//!
//! Talks to a JSON document backend over HTTP. The backend has no push
//! channel, so live queries are polled.

pub mod client;
pub mod poller;
pub mod stores;

pub use client::DocumentClient;
pub use stores::{RestCommentStore, RestImageStore, RestPostStore, RestProfileStore};
