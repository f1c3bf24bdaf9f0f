//! Catchu terminal client
//!
//! Browses the live community feed from the terminal. Talks either to the
//! in-memory store (seeded with demo posts) or to a REST document backend,
//! picked with CATCHU_BACKEND.

mod command;
mod demo;
mod render;
mod session;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use catchu_core::adapters::{
    DocumentClient, InMemoryCommentStore, InMemoryPostStore, InMemoryProfileStore,
    RestCommentStore, RestPostStore, RestProfileStore,
};
use catchu_core::app::FeedReconciler;
use catchu_core::{BackendKind, Config};
use session::Session;

/// Posts seeded into the in-memory backend
const DEMO_POSTS: usize = 60;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr (stdout is the feed display)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    tracing::info!(
        "Starting catchu ({:?} backend, page size {}, live window {})",
        config.backend,
        config.feed.page_size,
        config.feed.live_window
    );

    match config.backend {
        BackendKind::Memory => run_memory(config).await,
        BackendKind::Rest => run_rest(config).await,
    }
}

async fn run_memory(config: Config) -> Result<()> {
    let user = config.user.clone().unwrap_or_else(demo::demo_user);

    let posts = Arc::new(InMemoryPostStore::new().with_posts(demo::demo_posts(DEMO_POSTS)));
    let comments = Arc::new(InMemoryCommentStore::new());
    let profiles =
        Arc::new(InMemoryProfileStore::new().with_profile(user.id.clone(), demo::demo_profile()));

    let mut feed = FeedReconciler::new(Arc::clone(&posts), config.feed);
    feed.set_user(Some(user)).await;

    Session::new(feed, posts, comments, profiles, config.request_timeout)
        .run()
        .await
}

async fn run_rest(config: Config) -> Result<()> {
    let client = DocumentClient::new(
        &config.api_url,
        config.api_token.as_deref(),
        config.request_timeout,
    )
    .context("Failed to build the REST client")?;
    let client = Arc::new(client);
    tracing::info!("Using document backend at {}", config.api_url);

    let posts = Arc::new(RestPostStore::new(Arc::clone(&client), config.poll_interval));
    let comments = Arc::new(RestCommentStore::new(
        Arc::clone(&client),
        config.poll_interval,
    ));
    let profiles = Arc::new(RestProfileStore::new(client));

    let mut feed = FeedReconciler::new(Arc::clone(&posts), config.feed);
    feed.set_user(config.user.clone()).await;

    Session::new(feed, posts, comments, profiles, config.request_timeout)
        .run()
        .await
}
