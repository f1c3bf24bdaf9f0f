//! Store port traits
//!
//! These traits define the interface to the document backend.
//! Implementations are provided by adapters (in-memory, REST).

use async_trait::async_trait;

use super::Subscription;
use crate::domain::entities::{
    Comment, CommentId, CommentUpdate, NewComment, NewPost, Post, PostId, PostUpdate, UserId,
    UserProfile,
};
use crate::error::DomainError;

/// Opaque resumption token returned by a query
///
/// Only the adapter that issued a cursor knows what it means. Callers keep it
/// and hand it back verbatim to request the next page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap a backend token; for adapters only
    pub fn from_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The backend token; for adapters only
    pub fn token(&self) -> &str {
        &self.0
    }
}

/// One push of the live top-K window
#[derive(Debug, Clone, PartialEq)]
pub struct PostsSnapshot {
    /// Newest first
    pub posts: Vec<Post>,
    /// Position of the last post in the window; `None` when the window is empty
    pub cursor: Option<Cursor>,
}

/// One page of older posts
#[derive(Debug, Clone, PartialEq)]
pub struct PostsPage {
    /// Newest first, all strictly older than the requested cursor
    pub posts: Vec<Post>,
    pub cursor: Option<Cursor>,
}

/// Store for post documents
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Subscribe to the newest `page_size` posts by creation time
    ///
    /// Every push carries the full current window, never a diff.
    async fn subscribe_latest(
        &self,
        page_size: usize,
    ) -> Result<Subscription<PostsSnapshot>, DomainError>;

    /// Fetch up to `page_size` posts older than `cursor` (or the newest when `None`)
    async fn fetch_page(
        &self,
        cursor: Option<&Cursor>,
        page_size: usize,
    ) -> Result<PostsPage, DomainError>;

    /// Point lookup
    async fn get_by_id(&self, id: &PostId) -> Result<Option<Post>, DomainError>;

    /// Create a post; the store assigns id, like count and timestamp
    async fn create(&self, post: &NewPost) -> Result<PostId, DomainError>;

    /// Update editable fields of an existing post
    async fn update(&self, id: &PostId, update: &PostUpdate) -> Result<(), DomainError>;
}

/// Store for comments (nested under posts)
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Subscribe to a post's comments, oldest first
    async fn subscribe(&self, post_id: &PostId) -> Result<Subscription<Vec<Comment>>, DomainError>;

    async fn create(&self, post_id: &PostId, comment: &NewComment)
        -> Result<CommentId, DomainError>;

    async fn update(
        &self,
        post_id: &PostId,
        comment_id: &CommentId,
        update: &CommentUpdate,
    ) -> Result<(), DomainError>;
}

/// Store for user profile documents
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, DomainError>;
}
