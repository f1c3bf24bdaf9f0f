//! In-memory implementation of CommentStore

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::lock;
use crate::domain::entities::{Comment, CommentId, CommentUpdate, NewComment, PostId};
use crate::domain::ports::{subscription_channel, CommentStore, Subscription, SubscriptionSink};
use crate::error::DomainError;

#[derive(Default)]
struct Inner {
    comments: HashMap<PostId, Vec<Comment>>,
    watchers: HashMap<PostId, Vec<SubscriptionSink<Vec<Comment>>>>,
}

impl Inner {
    fn thread(&self, post_id: &PostId) -> Vec<Comment> {
        self.comments.get(post_id).cloned().unwrap_or_default()
    }

    fn broadcast(&mut self, post_id: &PostId) {
        let thread = self.thread(post_id);
        if let Some(sinks) = self.watchers.get_mut(post_id) {
            sinks.retain(|sink| sink.push(thread.clone()));
        }
    }
}

/// In-memory comment threads, one per post, oldest comment first
#[derive(Default)]
pub struct InMemoryCommentStore {
    inner: Mutex<Inner>,
}

impl InMemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentStore for InMemoryCommentStore {
    async fn subscribe(&self, post_id: &PostId) -> Result<Subscription<Vec<Comment>>, DomainError> {
        let (sink, subscription) = subscription_channel();
        let mut inner = lock(&self.inner)?;
        sink.push(inner.thread(post_id));
        inner.watchers.entry(post_id.clone()).or_default().push(sink);
        Ok(subscription)
    }

    async fn create(
        &self,
        post_id: &PostId,
        new_comment: &NewComment,
    ) -> Result<CommentId, DomainError> {
        let mut inner = lock(&self.inner)?;
        let id = CommentId::new(Uuid::new_v4().simple().to_string());
        inner
            .comments
            .entry(post_id.clone())
            .or_default()
            .push(Comment {
                id: id.clone(),
                content: new_comment.content.clone(),
                tone_tag: new_comment.tone_tag.clone(),
                author_id: new_comment.author_id.clone(),
                author_name: new_comment.author_name.clone(),
                created_at: Some(Utc::now()),
            });
        inner.broadcast(post_id);
        Ok(id)
    }

    async fn update(
        &self,
        post_id: &PostId,
        comment_id: &CommentId,
        update: &CommentUpdate,
    ) -> Result<(), DomainError> {
        let mut inner = lock(&self.inner)?;
        let comment = inner
            .comments
            .get_mut(post_id)
            .and_then(|thread| thread.iter_mut().find(|c| &c.id == comment_id))
            .ok_or_else(|| DomainError::NotFound(format!("Comment {} not found", comment_id)))?;
        update.apply_to(comment);
        inner.broadcast(post_id);
        Ok(())
    }
}
