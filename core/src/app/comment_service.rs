//! Comment service

use std::sync::Arc;

use crate::domain::entities::{
    Comment, CommentId, CommentUpdate, CurrentUser, NewComment, PostId,
};
use crate::domain::ports::{CommentStore, Subscription};
use crate::error::DomainError;

pub struct CommentService<CS: CommentStore> {
    comments: Arc<CS>,
}

impl<CS: CommentStore> CommentService<CS> {
    pub fn new(comments: Arc<CS>) -> Self {
        Self { comments }
    }

    /// Live thread of a post, oldest comment first
    pub async fn watch(&self, post_id: &PostId) -> Result<Subscription<Vec<Comment>>, DomainError> {
        self.comments.subscribe(post_id).await
    }

    pub async fn create(
        &self,
        user: Option<&CurrentUser>,
        post_id: &PostId,
        content: &str,
        tone_tag: &str,
    ) -> Result<CommentId, DomainError> {
        let user = user.ok_or_else(|| {
            DomainError::Unauthenticated("Sign in to comment".to_string())
        })?;

        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::Validation("Comment is empty".to_string()));
        }
        let tone_tag = tone_tag.trim();
        if tone_tag.is_empty() {
            return Err(DomainError::Validation("Pick a tone".to_string()));
        }

        let comment = NewComment {
            content: content.to_string(),
            tone_tag: tone_tag.to_string(),
            author_id: user.id.clone(),
            author_name: user.display_name.clone(),
        };
        self.comments.create(post_id, &comment).await
    }

    /// Start editing `comment` as `user`
    pub fn edit(
        &self,
        user: Option<&CurrentUser>,
        post_id: &PostId,
        comment: Comment,
    ) -> EditableComment<CS> {
        EditableComment {
            store: self.comments.clone(),
            post_id: post_id.clone(),
            is_owner: user.map_or(false, |u| u.owns(&comment.author_id)),
            draft_content: comment.content.clone(),
            draft_tone: comment.tone_tag.clone(),
            comment,
        }
    }
}

/// A comment with a pending draft of its content and tone
pub struct EditableComment<CS: CommentStore> {
    store: Arc<CS>,
    post_id: PostId,
    comment: Comment,
    is_owner: bool,
    pub draft_content: String,
    pub draft_tone: String,
}

impl<CS: CommentStore> EditableComment<CS> {
    pub fn comment(&self) -> &Comment {
        &self.comment
    }

    pub fn is_owner(&self) -> bool {
        self.is_owner
    }

    pub fn has_changes(&self) -> bool {
        self.draft_content.trim() != self.comment.content || self.draft_tone != self.comment.tone_tag
    }

    /// Save the draft; `Ok(false)` when not owner or nothing changed
    pub async fn save(&mut self) -> Result<bool, DomainError> {
        if !self.is_owner || !self.has_changes() {
            return Ok(false);
        }

        let update = CommentUpdate {
            content: Some(self.draft_content.trim().to_string()),
            tone_tag: Some(self.draft_tone.clone()),
        };
        self.store
            .update(&self.post_id, &self.comment.id, &update)
            .await?;

        update.apply_to(&mut self.comment);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCommentStore;
    use crate::test_utils::{other_user, test_user};

    async fn posted(service: &CommentService<InMemoryCommentStore>, post: &PostId) -> Comment {
        service
            .create(Some(&test_user()), post, "  love it ", "agree")
            .await
            .unwrap();
        let mut sub = service.watch(post).await.unwrap();
        sub.next().await.unwrap().unwrap().remove(0)
    }

    #[tokio::test]
    async fn create_trims_and_attributes() {
        let service = CommentService::new(Arc::new(InMemoryCommentStore::new()));
        let comment = posted(&service, &PostId::from("p1")).await;

        assert_eq!(comment.content, "love it");
        assert_eq!(comment.tone_tag, "agree");
        assert_eq!(comment.author_id, test_user().id);
        assert_eq!(comment.author_name.as_deref(), Some("Mina"));
    }

    #[tokio::test]
    async fn create_validation() {
        let service = CommentService::new(Arc::new(InMemoryCommentStore::new()));
        let post = PostId::from("p1");
        let user = test_user();

        assert!(matches!(
            service.create(None, &post, "hi", "agree").await,
            Err(DomainError::Unauthenticated(_))
        ));
        assert!(matches!(
            service.create(Some(&user), &post, "   ", "agree").await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.create(Some(&user), &post, "hi", " ").await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn owner_saves_trimmed_draft() {
        let service = CommentService::new(Arc::new(InMemoryCommentStore::new()));
        let post = PostId::from("p1");
        let comment = posted(&service, &post).await;

        let mut editor = service.edit(Some(&test_user()), &post, comment);
        assert!(editor.is_owner());
        assert!(!editor.has_changes());

        editor.draft_content = "love it  ".to_string();
        assert!(!editor.has_changes());

        editor.draft_content = " actually no ".to_string();
        editor.draft_tone = "disagree".to_string();
        assert!(editor.save().await.unwrap());
        assert!(!editor.has_changes());

        let mut sub = service.watch(&post).await.unwrap();
        let thread = sub.next().await.unwrap().unwrap();
        assert_eq!(thread[0].content, "actually no");
        assert_eq!(thread[0].tone_tag, "disagree");
    }

    #[tokio::test]
    async fn save_without_changes_or_ownership_is_refused() {
        let service = CommentService::new(Arc::new(InMemoryCommentStore::new()));
        let post = PostId::from("p1");
        let comment = posted(&service, &post).await;

        let mut unchanged = service.edit(Some(&test_user()), &post, comment.clone());
        assert!(!unchanged.save().await.unwrap());

        let mut stranger = service.edit(Some(&other_user()), &post, comment.clone());
        stranger.draft_content = "edited by someone else".to_string();
        assert!(!stranger.is_owner());
        assert!(!stranger.save().await.unwrap());

        let mut signed_out = service.edit(None, &post, comment);
        signed_out.draft_tone = "question".to_string();
        assert!(!signed_out.save().await.unwrap());
    }
}
