//! Post service
//!
//! Creating posts (validation plus image upload) and editing existing ones.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::entities::{CurrentUser, NewPost, NewPostForm, Post, PostId, PostUpdate};
use crate::domain::ports::{ImageStore, PostStore};
use crate::error::DomainError;

/// Most images a single post may carry
pub const MAX_IMAGES: usize = 5;

/// Service for authoring posts
pub struct PostService<PS, IS>
where
    PS: PostStore,
    IS: ImageStore,
{
    posts: Arc<PS>,
    images: Arc<IS>,
}

impl<PS, IS> PostService<PS, IS>
where
    PS: PostStore,
    IS: ImageStore,
{
    pub fn new(posts: Arc<PS>, images: Arc<IS>) -> Self {
        Self { posts, images }
    }

    /// Validate the form, upload its images and create the post
    pub async fn create(
        &self,
        user: Option<&CurrentUser>,
        form: NewPostForm,
    ) -> Result<PostId, DomainError> {
        let user = user.ok_or_else(|| {
            DomainError::Unauthenticated("Sign in to write a post".to_string())
        })?;

        let title = required("title", &form.title)?;
        let brand = required("brand", &form.brand)?;
        let category = required("category", &form.category)?;
        let content = required("content", &form.content)?;

        if form.images.is_empty() {
            return Err(DomainError::Validation(
                "At least one image is required".to_string(),
            ));
        }
        if form.images.len() > MAX_IMAGES {
            return Err(DomainError::Validation(format!(
                "At most {} images are allowed",
                MAX_IMAGES
            )));
        }

        let tags: Vec<String> = form
            .tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        let timestamp = Utc::now().timestamp_millis();
        let mut image_urls = Vec::with_capacity(form.images.len());
        for (index, bytes) in form.images.into_iter().enumerate() {
            let path = format!("posts/{}/{}-{}.jpg", user.id, timestamp, index);
            let url = self.images.upload(&path, bytes).await.map_err(|e| {
                tracing::warn!("Image upload {} failed: {}", path, e);
                e
            })?;
            image_urls.push(url);
        }

        let new_post = NewPost {
            title,
            brand,
            category,
            content,
            tags,
            image_urls,
            author_id: user.id.clone(),
            author_name: user.display_name.clone(),
        };

        let id = self.posts.create(&new_post).await?;
        tracing::info!("Created post {} by {}", id, user.id);
        Ok(id)
    }

    pub async fn get(&self, id: &PostId) -> Result<Option<Post>, DomainError> {
        self.posts.get_by_id(id).await
    }

    /// Load a post for editing
    pub async fn open_editor(
        &self,
        user: Option<&CurrentUser>,
        id: &PostId,
    ) -> Result<EditablePost<PS>, DomainError> {
        let post = self
            .posts
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Post {} not found", id)))?;

        Ok(EditablePost::new(self.posts.clone(), post, user))
    }
}

fn required(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// A post being edited: the stored `original` and the working `draft`
pub struct EditablePost<PS: PostStore> {
    store: Arc<PS>,
    original: Post,
    draft: Post,
    is_owner: bool,
    editing_enabled: bool,
}

impl<PS: PostStore> EditablePost<PS> {
    fn new(store: Arc<PS>, post: Post, user: Option<&CurrentUser>) -> Self {
        let is_owner = user.map_or(false, |u| u.owns(&post.author_id));
        Self {
            store,
            draft: post.clone(),
            original: post,
            is_owner,
            editing_enabled: true,
        }
    }

    /// Read-only view: `save` refuses while disabled
    pub fn with_editing(mut self, enabled: bool) -> Self {
        self.editing_enabled = enabled;
        self
    }

    pub fn original(&self) -> &Post {
        &self.original
    }

    pub fn draft(&self) -> &Post {
        &self.draft
    }

    pub fn is_owner(&self) -> bool {
        self.is_owner
    }

    pub fn set_draft(&mut self, draft: Post) {
        self.draft = draft;
    }

    pub fn update_draft(&mut self, updates: &PostUpdate) {
        updates.apply_to(&mut self.draft);
    }

    pub fn has_changes(&self) -> bool {
        let (a, b) = (&self.original, &self.draft);
        a.title != b.title
            || a.brand != b.brand
            || a.category != b.category
            || a.content != b.content
            || a.tags != b.tags
            || a.image_urls != b.image_urls
    }

    /// Write the draft (plus `updates`) back to the store
    ///
    /// Returns `Ok(false)` without touching the store when the user does not
    /// own the post or editing is disabled.
    pub async fn save(&mut self, updates: Option<&PostUpdate>) -> Result<bool, DomainError> {
        if !self.editing_enabled || !self.is_owner {
            return Ok(false);
        }

        let mut next = self.draft.clone();
        if let Some(updates) = updates {
            updates.apply_to(&mut next);
        }

        self.store
            .update(&next.id, &PostUpdate::from_post(&next))
            .await?;

        self.original = next.clone();
        self.draft = next;
        Ok(true)
    }
}
