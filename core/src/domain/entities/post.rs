//! Post domain entity
//!
//! Posts live in the document backend (source of truth). This entity is the
//! client's view of one document in the `posts` collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Unique, stable identifier of a post (the backend's document id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PostId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A community post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub brand: String,
    pub category: String,
    pub content: String,
    pub tags: Vec<String>,
    pub image_urls: Vec<String>,
    pub author_id: UserId,
    pub author_name: Option<String>,
    pub like_count: u32,
    /// Absent only while the server timestamp of a fresh write is pending
    pub created_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Whether the post passes the given facet filters
    pub fn matches(&self, brand: Option<&str>, category: Option<&str>) -> bool {
        brand.map_or(true, |b| self.brand == b) && category.map_or(true, |c| self.category == c)
    }
}

/// Data written to the store when a post is created
///
/// Image URLs are already uploaded; the store assigns the id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub brand: String,
    pub category: String,
    pub content: String,
    pub tags: Vec<String>,
    pub image_urls: Vec<String>,
    pub author_id: UserId,
    pub author_name: Option<String>,
}

/// Authoring input for a new post, before validation and image upload
#[derive(Debug, Clone, Default)]
pub struct NewPostForm {
    pub title: String,
    pub brand: String,
    pub category: String,
    pub content: String,
    pub tags: Vec<String>,
    /// Raw image bytes, in display order
    pub images: Vec<Vec<u8>>,
}

/// Partial update of a post's editable fields
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
}

impl PostUpdate {
    /// An update that rewrites every editable field from `post`
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: Some(post.title.clone()),
            brand: Some(post.brand.clone()),
            category: Some(post.category.clone()),
            content: Some(post.content.clone()),
            tags: Some(post.tags.clone()),
            image_urls: Some(post.image_urls.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.brand.is_none()
            && self.category.is_none()
            && self.content.is_none()
            && self.tags.is_none()
            && self.image_urls.is_none()
    }

    /// Apply the set fields to `post`; identity, author and timestamps are untouched
    pub fn apply_to(&self, post: &mut Post) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(brand) = &self.brand {
            post.brand = brand.clone();
        }
        if let Some(category) = &self.category {
            post.category = category.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
        if let Some(tags) = &self.tags {
            post.tags = tags.clone();
        }
        if let Some(image_urls) = &self.image_urls {
            post.image_urls = image_urls.clone();
        }
    }
}
