//! HTTP client for the JSON document backend

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use urlencoding::encode;

use crate::domain::entities::{
    Comment, CommentId, CommentUpdate, NewComment, NewPost, Post, PostId, PostUpdate, UserId,
    UserProfile,
};
use crate::error::StoreError;

/// Post document as stored by the backend
///
/// Optional collections and counters may be missing on older documents.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDocument {
    pub id: String,
    pub title: String,
    pub brand: String,
    pub category: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub author_id: String,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<PostDocument> for Post {
    fn from(doc: PostDocument) -> Self {
        Post {
            id: PostId(doc.id),
            title: doc.title,
            brand: doc.brand,
            category: doc.category,
            content: doc.content,
            tags: doc.tags,
            image_urls: doc.image_urls,
            author_id: UserId(doc.author_id),
            author_name: doc.author_name,
            like_count: doc.like_count,
            created_at: doc.created_at,
        }
    }
}

/// Comment document as stored by the backend
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDocument {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub tone_tag: String,
    pub author_id: String,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<CommentDocument> for Comment {
    fn from(doc: CommentDocument) -> Self {
        Comment {
            id: CommentId(doc.id),
            content: doc.content,
            tone_tag: doc.tone_tag,
            author_id: UserId(doc.author_id),
            author_name: doc.author_name,
            created_at: doc.created_at,
        }
    }
}

/// One page of a collection query
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPage<T> {
    pub documents: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Deserialize)]
struct CreatedResponse {
    id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    download_url: String,
}

#[derive(Serialize)]
struct ListQuery<'a> {
    limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_after: Option<&'a str>,
}

/// Client for the document backend's REST API
pub struct DocumentClient {
    http: Client,
    base_url: String,
}

impl DocumentClient {
    /// Create a client; `token` is sent as a bearer token on every request
    pub fn new(base_url: &str, token: Option<&str>, timeout: Duration) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| StoreError::Config("API token is not a valid header value".into()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| StoreError::Deserialization(e.to_string()))
    }

    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<(), StoreError> {
        check_status(response).await.map(|_| ())
    }

    // Posts

    pub async fn list_posts(
        &self,
        start_after: Option<&str>,
        limit: usize,
    ) -> Result<DocumentPage<PostDocument>, StoreError> {
        let response = self
            .http
            .get(self.url("/posts"))
            .query(&ListQuery { limit, start_after })
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn get_post(&self, id: &str) -> Result<Option<PostDocument>, StoreError> {
        let response = self
            .http
            .get(self.url(&format!("/posts/{}", encode(id))))
            .send()
            .await?;
        match self.handle_response(response).await {
            Ok(doc) => Ok(Some(doc)),
            Err(StoreError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn create_post(&self, post: &NewPost) -> Result<String, StoreError> {
        let response = self.http.post(self.url("/posts")).json(post).send().await?;
        let created: CreatedResponse = self.handle_response(response).await?;
        Ok(created.id)
    }

    pub async fn update_post(&self, id: &str, update: &PostUpdate) -> Result<(), StoreError> {
        let response = self
            .http
            .patch(self.url(&format!("/posts/{}", encode(id))))
            .json(update)
            .send()
            .await?;
        self.handle_empty_response(response).await
    }

    // Comments

    pub async fn list_comments(&self, post_id: &str) -> Result<Vec<CommentDocument>, StoreError> {
        let response = self
            .http
            .get(self.url(&format!("/posts/{}/comments", encode(post_id))))
            .send()
            .await?;
        let page: DocumentPage<CommentDocument> = self.handle_response(response).await?;
        Ok(page.documents)
    }

    pub async fn create_comment(
        &self,
        post_id: &str,
        comment: &NewComment,
    ) -> Result<String, StoreError> {
        let response = self
            .http
            .post(self.url(&format!("/posts/{}/comments", encode(post_id))))
            .json(comment)
            .send()
            .await?;
        let created: CreatedResponse = self.handle_response(response).await?;
        Ok(created.id)
    }

    pub async fn update_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        update: &CommentUpdate,
    ) -> Result<(), StoreError> {
        let response = self
            .http
            .patch(self.url(&format!(
                "/posts/{}/comments/{}",
                encode(post_id),
                encode(comment_id)
            )))
            .json(update)
            .send()
            .await?;
        self.handle_empty_response(response).await
    }

    // Users

    pub async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let response = self
            .http
            .get(self.url(&format!("/users/{}", encode(user_id))))
            .send()
            .await?;
        match self.handle_response(response).await {
            Ok(profile) => Ok(Some(profile)),
            Err(StoreError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    // Storage

    pub async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String, StoreError> {
        let encoded: Vec<String> = path.split('/').map(|s| encode(s).into_owned()).collect();
        let response = self
            .http
            .put(self.url(&format!("/storage/{}", encoded.join("/"))))
            .header(reqwest::header::CONTENT_TYPE, "image/jpeg")
            .body(bytes)
            .send()
            .await?;
        let uploaded: UploadResponse = self.handle_response(response).await?;
        Ok(uploaded.download_url)
    }
}

/// Map non-success statuses to errors
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status.as_u16(), body))
}

fn status_error(status: u16, body: String) -> StoreError {
    match status {
        401 => StoreError::Unauthorized,
        403 => StoreError::PermissionDenied,
        429 => StoreError::RateLimited,
        _ => StoreError::Api {
            status,
            message: body,
        },
    }
}
