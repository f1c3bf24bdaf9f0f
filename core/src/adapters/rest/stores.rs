//! Store ports over the REST document backend

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::client::{DocumentClient, DocumentPage, PostDocument};
use super::poller::spawn_poll;
use crate::domain::entities::{
    Comment, CommentId, CommentUpdate, NewComment, NewPost, Post, PostId, PostUpdate, UserId,
    UserProfile,
};
use crate::domain::ports::{
    subscription_channel, CommentStore, Cursor, ImageStore, PostStore, PostsPage, PostsSnapshot,
    ProfileStore, Subscription,
};
use crate::error::DomainError;

fn to_page(page: DocumentPage<PostDocument>) -> PostsPage {
    PostsPage {
        posts: page.documents.into_iter().map(Post::from).collect(),
        cursor: page.next_cursor.map(Cursor::from_token),
    }
}

pub struct RestPostStore {
    client: Arc<DocumentClient>,
    poll_interval: Duration,
}

impl RestPostStore {
    pub fn new(client: Arc<DocumentClient>, poll_interval: Duration) -> Self {
        Self {
            client,
            poll_interval,
        }
    }
}

#[async_trait]
impl PostStore for RestPostStore {
    async fn subscribe_latest(
        &self,
        page_size: usize,
    ) -> Result<Subscription<PostsSnapshot>, DomainError> {
        let (sink, subscription) = subscription_channel();
        let client = self.client.clone();

        spawn_poll(sink, self.poll_interval, move || {
            let client = client.clone();
            async move {
                let page = to_page(client.list_posts(None, page_size).await?);
                Ok::<_, DomainError>(PostsSnapshot {
                    posts: page.posts,
                    cursor: page.cursor,
                })
            }
        });

        Ok(subscription)
    }

    async fn fetch_page(
        &self,
        cursor: Option<&Cursor>,
        page_size: usize,
    ) -> Result<PostsPage, DomainError> {
        let page = self
            .client
            .list_posts(cursor.map(Cursor::token), page_size)
            .await?;
        Ok(to_page(page))
    }

    async fn get_by_id(&self, id: &PostId) -> Result<Option<Post>, DomainError> {
        Ok(self.client.get_post(id.as_str()).await?.map(Post::from))
    }

    async fn create(&self, post: &NewPost) -> Result<PostId, DomainError> {
        Ok(PostId::new(self.client.create_post(post).await?))
    }

    async fn update(&self, id: &PostId, update: &PostUpdate) -> Result<(), DomainError> {
        Ok(self.client.update_post(id.as_str(), update).await?)
    }
}

pub struct RestCommentStore {
    client: Arc<DocumentClient>,
    poll_interval: Duration,
}

impl RestCommentStore {
    pub fn new(client: Arc<DocumentClient>, poll_interval: Duration) -> Self {
        Self {
            client,
            poll_interval,
        }
    }
}

#[async_trait]
impl CommentStore for RestCommentStore {
    async fn subscribe(&self, post_id: &PostId) -> Result<Subscription<Vec<Comment>>, DomainError> {
        let (sink, subscription) = subscription_channel();
        let client = self.client.clone();
        let post_id = post_id.clone();

        spawn_poll(sink, self.poll_interval, move || {
            let client = client.clone();
            let post_id = post_id.clone();
            async move {
                let docs = client.list_comments(post_id.as_str()).await?;
                Ok::<_, DomainError>(docs.into_iter().map(Comment::from).collect::<Vec<_>>())
            }
        });

        Ok(subscription)
    }

    async fn create(
        &self,
        post_id: &PostId,
        comment: &NewComment,
    ) -> Result<CommentId, DomainError> {
        let id = self.client.create_comment(post_id.as_str(), comment).await?;
        Ok(CommentId::new(id))
    }

    async fn update(
        &self,
        post_id: &PostId,
        comment_id: &CommentId,
        update: &CommentUpdate,
    ) -> Result<(), DomainError> {
        Ok(self
            .client
            .update_comment(post_id.as_str(), &comment_id.0, update)
            .await?)
    }
}

pub struct RestProfileStore {
    client: Arc<DocumentClient>,
}

impl RestProfileStore {
    pub fn new(client: Arc<DocumentClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProfileStore for RestProfileStore {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        Ok(self.client.get_profile(user_id.as_str()).await?)
    }
}

pub struct RestImageStore {
    client: Arc<DocumentClient>,
}

impl RestImageStore {
    pub fn new(client: Arc<DocumentClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageStore for RestImageStore {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String, DomainError> {
        Ok(self.client.upload(path, bytes).await?)
    }
}
