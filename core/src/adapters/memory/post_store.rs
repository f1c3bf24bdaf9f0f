//! In-memory implementation of PostStore

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::lock;
use crate::domain::entities::{NewPost, Post, PostId, PostUpdate};
use crate::domain::ports::{
    subscription_channel, Cursor, PostStore, PostsPage, PostsSnapshot, Subscription,
    SubscriptionSink,
};
use crate::error::DomainError;

/// Sort position of a post in the feed (compared in descending order)
///
/// Posts whose server timestamp is still pending sort as the newest.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Position {
    pending: bool,
    millis: i64,
    id: String,
}

impl Position {
    fn of(post: &Post) -> Self {
        Self {
            pending: post.created_at.is_none(),
            millis: post.created_at.map_or(0, |t| t.timestamp_millis()),
            id: post.id.0.clone(),
        }
    }

    fn to_cursor(&self) -> Cursor {
        let raw = format!("{}:{}:{}", u8::from(self.pending), self.millis, self.id);
        Cursor::from_token(URL_SAFE_NO_PAD.encode(raw))
    }

    fn from_cursor(cursor: &Cursor) -> Result<Self, DomainError> {
        let invalid = || DomainError::Validation("Invalid cursor".to_string());
        let bytes = URL_SAFE_NO_PAD
            .decode(cursor.token())
            .map_err(|_| invalid())?;
        let raw = String::from_utf8(bytes).map_err(|_| invalid())?;

        let mut parts = raw.splitn(3, ':');
        let pending = match parts.next() {
            Some("0") => false,
            Some("1") => true,
            _ => return Err(invalid()),
        };
        let millis = parts
            .next()
            .and_then(|m| m.parse().ok())
            .ok_or_else(invalid)?;
        let id = parts.next().ok_or_else(invalid)?.to_string();

        Ok(Self {
            pending,
            millis,
            id,
        })
    }
}

struct Watcher {
    page_size: usize,
    sink: SubscriptionSink<PostsSnapshot>,
}

#[derive(Default)]
struct Inner {
    posts: HashMap<PostId, Post>,
    watchers: Vec<Watcher>,
    last_created: Option<DateTime<Utc>>,
}

impl Inner {
    /// All posts, newest first
    fn ordered(&self) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self.posts.values().collect();
        posts.sort_by_cached_key(|p| std::cmp::Reverse(Position::of(p)));
        posts
    }

    fn window(&self, page_size: usize) -> PostsSnapshot {
        let posts: Vec<Post> = self
            .ordered()
            .into_iter()
            .take(page_size)
            .cloned()
            .collect();
        let cursor = posts.last().map(|p| Position::of(p).to_cursor());
        PostsSnapshot { posts, cursor }
    }

    /// Push the current window to every live subscriber, dropping closed ones
    fn broadcast(&mut self) {
        let windows: Vec<PostsSnapshot> = self
            .watchers
            .iter()
            .map(|w| self.window(w.page_size))
            .collect();
        let mut delivered = windows.into_iter();
        self.watchers.retain(|w| match delivered.next() {
            Some(window) => w.sink.push(window),
            None => false,
        });
    }

    /// Server timestamp for a new write, strictly after the previous one
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_created {
            Some(last) if now <= last => last + Duration::milliseconds(1),
            _ => now,
        };
        self.last_created = Some(ts);
        ts
    }
}

/// In-memory post collection with live subscriptions
#[derive(Default)]
pub struct InMemoryPostStore {
    inner: Mutex<Inner>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with posts, keeping their ids and timestamps
    pub fn with_posts(self, posts: impl IntoIterator<Item = Post>) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            for post in posts {
                if let Some(ts) = post.created_at {
                    inner.last_created = Some(inner.last_created.map_or(ts, |l| l.max(ts)));
                }
                inner.posts.insert(post.id.clone(), post);
            }
        }
        self
    }

    /// Remove a post (moderation / owner delete)
    pub fn remove(&self, id: &PostId) -> Result<bool, DomainError> {
        let mut inner = lock(&self.inner)?;
        let removed = inner.posts.remove(id).is_some();
        if removed {
            inner.broadcast();
        }
        Ok(removed)
    }

    /// Bump the like counter of a post
    pub fn like(&self, id: &PostId) -> Result<u32, DomainError> {
        let mut inner = lock(&self.inner)?;
        let post = inner
            .posts
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Post {} not found", id)))?;
        post.like_count += 1;
        let count = post.like_count;
        inner.broadcast();
        Ok(count)
    }

    /// Number of subscribers still attached
    pub fn subscriber_count(&self) -> usize {
        match self.inner.lock() {
            Ok(inner) => inner.watchers.iter().filter(|w| !w.sink.is_closed()).count(),
            Err(_) => 0,
        }
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn subscribe_latest(
        &self,
        page_size: usize,
    ) -> Result<Subscription<PostsSnapshot>, DomainError> {
        let (sink, subscription) = subscription_channel();
        let mut inner = lock(&self.inner)?;
        sink.push(inner.window(page_size));
        inner.watchers.push(Watcher { page_size, sink });
        Ok(subscription)
    }

    async fn fetch_page(
        &self,
        cursor: Option<&Cursor>,
        page_size: usize,
    ) -> Result<PostsPage, DomainError> {
        let after = cursor.map(Position::from_cursor).transpose()?;
        let inner = lock(&self.inner)?;

        let posts: Vec<Post> = inner
            .ordered()
            .into_iter()
            .filter(|p| after.as_ref().map_or(true, |a| &Position::of(p) < a))
            .take(page_size)
            .cloned()
            .collect();
        let cursor = posts.last().map(|p| Position::of(p).to_cursor());

        Ok(PostsPage { posts, cursor })
    }

    async fn get_by_id(&self, id: &PostId) -> Result<Option<Post>, DomainError> {
        let inner = lock(&self.inner)?;
        Ok(inner.posts.get(id).cloned())
    }

    async fn create(&self, new_post: &NewPost) -> Result<PostId, DomainError> {
        let mut inner = lock(&self.inner)?;
        let id = PostId::new(Uuid::new_v4().simple().to_string());
        let post = Post {
            id: id.clone(),
            title: new_post.title.clone(),
            brand: new_post.brand.clone(),
            category: new_post.category.clone(),
            content: new_post.content.clone(),
            tags: new_post.tags.clone(),
            image_urls: new_post.image_urls.clone(),
            author_id: new_post.author_id.clone(),
            author_name: new_post.author_name.clone(),
            like_count: 0,
            created_at: Some(inner.next_timestamp()),
        };
        inner.posts.insert(id.clone(), post);
        inner.broadcast();
        Ok(id)
    }

    async fn update(&self, id: &PostId, update: &PostUpdate) -> Result<(), DomainError> {
        let mut inner = lock(&self.inner)?;
        let post = inner
            .posts
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Post {} not found", id)))?;
        update.apply_to(post);
        inner.broadcast();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_new_post, test_post_at};

    fn ids(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.id.as_str()).collect()
    }

    fn seeded(n: i64) -> InMemoryPostStore {
        InMemoryPostStore::new().with_posts((1..=n).map(|i| test_post_at(&format!("p{}", i), i)))
    }

    #[tokio::test]
    async fn window_is_newest_first() {
        let store = seeded(5);
        let mut sub = store.subscribe_latest(3).await.unwrap();

        let snapshot = sub.next().await.unwrap().unwrap();

        assert_eq!(ids(&snapshot.posts), vec!["p5", "p4", "p3"]);
        assert!(snapshot.cursor.is_some());
    }

    #[tokio::test]
    async fn pages_continue_strictly_older() {
        let store = seeded(5);
        let mut sub = store.subscribe_latest(3).await.unwrap();
        let window = sub.next().await.unwrap().unwrap();

        let page = store.fetch_page(window.cursor.as_ref(), 3).await.unwrap();
        assert_eq!(ids(&page.posts), vec!["p2", "p1"]);

        let last = store.fetch_page(page.cursor.as_ref(), 3).await.unwrap();
        assert!(last.posts.is_empty());
        assert!(last.cursor.is_none());
    }

    #[tokio::test]
    async fn first_page_without_cursor() {
        let store = seeded(3);
        let page = store.fetch_page(None, 2).await.unwrap();
        assert_eq!(ids(&page.posts), vec!["p3", "p2"]);
    }

    #[tokio::test]
    async fn create_pushes_new_window() {
        let store = seeded(2);
        let mut sub = store.subscribe_latest(2).await.unwrap();
        sub.next().await.unwrap().unwrap();

        let id = store.create(&test_new_post()).await.unwrap();

        let snapshot = sub.next().await.unwrap().unwrap();
        assert_eq!(snapshot.posts[0].id, id);
        assert_eq!(snapshot.posts.len(), 2);
        assert_eq!(snapshot.posts[0].like_count, 0);
        assert!(snapshot.posts[0].created_at.is_some());
    }

    #[tokio::test]
    async fn update_and_like_are_redelivered() {
        let store = seeded(1);
        let mut sub = store.subscribe_latest(5).await.unwrap();
        sub.next().await.unwrap().unwrap();
        let id = PostId::from("p1");

        let update = PostUpdate {
            title: Some("edited".to_string()),
            ..Default::default()
        };
        store.update(&id, &update).await.unwrap();
        assert_eq!(sub.next().await.unwrap().unwrap().posts[0].title, "edited");

        assert_eq!(store.like(&id).unwrap(), 1);
        assert_eq!(sub.next().await.unwrap().unwrap().posts[0].like_count, 1);
    }

    #[tokio::test]
    async fn remove_pushes_window_without_the_post() {
        let store = seeded(3);
        let mut sub = store.subscribe_latest(2).await.unwrap();
        sub.next().await.unwrap().unwrap();

        assert!(store.remove(&PostId::from("p3")).unwrap());

        let snapshot = sub.next().await.unwrap().unwrap();
        assert_eq!(ids(&snapshot.posts), vec!["p2", "p1"]);
        assert_eq!(store.get_by_id(&PostId::from("p3")).await.unwrap(), None);
        assert!(!store.remove(&PostId::from("p3")).unwrap());
    }

    #[tokio::test]
    async fn update_missing_post() {
        let store = InMemoryPostStore::new();
        let result = store
            .update(&PostId::from("nope"), &PostUpdate::default())
            .await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn closed_subscribers_are_dropped() {
        let store = seeded(1);
        let mut sub = store.subscribe_latest(5).await.unwrap();
        assert_eq!(store.subscriber_count(), 1);

        sub.close();
        store.create(&test_new_post()).await.unwrap();

        assert_eq!(store.subscriber_count(), 0);
        assert!(sub.next().await.is_none());
    }

    #[tokio::test]
    async fn garbage_cursor_is_rejected() {
        let store = seeded(1);
        let result = store
            .fetch_page(Some(&Cursor::from_token("not a cursor")), 5)
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn get_by_id() {
        let store = seeded(2);
        assert!(store.get_by_id(&PostId::from("p2")).await.unwrap().is_some());
        assert!(store.get_by_id(&PostId::from("p9")).await.unwrap().is_none());
    }

    #[test]
    fn cursor_round_trip_keeps_colons_in_ids() {
        let position = Position {
            pending: false,
            millis: 42,
            id: "a:b".to_string(),
        };
        assert_eq!(Position::from_cursor(&position.to_cursor()).unwrap(), position);
    }
}
