//! Mock implementations of port traits
//!
//! Scripted stores that let tests drive pushes and page results by hand and
//! inspect what the code under test asked for.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

use crate::domain::entities::{NewPost, Post, PostId, PostUpdate};
use crate::domain::ports::{
    subscription_channel, Cursor, ImageStore, PostStore, PostsPage, PostsSnapshot, Subscription,
    SubscriptionSink,
};
use crate::error::DomainError;

// ============================================================================
// Scripted Post Store
// ============================================================================

struct QueuedPage {
    result: Result<PostsPage, DomainError>,
    gate: Option<oneshot::Receiver<()>>,
}

#[derive(Default)]
struct ScriptState {
    sinks: Vec<SubscriptionSink<PostsSnapshot>>,
    window_sizes: Vec<usize>,
    subscribe_failure: Option<DomainError>,
    pages: VecDeque<QueuedPage>,
    page_requests: Vec<(Option<Cursor>, usize)>,
    posts: HashMap<PostId, Post>,
    write_failure: Option<DomainError>,
    created: Vec<NewPost>,
    updates: Vec<(PostId, PostUpdate)>,
}

/// Post store whose pushes and pages are scripted by the test
///
/// Pages are handed out in queue order; an empty queue yields an empty page.
#[derive(Default, Clone)]
pub struct ScriptedPostStore {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate point lookups
    pub fn with_post(self, post: Post) -> Self {
        self.state
            .lock()
            .unwrap()
            .posts
            .insert(post.id.clone(), post);
        self
    }

    /// Push a window to the most recent subscription
    pub fn push(&self, snapshot: PostsSnapshot) -> bool {
        self.latest_sink().map_or(false, |sink| sink.push(snapshot))
    }

    /// Fail the most recent subscription
    pub fn fail(&self, err: DomainError) -> bool {
        self.latest_sink().map_or(false, |sink| sink.fail(err))
    }

    pub fn queue_page(&self, result: Result<PostsPage, DomainError>) {
        self.state.lock().unwrap().pages.push_back(QueuedPage { result, gate: None });
    }

    /// Queue a page that is held back until the returned sender fires
    pub fn queue_gated_page(&self, result: Result<PostsPage, DomainError>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.state.lock().unwrap().pages.push_back(QueuedPage {
            result,
            gate: Some(rx),
        });
        tx
    }

    pub fn fail_next_subscribe(&self, err: DomainError) {
        self.state.lock().unwrap().subscribe_failure = Some(err);
    }

    pub fn fail_next_write(&self, err: DomainError) {
        self.state.lock().unwrap().write_failure = Some(err);
    }

    pub fn subscribe_calls(&self) -> usize {
        self.state.lock().unwrap().window_sizes.len()
    }

    pub fn last_window_size(&self) -> Option<usize> {
        self.state.lock().unwrap().window_sizes.last().copied()
    }

    pub fn fetch_calls(&self) -> usize {
        self.state.lock().unwrap().page_requests.len()
    }

    pub fn page_requests(&self) -> Vec<(Option<Cursor>, usize)> {
        self.state.lock().unwrap().page_requests.clone()
    }

    pub fn latest_sink(&self) -> Option<SubscriptionSink<PostsSnapshot>> {
        self.state.lock().unwrap().sinks.last().cloned()
    }

    /// Subscriptions whose subscriber has not closed yet
    pub fn open_subscriptions(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.sinks.iter().filter(|s| !s.is_closed()).count()
    }

    pub fn created(&self) -> Vec<NewPost> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn updates(&self) -> Vec<(PostId, PostUpdate)> {
        self.state.lock().unwrap().updates.clone()
    }
}

#[async_trait]
impl PostStore for ScriptedPostStore {
    async fn subscribe_latest(
        &self,
        page_size: usize,
    ) -> Result<Subscription<PostsSnapshot>, DomainError> {
        let mut state = self.state.lock().unwrap();
        state.window_sizes.push(page_size);
        if let Some(err) = state.subscribe_failure.take() {
            return Err(err);
        }
        let (sink, subscription) = subscription_channel();
        state.sinks.push(sink);
        Ok(subscription)
    }

    async fn fetch_page(
        &self,
        cursor: Option<&Cursor>,
        page_size: usize,
    ) -> Result<PostsPage, DomainError> {
        let queued = {
            let mut state = self.state.lock().unwrap();
            state.page_requests.push((cursor.cloned(), page_size));
            state.pages.pop_front()
        };

        let Some(queued) = queued else {
            return Ok(PostsPage {
                posts: Vec::new(),
                cursor: None,
            });
        };
        if let Some(gate) = queued.gate {
            let _ = gate.await;
        }
        queued.result
    }

    async fn get_by_id(&self, id: &PostId) -> Result<Option<Post>, DomainError> {
        Ok(self.state.lock().unwrap().posts.get(id).cloned())
    }

    async fn create(&self, post: &NewPost) -> Result<PostId, DomainError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.write_failure.take() {
            return Err(err);
        }
        state.created.push(post.clone());
        Ok(PostId::new(format!("created-{}", state.created.len())))
    }

    async fn update(&self, id: &PostId, update: &PostUpdate) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.write_failure.take() {
            return Err(err);
        }
        state.updates.push((id.clone(), update.clone()));
        if let Some(post) = state.posts.get_mut(id) {
            update.apply_to(post);
        }
        Ok(())
    }
}

// ============================================================================
// Recording Image Store
// ============================================================================

/// Image store that records uploads and can fail the n-th one
#[derive(Default)]
pub struct RecordingImageStore {
    uploads: Mutex<Vec<(String, usize)>>,
    fail_at: Option<usize>,
}

impl RecordingImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the upload with this zero-based index
    pub fn failing_at(index: usize) -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            fail_at: Some(index),
        }
    }

    /// Uploaded paths with their byte lengths, in order
    pub fn uploads(&self) -> Vec<(String, usize)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStore for RecordingImageStore {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String, DomainError> {
        let mut uploads = self.uploads.lock().unwrap();
        if self.fail_at == Some(uploads.len()) {
            return Err(DomainError::Unavailable("storage offline".to_string()));
        }
        uploads.push((path.to_string(), bytes.len()));
        Ok(format!("https://cdn.test/{}", path))
    }
}
