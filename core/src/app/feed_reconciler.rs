//! Feed reconciler
//!
//! Drives a `FeedState` from a `PostStore`: owns the live subscription, issues
//! page fetches and merges their results. All methods take `&mut self` and are
//! meant to be called from one task; page fetches can run elsewhere through
//! `page_fetch` and come back via `finish_load_more`.

use std::future::Future;
use std::sync::Arc;

use crate::app::feed_state::{
    Applied, FeedState, Generation, LoadMoreOutcome, PageRequest, PageResult,
};
use crate::config::FeedConfig;
use crate::domain::entities::{CurrentUser, Post};
use crate::domain::ports::{PostStore, PostsSnapshot, Subscription};
use crate::error::DomainError;

/// A push received from the live subscription, tagged with its generation
#[derive(Debug)]
pub struct LivePush {
    pub generation: Generation,
    pub result: Result<PostsSnapshot, DomainError>,
}

struct ActiveSubscription {
    generation: Generation,
    stream: Subscription<PostsSnapshot>,
}

/// Live + paginated feed over a post store
pub struct FeedReconciler<PS>
where
    PS: PostStore,
{
    store: Arc<PS>,
    state: FeedState,
    live_window: usize,
    user: Option<CurrentUser>,
    subscription: Option<ActiveSubscription>,
}

impl<PS> FeedReconciler<PS>
where
    PS: PostStore + 'static,
{
    pub fn new(store: Arc<PS>, config: FeedConfig) -> Self {
        Self {
            store,
            state: FeedState::new(config.page_size),
            live_window: config.live_window.max(1),
            user: None,
            subscription: None,
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    /// The deduplicated, filtered feed
    pub fn visible(&self) -> Vec<&Post> {
        self.state.visible()
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Switch the signed-in user
    ///
    /// Signing in (or switching accounts) opens a fresh subscription; signing
    /// out closes it and clears the feed.
    pub async fn set_user(&mut self, user: Option<CurrentUser>) {
        if self.user == user && (user.is_none() || self.is_subscribed()) {
            return;
        }
        self.user = user;
        self.start().await;
    }

    /// Open the live subscription, replacing any previous one
    pub async fn start(&mut self) {
        self.close_subscription();

        let Some(user) = &self.user else {
            self.state.clear_session();
            return;
        };

        let generation = self.state.begin_subscription();
        tracing::info!(
            "Subscribing to latest {} posts for user {} (generation {})",
            self.live_window,
            user.id,
            generation
        );

        match self.store.subscribe_latest(self.live_window).await {
            Ok(stream) => {
                self.subscription = Some(ActiveSubscription { generation, stream });
            }
            Err(e) => {
                self.state.apply_subscription_error(generation, &e);
            }
        }
    }

    /// Drop everything loaded so far and subscribe again
    pub async fn refresh(&mut self) {
        self.close_subscription();
        if self.user.is_none() {
            self.state.clear_session();
            return;
        }
        self.state.reset();
        tracing::info!("Feed refresh requested");
        self.start().await;
    }

    /// Close the live subscription
    pub fn shutdown(&mut self) {
        self.close_subscription();
    }

    fn close_subscription(&mut self) {
        if let Some(mut active) = self.subscription.take() {
            active.stream.close();
            tracing::info!(
                "Closed live subscription (generation {})",
                active.generation
            );
        }
    }

    // Live pushes

    /// Wait for the next push from the live subscription
    ///
    /// Returns `None` when there is no subscription or the store ended it.
    /// Cancel safe, so it can sit in a `select!` loop.
    pub async fn recv_push(&mut self) -> Option<LivePush> {
        let active = self.subscription.as_mut()?;
        match active.stream.next().await {
            Some(result) => Some(LivePush {
                generation: active.generation,
                result,
            }),
            None => {
                tracing::warn!("Live subscription ended by the store");
                self.subscription = None;
                None
            }
        }
    }

    pub fn apply_push(&mut self, push: LivePush) -> Applied {
        match push.result {
            Ok(snapshot) => self.state.apply_snapshot(push.generation, snapshot),
            Err(e) => self.state.apply_subscription_error(push.generation, &e),
        }
    }

    /// Wait for the next push and merge it
    pub async fn next_update(&mut self) -> Option<Applied> {
        let push = self.recv_push().await?;
        Some(self.apply_push(push))
    }

    // Pagination

    /// Claim the load-more slot; `None` means nothing should be fetched
    pub fn begin_load_more(&mut self) -> Option<PageRequest> {
        self.state.begin_load_more()
    }

    /// Fetch the requested page without borrowing the reconciler
    pub fn page_fetch(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = PageResult> + Send + 'static {
        let store = Arc::clone(&self.store);
        async move {
            let result = store
                .fetch_page(Some(&request.cursor), request.page_size)
                .await;
            PageResult { request, result }
        }
    }

    pub fn finish_load_more(&mut self, done: PageResult) -> LoadMoreOutcome {
        self.state.finish_load_more(done)
    }

    /// Fetch and merge the next page in place
    ///
    /// Returns `None` when the call was a no-op (already fetching, exhausted
    /// or no resume point yet).
    pub async fn load_more(&mut self) -> Option<LoadMoreOutcome> {
        let request = self.begin_load_more()?;
        let done = self.page_fetch(request).await;
        Some(self.finish_load_more(done))
    }

    // Filters

    pub fn set_brand_filter(&mut self, brand: Option<String>) {
        self.state.set_brand_filter(brand);
    }

    pub fn set_category_filter(&mut self, category: Option<String>) {
        self.state.set_category_filter(category);
    }

    pub fn toggle_brand(&mut self, brand: &str) {
        self.state.toggle_brand(brand);
    }

    pub fn toggle_category(&mut self, category: &str) {
        self.state.toggle_category(category);
    }

    pub fn clear_filters(&mut self) {
        self.state.clear_filters();
    }
}
