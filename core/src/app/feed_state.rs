//! Feed reconciliation state
//!
//! Holds the live window and the historical pages side by side and derives the
//! visible feed from them. Everything here is synchronous; the async plumbing
//! lives in `FeedReconciler`. Results that arrive asynchronously carry the
//! `Generation` they were issued under and are dropped if the feed has been
//! reset since.

use std::collections::HashSet;

use crate::domain::entities::Post;
use crate::domain::ports::{Cursor, PostsPage, PostsSnapshot};
use crate::error::{DomainError, ErrorSource, FeedError};

/// Monotonic counter bumped whenever in-flight work must be invalidated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether an asynchronous result was merged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    /// Issued under an older generation; ignored
    Stale,
}

/// A page request handed out by `begin_load_more`
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub generation: Generation,
    pub cursor: Cursor,
    pub page_size: usize,
}

/// A completed page request, ready to be merged
#[derive(Debug, Clone)]
pub struct PageResult {
    pub request: PageRequest,
    pub result: Result<PostsPage, DomainError>,
}

/// What happened when a page result was merged
#[derive(Debug, Clone, PartialEq)]
pub enum LoadMoreOutcome {
    Loaded { added: usize, has_more: bool },
    Failed(FeedError),
    Stale,
}

/// Active facet filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedFilters {
    pub brand: Option<String>,
    pub category: Option<String>,
}

impl FeedFilters {
    pub fn is_active(&self) -> bool {
        self.brand.is_some() || self.category.is_some()
    }

    /// Number of facets currently filtering
    pub fn active_count(&self) -> usize {
        usize::from(self.brand.is_some()) + usize::from(self.category.is_some())
    }

    pub fn matches(&self, post: &Post) -> bool {
        post.matches(self.brand.as_deref(), self.category.as_deref())
    }
}

/// Merge live and historical posts into the visible feed
///
/// Live posts come first, the first copy of an id wins, then filters apply.
pub fn visible_posts<'a>(
    live: &'a [Post],
    historical: &'a [Post],
    filters: &FeedFilters,
) -> Vec<&'a Post> {
    let mut seen = HashSet::new();
    live.iter()
        .chain(historical)
        .filter(|&post| seen.insert(&post.id))
        .filter(|post| filters.matches(post))
        .collect()
}

/// Client-side feed state
#[derive(Debug, Clone)]
pub struct FeedState {
    live: Vec<Post>,
    historical: Vec<Post>,
    live_cursor: Option<Cursor>,
    pagination_cursor: Option<Cursor>,
    has_more: bool,
    is_loading_initial: bool,
    is_fetching_more: bool,
    error: Option<FeedError>,
    filters: FeedFilters,
    generation: Generation,
    page_size: usize,
}

impl FeedState {
    pub fn new(page_size: usize) -> Self {
        Self {
            live: Vec::new(),
            historical: Vec::new(),
            live_cursor: None,
            pagination_cursor: None,
            has_more: true,
            is_loading_initial: true,
            is_fetching_more: false,
            error: None,
            filters: FeedFilters::default(),
            generation: Generation::default(),
            page_size: page_size.max(1),
        }
    }

    pub fn visible(&self) -> Vec<&Post> {
        visible_posts(&self.live, &self.historical, &self.filters)
    }

    pub fn live(&self) -> &[Post] {
        &self.live
    }

    pub fn historical(&self) -> &[Post] {
        &self.historical
    }

    pub fn live_cursor(&self) -> Option<&Cursor> {
        self.live_cursor.as_ref()
    }

    pub fn pagination_cursor(&self) -> Option<&Cursor> {
        self.pagination_cursor.as_ref()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading_initial(&self) -> bool {
        self.is_loading_initial
    }

    pub fn is_fetching_more(&self) -> bool {
        self.is_fetching_more
    }

    pub fn error(&self) -> Option<&FeedError> {
        self.error.as_ref()
    }

    pub fn filters(&self) -> &FeedFilters {
        &self.filters
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    // Lifecycle

    /// Prepare for a new live subscription and return its generation
    ///
    /// Pagination restarts from the new live window; the current live posts
    /// stay on screen until the first push replaces them.
    pub fn begin_subscription(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.historical.clear();
        self.pagination_cursor = None;
        self.has_more = true;
        self.is_loading_initial = true;
        self.is_fetching_more = false;
        self.generation
    }

    /// Manual refresh: drop everything loaded so far and start over
    pub fn reset(&mut self) -> Generation {
        self.live.clear();
        self.live_cursor = None;
        self.begin_subscription()
    }

    /// No signed-in user: nothing to show and nothing loading
    pub fn clear_session(&mut self) {
        self.generation = self.generation.next();
        self.live.clear();
        self.historical.clear();
        self.live_cursor = None;
        self.pagination_cursor = None;
        self.has_more = true;
        self.is_loading_initial = false;
        self.is_fetching_more = false;
        self.error = None;
    }

    // Live window

    pub fn apply_snapshot(&mut self, generation: Generation, snapshot: PostsSnapshot) -> Applied {
        if generation != self.generation {
            tracing::debug!(
                "Discarding live push from generation {} (current {})",
                generation,
                self.generation
            );
            return Applied::Stale;
        }

        tracing::debug!("Live window replaced with {} posts", snapshot.posts.len());
        self.live = snapshot.posts;
        self.live_cursor = snapshot.cursor;
        self.error = None;
        self.is_loading_initial = false;
        Applied::Applied
    }

    pub fn apply_subscription_error(
        &mut self,
        generation: Generation,
        err: &DomainError,
    ) -> Applied {
        if generation != self.generation {
            return Applied::Stale;
        }

        tracing::warn!("Live feed subscription failed: {}", err);
        self.is_loading_initial = false;
        self.error = Some(FeedError::subscription(err));
        Applied::Applied
    }

    // Pagination

    /// Claim the single load-more slot and describe the page to fetch
    ///
    /// Returns `None` (and requests nothing) while a fetch is in flight, once
    /// pagination is exhausted, or before the live window has a resume point.
    pub fn begin_load_more(&mut self) -> Option<PageRequest> {
        if self.is_fetching_more || !self.has_more {
            return None;
        }

        let cursor = match self.pagination_cursor.as_ref().or(self.live_cursor.as_ref()) {
            Some(cursor) => cursor.clone(),
            None => {
                // An empty live window has nothing older behind it
                if !self.is_loading_initial {
                    self.has_more = false;
                }
                return None;
            }
        };

        self.is_fetching_more = true;
        Some(PageRequest {
            generation: self.generation,
            cursor,
            page_size: self.page_size,
        })
    }

    pub fn finish_load_more(&mut self, done: PageResult) -> LoadMoreOutcome {
        let PageResult { request, result } = done;
        if request.generation != self.generation {
            tracing::debug!(
                "Discarding page from generation {} (current {})",
                request.generation,
                self.generation
            );
            return LoadMoreOutcome::Stale;
        }
        self.is_fetching_more = false;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Failed to load more posts: {}", e);
                let err = FeedError::pagination(&e);
                self.error = Some(err.clone());
                return LoadMoreOutcome::Failed(err);
            }
        };

        if self
            .error
            .as_ref()
            .is_some_and(|e| e.origin == ErrorSource::Pagination)
        {
            self.error = None;
        }

        if page.posts.is_empty() {
            self.has_more = false;
            return LoadMoreOutcome::Loaded {
                added: 0,
                has_more: false,
            };
        }

        let returned = page.posts.len();
        let known: HashSet<_> = self
            .live
            .iter()
            .chain(&self.historical)
            .map(|p| p.id.clone())
            .collect();
        let before = self.historical.len();
        self.historical
            .extend(page.posts.into_iter().filter(|p| !known.contains(&p.id)));
        let added = self.historical.len() - before;

        // A short page is the last one; without a cursor there is no resume point
        if returned < request.page_size || page.cursor.is_none() {
            self.has_more = false;
        }
        if page.cursor.is_some() {
            self.pagination_cursor = page.cursor;
        }

        tracing::debug!(
            "Appended {} of {} posts (has_more: {})",
            added,
            returned,
            self.has_more
        );
        LoadMoreOutcome::Loaded {
            added,
            has_more: self.has_more,
        }
    }

    // Filters

    pub fn set_brand_filter(&mut self, brand: Option<String>) {
        self.filters.brand = brand;
    }

    pub fn set_category_filter(&mut self, category: Option<String>) {
        self.filters.category = category;
    }

    /// Select `brand`, or clear the filter if it is already selected
    pub fn toggle_brand(&mut self, brand: &str) {
        self.filters.brand = toggled(self.filters.brand.take(), brand);
    }

    /// Select `category`, or clear the filter if it is already selected
    pub fn toggle_category(&mut self, category: &str) {
        self.filters.category = toggled(self.filters.category.take(), category);
    }

    pub fn clear_filters(&mut self) {
        self.filters = FeedFilters::default();
    }
}

fn toggled(current: Option<String>, value: &str) -> Option<String> {
    match current {
        Some(v) if v == value => None,
        _ => Some(value.to_string()),
    }
}
