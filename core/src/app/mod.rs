//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities and the store ports.

pub mod account_service;
pub mod comment_service;
pub mod feed_reconciler;
pub mod feed_state;
pub mod post_service;

pub use account_service::AccountService;
pub use comment_service::{CommentService, EditableComment};
pub use feed_reconciler::{FeedReconciler, LivePush};
pub use feed_state::{
    visible_posts, Applied, FeedFilters, FeedState, Generation, LoadMoreOutcome, PageRequest,
    PageResult,
};
pub use post_service::{EditablePost, PostService, MAX_IMAGES};
