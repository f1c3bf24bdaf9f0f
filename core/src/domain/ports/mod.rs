//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod media;
pub mod repositories;
pub mod subscription;

pub use media::ImageStore;
pub use repositories::{CommentStore, Cursor, PostStore, PostsPage, PostsSnapshot, ProfileStore};
pub use subscription::{subscription_channel, Subscription, SubscriptionSink};
