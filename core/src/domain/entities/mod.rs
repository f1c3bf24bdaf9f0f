//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the wire documents used by the adapters.

pub mod comment;
pub mod post;
pub mod user;

pub use comment::{Comment, CommentId, CommentUpdate, NewComment};
pub use post::{NewPost, NewPostForm, Post, PostId, PostUpdate};
pub use user::{CurrentUser, UserId, UserProfile};
