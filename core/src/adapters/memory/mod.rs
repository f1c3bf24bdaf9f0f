//! In-memory adapter
//!
//! Process-local implementations of the store ports. Writes are pushed to
//! live subscribers immediately, the way the hosted backend does.

pub mod comment_store;
pub mod post_store;
pub mod profile_store;

pub use comment_store::InMemoryCommentStore;
pub use post_store::InMemoryPostStore;
pub use profile_store::{InMemoryImageStore, InMemoryProfileStore};

use std::sync::{Mutex, MutexGuard};

use crate::error::DomainError;

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, DomainError> {
    mutex
        .lock()
        .map_err(|_| DomainError::Internal("in-memory store lock poisoned".to_string()))
}
