//! In-memory implementations of ProfileStore and ImageStore

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::lock;
use crate::domain::entities::{UserId, UserProfile};
use crate::domain::ports::{ImageStore, ProfileStore};
use crate::error::DomainError;

#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: Mutex<HashMap<UserId, UserProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a profile
    pub fn with_profile(self, user_id: UserId, profile: UserProfile) -> Self {
        if let Ok(mut profiles) = self.profiles.lock() {
            profiles.insert(user_id, profile);
        }
        self
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        let profiles = lock(&self.profiles)?;
        Ok(profiles.get(user_id).cloned())
    }
}

/// Keeps uploaded blobs in memory and hands out `memory://` URLs
#[derive(Default)]
pub struct InMemoryImageStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<String> {
        match self.blobs.lock() {
            Ok(blobs) => {
                let mut paths: Vec<String> = blobs.keys().cloned().collect();
                paths.sort();
                paths
            }
            Err(_) => Vec::new(),
        }
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String, DomainError> {
        if bytes.is_empty() {
            return Err(DomainError::Validation(format!("Image {} is empty", path)));
        }
        let mut blobs = lock(&self.blobs)?;
        blobs.insert(path.to_string(), bytes);
        Ok(format!("memory://{}", path))
    }
}
