//! Blob storage port trait

use async_trait::async_trait;

use crate::error::DomainError;

/// Blob storage for post images
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Upload `bytes` under `path` and return its public download URL
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String, DomainError>;
}
