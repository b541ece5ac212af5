//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A stored object: its internal key and the public URL persisted on records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) implement this trait so services
/// only ever deal with keys and URLs.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` under `key` and return the key with its public URL.
    async fn upload(
        &self,
        key: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<StoredObject>;

    /// Delete a file by its storage key
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check if a file exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Public URL a key is served from
    fn public_url(&self, key: &str) -> String;

    /// Recover the storage key from a URL previously returned by `upload`.
    ///
    /// Returns `None` for URLs that do not belong to this backend.
    fn key_from_url(&self, url: &str) -> Option<String> {
        let base = self.public_url("");
        url.strip_prefix(base.as_str())
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
