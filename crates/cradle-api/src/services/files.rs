//! Turning inline `data:` URIs into stored objects.

use crate::error::storage_error;
use cradle_core::{AppError, DataUri};
use cradle_storage::keys::generate_key;
use cradle_storage::{Storage, StoredObject};
use std::sync::Arc;

/// Decodes data URIs, enforces the upload size cap and writes the bytes to storage.
#[derive(Clone)]
pub struct FileUploader {
    storage: Arc<dyn Storage>,
    max_bytes: usize,
}

impl FileUploader {
    pub fn new(storage: Arc<dyn Storage>, max_bytes: usize) -> Self {
        Self { storage, max_bytes }
    }

    /// Decode any base64 data URI. No storage call happens here.
    pub fn decode(&self, raw: &str) -> Result<DataUri, AppError> {
        let file = DataUri::parse(raw)?;
        self.check_size(&file)?;
        Ok(file)
    }

    /// Decode a data URI that must carry an `image/*` media type.
    pub fn decode_image(&self, raw: &str) -> Result<DataUri, AppError> {
        let file = DataUri::parse_image(raw)?;
        self.check_size(&file)?;
        Ok(file)
    }

    fn check_size(&self, file: &DataUri) -> Result<(), AppError> {
        if file.len() > self.max_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "File exceeds the maximum upload size of {} MB",
                self.max_bytes / (1024 * 1024)
            )));
        }
        Ok(())
    }

    /// Store an already decoded file under `folder`.
    pub async fn store(&self, folder: &str, file: DataUri) -> Result<StoredObject, AppError> {
        let key = generate_key(folder, file.extension());
        let size = file.len();
        let stored = self
            .storage
            .upload(&key, &file.mime_type, file.data)
            .await
            .map_err(storage_error)?;

        tracing::info!(
            key = %stored.key,
            content_type = %file.mime_type,
            size_bytes = size,
            "File stored"
        );
        Ok(stored)
    }

    /// Best-effort removal of a previously stored object. Failures are logged only.
    pub async fn discard(&self, key: &str) {
        if let Err(e) = self.storage.delete(key).await {
            tracing::warn!(error = %e, key = %key, "Failed to remove stored file");
        }
    }

    /// Best-effort removal by public URL; URLs from another backend are ignored.
    pub async fn discard_url(&self, url: &str) {
        match self.storage.key_from_url(url) {
            Some(key) => self.discard(&key).await,
            None => tracing::debug!(url = %url, "URL does not belong to the storage backend"),
        }
    }
}
