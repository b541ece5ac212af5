//! Backend selection from `Config`.

#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use cradle_core::Config;
use std::sync::Arc;

/// A setting the selected backend cannot run without.
fn required(value: Option<&str>, name: &str) -> StorageResult<String> {
    value
        .map(str::to_string)
        .ok_or_else(|| StorageError::ConfigError(format!("{} not configured", name)))
}

/// Build the storage backend named by `STORAGE_BACKEND`.
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let backend = config.storage_backend();
    let storage: Arc<dyn Storage> = match backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => Arc::new(S3Storage::new(
            required(config.s3_bucket(), "S3_BUCKET")?,
            required(config.s3_region(), "S3_REGION or AWS_REGION")?,
            config.s3_endpoint().map(str::to_string),
        )?),
        #[cfg(feature = "storage-local")]
        StorageBackend::Local => Arc::new(
            LocalStorage::new(
                required(config.local_storage_path(), "LOCAL_STORAGE_PATH")?,
                required(config.local_storage_base_url(), "LOCAL_STORAGE_BASE_URL")?,
            )
            .await?,
        ),
        #[allow(unreachable_patterns)]
        other => {
            return Err(StorageError::ConfigError(format!(
                "{} storage backend not compiled in (enable the storage-{} feature)",
                other, other
            )))
        }
    };
    Ok(storage)
}
