use async_trait::async_trait;
use cradle_storage::{LocalStorage, Storage, StorageBackend, StorageError, StorageResult, StoredObject};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Local storage that counts calls and can be told to fail uploads.
pub struct CountingStorage {
    inner: LocalStorage,
    uploads: AtomicUsize,
    deletes: AtomicUsize,
    fail_uploads: AtomicBool,
}

impl CountingStorage {
    pub fn new(inner: LocalStorage) -> Self {
        Self {
            inner,
            uploads: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            fail_uploads: AtomicBool::new(false),
        }
    }

    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Whether the object behind a public URL is still on disk.
    pub async fn holds_url(&self, url: &str) -> bool {
        match self.inner.key_from_url(url) {
            Some(key) => self.inner.exists(&key).await.unwrap_or(false),
            None => false,
        }
    }

    /// Number of files currently stored under `folder`.
    pub fn files_in(&self, folder: &str) -> usize {
        std::fs::read_dir(self.inner.base_path().join(folder))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

#[async_trait]
impl Storage for CountingStorage {
    async fn upload(&self, key: &str, content_type: &str, data: Vec<u8>) -> StorageResult<StoredObject> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("storage unavailable".to_string()));
        }
        self.inner.upload(key, content_type, data).await
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.inner.exists(key).await
    }

    fn public_url(&self, key: &str) -> String {
        self.inner.public_url(key)
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}
