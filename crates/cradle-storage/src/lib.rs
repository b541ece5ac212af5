//! Cradle Storage Library
//!
//! Object storage for uploaded files: the `Storage` trait plus S3 (via
//! `object_store`) and local filesystem backends.
//!
//! # Storage key format
//!
//! Keys are `{folder}/{unix_millis}-{uuid}.{ext}`, e.g.
//! `request_files/1718000000000-6f1c....png`. Keys must not contain `..` or a
//! leading `/`. Key generation lives in the `keys` module so all backends agree.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use cradle_core::StorageBackend;
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};
