//! Cradle Core Library
//!
//! Domain models, error types, configuration and the request-analytics workflow
//! rules shared by every Cradle crate.

pub mod config;
pub mod data_uri;
pub mod error;
pub mod models;
pub mod pagination;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use data_uri::{DataUri, DataUriError};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use pagination::{Page, PageRequest, PaginationMeta};
pub use storage_types::StorageBackend;
