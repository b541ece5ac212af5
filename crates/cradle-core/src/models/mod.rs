//! Data models for the application
//!
//! Each sub-module represents one feature area: persisted entities, their
//! response shapes, request DTOs and patch structs.

mod category;
mod request_analytics;
mod request_type;
mod user;

// Re-export all models for convenient imports
pub use category::*;
pub use request_analytics::*;
pub use request_type::*;
pub use user::*;
