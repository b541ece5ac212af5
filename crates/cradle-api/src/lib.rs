//! Cradle API Library
//!
//! HTTP handlers, services, middleware and application setup for the
//! data-request marketplace.

mod api_doc;
pub mod constants;
mod handlers;
pub mod response;
pub mod services;
pub mod setup;

pub mod auth;
pub mod error;
pub mod state;

pub use api_doc::ApiDoc;
pub use error::ErrorResponse;
