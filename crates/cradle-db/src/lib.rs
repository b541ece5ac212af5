//! Database repositories for the data access layer
//!
//! Each repository is a trait (so services can be exercised without a
//! database) with a PostgreSQL implementation under `postgres` and, behind the
//! `memory` feature, an in-process implementation under `memory`.

pub mod postgres;
pub mod repository;

#[cfg(any(test, feature = "memory"))]
pub mod memory;

pub use postgres::{
    PostgresCategoryRepository, PostgresRequestAnalyticsRepository,
    PostgresRequestTypeRepository, PostgresUserRepository,
};
pub use repository::{
    CategoryRepository, RequestAnalyticsRepository, RequestTypeRepository, UserFilter,
    UserRepository,
};
