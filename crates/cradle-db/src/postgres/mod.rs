//! PostgreSQL repositories (sqlx)

pub mod category;
pub mod request_analytics;
pub mod request_type;
pub mod user;

pub use category::PostgresCategoryRepository;
pub use request_analytics::PostgresRequestAnalyticsRepository;
pub use request_type::PostgresRequestTypeRepository;
pub use user::PostgresUserRepository;
