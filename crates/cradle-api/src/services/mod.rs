pub mod auth;
pub mod categories;
pub mod email;
pub mod files;
pub mod request_analytics;
pub mod request_types;
pub mod users;

pub use auth::AuthService;
pub use categories::CategoryService;
pub use email::{mailer_from_config, LogMailer, Mailer, SmtpMailer};
pub use files::FileUploader;
pub use request_analytics::{RequestAnalyticsDeps, RequestAnalyticsService};
pub use request_types::RequestTypeService;
pub use users::UserService;
