//! Application state and sub-state extractors.
//!
//! AppState is built once at startup and never mutated. Resource handlers
//! extract only `Services` via `FromRef`; health checks take the whole state.

use crate::auth::{AuthState, JwtService};
use crate::services::{
    AuthService, CategoryService, FileUploader, Mailer, RequestAnalyticsDeps,
    RequestAnalyticsService, RequestTypeService, UserService,
};
use cradle_core::Config;
use cradle_db::{
    CategoryRepository, RequestAnalyticsRepository, RequestTypeRepository, UserRepository,
};
use cradle_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

/// Repository handles shared by the services
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub request_types: Arc<dyn RequestTypeRepository>,
    pub request_analytics: Arc<dyn RequestAnalyticsRepository>,
}

/// Database pool (absent when running on in-memory repositories) and repositories.
#[derive(Clone)]
pub struct DbState {
    pub pool: Option<PgPool>,
    pub repositories: Repositories,
}

#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub users: UserService,
    pub categories: CategoryService,
    pub request_types: RequestTypeService,
    pub request_analytics: RequestAnalyticsService,
    pub files: FileUploader,
}

/// Settings the router and middleware stack need
#[derive(Clone, Debug)]
pub struct SecurityConfig {
    pub is_production: bool,
    pub cors_origins: Vec<String>,
    pub max_upload_size_bytes: usize,
}

pub struct AppState {
    pub db: DbState,
    pub storage: Arc<dyn Storage>,
    pub auth: Arc<AuthState>,
    pub security: SecurityConfig,
    pub services: Services,
}

impl AppState {
    /// Wire services from their collaborators.
    pub fn new(
        config: &Config,
        db: DbState,
        storage: Arc<dyn Storage>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let repos = db.repositories.clone();
        let jwt = JwtService::new(config.jwt_secret(), config.jwt_expiry_minutes());
        let files = FileUploader::new(storage.clone(), config.max_upload_size_bytes());

        let services = Services {
            auth: AuthService::new(
                repos.users.clone(),
                files.clone(),
                mailer,
                jwt.clone(),
                config.otp_ttl_minutes(),
            ),
            users: UserService::new(repos.users.clone(), files.clone()),
            categories: CategoryService::new(repos.categories.clone()),
            request_types: RequestTypeService::new(repos.request_types.clone()),
            request_analytics: RequestAnalyticsService::new(
                RequestAnalyticsDeps {
                    records: repos.request_analytics.clone(),
                    categories: repos.categories.clone(),
                    request_types: repos.request_types.clone(),
                    users: repos.users.clone(),
                },
                files.clone(),
            ),
            files,
        };

        let auth = Arc::new(AuthState {
            jwt,
            users: repos.users,
        });

        let security = SecurityConfig {
            is_production: config.is_production(),
            cors_origins: config.cors_origins().to_vec(),
            max_upload_size_bytes: config.max_upload_size_bytes(),
        };

        Self {
            db,
            storage,
            auth,
            security,
            services,
        }
    }
}

impl axum::extract::FromRef<Arc<AppState>> for Services {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.services.clone()
    }
}
