//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p cradle-api`. The app runs on the
//! in-memory repositories from `cradle-db` (feature `memory`) and a local
//! storage backend in a temp directory, so no database or network is needed.

#![allow(dead_code)]

pub mod auth;
pub mod fixtures;
pub mod mailer;
pub mod storage;

use axum_test::TestServer;
use cradle_api::constants;
use cradle_api::setup::routes;
use cradle_api::state::{AppState, DbState, Repositories};
use cradle_core::config::{AppConfig, DatabaseConfig, ServerConfig, SmtpConfig, StorageConfig};
use cradle_core::{Config, StorageBackend};
use cradle_db::memory::{
    InMemoryCategoryRepository, InMemoryRequestAnalyticsRepository,
    InMemoryRequestTypeRepository, InMemoryUserRepository,
};
use cradle_storage::LocalStorage;
use mailer::RecordingMailer;
use std::sync::Arc;
use storage::CountingStorage;
use tempfile::TempDir;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";
pub const TEST_BASE_URL: &str = "http://localhost:4000/uploads";
pub const MAX_UPLOAD_SIZE_BYTES: usize = 64 * 1024;

/// API path prefix for tests (e.g. `/api/v1`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server plus handles on the in-memory collaborators.
pub struct TestApp {
    pub server: TestServer,
    pub users: InMemoryUserRepository,
    pub records: InMemoryRequestAnalyticsRepository,
    pub storage: Arc<CountingStorage>,
    pub mailer: Arc<RecordingMailer>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn create_test_config(storage_path: &str) -> Config {
    Config(Box::new(AppConfig {
        server: ServerConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            environment: "test".to_string(),
            log_format: "compact".to_string(),
            jwt_secret: TEST_JWT_SECRET.to_string(),
            jwt_expiry_minutes: 30,
            otp_ttl_minutes: 10,
            max_upload_size_bytes: MAX_UPLOAD_SIZE_BYTES,
            admin_email: None,
            admin_password: None,
        },
        database: DatabaseConfig {
            database_url: "postgresql://unused@localhost/cradle_test".to_string(),
            max_connections: 1,
            timeout_seconds: 1,
        },
        storage: StorageConfig {
            backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            local_storage_path: Some(storage_path.to_string()),
            local_storage_base_url: Some(TEST_BASE_URL.to_string()),
        },
        smtp: SmtpConfig {
            smtp_host: None,
            smtp_port: 587,
            smtp_user: None,
            smtp_password: None,
            smtp_from: None,
            smtp_tls: true,
        },
    }))
}

/// Setup test app with in-memory repositories and local storage.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let storage_path = temp_dir.path().to_string_lossy().to_string();

    let local = LocalStorage::new(temp_dir.path(), TEST_BASE_URL.to_string())
        .await
        .expect("Failed to create local storage");
    let storage = Arc::new(CountingStorage::new(local));
    let mailer = Arc::new(RecordingMailer::default());

    let users = InMemoryUserRepository::new();
    let records = InMemoryRequestAnalyticsRepository::new();
    let repositories = Repositories {
        users: Arc::new(users.clone()),
        categories: Arc::new(InMemoryCategoryRepository::new()),
        request_types: Arc::new(InMemoryRequestTypeRepository::new()),
        request_analytics: Arc::new(records.clone()),
    };

    let config = create_test_config(&storage_path);
    let state = Arc::new(AppState::new(
        &config,
        DbState {
            pool: None,
            repositories,
        },
        storage.clone(),
        mailer.clone(),
    ));

    let router = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        users,
        records,
        storage,
        mailer,
        _temp_dir: temp_dir,
    }
}
