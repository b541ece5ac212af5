//! Application setup and initialization
//!
//! Everything main.rs needs to go from a `Config` to a served router:
//! telemetry, database pool and migrations, storage, services and routes.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::services::mailer_from_config;
use crate::state::{AppState, DbState};
use anyhow::{Context, Result};
use cradle_core::Config;
use cradle_infra::{init_telemetry, LogFormat};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    let log_format = config
        .log_format()
        .parse::<LogFormat>()
        .map_err(|e| anyhow::anyhow!(e))?;
    init_telemetry(log_format).map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let repositories = database::postgres_repositories(&pool);

    let storage = storage::setup_storage(&config).await?;
    let mailer = mailer_from_config(config.smtp());

    let state = Arc::new(AppState::new(
        &config,
        DbState {
            pool: Some(pool),
            repositories,
        },
        storage,
        mailer,
    ));

    if let Some((email, password)) = config.admin_credentials() {
        state
            .services
            .auth
            .ensure_admin(email, password)
            .await
            .context("Failed to bootstrap admin account")?;
    }

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
