//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use cradle_core::{Config, StorageBackend};

/// Validate critical configuration values.
///
/// Structural checks live in `Config::validate`; this adds the checks that
/// only matter for running the HTTP server.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let is_production = config.is_production();

    if is_production && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Please set specific allowed origins via CORS_ORIGINS environment variable."
        ));
    }

    if config.db_max_connections() == 0 {
        return Err(anyhow::anyhow!("Database max connections cannot be 0"));
    }

    if config.db_timeout_seconds() == 0 {
        return Err(anyhow::anyhow!("Database timeout cannot be 0"));
    }

    if config.max_upload_size_bytes() == 0 {
        return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be positive"));
    }

    if config.smtp().smtp_host.is_none() {
        if is_production {
            return Err(anyhow::anyhow!(
                "SMTP_HOST must be set in production, OTP emails cannot be delivered otherwise"
            ));
        }
        tracing::warn!("SMTP_HOST not set - OTP emails will only be logged");
    }

    if is_production && config.storage_backend() == StorageBackend::Local {
        tracing::warn!("Local storage backend in production - files are not replicated");
    }

    Ok(())
}
