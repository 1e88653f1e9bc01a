//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{CommitteeHubError, Result};

use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_redis_config(&settings.redis)?;
    validate_auth_config(&settings.auth)?;
    validate_logging_config(&settings.logging)?;
    validate_media_config(&settings.media)?;

    if settings.features.payments {
        validate_razorpay_config(&settings.razorpay)?;
    }

    Ok(())
}

fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(CommitteeHubError::Config(
            "Server host is required".to_string(),
        ));
    }

    Ok(())
}

fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(CommitteeHubError::Config(
            "Database URL is required".to_string(),
        ));
    }

    if config.max_connections == 0 {
        return Err(CommitteeHubError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(CommitteeHubError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(CommitteeHubError::Config(
            "Redis URL is required".to_string(),
        ));
    }

    Ok(())
}

fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.len() < 32 {
        return Err(CommitteeHubError::Config(
            "JWT secret must be at least 32 bytes".to_string(),
        ));
    }

    if config.token_ttl_seconds == 0 || config.reauth_grant_ttl_seconds == 0 {
        return Err(CommitteeHubError::Config(
            "Token lifetimes must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_razorpay_config(config: &super::RazorpayConfig) -> Result<()> {
    if config.key_id.is_empty() || config.key_secret.is_empty() {
        return Err(CommitteeHubError::Config(
            "Razorpay API credentials are required when payments are enabled".to_string(),
        ));
    }

    url::Url::parse(&config.api_url)
        .map_err(|_| CommitteeHubError::Config("Razorpay API URL is not a valid URL".to_string()))?;

    if config.timeout_seconds == 0 {
        return Err(CommitteeHubError::Config(
            "Razorpay timeout must be greater than 0".to_string(),
        ));
    }

    if config.fallback_amount <= 0 {
        return Err(CommitteeHubError::Config(
            "Razorpay fallback amount must be positive".to_string(),
        ));
    }

    Ok(())
}

fn validate_media_config(config: &super::MediaConfig) -> Result<()> {
    if config.upload_dir.is_empty() {
        return Err(CommitteeHubError::Config(
            "Media upload directory is required".to_string(),
        ));
    }

    if config.max_bytes == 0 {
        return Err(CommitteeHubError::Config(
            "Media max size must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(CommitteeHubError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(CommitteeHubError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}
