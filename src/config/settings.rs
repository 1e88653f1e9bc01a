//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub razorpay: RazorpayConfig,
    pub media: MediaConfig,
    pub logging: LoggingConfig,
    pub features: FeaturesConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Redis configuration (registration flow state)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    pub prefix: String,
    pub ttl_seconds: u64,
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_seconds: u64,
    /// How recent a bearer token must be to count as a silent reauthentication
    pub reauth_window_seconds: u64,
    /// How long a granted reauthentication stays usable
    pub reauth_grant_ttl_seconds: u64,
}

/// Payment gateway configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub api_url: String,
    pub timeout_seconds: u64,
    /// Amount (minor units) used when the order endpoint is called without one
    pub fallback_amount: i64,
    pub currency: String,
}

/// Uploaded media configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    pub upload_dir: String,
    pub base_url: String,
    pub max_bytes: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
    pub max_file_size: String,
    pub max_files: u32,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub payments: bool,
    pub media_uploads: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("COMMITTEEHUB").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::CommitteeHubError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/committeehub".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            redis: RedisConfig {
                url: "redis://localhost:6379".to_string(),
                prefix: "committeehub:".to_string(),
                ttl_seconds: 1800,
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                token_ttl_seconds: 24 * 60 * 60,
                reauth_window_seconds: 5 * 60,
                reauth_grant_ttl_seconds: 5 * 60,
            },
            razorpay: RazorpayConfig {
                key_id: String::new(),
                key_secret: String::new(),
                api_url: "https://api.razorpay.com/v1".to_string(),
                timeout_seconds: 10,
                fallback_amount: 50000,
                currency: "INR".to_string(),
            },
            media: MediaConfig {
                upload_dir: "uploads".to_string(),
                base_url: "/media".to_string(),
                max_bytes: 5 * 1024 * 1024,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "/var/log/committeehub".to_string(),
                max_file_size: "10MB".to_string(),
                max_files: 5,
            },
            features: FeaturesConfig {
                payments: true,
                media_uploads: true,
            },
        }
    }
}
