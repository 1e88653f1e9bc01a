//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the CommitteeHub application.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "committeehub.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(())
}

/// Log authentication and reauthentication attempts
pub fn log_auth_event(user_id: Option<uuid::Uuid>, action: &str, success: bool, details: Option<&str>) {
    if success {
        info!(
            user_id = ?user_id,
            action = action,
            details = details,
            "Authentication event: success"
        );
    } else {
        warn!(
            user_id = ?user_id,
            action = action,
            details = details,
            "Authentication event: failure"
        );
    }
}

/// Log group membership changes
pub fn log_group_event(group_id: uuid::Uuid, event: &str, user_id: uuid::Uuid, details: Option<&str>) {
    info!(
        group_id = %group_id,
        event = event,
        user_id = %user_id,
        details = details,
        "Group event occurred"
    );
}

/// Log event management actions
pub fn log_event_action(event_id: uuid::Uuid, action: &str, user_id: uuid::Uuid, details: Option<&str>) {
    info!(
        event_id = %event_id,
        action = action,
        user_id = %user_id,
        details = details,
        "Event action performed"
    );
}

/// Log payment gateway interactions
pub fn log_payment_event(user_id: uuid::Uuid, event_id: uuid::Uuid, action: &str, details: Option<&str>) {
    info!(
        user_id = %user_id,
        event_id = %event_id,
        action = action,
        details = details,
        "Payment event occurred"
    );
}

