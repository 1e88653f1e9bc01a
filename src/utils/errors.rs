//! Error handling for CommitteeHub
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the CommitteeHub application
#[derive(Error, Debug)]
pub enum CommitteeHubError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Payment gateway error: {0}")]
    Razorpay(#[from] RazorpayError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Account not found: {user_id}")]
    AccountNotFound { user_id: uuid::Uuid },

    #[error("Student profile not found: {user_id}")]
    StudentNotFound { user_id: uuid::Uuid },

    #[error("Group not found")]
    GroupNotFound,

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: uuid::Uuid },

    #[error("Already a member of a group")]
    AlreadyInGroup,

    #[error("Transfer leadership before leaving the group")]
    LeaderCannotLeave,

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Concurrent modification, retry the operation")]
    VersionConflict,

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Reauthentication error: {0}")]
    Reauthentication(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Payment gateway specific errors
#[derive(Error, Debug)]
pub enum RazorpayError {
    #[error("Order creation failed: {0}")]
    OrderCreationFailed(String),

    #[error("Gateway request timed out")]
    Timeout,

    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),

    #[error("Payment signature mismatch")]
    SignatureMismatch,

    #[error("Payment failed")]
    PaymentFailed,

    #[error("Gateway unavailable")]
    ServiceUnavailable,
}

/// Result type alias for CommitteeHub operations
pub type Result<T> = std::result::Result<T, CommitteeHubError>;

/// Result type alias for payment gateway operations
pub type RazorpayResult<T> = std::result::Result<T, RazorpayError>;

impl CommitteeHubError {
    /// Check if the error is recoverable by retrying the same action
    pub fn is_recoverable(&self) -> bool {
        match self {
            CommitteeHubError::Database(_) => false,
            CommitteeHubError::Migration(_) => false,
            CommitteeHubError::Razorpay(_) => true,
            CommitteeHubError::Config(_) => false,
            CommitteeHubError::PermissionDenied(_) => false,
            CommitteeHubError::AccountNotFound { .. } => false,
            CommitteeHubError::StudentNotFound { .. } => false,
            CommitteeHubError::GroupNotFound => false,
            CommitteeHubError::EventNotFound { .. } => false,
            CommitteeHubError::AlreadyInGroup => false,
            CommitteeHubError::LeaderCannotLeave => false,
            CommitteeHubError::InvalidStateTransition { .. } => false,
            CommitteeHubError::VersionConflict => true,
            CommitteeHubError::Redis(_) => true,
            CommitteeHubError::Http(_) => true,
            CommitteeHubError::Serialization(_) => false,
            CommitteeHubError::Io(_) => true,
            CommitteeHubError::UrlParse(_) => false,
            CommitteeHubError::Authentication(_) => true,
            CommitteeHubError::Reauthentication(_) => true,
            CommitteeHubError::RateLimitExceeded => true,
            CommitteeHubError::InvalidInput(_) => false,
            CommitteeHubError::ServiceUnavailable(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CommitteeHubError::Database(_) => ErrorSeverity::Critical,
            CommitteeHubError::Migration(_) => ErrorSeverity::Critical,
            CommitteeHubError::Config(_) => ErrorSeverity::Critical,
            CommitteeHubError::PermissionDenied(_) => ErrorSeverity::Warning,
            CommitteeHubError::Authentication(_) => ErrorSeverity::Warning,
            CommitteeHubError::Reauthentication(_) => ErrorSeverity::Warning,
            CommitteeHubError::RateLimitExceeded => ErrorSeverity::Warning,
            CommitteeHubError::InvalidInput(_) => ErrorSeverity::Info,
            CommitteeHubError::AlreadyInGroup => ErrorSeverity::Info,
            CommitteeHubError::LeaderCannotLeave => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_are_not_recoverable() {
        assert!(!CommitteeHubError::AlreadyInGroup.is_recoverable());
        assert!(!CommitteeHubError::GroupNotFound.is_recoverable());
        assert!(!CommitteeHubError::InvalidInput("code".to_string()).is_recoverable());
    }

    #[test]
    fn test_transient_errors_are_recoverable() {
        assert!(CommitteeHubError::VersionConflict.is_recoverable());
        assert!(CommitteeHubError::RateLimitExceeded.is_recoverable());
        assert!(CommitteeHubError::Razorpay(RazorpayError::Timeout).is_recoverable());
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(
            CommitteeHubError::Config("missing".to_string()).severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(
            CommitteeHubError::AlreadyInGroup.severity(),
            ErrorSeverity::Info
        );
    }
}
