//! CommitteeHub backend service
//!
//! A backend for student committee event management. This library provides
//! modular components for accounts and role resolution, event management,
//! study-group membership, and the registration flow with optional fee
//! collection through a payment gateway.

#![allow(non_snake_case)]

pub mod api;
pub mod config;
pub mod database;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{CommitteeHubError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::ServiceFactory;
pub use state::{FlowStorage, RegistrationFlow};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
