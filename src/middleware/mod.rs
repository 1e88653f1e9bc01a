//! Middleware components
//!
//! This module contains authentication extraction and rate limiting for
//! the HTTP surface.

pub mod auth;
pub mod rate_limit;

pub use auth::{CurrentActor, CurrentUser};
pub use rate_limit::{RateLimitConfig, RateLimiter};
