//! Test helpers module
//!
//! This module provides utilities and helpers for testing the CommitteeHub
//! application: containerized Postgres/Redis, a mock payment gateway, and
//! test data builders.

pub mod database_helper;
pub mod razorpay_mock;
pub mod test_data;

pub use database_helper::*;
pub use razorpay_mock::*;
pub use test_data::*;
