//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use std::sync::OnceLock;

use regex::Regex;

/// Characters used for group join codes. Uppercase plus digits keeps the
/// codes easy to read aloud and type on a phone.
const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of a group join code
pub const JOIN_CODE_LEN: usize = 6;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

/// Generate a shareable 6-character group join code
pub fn generate_join_code() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();

    (0..JOIN_CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..CODE_CHARSET.len());
            CODE_CHARSET[idx] as char
        })
        .collect()
}

/// Parse a registration fee stored as a decimal string in whole currency
/// units. Absent or non-numeric values are treated as zero (a free event).
pub fn parse_fee(fee: Option<&str>) -> i64 {
    fee.map(str::trim)
        .and_then(|s| s.parse::<i64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(0)
}

/// Convert a whole-currency-unit fee to the gateway's minor units (paise)
pub fn to_minor_units(fee: i64) -> i64 {
    fee * 100
}

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    let re = EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"));
    re.is_match(email)
}

/// Sanitize filename for safe storage
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
