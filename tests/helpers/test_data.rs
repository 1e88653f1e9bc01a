//! Test data builders

use chrono::{NaiveDate, NaiveTime};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use CommitteeHub::config::Settings;
use CommitteeHub::models::event::CreateEventRequest;

/// Settings wired for tests: in-process secrets, no external services
pub fn test_settings(database_url: &str, redis_url: &str, razorpay_url: &str) -> Settings {
    let mut settings = Settings::default();
    settings.database.url = database_url.to_string();
    settings.redis.url = redis_url.to_string();
    settings.redis.prefix = "test_committeehub:".to_string();
    settings.auth.jwt_secret = "test-jwt-secret-test-jwt-secret!".to_string();
    settings.razorpay.api_url = razorpay_url.to_string();
    settings.razorpay.key_id = "rzp_test_key".to_string();
    settings.razorpay.key_secret = "rzp_test_secret".to_string();
    settings
}

/// An event request five days out with a valid cancellation deadline
pub fn event_request(name: &str, fee: Option<&str>) -> CreateEventRequest {
    CreateEventRequest {
        name: name.to_string(),
        committee: "CSI".to_string(),
        place: "Main Auditorium".to_string(),
        description: Some("A test event".to_string()),
        branches: vec!["CSE".to_string(), "IT".to_string()],
        years: vec!["2".to_string(), "3".to_string()],
        departments: vec![],
        start_date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
        end_date: None,
        is_date_range: false,
        start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        end_time: None,
        is_time_range: false,
        cover_image: None,
        registration_fee_enabled: fee.is_some(),
        registration_fee: fee.map(|s| s.to_string()),
        refund_enabled: false,
        refund_amount: None,
        refund_date: None,
        cancellation_date: NaiveDate::from_ymd_opt(2025, 6, 6).unwrap(),
    }
}

/// Compute the checkout signature the way the gateway does, so completed
/// payments can be simulated against the configured test secret
pub fn gateway_signature(order_id: &str, payment_id: &str, secret: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    mac.finalize()
        .into_bytes()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
