//! Event model

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::helpers;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub committee: String,
    pub place: String,
    pub description: Option<String>,
    /// Audience filters; empty means open to everyone
    pub branches: Vec<String>,
    pub years: Vec<String>,
    pub departments: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_date_range: bool,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub is_time_range: bool,
    /// Inline base64 cover image, unlike profile photos which are URLs
    pub cover_image: Option<String>,
    pub created_by: Uuid,
    pub registration_fee_enabled: bool,
    /// Decimal string in whole currency units, e.g. "500"
    pub registration_fee: Option<String>,
    pub refund_enabled: bool,
    pub refund_amount: Option<String>,
    pub refund_date: Option<NaiveDate>,
    pub cancellation_date: NaiveDate,
    /// Revision counter checked before delete
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// The registration fee in whole currency units; absent or non-numeric
    /// values count as a free event.
    pub fn fee(&self) -> i64 {
        helpers::parse_fee(self.registration_fee.as_deref())
    }

    /// Whether the registration flow must pass through the payment step
    pub fn requires_payment(&self) -> bool {
        self.fee() > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub committee: String,
    pub place: String,
    pub description: Option<String>,
    pub branches: Vec<String>,
    pub years: Vec<String>,
    pub departments: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_date_range: bool,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub is_time_range: bool,
    pub cover_image: Option<String>,
    pub registration_fee_enabled: bool,
    pub registration_fee: Option<String>,
    pub refund_enabled: bool,
    pub refund_amount: Option<String>,
    pub refund_date: Option<NaiveDate>,
    pub cancellation_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_with_fee(enabled: bool, fee: Option<&str>) -> Event {
        Event {
            id: Uuid::new_v4(),
            name: "Tech Talk".to_string(),
            committee: "CSI".to_string(),
            place: "Auditorium".to_string(),
            description: None,
            branches: vec![],
            years: vec![],
            departments: vec![],
            start_date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            end_date: None,
            is_date_range: false,
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: None,
            is_time_range: false,
            cover_image: None,
            created_by: Uuid::new_v4(),
            registration_fee_enabled: enabled,
            registration_fee: fee.map(|s| s.to_string()),
            refund_enabled: false,
            refund_amount: None,
            refund_date: None,
            cancellation_date: NaiveDate::from_ymd_opt(2025, 6, 6).unwrap(),
            version: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_fee_parses_defensively() {
        assert_eq!(event_with_fee(true, Some("500")).fee(), 500);
        assert_eq!(event_with_fee(true, Some("abc")).fee(), 0);
        assert_eq!(event_with_fee(true, None).fee(), 0);
        assert_eq!(event_with_fee(false, Some("0")).fee(), 0);
    }

    #[test]
    fn test_requires_payment_only_for_positive_fee() {
        assert!(event_with_fee(true, Some("500")).requires_payment());
        assert!(!event_with_fee(true, Some("0")).requires_payment());
        assert!(!event_with_fee(true, Some("free")).requires_payment());
        assert!(!event_with_fee(false, None).requires_payment());
    }
}
