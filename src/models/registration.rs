//! Registration and payment receipt models
//!
//! A registration is a per-(event, student) snapshot of the student's name
//! fields at the time of registration. Paid events additionally carry one
//! payment receipt keyed by the gateway's payment id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentReceipt {
    /// The gateway's payment id
    pub payment_id: String,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub order_id: String,
    pub signature: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRegistrationRequest {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReceiptRequest {
    pub payment_id: String,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub order_id: String,
    pub signature: String,
}

/// A registration together with its receipt, if any, for host/admin views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationWithReceipt {
    pub registration: Registration,
    pub receipt: Option<PaymentReceipt>,
}
