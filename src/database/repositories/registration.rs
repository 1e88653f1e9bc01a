//! Registration repository implementation

use chrono::Utc;
use std::collections::HashMap;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::registration::{
    CreateReceiptRequest, CreateRegistrationRequest, PaymentReceipt, Registration,
    RegistrationWithReceipt,
};
use crate::utils::errors::CommitteeHubError;

#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a registration snapshot for one (event, student) pair
    pub async fn create(
        &self,
        request: CreateRegistrationRequest,
    ) -> Result<Registration, CommitteeHubError> {
        let registration = sqlx::query_as::<_, Registration>(
            r#"
            INSERT INTO registrations (event_id, user_id, first_name, last_name, email, registered_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING event_id, user_id, first_name, last_name, email, registered_at
            "#,
        )
        .bind(request.event_id)
        .bind(request.user_id)
        .bind(request.first_name)
        .bind(request.last_name)
        .bind(request.email)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Find one registration
    pub async fn find(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Registration>, CommitteeHubError> {
        let registration = sqlx::query_as::<_, Registration>(
            "SELECT event_id, user_id, first_name, last_name, email, registered_at FROM registrations WHERE event_id = $1 AND user_id = $2",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Check if a student is already registered for an event
    pub async fn is_registered(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, CommitteeHubError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND user_id = $2",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// List registrations for an event in registration order
    pub async fn list_for_event(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<Registration>, CommitteeHubError> {
        let registrations = sqlx::query_as::<_, Registration>(
            "SELECT event_id, user_id, first_name, last_name, email, registered_at FROM registrations WHERE event_id = $1 ORDER BY registered_at ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    /// List registrations together with any payment receipts
    pub async fn list_for_event_with_receipts(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<RegistrationWithReceipt>, CommitteeHubError> {
        let (registrations, receipts) = futures::future::try_join(
            self.list_for_event(event_id),
            self.list_receipts_for_event(event_id),
        )
        .await?;

        let mut by_user: HashMap<Uuid, PaymentReceipt> = receipts
            .into_iter()
            .map(|receipt| (receipt.user_id, receipt))
            .collect();

        Ok(registrations
            .into_iter()
            .map(|registration| {
                let receipt = by_user.remove(&registration.user_id);
                RegistrationWithReceipt {
                    registration,
                    receipt,
                }
            })
            .collect())
    }

    /// Store the payment receipt for a completed checkout, keyed by the
    /// gateway's payment id
    pub async fn create_receipt(
        &self,
        request: CreateReceiptRequest,
    ) -> Result<PaymentReceipt, CommitteeHubError> {
        let receipt = sqlx::query_as::<_, PaymentReceipt>(
            r#"
            INSERT INTO payment_receipts (payment_id, event_id, user_id, order_id, signature, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING payment_id, event_id, user_id, order_id, signature, created_at
            "#,
        )
        .bind(request.payment_id)
        .bind(request.event_id)
        .bind(request.user_id)
        .bind(request.order_id)
        .bind(request.signature)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(receipt)
    }

    /// Find a receipt by the gateway's payment id
    pub async fn find_receipt(
        &self,
        payment_id: &str,
    ) -> Result<Option<PaymentReceipt>, CommitteeHubError> {
        let receipt = sqlx::query_as::<_, PaymentReceipt>(
            "SELECT payment_id, event_id, user_id, order_id, signature, created_at FROM payment_receipts WHERE payment_id = $1",
        )
        .bind(payment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(receipt)
    }

    /// List receipts for an event
    pub async fn list_receipts_for_event(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<PaymentReceipt>, CommitteeHubError> {
        let receipts = sqlx::query_as::<_, PaymentReceipt>(
            "SELECT payment_id, event_id, user_id, order_id, signature, created_at FROM payment_receipts WHERE event_id = $1 ORDER BY created_at ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(receipts)
    }
}
