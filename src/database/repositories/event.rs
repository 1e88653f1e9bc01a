//! Event repository implementation

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::event::{CreateEventRequest, Event};
use crate::utils::errors::CommitteeHubError;

const EVENT_COLUMNS: &str = "id, name, committee, place, description, branches, years, departments, start_date, end_date, is_date_range, start_time, end_time, is_time_range, cover_image, created_by, registration_fee_enabled, registration_fee, refund_enabled, refund_amount, refund_date, cancellation_date, version, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event
    pub async fn create(
        &self,
        created_by: Uuid,
        request: CreateEventRequest,
    ) -> Result<Event, CommitteeHubError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (id, name, committee, place, description, branches, years, departments,
                                start_date, end_date, is_date_range, start_time, end_time, is_time_range,
                                cover_image, created_by, registration_fee_enabled, registration_fee,
                                refund_enabled, refund_amount, refund_date, cancellation_date,
                                version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, 0, $23, $24)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(request.name)
        .bind(request.committee)
        .bind(request.place)
        .bind(request.description)
        .bind(request.branches)
        .bind(request.years)
        .bind(request.departments)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.is_date_range)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.is_time_range)
        .bind(request.cover_image)
        .bind(created_by)
        .bind(request.registration_fee_enabled)
        .bind(request.registration_fee)
        .bind(request.refund_enabled)
        .bind(request.refund_amount)
        .bind(request.refund_date)
        .bind(request.cancellation_date)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, CommitteeHubError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// List all events, soonest first
    pub async fn list(&self) -> Result<Vec<Event>, CommitteeHubError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY start_date ASC, start_time ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// List events starting on or after the given date
    pub async fn list_upcoming(&self, from: NaiveDate) -> Result<Vec<Event>, CommitteeHubError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE start_date >= $1 ORDER BY start_date ASC, start_time ASC"
        ))
        .bind(from)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// List events created by one user
    pub async fn list_by_creator(&self, created_by: Uuid) -> Result<Vec<Event>, CommitteeHubError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE created_by = $1 ORDER BY start_date ASC, start_time ASC"
        ))
        .bind(created_by)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Delete an event under an optimistic version check. Registrations
    /// cascade at the schema level.
    pub async fn delete(&self, id: Uuid, version: i64) -> Result<(), CommitteeHubError> {
        let deleted = sqlx::query("DELETE FROM events WHERE id = $1 AND version = $2")
            .bind(id)
            .bind(version)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(CommitteeHubError::VersionConflict);
        }

        Ok(())
    }
}
