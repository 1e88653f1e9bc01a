//! Event management service implementation
//!
//! Hosts and admins create events; everyone reads them. Deletion is a
//! sensitive write and only happens behind a fresh reauthentication grant,
//! checked at the API layer.

use chrono::{Duration, NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::repositories::{EventRepository, RegistrationRepository};
use crate::models::event::{CreateEventRequest, Event};
use crate::models::profile::Role;
use crate::models::registration::RegistrationWithReceipt;
use crate::services::notification::{DomainEvent, NotificationService};
use crate::utils::errors::{CommitteeHubError, Result};
use crate::utils::helpers;

/// Earliest allowed cancellation deadline: five days before the start
const CANCELLATION_WINDOW_MAX_DAYS: i64 = 5;
/// Latest allowed cancellation deadline: two days before the start
const CANCELLATION_WINDOW_MIN_DAYS: i64 = 2;

/// Event management service
#[derive(Clone)]
pub struct EventService {
    events: EventRepository,
    registrations: RegistrationRepository,
    notifications: NotificationService,
}

impl EventService {
    /// Create a new EventService instance
    pub fn new(
        events: EventRepository,
        registrations: RegistrationRepository,
        notifications: NotificationService,
    ) -> Self {
        Self {
            events,
            registrations,
            notifications,
        }
    }

    /// Create an event. Only hosts and admins may create.
    pub async fn create_event(
        &self,
        actor_id: Uuid,
        actor_role: Role,
        request: CreateEventRequest,
    ) -> Result<Event> {
        if actor_role == Role::Student {
            return Err(CommitteeHubError::PermissionDenied(
                "Only hosts and admins can create events".to_string(),
            ));
        }

        validate_event_request(&request)?;

        let event = self.events.create(actor_id, request).await?;
        info!(event_id = %event.id, user_id = %actor_id, "Event created");
        crate::utils::logging::log_event_action(event.id, "created", actor_id, None);

        Ok(event)
    }

    /// Fetch a single event
    pub async fn get_event(&self, event_id: Uuid) -> Result<Event> {
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or(CommitteeHubError::EventNotFound { event_id })
    }

    /// List every event, soonest first
    pub async fn list_events(&self) -> Result<Vec<Event>> {
        self.events.list().await
    }

    /// List events that have not started yet (today inclusive)
    pub async fn list_upcoming(&self) -> Result<Vec<Event>> {
        self.events.list_upcoming(Utc::now().date_naive()).await
    }

    /// List events created by one host or admin
    pub async fn list_created_by(&self, user_id: Uuid) -> Result<Vec<Event>> {
        self.events.list_by_creator(user_id).await
    }

    /// Delete an event. Hosts may delete their own events, admins any.
    /// Callers must already hold a reauthentication grant.
    pub async fn delete_event(
        &self,
        actor_id: Uuid,
        actor_role: Role,
        event_id: Uuid,
    ) -> Result<()> {
        let event = self.get_event(event_id).await?;

        match actor_role {
            Role::Admin => {}
            Role::Host if event.created_by == actor_id => {}
            _ => {
                return Err(CommitteeHubError::PermissionDenied(
                    "Only the creating host or an admin can delete this event".to_string(),
                ));
            }
        }

        self.events.delete(event_id, event.version).await?;

        info!(event_id = %event_id, user_id = %actor_id, "Event deleted");
        crate::utils::logging::log_event_action(event_id, "deleted", actor_id, None);
        self.notifications.publish(DomainEvent::EventDeleted { event_id });

        Ok(())
    }

    /// Registered students with receipts, for the host/admin view
    pub async fn registrations_for_event(
        &self,
        actor_id: Uuid,
        actor_role: Role,
        event_id: Uuid,
    ) -> Result<Vec<RegistrationWithReceipt>> {
        let event = self.get_event(event_id).await?;

        match actor_role {
            Role::Admin => {}
            Role::Host if event.created_by == actor_id => {}
            _ => {
                return Err(CommitteeHubError::PermissionDenied(
                    "Only the creating host or an admin can view registrations".to_string(),
                ));
            }
        }

        debug!(event_id = %event_id, "Listing registrations");
        self.registrations
            .list_for_event_with_receipts(event_id)
            .await
    }
}

/// Validate an event creation request against the documented invariants
pub fn validate_event_request(request: &CreateEventRequest) -> Result<()> {
    if request.name.trim().is_empty()
        || request.committee.trim().is_empty()
        || request.place.trim().is_empty()
    {
        return Err(CommitteeHubError::InvalidInput(
            "Event name, committee and place are required".to_string(),
        ));
    }

    if request.is_date_range {
        match request.end_date {
            Some(end_date) if end_date >= request.start_date => {}
            Some(_) => {
                return Err(CommitteeHubError::InvalidInput(
                    "End date cannot fall before the start date".to_string(),
                ));
            }
            None => {
                return Err(CommitteeHubError::InvalidInput(
                    "End date is required for a date range".to_string(),
                ));
            }
        }
    }

    if request.is_time_range && request.end_time.is_none() {
        return Err(CommitteeHubError::InvalidInput(
            "End time is required for a time range".to_string(),
        ));
    }

    validate_cancellation_date(request.start_date, request.cancellation_date)?;

    if request.registration_fee_enabled
        && helpers::parse_fee(request.registration_fee.as_deref()) <= 0
    {
        return Err(CommitteeHubError::InvalidInput(
            "Registration fee must be a positive amount".to_string(),
        ));
    }

    if request.refund_enabled && (request.refund_amount.is_none() || request.refund_date.is_none())
    {
        return Err(CommitteeHubError::InvalidInput(
            "Refund amount and refund date are required when refunds are enabled".to_string(),
        ));
    }

    Ok(())
}

/// The cancellation deadline must fall between five and two days before the
/// event start, both ends inclusive.
pub fn validate_cancellation_date(start_date: NaiveDate, cancellation_date: NaiveDate) -> Result<()> {
    let earliest = start_date - Duration::days(CANCELLATION_WINDOW_MAX_DAYS);
    let latest = start_date - Duration::days(CANCELLATION_WINDOW_MIN_DAYS);

    if cancellation_date < earliest || cancellation_date > latest {
        return Err(CommitteeHubError::InvalidInput(format!(
            "Cancellation deadline must fall between {} and {}",
            earliest, latest
        )));
    }

    Ok(())
}
