//! Event endpoints: creation, listings, deletion, registration views

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::middleware::{CurrentActor, CurrentUser};
use crate::models::event::{CreateEventRequest, Event};
use crate::models::registration::RegistrationWithReceipt;
use crate::utils::errors::{CommitteeHubError, Result};

use super::AppState;

/// Header carrying the reauthentication grant for sensitive operations
const REAUTH_GRANT_HEADER: &str = "x-reauth-grant";

async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>> {
    Ok(Json(state.services.event_service.list_events().await?))
}

async fn list_upcoming(State(state): State<AppState>) -> Result<Json<Vec<Event>>> {
    Ok(Json(state.services.event_service.list_upcoming().await?))
}

async fn list_mine(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Event>>> {
    Ok(Json(
        state
            .services
            .event_service
            .list_created_by(user.user_id)
            .await?,
    ))
}

async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Event>> {
    Ok(Json(state.services.event_service.get_event(event_id).await?))
}

async fn create_event(
    State(state): State<AppState>,
    actor: CurrentActor,
    Json(request): Json<CreateEventRequest>,
) -> Result<Json<Event>> {
    let event = state
        .services
        .event_service
        .create_event(actor.user_id, actor.role, request)
        .await?;

    Ok(Json(event))
}

/// Deleting an event requires a fresh reauthentication grant in addition to
/// the bearer token.
async fn delete_event(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(event_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>> {
    let grant = headers
        .get(REAUTH_GRANT_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            CommitteeHubError::Reauthentication("Reauthentication required".to_string())
        })?;
    state
        .services
        .auth_service
        .check_reauth_grant(actor.user_id, grant)?;

    state
        .services
        .event_service
        .delete_event(actor.user_id, actor.role, event_id)
        .await?;

    Ok(Json(serde_json::json!({ "deleted": event_id })))
}

async fn event_registrations(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<RegistrationWithReceipt>>> {
    Ok(Json(
        state
            .services
            .event_service
            .registrations_for_event(actor.user_id, actor.role, event_id)
            .await?,
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/upcoming", get(list_upcoming))
        .route("/mine", get(list_mine))
        .route("/:event_id", get(get_event).delete(delete_event))
        .route("/:event_id/registrations", get(event_registrations))
}
