//! HTTP API surface
//!
//! Route handlers are grouped per resource and assembled here. Errors from
//! the service layer map onto status codes with a small JSON body; backend
//! failures are logged and surfaced as a generic message.

pub mod auth;
pub mod events;
pub mod groups;
pub mod media;
pub mod payments;
pub mod profile;
pub mod registrations;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::error;

use crate::config::settings::Settings;
use crate::database::DatabasePool;
use crate::middleware::RateLimiter;
use crate::services::ServiceFactory;
use crate::state::storage::FlowStorage;
use crate::utils::errors::CommitteeHubError;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub services: Arc<ServiceFactory>,
    pub pool: DatabasePool,
    pub flow_storage: FlowStorage,
    pub login_limiter: RateLimiter,
}

/// Assemble the full application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api/auth", auth::router())
        .nest("/api/profile", profile::router())
        .nest("/api/events", events::router())
        .nest("/api/groups", groups::router())
        .nest("/api/registrations", registrations::router())
        .nest("/api/razorpay", payments::router())
        .nest("/api/media", media::router())
        .route("/api/health", get(health))
        .with_state(state)
}

#[derive(Serialize)]
struct ErrorBody {
    status: u16,
    message: String,
}

impl IntoResponse for CommitteeHubError {
    fn into_response(self) -> Response {
        use CommitteeHubError as E;

        let (status, message) = match &self {
            E::InvalidInput(message) => (StatusCode::BAD_REQUEST, message.clone()),
            E::InvalidStateTransition { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            E::AlreadyInGroup | E::LeaderCannotLeave | E::VersionConflict => {
                (StatusCode::CONFLICT, self.to_string())
            }
            E::Authentication(message) | E::Reauthentication(message) => {
                (StatusCode::UNAUTHORIZED, message.clone())
            }
            E::PermissionDenied(message) => (StatusCode::FORBIDDEN, message.clone()),
            E::GroupNotFound
            | E::EventNotFound { .. }
            | E::AccountNotFound { .. }
            | E::StudentNotFound { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            E::RateLimitExceeded => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
            E::ServiceUnavailable(message) => {
                (StatusCode::SERVICE_UNAVAILABLE, message.clone())
            }
            E::Razorpay(inner) => {
                error!(error = %inner, "Payment gateway failure");
                (StatusCode::BAD_GATEWAY, "Payment failed".to_string())
            }
            _ => {
                error!(error = %self, "Unhandled backend failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorBody {
                status: status.as_u16(),
                message,
            }),
        )
            .into_response()
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    redis: &'static str,
}

/// Liveness probe covering the database and the flow-state store
async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<Json<HealthResponse>, CommitteeHubError> {
    let database = crate::database::health_check(&state.pool).await.is_ok();
    let redis = state.flow_storage.test_connection().await.is_ok();

    if database && redis {
        Ok(Json(HealthResponse {
            status: "ok",
            database: "up",
            redis: "up",
        }))
    } else {
        Err(CommitteeHubError::ServiceUnavailable(
            format!(
                "database: {}, redis: {}",
                if database { "up" } else { "down" },
                if redis { "up" } else { "down" }
            ),
        ))
    }
}
