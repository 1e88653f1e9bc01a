//! Authentication middleware
//!
//! Extracts the signed-in user from the Authorization header and, where a
//! handler needs it, resolves the governing role for permission checks.

use axum::{async_trait, extract::FromRequestParts, http::header, http::request::Parts};
use uuid::Uuid;

use crate::api::AppState;
use crate::models::profile::Role;
use crate::utils::errors::CommitteeHubError;

/// The authenticated caller, extracted from a bearer token
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = CommitteeHubError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                CommitteeHubError::Authentication("Missing bearer token".to_string())
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            CommitteeHubError::Authentication("Malformed Authorization header".to_string())
        })?;

        let claims = state.services.auth_service.validate(token)?;

        Ok(CurrentUser {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}

/// The authenticated caller together with their governing role, for
/// handlers that gate on host/admin permissions
#[derive(Debug, Clone)]
pub struct CurrentActor {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = CommitteeHubError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        let role = state
            .services
            .role_service
            .governing_role(user.user_id)
            .await?;

        Ok(CurrentActor {
            user_id: user.user_id,
            email: user.email,
            role,
        })
    }
}
