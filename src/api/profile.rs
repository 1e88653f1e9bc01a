//! Profile endpoints: role-specific records and detail forms

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::middleware::{CurrentActor, CurrentUser};
use crate::models::profile::{
    Role, UpdateAdminRequest, UpdateHostRequest, UpdateStudentRequest,
};
use crate::utils::errors::{CommitteeHubError, Result};

use super::AppState;

/// One body shape for all three detail forms; the governing role decides
/// which fields apply.
#[derive(Debug, Deserialize)]
struct UpdateProfileRequest {
    first_name: Option<String>,
    last_name: Option<String>,
    roll_no: Option<String>,
    branch: Option<String>,
    year: Option<String>,
    organization: Option<String>,
    department: Option<String>,
    profile_photo: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssignRoleRequest {
    user_id: Uuid,
    role: Role,
}

async fn get_profile(State(state): State<AppState>, user: CurrentUser) -> Result<Json<Value>> {
    let roles = &state.services.role_service;
    let role = roles.governing_role(user.user_id).await?;

    let record = match role {
        Role::Student => {
            let student = roles.get_student(user.user_id).await?;
            json!(student)
        }
        Role::Host => {
            let host = roles.get_host(user.user_id).await?;
            json!(host)
        }
        Role::Admin => {
            let admin = roles.get_admin(user.user_id).await?;
            json!(admin)
        }
    };

    Ok(Json(json!({ "role": role, "record": record })))
}

async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Value>> {
    let roles = &state.services.role_service;
    let role = roles.governing_role(user.user_id).await?;

    let record = match role {
        Role::Student => {
            let student = roles
                .update_student(
                    user.user_id,
                    UpdateStudentRequest {
                        first_name: request.first_name,
                        last_name: request.last_name,
                        roll_no: request.roll_no,
                        branch: request.branch,
                        year: request.year,
                        profile_photo: request.profile_photo,
                    },
                )
                .await?;
            json!(student)
        }
        Role::Host => {
            let host = roles
                .update_host(
                    user.user_id,
                    UpdateHostRequest {
                        first_name: request.first_name,
                        last_name: request.last_name,
                        organization: request.organization,
                        profile_photo: request.profile_photo,
                    },
                )
                .await?;
            json!(host)
        }
        Role::Admin => {
            let admin = roles
                .update_admin(
                    user.user_id,
                    UpdateAdminRequest {
                        first_name: request.first_name,
                        last_name: request.last_name,
                        department: request.department,
                        profile_photo: request.profile_photo,
                    },
                )
                .await?;
            json!(admin)
        }
    };

    Ok(Json(json!({ "role": role, "record": record })))
}

/// Explicit role assignment; the role record is materialized before the
/// pointer flips. Admin only.
async fn assign_role(
    State(state): State<AppState>,
    actor: CurrentActor,
    Json(request): Json<AssignRoleRequest>,
) -> Result<Json<Value>> {
    if actor.role != Role::Admin {
        return Err(CommitteeHubError::PermissionDenied(
            "Only admins can assign roles".to_string(),
        ));
    }

    let student = state
        .services
        .role_service
        .assign_role(request.user_id, request.role)
        .await?;

    Ok(Json(json!({ "user_id": student.id, "role": student.role })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).put(update_profile))
        .route("/role", post(assign_role))
}
