//! Group endpoints: resolve, create, join, leave, member management

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::models::group::GroupView;
use crate::utils::errors::Result;

use super::AppState;

#[derive(Deserialize)]
struct JoinRequest {
    code: String,
}

#[derive(Deserialize)]
struct MemberRequest {
    member_id: Uuid,
}

/// The student's current group, or null when they have none
async fn current_group(State(state): State<AppState>, user: CurrentUser) -> Result<Json<Value>> {
    let view = state
        .services
        .group_service
        .resolve_current_group(user.user_id)
        .await?;

    Ok(Json(match view {
        Some(view) => json!({ "group": view }),
        None => json!({ "group": Value::Null }),
    }))
}

async fn create_group(State(state): State<AppState>, user: CurrentUser) -> Result<Json<GroupView>> {
    Ok(Json(
        state
            .services
            .group_service
            .create_group(user.user_id)
            .await?,
    ))
}

async fn join_group(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<JoinRequest>,
) -> Result<Json<GroupView>> {
    Ok(Json(
        state
            .services
            .group_service
            .join_group(user.user_id, &request.code)
            .await?,
    ))
}

async fn leave_group(State(state): State<AppState>, user: CurrentUser) -> Result<Json<Value>> {
    state
        .services
        .group_service
        .leave_group(user.user_id)
        .await?;

    Ok(Json(json!({ "group": Value::Null })))
}

async fn remove_member(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<MemberRequest>,
) -> Result<Json<Value>> {
    state
        .services
        .group_service
        .remove_member(user.user_id, request.member_id)
        .await?;

    Ok(Json(json!({ "removed": request.member_id })))
}

async fn transfer_leadership(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<MemberRequest>,
) -> Result<Json<GroupView>> {
    Ok(Json(
        state
            .services
            .group_service
            .transfer_leadership(user.user_id, request.member_id)
            .await?,
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/current", get(current_group))
        .route("/", post(create_group))
        .route("/join", post(join_group))
        .route("/leave", post(leave_group))
        .route("/members/remove", post(remove_member))
        .route("/transfer", post(transfer_leadership))
}
