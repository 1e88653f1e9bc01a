//! Authentication endpoints: sign-up, sign-in, reauthentication

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::middleware::CurrentUser;
use crate::models::account::Account;
use crate::models::profile::{RoleResolution, Student};
use crate::services::auth::{ReauthProof, SignUpRequest};
use crate::utils::errors::Result;

use super::AppState;

#[derive(Serialize)]
struct SignUpResponse {
    token: String,
    user_id: uuid::Uuid,
    student: Student,
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    token: String,
    user_id: uuid::Uuid,
    display_name: String,
    resolution: RoleResolution,
}

#[derive(Deserialize)]
struct ReauthenticateRequest {
    #[serde(flatten)]
    proof: ReauthProof,
}

#[derive(Serialize)]
struct ReauthenticateResponse {
    grant: String,
}

#[derive(Deserialize)]
struct DisplayNameRequest {
    display_name: String,
}

async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<Json<SignUpResponse>> {
    state.login_limiter.check(&request.email)?;

    let (account, student, token) = state.services.auth_service.sign_up(request).await?;

    Ok(Json(SignUpResponse {
        token,
        user_id: account.id,
        student,
    }))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    state.login_limiter.check(&request.email)?;

    let (account, token): (Account, String) = state
        .services
        .auth_service
        .sign_in(&request.email, &request.password)
        .await?;

    // Every login resolves the governing role, materializing a missing
    // host/admin record on the way.
    let resolution = state
        .services
        .role_service
        .resolve_on_login(account.id)
        .await?;

    Ok(Json(LoginResponse {
        token,
        user_id: account.id,
        display_name: account.display_name,
        resolution,
    }))
}

async fn reauthenticate(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<ReauthenticateRequest>,
) -> Result<Json<ReauthenticateResponse>> {
    let grant = state
        .services
        .auth_service
        .reauthenticate(user.user_id, request.proof)
        .await?;

    Ok(Json(ReauthenticateResponse { grant }))
}

async fn update_display_name(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<DisplayNameRequest>,
) -> Result<Json<serde_json::Value>> {
    let account = state
        .services
        .auth_service
        .update_display_name(user.user_id, request.display_name)
        .await?;

    Ok(Json(serde_json::json!({
        "user_id": account.id,
        "display_name": account.display_name
    })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/reauthenticate", post(reauthenticate))
        .route("/display-name", post(update_display_name))
}
