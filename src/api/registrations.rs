//! Registration flow endpoints
//!
//! Each endpoint advances one step of the per-(student, event) flow:
//! begin -> confirm -> reauthenticate -> order -> payment -> close.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::auth::ReauthProof;
use crate::services::razorpay::{PaymentCallback, RazorpayOrder};
use crate::state::machine::RegistrationFlow;
use crate::utils::errors::Result;

use super::AppState;

#[derive(Deserialize)]
struct ReauthenticateRequest {
    #[serde(flatten)]
    proof: ReauthProof,
}

#[derive(Serialize)]
struct OrderResponse {
    flow: RegistrationFlow,
    order: RazorpayOrder,
    checkout: Value,
}

async fn begin(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Json<RegistrationFlow>> {
    Ok(Json(
        state
            .services
            .registration_service
            .begin(user.user_id, event_id)
            .await?,
    ))
}

async fn confirm(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Json<RegistrationFlow>> {
    Ok(Json(
        state
            .services
            .registration_service
            .confirm(user.user_id, event_id)
            .await?,
    ))
}

async fn reauthenticate(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<Uuid>,
    Json(request): Json<ReauthenticateRequest>,
) -> Result<Json<RegistrationFlow>> {
    Ok(Json(
        state
            .services
            .registration_service
            .reauthenticate(user.user_id, event_id, request.proof)
            .await?,
    ))
}

/// Create the gateway order for the pending payment and hand back the
/// checkout configuration for the widget.
async fn order(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Json<OrderResponse>> {
    let (flow, order) = state
        .services
        .registration_service
        .create_order(user.user_id, event_id)
        .await?;

    let checkout = state.services.razorpay_service.checkout_options(&order);

    Ok(Json(OrderResponse {
        flow,
        order,
        checkout,
    }))
}

async fn payment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<Uuid>,
    Json(callback): Json<PaymentCallback>,
) -> Result<Json<RegistrationFlow>> {
    Ok(Json(
        state
            .services
            .registration_service
            .complete_payment(user.user_id, event_id, callback)
            .await?,
    ))
}

async fn close(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Value>> {
    state
        .services
        .registration_service
        .close(user.user_id, event_id)
        .await?;

    Ok(Json(json!({ "closed": event_id })))
}

async fn flow_state(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Value>> {
    let flow = state
        .services
        .registration_service
        .current(user.user_id, event_id)
        .await?;

    Ok(Json(match flow {
        Some(flow) => json!({ "flow": flow }),
        None => json!({ "flow": Value::Null }),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:event_id/begin", post(begin))
        .route("/:event_id/confirm", post(confirm))
        .route("/:event_id/reauthenticate", post(reauthenticate))
        .route("/:event_id/order", post(order))
        .route("/:event_id/payment", post(payment))
        .route("/:event_id/close", post(close))
        .route("/:event_id/state", get(flow_state))
}
