//! Payment gateway endpoints
//!
//! The order endpoint is what the checkout widget calls before opening;
//! the verify endpoint receives the widget's raw completion payload and
//! answers with an explicit success flag.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::services::razorpay::PaymentCallback;

use super::AppState;

#[derive(Debug, Default, Deserialize)]
struct CreateOrderRequest {
    amount: Option<i64>,
    currency: Option<String>,
}

/// Create a gateway order. Amount is in minor units; both fields fall back
/// to the configured defaults when omitted.
async fn create_order(
    State(state): State<AppState>,
    body: Option<Json<CreateOrderRequest>>,
) -> Response {
    if !state.services.razorpay_service.is_enabled() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "Payments are disabled" })),
        )
            .into_response();
    }

    let request = body.map(|Json(request)| request).unwrap_or_default();

    match state
        .services
        .razorpay_service
        .create_order(request.amount, request.currency)
        .await
    {
        Ok(order) => Json(order).into_response(),
        Err(e) => {
            error!(error = %e, "Order creation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to create order" })),
            )
                .into_response()
        }
    }
}

/// Verify a completed checkout's signature. Clients proceed only on an
/// explicit `success: true` reply.
async fn verify(
    State(state): State<AppState>,
    Json(callback): Json<PaymentCallback>,
) -> Json<serde_json::Value> {
    let success = state
        .services
        .razorpay_service
        .verify_signature(&callback)
        .is_ok();

    Json(json!({ "success": success }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-order", post(create_order))
        .route("/verify", post(verify))
}
