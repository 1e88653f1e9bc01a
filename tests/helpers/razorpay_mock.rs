//! Mock Razorpay Orders API
//!
//! Wiremock-backed stand-in for the gateway so order creation can be
//! exercised without credentials or network access.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A running mock gateway
pub struct RazorpayMockServer {
    pub server: MockServer,
}

impl RazorpayMockServer {
    /// Start the mock server with no registered behavior
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL to plug into `RazorpayConfig::api_url`
    pub fn api_url(&self) -> String {
        self.server.uri()
    }

    /// Respond to order creation with a fixed order id, echoing whatever
    /// amount the request carried
    pub async fn mock_order_created(&self, order_id: &str, amount: i64) {
        Mock::given(method("POST"))
            .and(path("/orders"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": order_id,
                "entity": "order",
                "amount": amount,
                "currency": "INR",
                "receipt": "rcpt_test",
                "status": "created"
            })))
            .mount(&self.server)
            .await;
    }

    /// Respond to order creation with a gateway failure
    pub async fn mock_order_failure(&self) {
        Mock::given(method("POST"))
            .and(path("/orders"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": { "description": "internal error" }
            })))
            .mount(&self.server)
            .await;
    }
}
