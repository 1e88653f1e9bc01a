//! Razorpay gateway service implementation
//!
//! This service handles order creation against the Razorpay Orders API,
//! checkout configuration, and signature verification of completed
//! payments.

use std::time::Duration;

use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, info, warn};

use crate::config::settings::Settings;
use crate::utils::errors::{CommitteeHubError, RazorpayError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Order object returned by the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    pub entity: String,
    /// Amount in minor units (paise)
    pub amount: i64,
    pub currency: String,
    pub receipt: Option<String>,
    pub status: String,
}

/// Body sent to the Orders API
#[derive(Debug, Clone, Serialize)]
struct CreateOrderBody {
    amount: i64,
    currency: String,
    receipt: String,
}

/// The raw fields the checkout widget reports on completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCallback {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

/// Razorpay service for fee collection
#[derive(Clone, Debug)]
pub struct RazorpayService {
    client: Client,
    settings: Settings,
}

impl RazorpayService {
    /// Create a new RazorpayService instance
    pub fn new(settings: Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.razorpay.timeout_seconds))
            .user_agent("CommitteeHub/1.0")
            .build()
            .map_err(CommitteeHubError::Http)?;

        Ok(Self { client, settings })
    }

    /// Create an order for the given amount in minor units. Missing values
    /// fall back to the configured defaults.
    pub async fn create_order(
        &self,
        amount: Option<i64>,
        currency: Option<String>,
    ) -> Result<RazorpayOrder> {
        let amount = amount.unwrap_or(self.settings.razorpay.fallback_amount);
        let currency = currency.unwrap_or_else(|| self.settings.razorpay.currency.clone());
        let url = format!("{}/orders", self.settings.razorpay.api_url);

        debug!(amount = amount, currency = %currency, "Creating gateway order");

        let body = CreateOrderBody {
            amount,
            currency,
            receipt: format!("rcpt_{}", uuid::Uuid::new_v4().simple()),
        };

        let response = self
            .client
            .post(&url)
            .basic_auth(
                &self.settings.razorpay.key_id,
                Some(&self.settings.razorpay.key_secret),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CommitteeHubError::Razorpay(RazorpayError::Timeout)
                } else if e.is_connect() {
                    CommitteeHubError::Razorpay(RazorpayError::ServiceUnavailable)
                } else {
                    CommitteeHubError::Razorpay(RazorpayError::OrderCreationFailed(e.to_string()))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, "Gateway order creation failed");
            return Err(CommitteeHubError::Razorpay(
                RazorpayError::OrderCreationFailed(format!("HTTP {}: {}", status, error_text)),
            ));
        }

        let order: RazorpayOrder = response
            .json()
            .await
            .map_err(|e| CommitteeHubError::Razorpay(RazorpayError::InvalidResponse(e.to_string())))?;

        info!(order_id = %order.id, amount = order.amount, "Gateway order created");
        Ok(order)
    }

    /// Verify the checkout signature: HMAC-SHA256 of "order_id|payment_id"
    /// keyed with the API secret.
    pub fn verify_signature(&self, callback: &PaymentCallback) -> Result<()> {
        let expected = compute_signature(
            &callback.razorpay_order_id,
            &callback.razorpay_payment_id,
            &self.settings.razorpay.key_secret,
        );

        if expected == callback.razorpay_signature.to_lowercase() {
            debug!(order_id = %callback.razorpay_order_id, "Payment signature verified");
            Ok(())
        } else {
            warn!(order_id = %callback.razorpay_order_id, "Payment signature mismatch");
            Err(CommitteeHubError::Razorpay(RazorpayError::SignatureMismatch))
        }
    }

    /// Checkout options for the client widget: the fixed allow-list of
    /// payment methods. EMI, pay-later, COD and bank transfer stay disabled.
    pub fn checkout_options(&self, order: &RazorpayOrder) -> serde_json::Value {
        serde_json::json!({
            "key": self.settings.razorpay.key_id,
            "order_id": order.id,
            "amount": order.amount,
            "currency": order.currency,
            "method": {
                "netbanking": true,
                "card": true,
                "upi": true,
                "wallet": true,
                "emi": false,
                "paylater": false,
                "cardless_emi": false,
                "bank_transfer": false
            }
        })
    }

    /// Whether fee collection is enabled at all
    pub fn is_enabled(&self) -> bool {
        self.settings.features.payments
    }
}

/// Hex-encoded HMAC-SHA256 signature over "order_id|payment_id"
fn compute_signature(order_id: &str, payment_id: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());

    mac.finalize()
        .into_bytes()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with_secret(secret: &str) -> RazorpayService {
        let mut settings = Settings::default();
        settings.razorpay.key_secret = secret.to_string();
        RazorpayService::new(settings).unwrap()
    }

    #[test]
    fn test_order_deserialization() {
        let json = r#"{"id":"order_123","entity":"order","amount":50000,"currency":"INR","receipt":"rcpt_1","status":"created"}"#;
        let order: RazorpayOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.id, "order_123");
        assert_eq!(order.amount, 50000);
    }

    #[test]
    fn test_signature_round_trip() {
        let service = service_with_secret("test_secret");
        let signature = compute_signature("order_123", "pay_456", "test_secret");

        let callback = PaymentCallback {
            razorpay_order_id: "order_123".to_string(),
            razorpay_payment_id: "pay_456".to_string(),
            razorpay_signature: signature,
        };
        assert!(service.verify_signature(&callback).is_ok());
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let service = service_with_secret("test_secret");
        let mut signature = compute_signature("order_123", "pay_456", "test_secret");
        signature.replace_range(0..1, if &signature[0..1] == "0" { "1" } else { "0" });

        let callback = PaymentCallback {
            razorpay_order_id: "order_123".to_string(),
            razorpay_payment_id: "pay_456".to_string(),
            razorpay_signature: signature,
        };
        assert!(service.verify_signature(&callback).is_err());
    }

    #[test]
    fn test_signature_depends_on_secret() {
        let signature = compute_signature("order_123", "pay_456", "secret_a");
        let other = compute_signature("order_123", "pay_456", "secret_b");
        assert_ne!(signature, other);
    }

    #[test]
    fn test_checkout_options_allow_list() {
        let service = service_with_secret("test_secret");
        let order = RazorpayOrder {
            id: "order_123".to_string(),
            entity: "order".to_string(),
            amount: 50000,
            currency: "INR".to_string(),
            receipt: None,
            status: "created".to_string(),
        };

        let options = service.checkout_options(&order);
        assert_eq!(options["method"]["upi"], true);
        assert_eq!(options["method"]["card"], true);
        assert_eq!(options["method"]["emi"], false);
        assert_eq!(options["method"]["paylater"], false);
        assert_eq!(options["order_id"], "order_123");
    }
}
