//! REST payment gateway adapter.
//!
//! Talks to the hosted-checkout gateway's HTTP API. Every call authenticates
//! with the tenant's own access token (multi-tenant gateways key everything
//! off the token, not off a service-wide credential) and carries a bounded
//! timeout so a slow gateway cannot pin a webhook worker.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::foundation::Timestamp;
use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, GatewayError, GatewayPayment, GatewayPaymentStatus,
    PaymentGateway,
};

/// Gateway API configuration.
#[derive(Debug, Clone)]
pub struct RestGatewayConfig {
    /// Base URL of the gateway API.
    pub api_base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for RestGatewayConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.gateway.example".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// REST implementation of the PaymentGateway port.
pub struct RestPaymentGateway {
    config: RestGatewayConfig,
    http_client: reqwest::Client,
}

impl RestPaymentGateway {
    /// Creates a new adapter; the timeout is baked into the HTTP client.
    pub fn new(config: RestGatewayConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();
        Self {
            config,
            http_client,
        }
    }
}

/// Gateway payment payload.
#[derive(Debug, Deserialize)]
struct PaymentResponse {
    id: serde_json::Value,
    status: String,

    /// Amount in currency units.
    transaction_amount: f64,

    external_reference: Option<String>,
    date_approved: Option<chrono::DateTime<chrono::Utc>>,
}

/// Gateway checkout-session payload.
#[derive(Debug, Deserialize)]
struct PreferenceResponse {
    /// Hosted checkout URL.
    init_point: String,
}

fn classify_status(status: reqwest::StatusCode, body: &str) -> GatewayError {
    match status.as_u16() {
        401 | 403 => GatewayError::authentication(format!("Gateway rejected token: {}", body)),
        404 => GatewayError::new(
            crate::ports::GatewayErrorCode::NotFound,
            "Resource not found at gateway",
        ),
        _ => GatewayError::provider(format!("Gateway returned {}: {}", status, body)),
    }
}

fn classify_transport(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() || err.is_connect() {
        GatewayError::network(err.to_string())
    } else {
        GatewayError::provider(err.to_string())
    }
}

#[async_trait]
impl PaymentGateway for RestPaymentGateway {
    async fn payment_status(
        &self,
        access_token: &SecretString,
        payment_id: &str,
    ) -> Result<GatewayPayment, GatewayError> {
        let url = format!("{}/v1/payments/{}", self.config.api_base_url, payment_id);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(access_token.expose_secret())
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let payload: PaymentResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::invalid_response(e.to_string()))?;

        Ok(GatewayPayment {
            id: match &payload.id {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            },
            status: GatewayPaymentStatus::from_gateway(&payload.status),
            amount_cents: (payload.transaction_amount * 100.0).round() as i64,
            external_reference: payload.external_reference,
            approved_at: payload.date_approved.map(Timestamp::from_datetime),
        })
    }

    async fn create_checkout_session(
        &self,
        access_token: &SecretString,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, GatewayError> {
        let items: Vec<serde_json::Value> = request
            .items
            .iter()
            .map(|item| {
                serde_json::json!({
                    "title": item.title,
                    "quantity": item.quantity,
                    "unit_price": item.unit_price_cents as f64 / 100.0,
                })
            })
            .collect();
        let mut body = serde_json::json!({
            "items": items,
            "external_reference": request.external_reference,
            "notification_url": request.notification_url,
        });
        if let Some(email) = &request.payer_email {
            body["payer"] = serde_json::json!({ "email": email });
        }

        let url = format!("{}/checkout/preferences", self.config.api_base_url);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(access_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let payload: PreferenceResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::invalid_response(e.to_string()))?;

        Ok(CheckoutSession {
            checkout_url: payload.init_point,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_response_parses_numeric_id_and_amount() {
        let payload: PaymentResponse = serde_json::from_value(serde_json::json!({
            "id": 123456789,
            "status": "approved",
            "transaction_amount": 49.90,
            "external_reference": "abc",
            "date_approved": "2026-03-14T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(payload.id.to_string(), "123456789");
        assert_eq!((payload.transaction_amount * 100.0).round() as i64, 4990);
        assert_eq!(payload.external_reference.as_deref(), Some("abc"));
    }

    #[test]
    fn auth_failures_map_to_authentication_errors() {
        let err = classify_status(reqwest::StatusCode::UNAUTHORIZED, "bad token");
        assert_eq!(err.code, crate::ports::GatewayErrorCode::Authentication);
        assert!(!err.retryable);
    }
}
