//! Payment gateway port.
//!
//! The gateway's webhooks carry no trustworthy payload; reconciliation
//! fetches the authoritative payment state through this port using the
//! tenant's own access token.

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};

/// Port for the hosted-checkout payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Fetches a payment's authoritative state by gateway payment id.
    async fn payment_status(
        &self,
        access_token: &SecretString,
        payment_id: &str,
    ) -> Result<GatewayPayment, GatewayError>;

    /// Creates a hosted checkout session and returns its URL.
    async fn create_checkout_session(
        &self,
        access_token: &SecretString,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, GatewayError>;
}

/// Authoritative payment state as reported by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayPayment {
    /// Gateway-side payment id.
    pub id: String,

    pub status: GatewayPaymentStatus,

    pub amount_cents: i64,

    /// Correlation value set at checkout time - the appointment id.
    pub external_reference: Option<String>,

    pub approved_at: Option<Timestamp>,
}

/// Gateway payment status; only `Approved` triggers reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayPaymentStatus {
    Approved,
    Pending,
    Rejected,
    Other(String),
}

impl GatewayPaymentStatus {
    /// Maps the gateway's status string.
    pub fn from_gateway(s: &str) -> Self {
        match s {
            "approved" => GatewayPaymentStatus::Approved,
            "pending" | "in_process" => GatewayPaymentStatus::Pending,
            "rejected" | "cancelled" => GatewayPaymentStatus::Rejected,
            other => GatewayPaymentStatus::Other(other.to_string()),
        }
    }
}

/// One line item of a checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub title: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
}

/// Request to create a hosted checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCheckoutRequest {
    pub items: Vec<CheckoutItem>,

    /// Payer email for pre-fill, when known.
    pub payer_email: Option<String>,

    /// Returned unchanged in webhook callbacks - the appointment id.
    pub external_reference: String,

    /// Tenant-scoped webhook callback URL.
    pub notification_url: String,
}

/// A created checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub checkout_url: String,
}

/// Errors from gateway operations.
#[derive(Debug, Clone)]
pub struct GatewayError {
    pub code: GatewayErrorCode,
    pub message: String,
    pub retryable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorCode {
    /// Network connectivity issue or timeout.
    Network,

    /// The gateway rejected the tenant's access token.
    Authentication,

    /// Payment id unknown at the gateway.
    NotFound,

    /// Malformed or unexpected gateway response.
    InvalidResponse,

    /// Gateway-side error.
    Provider,
}

impl GatewayError {
    pub fn new(code: GatewayErrorCode, message: impl Into<String>) -> Self {
        let retryable = matches!(code, GatewayErrorCode::Network);
        Self {
            code,
            message: message.into(),
            retryable,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::Network, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::Authentication, message)
    }

    pub fn not_found(payment_id: &str) -> Self {
        Self::new(
            GatewayErrorCode::NotFound,
            format!("Payment {} not found at gateway", payment_id),
        )
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::InvalidResponse, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::Provider, message)
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for GatewayError {}

impl From<GatewayError> for DomainError {
    fn from(err: GatewayError) -> Self {
        let code = match err.code {
            GatewayErrorCode::NotFound => ErrorCode::PaymentNotFound,
            _ => ErrorCode::ExternalServiceError,
        };
        DomainError::new(code, err.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn PaymentGateway) {}
    }

    #[test]
    fn status_maps_gateway_strings() {
        assert_eq!(
            GatewayPaymentStatus::from_gateway("approved"),
            GatewayPaymentStatus::Approved
        );
        assert_eq!(
            GatewayPaymentStatus::from_gateway("in_process"),
            GatewayPaymentStatus::Pending
        );
        assert_eq!(
            GatewayPaymentStatus::from_gateway("charged_back"),
            GatewayPaymentStatus::Other("charged_back".to_string())
        );
    }

    #[test]
    fn only_network_errors_are_retryable() {
        assert!(GatewayError::network("timeout").retryable);
        assert!(!GatewayError::authentication("bad token").retryable);
        assert!(!GatewayError::provider("oops").retryable);
    }

    #[test]
    fn gateway_error_converts_to_domain_error() {
        let err: DomainError = GatewayError::provider("gateway exploded").into();
        assert_eq!(err.code, ErrorCode::ExternalServiceError);
        assert!(err.message().contains("exploded"));
    }
}
