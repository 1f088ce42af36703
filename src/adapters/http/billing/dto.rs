//! Request/response DTOs for the payment endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::billing::{Payment, PaymentKind, PaymentMethod, PaymentStatus};

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    /// Payer; defaults to the authenticated client.
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub appointment_id: Option<Uuid>,
    pub subscription_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    #[serde(rename = "type")]
    pub kind: PaymentKind,
    pub appointment_id: Option<Uuid>,
    pub subscription_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        Self {
            id: *p.id.as_uuid(),
            user_id: *p.user_id.as_uuid(),
            amount_cents: p.amount_cents,
            method: p.method,
            status: p.status,
            kind: p.kind,
            appointment_id: p.appointment_id.map(|id| *id.as_uuid()),
            subscription_id: p.subscription_id.map(|id| *id.as_uuid()),
            created_at: *p.created_at.as_datetime(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub checkout_url: String,
}

/// `?tenantId=...` on the webhook callback URL.
#[derive(Debug, Deserialize)]
pub struct WebhookParams {
    #[serde(rename = "tenantId")]
    pub tenant_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
}
