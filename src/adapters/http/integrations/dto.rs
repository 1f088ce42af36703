//! Request DTO for the chat command webhook.
//!
//! The chat platform posts one flat JSON object per action; fields beyond
//! `action` are action-specific and optional at the type level.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::billing::PaymentMethod;

#[derive(Debug, Deserialize)]
pub struct ChatWebhookRequest {
    pub action: String,

    /// Tenant may come here or in the `x-tenant-id` header.
    pub tenant_id: Option<Uuid>,

    pub user_id: Option<Uuid>,

    /// Day for availability queries.
    pub date: Option<NaiveDate>,

    /// Instant for appointment creation.
    pub datetime: Option<DateTime<Utc>>,

    pub service_id: Option<Uuid>,
    pub professional_id: Option<Uuid>,

    #[serde(default)]
    pub service_ids: Vec<Uuid>,

    pub payment_method: Option<PaymentMethod>,
}
