//! Tenant configuration port.
//!
//! Each tenant carries an opaque configuration blob: SMTP credentials, the
//! chat API key, the payment-gateway access token, and notification
//! template overrides. The blob is read-mostly and fetched per call; no
//! in-memory cache is assumed.

use std::collections::HashMap;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::domain::foundation::{DomainError, TenantId};
use crate::domain::notifications::MessageTemplate;

/// SMTP connection settings stored per tenant.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    pub from_email: String,
    pub from_name: String,
}

/// A tenant's notification and payment configuration.
#[derive(Debug, Clone)]
pub struct TenantConfig {
    pub business_name: String,

    /// Email delivery settings; `None` disables the email channel.
    pub smtp: Option<SmtpSettings>,

    /// Chat platform API key; `None` disables the chat channel.
    pub chat_api_key: Option<SecretString>,

    /// Payment-gateway access token for checkout and status lookups.
    pub gateway_access_token: Option<SecretString>,

    /// Template overrides keyed by template key string.
    pub template_overrides: HashMap<String, MessageTemplate>,
}

#[async_trait]
pub trait TenantConfigReader: Send + Sync {
    /// Loads the tenant's configuration; `TenantNotFound` when absent.
    async fn config(&self, tenant_id: TenantId) -> Result<TenantConfig, DomainError>;
}
