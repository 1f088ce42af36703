//! PostgreSQL implementation of TenantConfigReader.
//!
//! Tenant settings live in a JSONB blob on the tenants table. The blob is
//! parsed leniently: unknown keys are ignored and missing sections disable
//! the corresponding channel.

use std::collections::HashMap;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::Deserialize;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, TenantId};
use crate::domain::notifications::MessageTemplate;
use crate::ports::{SmtpSettings, TenantConfig, TenantConfigReader};

/// PostgreSQL implementation of the TenantConfigReader port.
pub struct PostgresTenantConfigReader {
    pool: PgPool,
}

impl PostgresTenantConfigReader {
    /// Creates a new reader with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// JSON shape of the tenants.settings blob.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsBlob {
    smtp: Option<SmtpBlob>,
    chat_api_key: Option<String>,
    gateway_access_token: Option<String>,
    templates: HashMap<String, TemplateBlob>,
}

#[derive(Debug, Deserialize)]
struct SmtpBlob {
    host: String,
    #[serde(default = "default_smtp_port")]
    port: u16,
    username: String,
    password: String,
    from_email: String,
    #[serde(default)]
    from_name: String,
}

fn default_smtp_port() -> u16 {
    587
}

#[derive(Debug, Deserialize)]
struct TemplateBlob {
    subject: String,
    body: String,
}

fn build_config(business_name: String, blob: SettingsBlob) -> TenantConfig {
    TenantConfig {
        business_name,
        smtp: blob.smtp.map(|s| SmtpSettings {
            host: s.host,
            port: s.port,
            username: s.username,
            password: SecretString::new(s.password),
            from_email: s.from_email,
            from_name: s.from_name,
        }),
        chat_api_key: blob.chat_api_key.map(SecretString::new),
        gateway_access_token: blob.gateway_access_token.map(SecretString::new),
        template_overrides: blob
            .templates
            .into_iter()
            .map(|(key, t)| (key, MessageTemplate::new(t.subject, t.body)))
            .collect(),
    }
}

#[async_trait]
impl TenantConfigReader for PostgresTenantConfigReader {
    async fn config(&self, tenant_id: TenantId) -> Result<TenantConfig, DomainError> {
        let row: Option<(String, serde_json::Value)> =
            sqlx::query_as("SELECT name, settings FROM tenants WHERE id = $1")
                .bind(tenant_id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))?;

        let (name, settings) = row.ok_or_else(|| {
            DomainError::new(ErrorCode::TenantNotFound, "Tenant not found")
                .with_detail("tenant_id", tenant_id.to_string())
        })?;

        let blob: SettingsBlob = serde_json::from_value(settings).unwrap_or_else(|e| {
            tracing::warn!(
                tenant_id = %tenant_id,
                error = %e,
                "Malformed tenant settings blob; using empty configuration"
            );
            SettingsBlob::default()
        });

        Ok(build_config(name, blob))
    }
}
