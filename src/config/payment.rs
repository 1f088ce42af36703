//! Payment gateway configuration.
//!
//! Tenant access tokens live in each tenant's settings blob; this section
//! only configures the gateway endpoint itself.

use std::time::Duration;

use serde::Deserialize;

use crate::adapters::gateway::RestGatewayConfig;

use super::error::ValidationError;

/// Gateway endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    /// Gateway API base URL.
    pub api_base_url: String,

    /// Gateway request timeout in seconds.
    pub timeout_secs: u64,

    /// Slug used in the webhook path (`/payments/webhook/{slug}`).
    pub gateway_slug: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.gateway.example".to_string(),
            timeout_secs: 10,
            gateway_slug: "checkout".to_string(),
        }
    }
}

impl PaymentConfig {
    pub fn gateway(&self) -> RestGatewayConfig {
        RestGatewayConfig {
            api_base_url: self.api_base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.api_base_url.starts_with("http") {
            return Err(ValidationError::invalid(
                "payment.api_base_url",
                "must be an http(s) URL",
            ));
        }
        if self.gateway_slug.is_empty() {
            return Err(ValidationError::invalid(
                "payment.gateway_slug",
                "must not be empty",
            ));
        }
        Ok(())
    }
}
