//! Chat platform sender over its HTTP API.
//!
//! Messages are posted with the tenant's API key and a bounded timeout;
//! the dispatcher treats any failure as retryable.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::ports::{ChatSender, NotifyError};

/// Chat API configuration.
#[derive(Debug, Clone)]
pub struct ChatApiConfig {
    /// Base URL of the chat platform API.
    pub api_base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ChatApiConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.chat.example".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP implementation of the ChatSender port.
pub struct HttpChatSender {
    config: ChatApiConfig,
    http_client: reqwest::Client,
}

impl HttpChatSender {
    /// Creates a new sender; the timeout is baked into the HTTP client.
    pub fn new(config: ChatApiConfig) -> Self {
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

#[async_trait]
impl ChatSender for HttpChatSender {
    async fn send_text(
        &self,
        api_key: &SecretString,
        subscriber_id: &str,
        text: &str,
    ) -> Result<(), NotifyError> {
        let url = format!("{}/subscribers/messages", self.config.api_base_url);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key.expose_secret())
            .json(&serde_json::json!({
                "subscriber_id": subscriber_id,
                "text": text,
            }))
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Delivery(format!(
                "Chat API returned {}: {}",
                status, body
            )));
        }
        Ok(())
    }
}
