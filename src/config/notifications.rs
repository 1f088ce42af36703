//! Notification dispatcher and channel configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::application::notifications::DispatcherConfig;

use super::error::ValidationError;

/// Dispatcher and channel endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Outbox poll interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Maximum intents delivered per poll cycle.
    pub batch_size: u32,

    /// Delivery attempts before an intent is marked failed.
    pub max_attempts: u32,

    /// Chat platform API base URL.
    pub chat_api_base_url: String,

    /// Chat API request timeout in seconds.
    pub chat_timeout_secs: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            batch_size: 50,
            max_attempts: 3,
            chat_api_base_url: "https://api.chat.example".to_string(),
            chat_timeout_secs: 10,
        }
    }
}

impl NotificationsConfig {
    pub fn dispatcher(&self) -> DispatcherConfig {
        DispatcherConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            batch_size: self.batch_size,
            max_attempts: self.max_attempts,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.batch_size == 0 {
            return Err(ValidationError::invalid(
                "notifications.batch_size",
                "must be at least 1",
            ));
        }
        if self.max_attempts == 0 {
            return Err(ValidationError::invalid(
                "notifications.max_attempts",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
