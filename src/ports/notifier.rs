//! Notification channel ports.
//!
//! Both channels are best-effort: callers (the dispatcher) log failures and
//! never let them reach the operation that produced the notification.

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

use super::SmtpSettings;

/// Errors from a notification channel.
#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    /// The tenant has not configured this channel.
    #[error("channel not configured: {0}")]
    NotConfigured(&'static str),

    /// Delivery failed at the transport.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Sends short text messages through the chat platform.
#[async_trait]
pub trait ChatSender: Send + Sync {
    async fn send_text(
        &self,
        api_key: &SecretString,
        subscriber_id: &str,
        text: &str,
    ) -> Result<(), NotifyError>;
}

/// Sends templated email through the tenant's SMTP account.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(
        &self,
        smtp: &SmtpSettings,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotifyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_ports_are_object_safe() {
        fn _accepts_chat(_chat: &dyn ChatSender) {}
        fn _accepts_email(_email: &dyn EmailSender) {}
    }
}
