//! NotificationDispatcher - background service draining the outbox.
//!
//! The second half of the notification outbox pattern:
//! 1. Lifecycle handlers write intents to the outbox (alongside their
//!    primary write)
//! 2. **The dispatcher polls the outbox and delivers over chat/email** ← here
//!
//! Failures stay inside the dispatcher: a bad SMTP password or a chat API
//! outage marks intents for retry and is logged, nothing more. The tenant's
//! channel configuration is fetched per intent; config is read-mostly and
//! no cache is assumed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::domain::foundation::DomainError;
use crate::domain::notifications::{render, resolve, NotificationChannel, NotificationIntent};
use crate::ports::{
    ChatSender, EmailSender, NotificationOutbox, NotifyError, TenantConfigReader,
};

/// Configuration for the dispatcher service.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// How often to poll for pending intents.
    pub poll_interval: Duration,

    /// Maximum intents to deliver per poll cycle.
    pub batch_size: u32,

    /// Delivery attempts before an intent is marked failed for good.
    pub max_attempts: u32,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            batch_size: 50,
            max_attempts: 3,
        }
    }
}

/// Background service that delivers queued notification intents.
pub struct NotificationDispatcher {
    outbox: Arc<dyn NotificationOutbox>,
    chat: Arc<dyn ChatSender>,
    email: Arc<dyn EmailSender>,
    tenant_config: Arc<dyn TenantConfigReader>,
    config: DispatcherConfig,
}

impl NotificationDispatcher {
    pub fn new(
        outbox: Arc<dyn NotificationOutbox>,
        chat: Arc<dyn ChatSender>,
        email: Arc<dyn EmailSender>,
        tenant_config: Arc<dyn TenantConfigReader>,
    ) -> Self {
        Self::with_config(outbox, chat, email, tenant_config, DispatcherConfig::default())
    }

    pub fn with_config(
        outbox: Arc<dyn NotificationOutbox>,
        chat: Arc<dyn ChatSender>,
        email: Arc<dyn EmailSender>,
        tenant_config: Arc<dyn TenantConfigReader>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            outbox,
            chat,
            email,
            tenant_config,
            config,
        }
    }

    /// Run the dispatch loop until the shutdown signal flips.
    ///
    /// Completes the in-flight batch before exiting.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), DomainError> {
        let mut interval = time::interval(self.config.poll_interval);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        self.process_batch().await?;
                        return Ok(());
                    }
                }

                _ = interval.tick() => {
                    self.process_batch().await?;
                }
            }
        }
    }

    /// Deliver one batch of pending intents.
    ///
    /// Returns the number delivered. Per-intent failures are recorded on
    /// the intent and never abort the batch.
    pub async fn process_batch(&self) -> Result<usize, DomainError> {
        let intents = self.outbox.pending(self.config.batch_size).await?;
        let mut delivered = 0;

        for intent in intents {
            match self.deliver(&intent).await {
                Ok(()) => {
                    self.outbox.mark_dispatched(intent.id).await?;
                    delivered += 1;
                }
                Err(e) => {
                    let error_msg = e.to_string();
                    tracing::warn!(
                        intent_id = %intent.id,
                        tenant_id = %intent.tenant_id,
                        channel = intent.channel.as_str(),
                        error = %error_msg,
                        "Notification delivery failed"
                    );
                    if intent.attempts + 1 >= self.config.max_attempts {
                        self.outbox.mark_failed(intent.id, &error_msg).await?;
                    } else {
                        self.outbox.mark_retry(intent.id, &error_msg).await?;
                    }
                }
            }
        }

        Ok(delivered)
    }

    /// Run exactly one poll cycle (for testing).
    pub async fn poll_once(&self) -> Result<usize, DomainError> {
        self.process_batch().await
    }

    async fn deliver(&self, intent: &NotificationIntent) -> Result<(), NotifyError> {
        let config = self
            .tenant_config
            .config(intent.tenant_id)
            .await
            .map_err(|e| NotifyError::Delivery(format!("tenant config: {}", e)))?;

        // Resolve at delivery time so tenant overrides apply to both channels.
        let (subject, text) = match intent.template_key {
            Some(key) => {
                let template = resolve(key, &config.template_overrides);
                (
                    render(&template.subject, &intent.variables),
                    render(&template.body, &intent.variables),
                )
            }
            None => (String::new(), intent.body.clone().unwrap_or_default()),
        };

        match intent.channel {
            NotificationChannel::Chat => {
                let api_key = config
                    .chat_api_key
                    .as_ref()
                    .ok_or(NotifyError::NotConfigured("chat"))?;
                self.chat.send_text(api_key, &intent.recipient, &text).await
            }
            NotificationChannel::Email => {
                let smtp = config
                    .smtp
                    .as_ref()
                    .ok_or(NotifyError::NotConfigured("email"))?;
                self.email
                    .send_email(smtp, &intent.recipient, &subject, &text)
                    .await
            }
        }
    }
}
