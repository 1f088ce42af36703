//! In-memory notification outbox and recording channel senders.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use secrecy::SecretString;
use uuid::Uuid;

use crate::domain::foundation::DomainError;
use crate::domain::notifications::{IntentStatus, NotificationIntent};
use crate::ports::{ChatSender, EmailSender, NotificationOutbox, NotifyError, SmtpSettings};

/// In-memory notification outbox.
#[derive(Default)]
pub struct InMemoryOutbox {
    intents: Mutex<HashMap<Uuid, NotificationIntent>>,
}

impl InMemoryOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_of(&self, id: Uuid) -> Option<IntentStatus> {
        self.intents.lock().unwrap().get(&id).map(|i| i.status)
    }

    pub fn all(&self) -> Vec<NotificationIntent> {
        self.intents.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl NotificationOutbox for InMemoryOutbox {
    async fn enqueue(&self, intent: NotificationIntent) -> Result<(), DomainError> {
        self.intents.lock().unwrap().insert(intent.id, intent);
        Ok(())
    }

    async fn enqueue_all(&self, intents: Vec<NotificationIntent>) -> Result<(), DomainError> {
        let mut guard = self.intents.lock().unwrap();
        for intent in intents {
            guard.insert(intent.id, intent);
        }
        Ok(())
    }

    async fn pending(&self, limit: u32) -> Result<Vec<NotificationIntent>, DomainError> {
        let guard = self.intents.lock().unwrap();
        let mut pending: Vec<NotificationIntent> = guard
            .values()
            .filter(|i| i.status == IntentStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by_key(|i| i.created_at);
        pending.truncate(limit as usize);
        Ok(pending)
    }

    async fn mark_dispatched(&self, id: Uuid) -> Result<(), DomainError> {
        if let Some(intent) = self.intents.lock().unwrap().get_mut(&id) {
            intent.status = IntentStatus::Dispatched;
        }
        Ok(())
    }

    async fn mark_retry(&self, id: Uuid, error: &str) -> Result<(), DomainError> {
        if let Some(intent) = self.intents.lock().unwrap().get_mut(&id) {
            intent.attempts += 1;
            intent.last_error = Some(error.to_string());
        }
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), DomainError> {
        if let Some(intent) = self.intents.lock().unwrap().get_mut(&id) {
            intent.attempts += 1;
            intent.status = IntentStatus::Failed;
            intent.last_error = Some(error.to_string());
        }
        Ok(())
    }
}

/// Chat sender that records messages instead of delivering them.
#[derive(Default)]
pub struct RecordingChat {
    sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// `(subscriber_id, text)` pairs in send order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatSender for RecordingChat {
    async fn send_text(
        &self,
        _api_key: &SecretString,
        subscriber_id: &str,
        text: &str,
    ) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Delivery("simulated chat outage".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((subscriber_id.to_string(), text.to_string()));
        Ok(())
    }
}

/// Email sender that records messages instead of delivering them.
#[derive(Default)]
pub struct RecordingEmail {
    sent: Mutex<Vec<(String, String, String)>>,
    fail: bool,
}

impl RecordingEmail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// `(to, subject, body)` triples in send order.
    pub fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for RecordingEmail {
    async fn send_email(
        &self,
        _smtp: &SmtpSettings,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Delivery("simulated SMTP outage".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}
