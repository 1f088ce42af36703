//! Notification outbox port.
//!
//! Lifecycle operations enqueue intents; the dispatcher polls `pending`
//! and records each outcome. The enqueue side must be cheap and local so
//! producing a notification can never fail the primary write path in an
//! interesting way.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::foundation::DomainError;
use crate::domain::notifications::NotificationIntent;

#[async_trait]
pub trait NotificationOutbox: Send + Sync {
    async fn enqueue(&self, intent: NotificationIntent) -> Result<(), DomainError>;

    async fn enqueue_all(&self, intents: Vec<NotificationIntent>) -> Result<(), DomainError>;

    /// Oldest pending intents, up to `limit`.
    async fn pending(&self, limit: u32) -> Result<Vec<NotificationIntent>, DomainError>;

    async fn mark_dispatched(&self, id: Uuid) -> Result<(), DomainError>;

    /// Records a failed attempt, leaving the intent pending for retry.
    async fn mark_retry(&self, id: Uuid, error: &str) -> Result<(), DomainError>;

    /// Marks the intent permanently failed (attempt cap reached).
    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), DomainError>;
}
