//! Notification application layer: intent builders and the dispatcher.

mod dispatcher;
pub mod intents;

pub use dispatcher::{DispatcherConfig, NotificationDispatcher};
pub use intents::AppointmentContext;

use crate::domain::notifications::NotificationIntent;
use crate::ports::NotificationOutbox;

/// Enqueues intents, logging failures instead of propagating them.
///
/// Notification dispatch is best-effort; a full outbox or broken store must
/// never fail the lifecycle operation that produced the intents.
pub async fn enqueue_quietly(outbox: &dyn NotificationOutbox, intents: Vec<NotificationIntent>) {
    if intents.is_empty() {
        return;
    }
    if let Err(e) = outbox.enqueue_all(intents).await {
        tracing::warn!(error = %e, "Failed to enqueue notifications");
    }
}
