//! Notification intents - the outbox row model.
//!
//! Lifecycle operations produce intents; the background dispatcher drains
//! them. A failed dispatch marks the intent and never reaches back into the
//! operation that produced it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{TenantId, Timestamp};

use super::TemplateKey;

/// Delivery channel for an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    /// Chat text message to a chat subscriber id.
    Chat,

    /// Templated email to an address.
    Email,
}

impl NotificationChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationChannel::Chat => "chat",
            NotificationChannel::Email => "email",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "chat" => Some(NotificationChannel::Chat),
            "email" => Some(NotificationChannel::Email),
            _ => None,
        }
    }
}

/// Dispatch state of an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    Pending,
    Dispatched,
    Failed,
}

impl IntentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentStatus::Pending => "pending",
            IntentStatus::Dispatched => "dispatched",
            IntentStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(IntentStatus::Pending),
            "dispatched" => Some(IntentStatus::Dispatched),
            "failed" => Some(IntentStatus::Failed),
            _ => None,
        }
    }
}

/// A queued notification: template plus variables, or a pre-rendered body.
///
/// The dispatcher resolves the template against the tenant's overrides at
/// send time, so overrides apply to both channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationIntent {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub channel: NotificationChannel,

    /// Email address or chat subscriber id, depending on the channel.
    pub recipient: String,

    pub template_key: Option<TemplateKey>,
    pub variables: HashMap<String, String>,

    /// Pre-rendered text used instead of a template when present.
    pub body: Option<String>,

    pub status: IntentStatus,
    pub attempts: u32,
    pub last_error: Option<String>,
    pub created_at: Timestamp,
}

impl NotificationIntent {
    /// A templated email intent.
    pub fn email(
        tenant_id: TenantId,
        recipient: impl Into<String>,
        template_key: TemplateKey,
        variables: HashMap<String, String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            channel: NotificationChannel::Email,
            recipient: recipient.into(),
            template_key: Some(template_key),
            variables,
            body: None,
            status: IntentStatus::Pending,
            attempts: 0,
            last_error: None,
            created_at: Timestamp::now(),
        }
    }

    /// A templated chat intent (the rendered body becomes the message text).
    pub fn chat(
        tenant_id: TenantId,
        subscriber_id: impl Into<String>,
        template_key: TemplateKey,
        variables: HashMap<String, String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            channel: NotificationChannel::Chat,
            recipient: subscriber_id.into(),
            template_key: Some(template_key),
            variables,
            body: None,
            status: IntentStatus::Pending,
            attempts: 0,
            last_error: None,
            created_at: Timestamp::now(),
        }
    }

    /// A chat intent carrying already-rendered text.
    pub fn chat_text(
        tenant_id: TenantId,
        subscriber_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            channel: NotificationChannel::Chat,
            recipient: subscriber_id.into(),
            template_key: None,
            variables: HashMap::new(),
            body: Some(text.into()),
            status: IntentStatus::Pending,
            attempts: 0,
            last_error: None,
            created_at: Timestamp::now(),
        }
    }
}
