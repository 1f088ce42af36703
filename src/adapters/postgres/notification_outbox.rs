//! PostgreSQL implementation of NotificationOutbox.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, TenantId, Timestamp};
use crate::domain::notifications::{
    IntentStatus, NotificationChannel, NotificationIntent, TemplateKey,
};
use crate::ports::NotificationOutbox;

/// PostgreSQL implementation of the NotificationOutbox port.
pub struct PostgresNotificationOutbox {
    pool: PgPool,
}

impl PostgresNotificationOutbox {
    /// Creates a new outbox with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct IntentRow {
    id: Uuid,
    tenant_id: Uuid,
    channel: String,
    recipient: String,
    template_key: Option<String>,
    variables: serde_json::Value,
    body: Option<String>,
    status: String,
    attempts: i32,
    last_error: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<IntentRow> for NotificationIntent {
    type Error = DomainError;

    fn try_from(row: IntentRow) -> Result<Self, Self::Error> {
        let channel = NotificationChannel::parse(&row.channel).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid channel value: {}", row.channel),
            )
        })?;
        let status = IntentStatus::parse(&row.status).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid status value: {}", row.status),
            )
        })?;
        let variables: HashMap<String, String> =
            serde_json::from_value(row.variables).unwrap_or_default();

        Ok(NotificationIntent {
            id: row.id,
            tenant_id: TenantId::from_uuid(row.tenant_id),
            channel,
            recipient: row.recipient,
            template_key: row.template_key.as_deref().and_then(TemplateKey::parse),
            variables,
            body: row.body,
            status,
            attempts: row.attempts.max(0) as u32,
            last_error: row.last_error,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn map_sqlx_err(err: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, err.to_string())
}

#[async_trait]
impl NotificationOutbox for PostgresNotificationOutbox {
    async fn enqueue(&self, intent: NotificationIntent) -> Result<(), DomainError> {
        let variables = serde_json::to_value(&intent.variables)
            .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?;
        sqlx::query(
            r#"
            INSERT INTO notification_outbox (
                id, tenant_id, channel, recipient, template_key, variables,
                body, status, attempts, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(intent.id)
        .bind(intent.tenant_id.as_uuid())
        .bind(intent.channel.as_str())
        .bind(&intent.recipient)
        .bind(intent.template_key.map(|k| k.as_str()))
        .bind(variables)
        .bind(&intent.body)
        .bind(intent.status.as_str())
        .bind(intent.attempts as i32)
        .bind(intent.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    async fn enqueue_all(&self, intents: Vec<NotificationIntent>) -> Result<(), DomainError> {
        for intent in intents {
            self.enqueue(intent).await?;
        }
        Ok(())
    }

    async fn pending(&self, limit: u32) -> Result<Vec<NotificationIntent>, DomainError> {
        let rows: Vec<IntentRow> = sqlx::query_as(
            r#"
            SELECT id, tenant_id, channel, recipient, template_key, variables,
                   body, status, attempts, last_error, created_at
            FROM notification_outbox
            WHERE status = 'pending'
            ORDER BY created_at
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        rows.into_iter().map(NotificationIntent::try_from).collect()
    }

    async fn mark_dispatched(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query(
            "UPDATE notification_outbox
             SET status = 'dispatched', dispatched_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        Ok(())
    }

    async fn mark_retry(&self, id: Uuid, error: &str) -> Result<(), DomainError> {
        sqlx::query(
            "UPDATE notification_outbox
             SET attempts = attempts + 1, last_error = $2
             WHERE id = $1",
        )
        .bind(id)
        .bind(error)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), DomainError> {
        sqlx::query(
            "UPDATE notification_outbox
             SET status = 'failed', attempts = attempts + 1, last_error = $2
             WHERE id = $1",
        )
        .bind(id)
        .bind(error)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        Ok(())
    }
}
