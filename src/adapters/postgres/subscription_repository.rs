//! PostgreSQL implementation of SubscriptionRepository.
//!
//! The credit decrement is a single conditional UPDATE guarded by
//! `credits_remaining > 0`; combined with the CHECK constraint on the
//! column, concurrent plan-credit payments cannot overdraw a subscription.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::billing::{Subscription, SubscriptionStatus};
use crate::domain::foundation::{
    DomainError, ErrorCode, PlanId, SubscriptionId, TenantId, Timestamp, UserId,
};
use crate::ports::SubscriptionRepository;

/// PostgreSQL implementation of the SubscriptionRepository port.
pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a subscription.
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    tenant_id: Uuid,
    user_id: Uuid,
    plan_id: Uuid,
    status: String,
    credits_remaining: i32,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let status = SubscriptionStatus::parse(&row.status).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid status value: {}", row.status),
            )
        })?;

        Ok(Subscription {
            id: SubscriptionId::from_uuid(row.id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            user_id: UserId::from_uuid(row.user_id),
            plan_id: PlanId::from_uuid(row.plan_id),
            status,
            credits_remaining: row.credits_remaining,
            start_date: row.start_date.map(Timestamp::from_datetime),
            end_date: row.end_date.map(Timestamp::from_datetime),
        })
    }
}

fn map_sqlx_err(err: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, err.to_string())
}

const SELECT: &str = r#"
    SELECT id, tenant_id, user_id, plan_id, status, credits_remaining,
           start_date, end_date
    FROM subscriptions
"#;

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: SubscriptionId,
    ) -> Result<Option<Subscription>, DomainError> {
        let sql = format!("{} WHERE tenant_id = $1 AND id = $2", SELECT);
        let row: Option<SubscriptionRow> = sqlx::query_as(&sql)
            .bind(tenant_id.as_uuid())
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        row.map(Subscription::try_from).transpose()
    }

    async fn find_active_with_credits(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> Result<Option<Subscription>, DomainError> {
        let sql = format!(
            "{} WHERE tenant_id = $1 AND user_id = $2
                AND status = 'active' AND credits_remaining > 0
             ORDER BY created_at DESC
             LIMIT 1",
            SELECT
        );
        let row: Option<SubscriptionRow> = sqlx::query_as(&sql)
            .bind(tenant_id.as_uuid())
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        row.map(Subscription::try_from).transpose()
    }

    async fn consume_credit(
        &self,
        tenant_id: TenantId,
        id: SubscriptionId,
    ) -> Result<bool, DomainError> {
        // Read-check-decrement must not race; the condition rides along in
        // the UPDATE itself.
        let result = sqlx::query(
            r#"
            UPDATE subscriptions
            SET credits_remaining = credits_remaining - 1, updated_at = now()
            WHERE tenant_id = $1 AND id = $2
              AND status = 'active' AND credits_remaining > 0
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn activate(&self, tenant_id: TenantId, id: SubscriptionId) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        let owner: Option<(Uuid,)> = sqlx::query_as(
            "SELECT user_id FROM subscriptions WHERE tenant_id = $1 AND id = $2",
        )
        .bind(tenant_id.as_uuid())
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;
        let owner = owner.ok_or_else(|| {
            DomainError::new(ErrorCode::SubscriptionNotFound, "Subscription not found")
        })?;

        // At most one active subscription per (user, tenant).
        sqlx::query(
            r#"
            UPDATE subscriptions
            SET status = 'canceled', updated_at = now()
            WHERE tenant_id = $1 AND user_id = $2 AND status = 'active' AND id <> $3
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(owner.0)
        .bind(id.as_uuid())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

        sqlx::query(
            r#"
            UPDATE subscriptions
            SET status = 'active', start_date = COALESCE(start_date, now()),
                updated_at = now()
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(id.as_uuid())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

        tx.commit().await.map_err(map_sqlx_err)
    }
}
