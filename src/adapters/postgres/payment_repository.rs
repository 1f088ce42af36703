//! PostgreSQL implementation of PaymentRepository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::billing::Payment;
use crate::domain::foundation::{AppointmentId, DomainError, ErrorCode, TenantId};
use crate::ports::PaymentRepository;

/// PostgreSQL implementation of the PaymentRepository port.
pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_sqlx_err(err: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, err.to_string())
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn insert(&self, payment: &Payment) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, tenant_id, user_id, amount_cents, method, status, type,
                appointment_id, subscription_id, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.tenant_id.as_uuid())
        .bind(payment.user_id.as_uuid())
        .bind(payment.amount_cents)
        .bind(payment.method.as_str())
        .bind(payment.status.as_str())
        .bind(payment.kind.as_str())
        .bind(payment.appointment_id.map(|id| *id.as_uuid()))
        .bind(payment.subscription_id.map(|id| *id.as_uuid()))
        .bind(payment.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    async fn has_completed_for_appointment(
        &self,
        tenant_id: TenantId,
        appointment_id: AppointmentId,
    ) -> Result<bool, DomainError> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM payments
                WHERE tenant_id = $1 AND appointment_id = $2 AND status = 'completed'
            )
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(appointment_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(exists.0)
    }

    async fn delete_for_appointments(
        &self,
        tenant_id: TenantId,
        appointment_ids: &[AppointmentId],
    ) -> Result<u64, DomainError> {
        let uuids: Vec<Uuid> = appointment_ids.iter().map(|id| *id.as_uuid()).collect();
        let result = sqlx::query(
            "DELETE FROM payments WHERE tenant_id = $1 AND appointment_id = ANY($2)",
        )
        .bind(tenant_id.as_uuid())
        .bind(&uuids)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(result.rows_affected())
    }
}
