//! PostgreSQL implementation of AppointmentRepository.
//!
//! The partial unique index `uq_appointments_professional_slot` on
//! `(tenant_id, professional_id, date)` over non-canceled rows is the final
//! defense against double booking; violations surface as the same
//! `SchedulingConflict` the availability probe raises.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::billing::PaymentMethod;
use crate::domain::foundation::{
    AppointmentId, DomainError, ErrorCode, LocationId, ProfessionalId, ServiceId, TenantId,
    Timestamp, UserId,
};
use crate::domain::scheduling::{Appointment, AppointmentStatus, ListScope};
use crate::ports::{AppointmentQuery, AppointmentRepository, BookedSlot, Page};

const SLOT_CONSTRAINT: &str = "uq_appointments_professional_slot";

/// PostgreSQL implementation of the AppointmentRepository port.
pub struct PostgresAppointmentRepository {
    pool: PgPool,
}

impl PostgresAppointmentRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an appointment with aggregated services.
#[derive(Debug, sqlx::FromRow)]
struct AppointmentRow {
    id: Uuid,
    tenant_id: Uuid,
    user_id: Uuid,
    professional_id: Option<Uuid>,
    location_id: Option<Uuid>,
    date: DateTime<Utc>,
    status: String,
    payment_method: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    service_ids: Option<Vec<Uuid>>,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = DomainError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let status = AppointmentStatus::parse(&row.status).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid status value: {}", row.status),
            )
        })?;
        let payment_method = PaymentMethod::parse(&row.payment_method).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid payment method value: {}", row.payment_method),
            )
        })?;

        Ok(Appointment {
            id: AppointmentId::from_uuid(row.id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            user_id: UserId::from_uuid(row.user_id),
            professional_id: row.professional_id.map(ProfessionalId::from_uuid),
            location_id: row.location_id.map(LocationId::from_uuid),
            date: Timestamp::from_datetime(row.date),
            status,
            payment_method,
            service_ids: row
                .service_ids
                .unwrap_or_default()
                .into_iter()
                .map(ServiceId::from_uuid)
                .collect(),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

/// Maps a sqlx error, surfacing the slot constraint as a conflict.
fn map_sqlx_err(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.constraint() == Some(SLOT_CONSTRAINT) {
            return DomainError::conflict("Professional already booked at this time");
        }
    }
    DomainError::new(ErrorCode::DatabaseError, err.to_string())
}

/// Scope binds shared by the listing queries: `(user_id, professional_email)`.
fn scope_binds(scope: &ListScope) -> (Option<Uuid>, Option<String>) {
    match scope {
        ListScope::All => (None, None),
        ListScope::OwnUser(user_id) => (Some(*user_id.as_uuid()), None),
        ListScope::ProfessionalEmail(email) => (None, Some(email.clone())),
    }
}

const LIST_SELECT: &str = r#"
    SELECT a.id, a.tenant_id, a.user_id, a.professional_id, a.location_id,
           a.date, a.status, a.payment_method, a.created_at, a.updated_at,
           array_agg(aps.service_id) FILTER (WHERE aps.service_id IS NOT NULL)
               AS service_ids
    FROM appointments a
    LEFT JOIN appointment_services aps ON aps.appointment_id = a.id
    LEFT JOIN professionals p ON p.id = a.professional_id
    WHERE a.tenant_id = $1
      AND ($2::timestamptz IS NULL OR a.date >= $2)
      AND ($3::timestamptz IS NULL OR a.date <= $3)
      AND ($4::uuid IS NULL OR a.user_id = $4)
      AND ($5::text IS NULL OR lower(p.email) = lower($5))
    GROUP BY a.id
"#;

#[async_trait]
impl AppointmentRepository for PostgresAppointmentRepository {
    async fn insert(&self, appointment: &Appointment) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        sqlx::query(
            r#"
            INSERT INTO appointments (
                id, tenant_id, user_id, professional_id, location_id,
                date, status, payment_method, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(appointment.id.as_uuid())
        .bind(appointment.tenant_id.as_uuid())
        .bind(appointment.user_id.as_uuid())
        .bind(appointment.professional_id.map(|id| *id.as_uuid()))
        .bind(appointment.location_id.map(|id| *id.as_uuid()))
        .bind(appointment.date.as_datetime())
        .bind(appointment.status.as_str())
        .bind(appointment.payment_method.as_str())
        .bind(appointment.created_at.as_datetime())
        .bind(appointment.updated_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

        for service_id in &appointment.service_ids {
            sqlx::query(
                "INSERT INTO appointment_services (appointment_id, service_id) VALUES ($1, $2)",
            )
            .bind(appointment.id.as_uuid())
            .bind(service_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;
        }

        tx.commit().await.map_err(map_sqlx_err)
    }

    async fn update(&self, appointment: &Appointment) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        let result = sqlx::query(
            r#"
            UPDATE appointments
            SET professional_id = $3, location_id = $4, date = $5,
                status = $6, payment_method = $7, updated_at = $8
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(appointment.tenant_id.as_uuid())
        .bind(appointment.id.as_uuid())
        .bind(appointment.professional_id.map(|id| *id.as_uuid()))
        .bind(appointment.location_id.map(|id| *id.as_uuid()))
        .bind(appointment.date.as_datetime())
        .bind(appointment.status.as_str())
        .bind(appointment.payment_method.as_str())
        .bind(appointment.updated_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::AppointmentNotFound,
                "Appointment not found",
            ));
        }

        sqlx::query("DELETE FROM appointment_services WHERE appointment_id = $1")
            .bind(appointment.id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;
        for service_id in &appointment.service_ids {
            sqlx::query(
                "INSERT INTO appointment_services (appointment_id, service_id) VALUES ($1, $2)",
            )
            .bind(appointment.id.as_uuid())
            .bind(service_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;
        }

        tx.commit().await.map_err(map_sqlx_err)
    }

    async fn set_status(
        &self,
        tenant_id: TenantId,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE appointments SET status = $3, updated_at = now()
             WHERE tenant_id = $1 AND id = $2",
        )
        .bind(tenant_id.as_uuid())
        .bind(id.as_uuid())
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::AppointmentNotFound,
                "Appointment not found",
            ));
        }
        Ok(())
    }

    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: AppointmentId,
    ) -> Result<Option<Appointment>, DomainError> {
        let row: Option<AppointmentRow> = sqlx::query_as(
            r#"
            SELECT a.id, a.tenant_id, a.user_id, a.professional_id, a.location_id,
                   a.date, a.status, a.payment_method, a.created_at, a.updated_at,
                   array_agg(aps.service_id) FILTER (WHERE aps.service_id IS NOT NULL)
                       AS service_ids
            FROM appointments a
            LEFT JOIN appointment_services aps ON aps.appointment_id = a.id
            WHERE a.tenant_id = $1 AND a.id = $2
            GROUP BY a.id
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        row.map(Appointment::try_from).transpose()
    }

    async fn exists_active_at(
        &self,
        tenant_id: TenantId,
        professional_id: ProfessionalId,
        date: Timestamp,
        exclude: Option<AppointmentId>,
    ) -> Result<bool, DomainError> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM appointments
                WHERE tenant_id = $1 AND professional_id = $2 AND date = $3
                  AND status <> 'canceled'
                  AND ($4::uuid IS NULL OR id <> $4)
            )
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(professional_id.as_uuid())
        .bind(date.as_datetime())
        .bind(exclude.map(|id| *id.as_uuid()))
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(exists.0)
    }

    async fn booked_slots(
        &self,
        tenant_id: TenantId,
        window: (Timestamp, Timestamp),
        professional_id: Option<ProfessionalId>,
    ) -> Result<Vec<BookedSlot>, DomainError> {
        let rows: Vec<(Uuid, DateTime<Utc>, Option<i64>)> = sqlx::query_as(
            r#"
            SELECT a.id, a.date, SUM(s.duration_minutes)::bigint AS total_minutes
            FROM appointments a
            LEFT JOIN appointment_services aps ON aps.appointment_id = a.id
            LEFT JOIN services s ON s.id = aps.service_id
            WHERE a.tenant_id = $1
              AND a.date >= $2 AND a.date <= $3
              AND a.status <> 'canceled'
              AND ($4::uuid IS NULL OR a.professional_id = $4)
            GROUP BY a.id, a.date
            ORDER BY a.date
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(window.0.as_datetime())
        .bind(window.1.as_datetime())
        .bind(professional_id.map(|id| *id.as_uuid()))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(rows
            .into_iter()
            .map(|(id, date, total)| BookedSlot {
                appointment_id: AppointmentId::from_uuid(id),
                start: Timestamp::from_datetime(date),
                duration_minutes: total.filter(|t| *t > 0).map(|t| t as u32),
            })
            .collect())
    }

    async fn list_asc(
        &self,
        tenant_id: TenantId,
        query: &AppointmentQuery,
    ) -> Result<Vec<Appointment>, DomainError> {
        let (user_id, email) = scope_binds(&query.scope);
        let sql = format!("{} ORDER BY a.date ASC", LIST_SELECT);
        let rows: Vec<AppointmentRow> = sqlx::query_as(&sql)
            .bind(tenant_id.as_uuid())
            .bind(query.window.map(|w| *w.0.as_datetime()))
            .bind(query.window.map(|w| *w.1.as_datetime()))
            .bind(user_id)
            .bind(email)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        rows.into_iter().map(Appointment::try_from).collect()
    }

    async fn list_page_desc(
        &self,
        tenant_id: TenantId,
        query: &AppointmentQuery,
        page: Page,
    ) -> Result<Vec<Appointment>, DomainError> {
        let (user_id, email) = scope_binds(&query.scope);
        let sql = format!("{} ORDER BY a.date DESC LIMIT $6 OFFSET $7", LIST_SELECT);
        let rows: Vec<AppointmentRow> = sqlx::query_as(&sql)
            .bind(tenant_id.as_uuid())
            .bind(query.window.map(|w| *w.0.as_datetime()))
            .bind(query.window.map(|w| *w.1.as_datetime()))
            .bind(user_id)
            .bind(email)
            .bind(page.limit as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        rows.into_iter().map(Appointment::try_from).collect()
    }

    async fn count(
        &self,
        tenant_id: TenantId,
        query: &AppointmentQuery,
    ) -> Result<u64, DomainError> {
        let (user_id, email) = scope_binds(&query.scope);
        let row: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM appointments a
            LEFT JOIN professionals p ON p.id = a.professional_id
            WHERE a.tenant_id = $1
              AND ($2::timestamptz IS NULL OR a.date >= $2)
              AND ($3::timestamptz IS NULL OR a.date <= $3)
              AND ($4::uuid IS NULL OR a.user_id = $4)
              AND ($5::text IS NULL OR lower(p.email) = lower($5))
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(query.window.map(|w| *w.0.as_datetime()))
        .bind(query.window.map(|w| *w.1.as_datetime()))
        .bind(user_id)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.0 as u64)
    }

    async fn statuses(
        &self,
        tenant_id: TenantId,
        ids: &[AppointmentId],
    ) -> Result<Vec<(AppointmentId, AppointmentStatus)>, DomainError> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<(Uuid, String)> = sqlx::query_as(
            "SELECT id, status FROM appointments WHERE tenant_id = $1 AND id = ANY($2)",
        )
        .bind(tenant_id.as_uuid())
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        rows.into_iter()
            .map(|(id, status)| {
                let status = AppointmentStatus::parse(&status).ok_or_else(|| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Invalid status value: {}", status),
                    )
                })?;
                Ok((AppointmentId::from_uuid(id), status))
            })
            .collect()
    }

    async fn delete_many(
        &self,
        tenant_id: TenantId,
        ids: &[AppointmentId],
    ) -> Result<u64, DomainError> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let result = sqlx::query("DELETE FROM appointments WHERE tenant_id = $1 AND id = ANY($2)")
            .bind(tenant_id.as_uuid())
            .bind(&uuids)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        Ok(result.rows_affected())
    }
}
