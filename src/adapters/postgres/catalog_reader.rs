//! PostgreSQL implementation of CatalogReader.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::billing::{Plan, PlanInterval};
use crate::domain::foundation::{
    DomainError, ErrorCode, PlanId, ProfessionalId, ServiceId, TenantId,
};
use crate::domain::scheduling::{Professional, Service};
use crate::ports::CatalogReader;

/// PostgreSQL implementation of the CatalogReader port.
pub struct PostgresCatalogReader {
    pool: PgPool,
}

impl PostgresCatalogReader {
    /// Creates a new reader with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ServiceRow {
    id: Uuid,
    tenant_id: Uuid,
    name: String,
    duration_minutes: i32,
    price_cents: i64,
}

impl From<ServiceRow> for Service {
    fn from(row: ServiceRow) -> Self {
        Service {
            id: ServiceId::from_uuid(row.id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            name: row.name,
            duration_minutes: row.duration_minutes.max(0) as u32,
            price_cents: row.price_cents,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProfessionalRow {
    id: Uuid,
    tenant_id: Uuid,
    name: String,
    email: Option<String>,
}

impl From<ProfessionalRow> for Professional {
    fn from(row: ProfessionalRow) -> Self {
        Professional {
            id: ProfessionalId::from_uuid(row.id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            name: row.name,
            email: row.email,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    id: Uuid,
    tenant_id: Uuid,
    name: String,
    interval: String,
    credits: i32,
    price_cents: i64,
}

impl TryFrom<PlanRow> for Plan {
    type Error = DomainError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        let interval = PlanInterval::parse(&row.interval).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid interval value: {}", row.interval),
            )
        })?;
        Ok(Plan {
            id: PlanId::from_uuid(row.id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            name: row.name,
            interval,
            credits: row.credits,
            price_cents: row.price_cents,
        })
    }
}

fn map_sqlx_err(err: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, err.to_string())
}

#[async_trait]
impl CatalogReader for PostgresCatalogReader {
    async fn service(
        &self,
        tenant_id: TenantId,
        id: ServiceId,
    ) -> Result<Option<Service>, DomainError> {
        let row: Option<ServiceRow> = sqlx::query_as(
            "SELECT id, tenant_id, name, duration_minutes, price_cents
             FROM services WHERE tenant_id = $1 AND id = $2",
        )
        .bind(tenant_id.as_uuid())
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.map(Service::from))
    }

    async fn services(
        &self,
        tenant_id: TenantId,
        ids: &[ServiceId],
    ) -> Result<Vec<Service>, DomainError> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<ServiceRow> = sqlx::query_as(
            "SELECT id, tenant_id, name, duration_minutes, price_cents
             FROM services WHERE tenant_id = $1 AND id = ANY($2)",
        )
        .bind(tenant_id.as_uuid())
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(rows.into_iter().map(Service::from).collect())
    }

    async fn list_services(&self, tenant_id: TenantId) -> Result<Vec<Service>, DomainError> {
        let rows: Vec<ServiceRow> = sqlx::query_as(
            "SELECT id, tenant_id, name, duration_minutes, price_cents
             FROM services WHERE tenant_id = $1 ORDER BY name",
        )
        .bind(tenant_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(rows.into_iter().map(Service::from).collect())
    }

    async fn professional(
        &self,
        tenant_id: TenantId,
        id: ProfessionalId,
    ) -> Result<Option<Professional>, DomainError> {
        let row: Option<ProfessionalRow> = sqlx::query_as(
            "SELECT id, tenant_id, name, email
             FROM professionals WHERE tenant_id = $1 AND id = $2",
        )
        .bind(tenant_id.as_uuid())
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.map(Professional::from))
    }

    async fn list_professionals(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<Professional>, DomainError> {
        let rows: Vec<ProfessionalRow> = sqlx::query_as(
            "SELECT id, tenant_id, name, email
             FROM professionals WHERE tenant_id = $1 ORDER BY name",
        )
        .bind(tenant_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(rows.into_iter().map(Professional::from).collect())
    }

    async fn plan(&self, tenant_id: TenantId, id: PlanId) -> Result<Option<Plan>, DomainError> {
        let row: Option<PlanRow> = sqlx::query_as(
            "SELECT id, tenant_id, name, interval, credits, price_cents
             FROM plans WHERE tenant_id = $1 AND id = $2",
        )
        .bind(tenant_id.as_uuid())
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        row.map(Plan::try_from).transpose()
    }
}
