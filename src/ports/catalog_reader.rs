//! Read-only catalog port: services, professionals, plans.
//!
//! Catalog CRUD belongs to the surrounding application; the booking engine
//! only reads durations, prices, names, and emails.

use async_trait::async_trait;

use crate::domain::billing::Plan;
use crate::domain::foundation::{DomainError, PlanId, ProfessionalId, ServiceId, TenantId};
use crate::domain::scheduling::{Professional, Service};

#[async_trait]
pub trait CatalogReader: Send + Sync {
    async fn service(
        &self,
        tenant_id: TenantId,
        id: ServiceId,
    ) -> Result<Option<Service>, DomainError>;

    /// Fetches the given services; unknown ids are silently omitted.
    async fn services(
        &self,
        tenant_id: TenantId,
        ids: &[ServiceId],
    ) -> Result<Vec<Service>, DomainError>;

    async fn list_services(&self, tenant_id: TenantId) -> Result<Vec<Service>, DomainError>;

    async fn professional(
        &self,
        tenant_id: TenantId,
        id: ProfessionalId,
    ) -> Result<Option<Professional>, DomainError>;

    async fn list_professionals(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<Professional>, DomainError>;

    async fn plan(&self, tenant_id: TenantId, id: PlanId) -> Result<Option<Plan>, DomainError>;
}
