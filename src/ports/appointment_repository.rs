//! Appointment repository port.
//!
//! All methods are tenant-scoped; implementations must never return rows
//! belonging to another tenant. `insert`/`update` are expected to surface
//! the persistence-level slot constraint as a `SchedulingConflict` so the
//! availability check and the write cannot race into a double booking.

use async_trait::async_trait;

use crate::domain::foundation::{
    AppointmentId, DomainError, ProfessionalId, TenantId, Timestamp,
};
use crate::domain::scheduling::{Appointment, AppointmentStatus, ListScope};

/// Filter shared by the listing and counting methods.
#[derive(Debug, Clone)]
pub struct AppointmentQuery {
    /// Role-derived visibility scope.
    pub scope: ListScope,

    /// Optional inclusive day window.
    pub window: Option<(Timestamp, Timestamp)>,
}

/// Pagination parameters (1-based page).
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1) * self.limit
    }
}

/// An occupied interval as needed by the availability engine.
#[derive(Debug, Clone)]
pub struct BookedSlot {
    pub appointment_id: AppointmentId,
    pub start: Timestamp,

    /// Sum of the appointment's service durations; `None` when it has no
    /// services (the caller applies the configured default).
    pub duration_minutes: Option<u32>,
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Persists a new appointment with its service associations.
    ///
    /// Returns `SchedulingConflict` when the slot constraint rejects the row.
    async fn insert(&self, appointment: &Appointment) -> Result<(), DomainError>;

    /// Persists changes to an existing appointment (reschedule).
    ///
    /// Returns `SchedulingConflict` on a slot constraint violation.
    async fn update(&self, appointment: &Appointment) -> Result<(), DomainError>;

    /// Writes only the status field.
    async fn set_status(
        &self,
        tenant_id: TenantId,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<(), DomainError>;

    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: AppointmentId,
    ) -> Result<Option<Appointment>, DomainError>;

    /// True when a non-canceled appointment exists for the professional at
    /// exactly this instant, excluding `exclude` (the appointment being
    /// edited) when given.
    async fn exists_active_at(
        &self,
        tenant_id: TenantId,
        professional_id: ProfessionalId,
        date: Timestamp,
        exclude: Option<AppointmentId>,
    ) -> Result<bool, DomainError>;

    /// Non-canceled appointments inside the window with their total service
    /// durations, optionally restricted to one professional.
    async fn booked_slots(
        &self,
        tenant_id: TenantId,
        window: (Timestamp, Timestamp),
        professional_id: Option<ProfessionalId>,
    ) -> Result<Vec<BookedSlot>, DomainError>;

    /// Full scoped listing, ordered by date ascending.
    async fn list_asc(
        &self,
        tenant_id: TenantId,
        query: &AppointmentQuery,
    ) -> Result<Vec<Appointment>, DomainError>;

    /// One page of the scoped listing, most recent first.
    async fn list_page_desc(
        &self,
        tenant_id: TenantId,
        query: &AppointmentQuery,
        page: Page,
    ) -> Result<Vec<Appointment>, DomainError>;

    /// Total rows matching the query (for the pagination envelope).
    async fn count(&self, tenant_id: TenantId, query: &AppointmentQuery)
        -> Result<u64, DomainError>;

    /// Statuses of the given appointments, omitting unknown ids.
    async fn statuses(
        &self,
        tenant_id: TenantId,
        ids: &[AppointmentId],
    ) -> Result<Vec<(AppointmentId, AppointmentStatus)>, DomainError>;

    /// Deletes the given appointments, returning the number removed.
    async fn delete_many(
        &self,
        tenant_id: TenantId,
        ids: &[AppointmentId],
    ) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appointment_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn AppointmentRepository) {}
    }

    #[test]
    fn page_offset_is_zero_based() {
        assert_eq!(Page { page: 1, limit: 20 }.offset(), 0);
        assert_eq!(Page { page: 3, limit: 20 }.offset(), 40);
        assert_eq!(Page { page: 0, limit: 20 }.offset(), 0);
    }
}
