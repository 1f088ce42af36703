//! Payment repository port.
//!
//! `has_completed_for_appointment` is the webhook idempotency guard: the
//! reconciliation handler creates a payment only when no completed payment
//! is already linked to the appointment.

use async_trait::async_trait;

use crate::domain::billing::Payment;
use crate::domain::foundation::{AppointmentId, DomainError, TenantId};

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn insert(&self, payment: &Payment) -> Result<(), DomainError>;

    /// True when a `Completed` payment is already linked to the appointment.
    async fn has_completed_for_appointment(
        &self,
        tenant_id: TenantId,
        appointment_id: AppointmentId,
    ) -> Result<bool, DomainError>;

    /// Removes payments linked to the given appointments (bulk delete
    /// support), returning the number removed.
    async fn delete_for_appointments(
        &self,
        tenant_id: TenantId,
        appointment_ids: &[AppointmentId],
    ) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn PaymentRepository) {}
    }
}
