//! DeleteAppointmentsHandler - admin bulk deletion.
//!
//! All-or-nothing at the validation level: one completed appointment in the
//! batch rejects the whole call before any row is touched. Linked payments
//! go first, then the appointments.

use std::sync::Arc;

use crate::domain::foundation::{AppointmentId, DomainError, Requester, TenantId};
use crate::domain::scheduling::{authorize_delete_batch, AppointmentStatus};
use crate::ports::{AppointmentRepository, PaymentRepository};

/// Command to delete a batch of appointments.
#[derive(Debug, Clone)]
pub struct DeleteAppointmentsCommand {
    pub tenant_id: TenantId,
    pub appointment_ids: Vec<AppointmentId>,
    pub requester: Requester,
}

/// Handler for bulk deletion.
pub struct DeleteAppointmentsHandler {
    appointments: Arc<dyn AppointmentRepository>,
    payments: Arc<dyn PaymentRepository>,
}

impl DeleteAppointmentsHandler {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        payments: Arc<dyn PaymentRepository>,
    ) -> Self {
        Self {
            appointments,
            payments,
        }
    }

    /// Returns the number of appointments deleted.
    pub async fn handle(&self, cmd: DeleteAppointmentsCommand) -> Result<u64, DomainError> {
        // 1. Admin-only, checked before anything is read.
        authorize_delete_batch(&cmd.requester)?;

        if cmd.appointment_ids.is_empty() {
            return Ok(0);
        }

        // 2. A completed appointment anywhere in the batch rejects it whole.
        let statuses = self
            .appointments
            .statuses(cmd.tenant_id, &cmd.appointment_ids)
            .await?;
        if let Some((id, _)) = statuses
            .iter()
            .find(|(_, status)| *status == AppointmentStatus::Completed)
        {
            return Err(DomainError::invalid_request(
                "Completed appointments cannot be deleted",
            )
            .with_detail("appointment_id", id.to_string()));
        }

        // 3. Payments first, then the appointments.
        self.payments
            .delete_for_appointments(cmd.tenant_id, &cmd.appointment_ids)
            .await?;
        let deleted = self
            .appointments
            .delete_many(cmd.tenant_id, &cmd.appointment_ids)
            .await?;

        tracing::info!(
            tenant_id = %cmd.tenant_id,
            deleted,
            "Appointments deleted"
        );
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryAppointments, InMemoryPayments};
    use crate::domain::billing::{Payment, PaymentKind, PaymentMethod};
    use crate::domain::foundation::{ErrorCode, Timestamp, UserId};
    use crate::domain::scheduling::Appointment;
    use crate::ports::AppointmentRepository as _;
    use crate::ports::PaymentRepository as _;

    async fn seed_with_status(
        repo: &InMemoryAppointments,
        tenant_id: TenantId,
        status: AppointmentStatus,
    ) -> Appointment {
        let appointment = Appointment::new(
            tenant_id,
            UserId::new(),
            None,
            None,
            Timestamp::now(),
            PaymentMethod::Cash,
            vec![],
        );
        repo.insert(&appointment).await.unwrap();
        repo.set_status(tenant_id, appointment.id, status)
            .await
            .unwrap();
        repo.get(appointment.id).unwrap()
    }

    #[tokio::test]
    async fn batch_with_completed_member_fails_and_deletes_nothing() {
        let appointments = Arc::new(InMemoryAppointments::new());
        let payments = Arc::new(InMemoryPayments::new());
        let tenant_id = TenantId::new();

        let mut ids = Vec::new();
        for _ in 0..3 {
            ids.push(
                seed_with_status(&appointments, tenant_id, AppointmentStatus::Pending)
                    .await
                    .id,
            );
        }
        let completed =
            seed_with_status(&appointments, tenant_id, AppointmentStatus::Completed).await;
        ids.push(completed.id);

        let handler = DeleteAppointmentsHandler::new(appointments.clone(), payments);
        let err = handler
            .handle(DeleteAppointmentsCommand {
                tenant_id,
                appointment_ids: ids.clone(),
                requester: Requester::admin(UserId::new()),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidRequest);
        // Zero rows deleted.
        for id in ids {
            assert!(appointments.get(id).is_some());
        }
    }

    #[tokio::test]
    async fn deletes_payments_then_appointments() {
        let appointments = Arc::new(InMemoryAppointments::new());
        let payments = Arc::new(InMemoryPayments::new());
        let tenant_id = TenantId::new();

        let appointment =
            seed_with_status(&appointments, tenant_id, AppointmentStatus::Canceled).await;
        payments
            .insert(&Payment::completed(
                tenant_id,
                appointment.user_id,
                1000,
                PaymentMethod::Cash,
                PaymentKind::Appointment,
                Some(appointment.id),
                None,
            ))
            .await
            .unwrap();

        let handler = DeleteAppointmentsHandler::new(appointments.clone(), payments.clone());
        let deleted = handler
            .handle(DeleteAppointmentsCommand {
                tenant_id,
                appointment_ids: vec![appointment.id],
                requester: Requester::admin(UserId::new()),
            })
            .await
            .unwrap();

        assert_eq!(deleted, 1);
        assert!(appointments.get(appointment.id).is_none());
        assert!(payments.all().is_empty());
    }

    #[tokio::test]
    async fn non_admin_is_forbidden() {
        let appointments = Arc::new(InMemoryAppointments::new());
        let payments = Arc::new(InMemoryPayments::new());
        let handler = DeleteAppointmentsHandler::new(appointments, payments);

        for requester in [
            Requester::client(UserId::new()),
            Requester::staff(UserId::new(), "s@x.com"),
        ] {
            let err = handler
                .handle(DeleteAppointmentsCommand {
                    tenant_id: TenantId::new(),
                    appointment_ids: vec![AppointmentId::new()],
                    requester,
                })
                .await
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::Forbidden);
        }
    }
}
