//! UpdateStatusHandler - validated lifecycle transitions.
//!
//! Authorization first, then the state machine, then persistence, then
//! best-effort notifications. Clients can only cancel their own bookings;
//! staff act within their professional's agenda.

use std::sync::Arc;

use crate::application::notifications::{enqueue_quietly, intents, AppointmentContext};
use crate::domain::foundation::{
    AppointmentId, DomainError, ErrorCode, Requester, TenantId,
};
use crate::domain::foundation::StateMachine;
use crate::domain::scheduling::{authorize, Appointment, AppointmentAction, AppointmentStatus};
use crate::ports::{AppointmentRepository, CatalogReader, NotificationOutbox, UserDirectory};

/// Command to transition an appointment's status.
#[derive(Debug, Clone)]
pub struct UpdateStatusCommand {
    pub tenant_id: TenantId,
    pub appointment_id: AppointmentId,
    pub new_status: AppointmentStatus,
    pub requester: Requester,
}

/// Handler for status transitions.
pub struct UpdateStatusHandler {
    appointments: Arc<dyn AppointmentRepository>,
    catalog: Arc<dyn CatalogReader>,
    users: Arc<dyn UserDirectory>,
    outbox: Arc<dyn NotificationOutbox>,
}

impl UpdateStatusHandler {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        catalog: Arc<dyn CatalogReader>,
        users: Arc<dyn UserDirectory>,
        outbox: Arc<dyn NotificationOutbox>,
    ) -> Self {
        Self {
            appointments,
            catalog,
            users,
            outbox,
        }
    }

    pub async fn handle(&self, cmd: UpdateStatusCommand) -> Result<Appointment, DomainError> {
        // 1. Load the target.
        let mut appointment = self
            .appointments
            .find_by_id(cmd.tenant_id, cmd.appointment_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::AppointmentNotFound, "Appointment not found")
            })?;

        // 2. Authorization.
        let professional = match appointment.professional_id {
            Some(id) => self.catalog.professional(cmd.tenant_id, id).await?,
            None => None,
        };
        authorize(
            &cmd.requester,
            AppointmentAction::Transition(cmd.new_status),
            &appointment,
            professional.as_ref().and_then(|p| p.email.as_deref()),
        )?;

        // 3. Validate against the transition table.
        let new_status = appointment
            .status
            .transition_to(cmd.new_status)
            .map_err(|e| DomainError::new(ErrorCode::InvalidStateTransition, e.to_string()))?;

        // 4. Persist.
        self.appointments
            .set_status(cmd.tenant_id, appointment.id, new_status)
            .await?;
        appointment.status = new_status;

        tracing::info!(
            tenant_id = %cmd.tenant_id,
            appointment_id = %appointment.id,
            status = new_status.as_str(),
            "Appointment status updated"
        );

        // 5. Status-specific notifications, best effort.
        let client = self
            .users
            .user(cmd.tenant_id, appointment.user_id)
            .await
            .unwrap_or(None);
        let services = self
            .catalog
            .services(cmd.tenant_id, &appointment.service_ids)
            .await
            .unwrap_or_default();
        let intents = intents::status_changed(
            &AppointmentContext {
                appointment: &appointment,
                client: client.as_ref(),
                professional: professional.as_ref(),
                services: &services,
            },
            new_status,
        );
        enqueue_quietly(self.outbox.as_ref(), intents).await;

        Ok(appointment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryAppointments, InMemoryCatalog, InMemoryOutbox};
    use crate::domain::billing::PaymentMethod;
    use crate::domain::foundation::{ProfessionalId, Timestamp, UserId};
    use crate::domain::notifications::NotificationChannel;
    use crate::domain::scheduling::{Professional, UserAccount};
    use crate::ports::AppointmentRepository as _;

    struct Fixture {
        handler: UpdateStatusHandler,
        appointments: Arc<InMemoryAppointments>,
        catalog: Arc<InMemoryCatalog>,
        outbox: Arc<InMemoryOutbox>,
    }

    fn fixture() -> Fixture {
        let appointments = Arc::new(InMemoryAppointments::new());
        let catalog = Arc::new(InMemoryCatalog::new());
        let outbox = Arc::new(InMemoryOutbox::new());
        let handler = UpdateStatusHandler::new(
            appointments.clone(),
            catalog.clone(),
            catalog.clone(),
            outbox.clone(),
        );
        Fixture {
            handler,
            appointments,
            catalog,
            outbox,
        }
    }

    async fn seed(
        f: &Fixture,
        tenant_id: TenantId,
        user_id: UserId,
        method: PaymentMethod,
    ) -> Appointment {
        let appointment = Appointment::new(
            tenant_id,
            user_id,
            None,
            None,
            Timestamp::now(),
            method,
            vec![],
        );
        f.appointments.insert(&appointment).await.unwrap();
        appointment
    }

    #[tokio::test]
    async fn client_cancels_their_own_booking() {
        let f = fixture();
        let tenant_id = TenantId::new();
        let user_id = UserId::new();
        let appointment = seed(&f, tenant_id, user_id, PaymentMethod::Cash).await;

        let updated = f
            .handler
            .handle(UpdateStatusCommand {
                tenant_id,
                appointment_id: appointment.id,
                new_status: AppointmentStatus::Canceled,
                requester: Requester::client(user_id),
            })
            .await
            .unwrap();

        assert_eq!(updated.status, AppointmentStatus::Canceled);
        assert_eq!(
            f.appointments.get(appointment.id).unwrap().status,
            AppointmentStatus::Canceled
        );
    }

    #[tokio::test]
    async fn client_cannot_complete_or_cancel_for_others() {
        let f = fixture();
        let tenant_id = TenantId::new();
        let user_id = UserId::new();
        let appointment = seed(&f, tenant_id, user_id, PaymentMethod::Cash).await;

        let err = f
            .handler
            .handle(UpdateStatusCommand {
                tenant_id,
                appointment_id: appointment.id,
                new_status: AppointmentStatus::Completed,
                requester: Requester::client(user_id),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let err = f
            .handler
            .handle(UpdateStatusCommand {
                tenant_id,
                appointment_id: appointment.id,
                new_status: AppointmentStatus::Canceled,
                requester: Requester::client(UserId::new()),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn terminal_states_reject_further_transitions() {
        let f = fixture();
        let tenant_id = TenantId::new();
        let appointment = seed(&f, tenant_id, UserId::new(), PaymentMethod::Cash).await;
        let requester = Requester::admin(UserId::new());

        f.handler
            .handle(UpdateStatusCommand {
                tenant_id,
                appointment_id: appointment.id,
                new_status: AppointmentStatus::Completed,
                requester: requester.clone(),
            })
            .await
            .unwrap();

        let err = f
            .handler
            .handle(UpdateStatusCommand {
                tenant_id,
                appointment_id: appointment.id,
                new_status: AppointmentStatus::Canceled,
                requester,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[tokio::test]
    async fn cancellation_notifies_client_and_professional() {
        let f = fixture();
        let tenant_id = TenantId::new();
        let user_id = UserId::new();
        let professional = Professional {
            id: ProfessionalId::new(),
            tenant_id,
            name: "Dr. Silva".to_string(),
            email: Some("silva@clinic.com".to_string()),
        };
        f.catalog.add_professional(professional.clone());
        f.catalog.add_user(UserAccount {
            id: user_id,
            tenant_id,
            name: "Ana".to_string(),
            email: Some("ana@example.com".to_string()),
            chat_subscriber_id: Some("sub-1".to_string()),
        });

        let appointment = Appointment::new(
            tenant_id,
            user_id,
            Some(professional.id),
            None,
            Timestamp::now(),
            PaymentMethod::Cash,
            vec![],
        );
        f.appointments.insert(&appointment).await.unwrap();

        f.handler
            .handle(UpdateStatusCommand {
                tenant_id,
                appointment_id: appointment.id,
                new_status: AppointmentStatus::Canceled,
                requester: Requester::admin(UserId::new()),
            })
            .await
            .unwrap();

        let intents = f.outbox.all();
        assert_eq!(intents.len(), 3);
        assert!(intents
            .iter()
            .any(|i| i.channel == NotificationChannel::Chat && i.recipient == "sub-1"));
        assert!(intents
            .iter()
            .any(|i| i.channel == NotificationChannel::Email
                && i.recipient == "silva@clinic.com"));
    }

    #[tokio::test]
    async fn completion_is_silent() {
        let f = fixture();
        let tenant_id = TenantId::new();
        let appointment = seed(&f, tenant_id, UserId::new(), PaymentMethod::Cash).await;

        f.handler
            .handle(UpdateStatusCommand {
                tenant_id,
                appointment_id: appointment.id,
                new_status: AppointmentStatus::Completed,
                requester: Requester::service(),
            })
            .await
            .unwrap();

        assert!(f.outbox.all().is_empty());
    }
}
