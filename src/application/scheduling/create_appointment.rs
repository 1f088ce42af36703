//! CreateAppointmentHandler - books a slot.
//!
//! The availability probe and the insert are distinct operations; the
//! persistence constraint on `(tenant, professional, date)` is what finally
//! rejects a concurrent double booking, surfacing the same conflict error
//! as the probe.

use std::sync::Arc;

use crate::application::billing::{CreatePaymentCommand, CreatePaymentHandler};
use crate::application::notifications::{enqueue_quietly, intents, AppointmentContext};
use crate::domain::billing::PaymentMethod;
use crate::domain::foundation::{
    DomainError, LocationId, ProfessionalId, ServiceId, TenantId, Timestamp, UserId,
};
use crate::domain::scheduling::Appointment;
use crate::ports::{AppointmentRepository, CatalogReader, NotificationOutbox, UserDirectory};

/// Command to create an appointment.
#[derive(Debug, Clone)]
pub struct CreateAppointmentCommand {
    pub tenant_id: TenantId,
    pub user_id: UserId,
    pub professional_id: Option<ProfessionalId>,
    pub location_id: Option<LocationId>,
    pub date: Timestamp,
    pub payment_method: PaymentMethod,
    pub service_ids: Vec<ServiceId>,
}

/// Handler for appointment creation.
pub struct CreateAppointmentHandler {
    appointments: Arc<dyn AppointmentRepository>,
    catalog: Arc<dyn CatalogReader>,
    users: Arc<dyn UserDirectory>,
    outbox: Arc<dyn NotificationOutbox>,
    payments: CreatePaymentHandler,
}

impl CreateAppointmentHandler {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        catalog: Arc<dyn CatalogReader>,
        users: Arc<dyn UserDirectory>,
        outbox: Arc<dyn NotificationOutbox>,
        payments: CreatePaymentHandler,
    ) -> Self {
        Self {
            appointments,
            catalog,
            users,
            outbox,
            payments,
        }
    }

    pub async fn handle(&self, cmd: CreateAppointmentCommand) -> Result<Appointment, DomainError> {
        // 1. Exact-instant collision probe for assigned bookings.
        if let Some(professional_id) = cmd.professional_id {
            let taken = self
                .appointments
                .exists_active_at(cmd.tenant_id, professional_id, cmd.date, None)
                .await?;
            if taken {
                return Err(DomainError::conflict(
                    "Professional already booked at this time",
                )
                .with_detail("professional_id", professional_id.to_string())
                .with_detail("date", cmd.date.to_string()));
            }
        }

        // 2. Persist. The slot constraint closes the probe/insert race.
        let appointment = Appointment::new(
            cmd.tenant_id,
            cmd.user_id,
            cmd.professional_id,
            cmd.location_id,
            cmd.date,
            cmd.payment_method,
            cmd.service_ids.clone(),
        );
        self.appointments.insert(&appointment).await?;

        tracing::info!(
            tenant_id = %cmd.tenant_id,
            appointment_id = %appointment.id,
            status = appointment.status.as_str(),
            "Appointment created"
        );

        // 3. Plan credit settles synchronously; a failure is logged and the
        //    booking stands.
        if cmd.payment_method == PaymentMethod::PlanCredit {
            let result = self
                .payments
                .handle(CreatePaymentCommand {
                    tenant_id: cmd.tenant_id,
                    user_id: cmd.user_id,
                    amount_cents: 0,
                    method: PaymentMethod::PlanCredit,
                    appointment_id: Some(appointment.id),
                    subscription_id: None,
                })
                .await;
            if let Err(e) = result {
                tracing::warn!(
                    appointment_id = %appointment.id,
                    error = %e,
                    "Plan-credit payment failed; booking kept"
                );
            }
        }

        // 4. Non-online bookings are confirmed now: notify client and
        //    professional.
        if !cmd.payment_method.is_deferred() {
            self.enqueue_confirmation(&appointment).await;
        }

        Ok(appointment)
    }

    async fn enqueue_confirmation(&self, appointment: &Appointment) {
        let client = match self
            .users
            .user(appointment.tenant_id, appointment.user_id)
            .await
        {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping confirmation notifications");
                return;
            }
        };
        let professional = match appointment.professional_id {
            Some(id) => self
                .catalog
                .professional(appointment.tenant_id, id)
                .await
                .unwrap_or(None),
            None => None,
        };
        let services = self
            .catalog
            .services(appointment.tenant_id, &appointment.service_ids)
            .await
            .unwrap_or_default();

        let intents = intents::booking_confirmed(&AppointmentContext {
            appointment,
            client: client.as_ref(),
            professional: professional.as_ref(),
            services: &services,
        });
        enqueue_quietly(self.outbox.as_ref(), intents).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryAppointments, InMemoryCatalog, InMemoryOutbox, InMemoryPayments,
        InMemorySubscriptions,
    };
    use crate::domain::foundation::ErrorCode;
    use crate::domain::scheduling::{AppointmentStatus, Professional, UserAccount};
    use chrono::{NaiveDate, NaiveTime};

    struct Fixture {
        handler: CreateAppointmentHandler,
        appointments: Arc<InMemoryAppointments>,
        payments: Arc<InMemoryPayments>,
        subscriptions: Arc<InMemorySubscriptions>,
        outbox: Arc<InMemoryOutbox>,
        catalog: Arc<InMemoryCatalog>,
    }

    fn fixture() -> Fixture {
        let appointments = Arc::new(InMemoryAppointments::new());
        let payments = Arc::new(InMemoryPayments::new());
        let subscriptions = Arc::new(InMemorySubscriptions::new());
        let catalog = Arc::new(InMemoryCatalog::new());
        let outbox = Arc::new(InMemoryOutbox::new());

        let payment_handler = CreatePaymentHandler::new(
            payments.clone(),
            subscriptions.clone(),
            catalog.clone(),
            catalog.clone(),
            outbox.clone(),
        );
        let handler = CreateAppointmentHandler::new(
            appointments.clone(),
            catalog.clone(),
            catalog.clone(),
            outbox.clone(),
            payment_handler,
        );
        Fixture {
            handler,
            appointments,
            payments,
            subscriptions,
            outbox,
            catalog,
        }
    }

    fn at(h: u32, m: u32) -> Timestamp {
        Timestamp::from_date_time(
            NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            NaiveTime::from_hms_opt(h, m, 0).unwrap(),
        )
    }

    fn command(tenant_id: TenantId, professional_id: Option<ProfessionalId>) -> CreateAppointmentCommand {
        CreateAppointmentCommand {
            tenant_id,
            user_id: UserId::new(),
            professional_id,
            location_id: None,
            date: at(10, 0),
            payment_method: PaymentMethod::Cash,
            service_ids: vec![],
        }
    }

    #[tokio::test]
    async fn second_booking_for_same_professional_instant_conflicts() {
        let f = fixture();
        let tenant_id = TenantId::new();
        let professional_id = ProfessionalId::new();

        f.handler
            .handle(command(tenant_id, Some(professional_id)))
            .await
            .unwrap();

        let err = f
            .handler
            .handle(command(tenant_id, Some(professional_id)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SchedulingConflict);
    }

    #[tokio::test]
    async fn unassigned_bookings_never_conflict() {
        let f = fixture();
        let tenant_id = TenantId::new();

        f.handler.handle(command(tenant_id, None)).await.unwrap();
        f.handler.handle(command(tenant_id, None)).await.unwrap();
    }

    #[tokio::test]
    async fn online_booking_stays_pending_and_silent() {
        let f = fixture();
        let tenant_id = TenantId::new();
        let mut cmd = command(tenant_id, None);
        cmd.payment_method = PaymentMethod::Online;

        let appointment = f.handler.handle(cmd).await.unwrap();

        assert_eq!(appointment.status, AppointmentStatus::Pending);
        assert!(f.outbox.all().is_empty());
    }

    #[tokio::test]
    async fn cash_booking_confirms_and_notifies_all_parties() {
        let f = fixture();
        let tenant_id = TenantId::new();
        let professional = Professional {
            id: ProfessionalId::new(),
            tenant_id,
            name: "Dr. Silva".to_string(),
            email: Some("silva@clinic.com".to_string()),
        };
        f.catalog.add_professional(professional.clone());

        let mut cmd = command(tenant_id, Some(professional.id));
        f.catalog.add_user(UserAccount {
            id: cmd.user_id,
            tenant_id,
            name: "Ana".to_string(),
            email: Some("ana@example.com".to_string()),
            chat_subscriber_id: Some("sub-1".to_string()),
        });
        cmd.payment_method = PaymentMethod::Cash;

        let appointment = f.handler.handle(cmd).await.unwrap();

        assert_eq!(appointment.status, AppointmentStatus::Confirmed);
        // Client chat + client email + professional admin email.
        assert_eq!(f.outbox.all().len(), 3);
    }

    #[tokio::test]
    async fn plan_credit_failure_keeps_the_booking() {
        let f = fixture();
        let tenant_id = TenantId::new();
        // No subscription exists, so the plan-credit payment fails.
        let mut cmd = command(tenant_id, None);
        cmd.payment_method = PaymentMethod::PlanCredit;

        let appointment = f.handler.handle(cmd).await.unwrap();

        assert_eq!(appointment.status, AppointmentStatus::Confirmed);
        assert!(f.appointments.get(appointment.id).is_some());
        assert!(f.payments.all().is_empty());
        let _ = &f.subscriptions;
    }
}
