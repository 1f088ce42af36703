//! ProcessWebhookHandler - idempotent payment reconciliation.
//!
//! Gateway delivery is at-least-once: retries and duplicates are normal.
//! The handler fetches the authoritative payment from the gateway, confirms
//! the referenced appointment, and creates exactly one completed payment,
//! guarded by the existing-completed-payment check. That guard is the sole
//! deduplication mechanism and is correctness-critical, not an
//! optimization.
//!
//! Whatever happens inside, the webhook is acknowledged: the gateway must
//! never see a retriable error code, or duplicate deliveries turn into
//! retry storms.

use std::sync::Arc;

use crate::application::notifications::{enqueue_quietly, intents, AppointmentContext};
use crate::domain::billing::{
    GatewayWebhook, Payment, PaymentKind, PaymentMethod, WebhookKind,
};
use crate::domain::foundation::{DomainError, ErrorCode, TenantId};
use crate::domain::scheduling::AppointmentStatus;
use crate::ports::{
    AppointmentRepository, CatalogReader, GatewayPaymentStatus, NotificationOutbox,
    PaymentGateway, PaymentRepository, TenantConfigReader, UserDirectory,
};

/// Command carrying one webhook delivery.
#[derive(Debug, Clone)]
pub struct ProcessWebhookCommand {
    pub tenant_id: TenantId,
    pub body: GatewayWebhook,
}

/// Acknowledgment returned to the gateway; always 200 at the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookAck {
    /// Delivery acknowledged without processing (test ping, other topic).
    Received,

    /// A payment event was picked up (whether or not it changed anything).
    Ok,
}

impl WebhookAck {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookAck::Received => "received",
            WebhookAck::Ok => "ok",
        }
    }
}

/// Handler for inbound gateway webhooks.
pub struct ProcessWebhookHandler {
    appointments: Arc<dyn AppointmentRepository>,
    payments: Arc<dyn PaymentRepository>,
    catalog: Arc<dyn CatalogReader>,
    users: Arc<dyn UserDirectory>,
    tenant_config: Arc<dyn TenantConfigReader>,
    gateway: Arc<dyn PaymentGateway>,
    outbox: Arc<dyn NotificationOutbox>,
}

impl ProcessWebhookHandler {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        payments: Arc<dyn PaymentRepository>,
        catalog: Arc<dyn CatalogReader>,
        users: Arc<dyn UserDirectory>,
        tenant_config: Arc<dyn TenantConfigReader>,
        gateway: Arc<dyn PaymentGateway>,
        outbox: Arc<dyn NotificationOutbox>,
    ) -> Self {
        Self {
            appointments,
            payments,
            catalog,
            users,
            tenant_config,
            gateway,
            outbox,
        }
    }

    /// Processes one delivery. Never returns an error: internal failures
    /// are logged and the delivery is acknowledged regardless.
    pub async fn handle(&self, cmd: ProcessWebhookCommand) -> WebhookAck {
        let payment_id = match cmd.body.classify() {
            WebhookKind::Ignorable { reason } => {
                tracing::debug!(tenant_id = %cmd.tenant_id, reason, "Webhook ignored");
                return WebhookAck::Received;
            }
            WebhookKind::Payment { payment_id } => payment_id,
        };

        if let Err(e) = self.reconcile(cmd.tenant_id, &payment_id).await {
            tracing::error!(
                tenant_id = %cmd.tenant_id,
                gateway_payment_id = %payment_id,
                error = %e,
                "Webhook reconciliation failed; acknowledging anyway"
            );
        }
        WebhookAck::Ok
    }

    async fn reconcile(&self, tenant_id: TenantId, payment_id: &str) -> Result<(), DomainError> {
        // 1. Fetch the authoritative payment with the tenant's token.
        let config = self.tenant_config.config(tenant_id).await?;
        let token = config.gateway_access_token.as_ref().ok_or_else(|| {
            DomainError::invalid_request("Payment gateway is not configured for this tenant")
        })?;
        let gateway_payment = self.gateway.payment_status(token, payment_id).await?;

        if gateway_payment.status != GatewayPaymentStatus::Approved {
            tracing::info!(
                tenant_id = %tenant_id,
                gateway_payment_id = %payment_id,
                status = ?gateway_payment.status,
                "Payment not approved; nothing to reconcile"
            );
            return Ok(());
        }

        // 2. Correlate back to the appointment via external_reference.
        let reference = match &gateway_payment.external_reference {
            Some(reference) => reference.clone(),
            None => {
                tracing::warn!(
                    tenant_id = %tenant_id,
                    gateway_payment_id = %payment_id,
                    "Approved payment without external reference"
                );
                return Ok(());
            }
        };
        let appointment_id = reference.parse().map_err(|_| {
            DomainError::validation("external_reference", "Not an appointment id")
        })?;
        let appointment = self
            .appointments
            .find_by_id(tenant_id, appointment_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::AppointmentNotFound, "Appointment not found")
            })?;

        // 3. Confirm the booking. Terminal appointments keep their state;
        //    the payment guard below still runs.
        match appointment.status {
            AppointmentStatus::Pending => {
                self.appointments
                    .set_status(tenant_id, appointment.id, AppointmentStatus::Confirmed)
                    .await?;
            }
            AppointmentStatus::Confirmed => {}
            other => {
                tracing::warn!(
                    appointment_id = %appointment.id,
                    status = other.as_str(),
                    "Approved payment for a terminal appointment; status left as is"
                );
            }
        }

        // 4. Idempotency guard: exactly one completed payment per
        //    appointment, no matter how many deliveries arrive.
        let already_paid = self
            .payments
            .has_completed_for_appointment(tenant_id, appointment.id)
            .await?;
        if already_paid {
            tracing::info!(
                appointment_id = %appointment.id,
                gateway_payment_id = %payment_id,
                "Completed payment already recorded; duplicate delivery dropped"
            );
            return Ok(());
        }

        let payment = Payment::completed(
            tenant_id,
            appointment.user_id,
            gateway_payment.amount_cents,
            PaymentMethod::Online,
            PaymentKind::Appointment,
            Some(appointment.id),
            None,
        );
        self.payments.insert(&payment).await?;

        tracing::info!(
            tenant_id = %tenant_id,
            appointment_id = %appointment.id,
            payment_id = %payment.id,
            amount_cents = payment.amount_cents,
            "Online payment reconciled"
        );

        // 5. Full confirmation set: client chat + email, professional email.
        let client = self
            .users
            .user(tenant_id, appointment.user_id)
            .await
            .unwrap_or(None);
        let professional = match appointment.professional_id {
            Some(id) => self.catalog.professional(tenant_id, id).await.unwrap_or(None),
            None => None,
        };
        let services = self
            .catalog
            .services(tenant_id, &appointment.service_ids)
            .await
            .unwrap_or_default();
        let mut appointment = appointment;
        if appointment.status == AppointmentStatus::Pending {
            appointment.status = AppointmentStatus::Confirmed;
        }
        let intents = intents::booking_confirmed(&AppointmentContext {
            appointment: &appointment,
            client: client.as_ref(),
            professional: professional.as_ref(),
            services: &services,
        });
        enqueue_quietly(self.outbox.as_ref(), intents).await;

        Ok(())
    }
}
