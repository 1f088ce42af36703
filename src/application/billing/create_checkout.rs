//! CreateCheckoutHandler - hosted checkout session for an online booking.
//!
//! Builds the session at the external gateway using the tenant's stored
//! access token, itemizing the appointment's services and tagging the
//! session with the appointment id as `external_reference` so the webhook
//! can correlate the payment back to the booking.

use std::sync::Arc;

use crate::domain::foundation::{AppointmentId, DomainError, TenantId};
use crate::ports::{
    AppointmentRepository, CatalogReader, CheckoutItem, CheckoutSession, CreateCheckoutRequest,
    PaymentGateway, TenantConfigReader, UserDirectory,
};

/// Command to create a checkout session for an appointment.
#[derive(Debug, Clone)]
pub struct CreateCheckoutCommand {
    pub tenant_id: TenantId,
    pub appointment_id: AppointmentId,
}

/// Handler for checkout session creation.
pub struct CreateCheckoutHandler {
    appointments: Arc<dyn AppointmentRepository>,
    catalog: Arc<dyn CatalogReader>,
    users: Arc<dyn UserDirectory>,
    tenant_config: Arc<dyn TenantConfigReader>,
    gateway: Arc<dyn PaymentGateway>,

    /// Public base URL of this service, used for the webhook callback.
    public_url: String,

    /// Gateway slug in the webhook path (`/payments/webhook/{slug}`).
    gateway_slug: String,
}

impl CreateCheckoutHandler {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        catalog: Arc<dyn CatalogReader>,
        users: Arc<dyn UserDirectory>,
        tenant_config: Arc<dyn TenantConfigReader>,
        gateway: Arc<dyn PaymentGateway>,
        public_url: impl Into<String>,
        gateway_slug: impl Into<String>,
    ) -> Self {
        Self {
            appointments,
            catalog,
            users,
            tenant_config,
            gateway,
            public_url: public_url.into(),
            gateway_slug: gateway_slug.into(),
        }
    }

    pub async fn handle(&self, cmd: CreateCheckoutCommand) -> Result<CheckoutSession, DomainError> {
        // 1. The tenant must have a gateway token on file.
        let config = self.tenant_config.config(cmd.tenant_id).await?;
        let token = config.gateway_access_token.as_ref().ok_or_else(|| {
            DomainError::invalid_request("Payment gateway is not configured for this tenant")
        })?;

        // 2. The appointment must exist.
        let appointment = self
            .appointments
            .find_by_id(cmd.tenant_id, cmd.appointment_id)
            .await?
            .ok_or_else(|| DomainError::invalid_request("Appointment does not exist"))?;

        // 3. Itemize its services.
        let services = self
            .catalog
            .services(cmd.tenant_id, &appointment.service_ids)
            .await?;
        if services.is_empty() {
            return Err(DomainError::invalid_request(
                "Appointment has no services to charge",
            ));
        }
        let items: Vec<CheckoutItem> = services
            .iter()
            .map(|s| CheckoutItem {
                title: s.name.clone(),
                quantity: 1,
                unit_price_cents: s.price_cents,
            })
            .collect();

        let payer_email = self
            .users
            .user(cmd.tenant_id, appointment.user_id)
            .await?
            .and_then(|u| u.email);

        // 4. Tenant-scoped callback URL; the gateway echoes external_reference
        //    back on webhook delivery.
        let notification_url = format!(
            "{}/payments/webhook/{}?tenantId={}",
            self.public_url.trim_end_matches('/'),
            self.gateway_slug,
            cmd.tenant_id
        );

        let session = self
            .gateway
            .create_checkout_session(
                token,
                CreateCheckoutRequest {
                    items,
                    payer_email,
                    external_reference: appointment.id.to_string(),
                    notification_url,
                },
            )
            .await?;

        tracing::info!(
            tenant_id = %cmd.tenant_id,
            appointment_id = %appointment.id,
            "Checkout session created"
        );
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryAppointments, InMemoryCatalog, InMemoryTenantConfig, MockGateway,
    };
    use crate::domain::billing::PaymentMethod;
    use crate::domain::foundation::{ErrorCode, ServiceId, Timestamp, UserId};
    use crate::domain::scheduling::{Appointment, Service};
    use crate::ports::AppointmentRepository as _;

    struct Fixture {
        handler: CreateCheckoutHandler,
        appointments: Arc<InMemoryAppointments>,
        catalog: Arc<InMemoryCatalog>,
        gateway: Arc<MockGateway>,
    }

    fn fixture(config: InMemoryTenantConfig) -> Fixture {
        let appointments = Arc::new(InMemoryAppointments::new());
        let catalog = Arc::new(InMemoryCatalog::new());
        let gateway = Arc::new(MockGateway::new());
        let handler = CreateCheckoutHandler::new(
            appointments.clone(),
            catalog.clone(),
            catalog.clone(),
            Arc::new(config),
            gateway.clone(),
            "https://api.agendly.test",
            "checkout",
        );
        Fixture {
            handler,
            appointments,
            catalog,
            gateway,
        }
    }

    async fn seed_appointment(f: &Fixture, tenant_id: TenantId) -> Appointment {
        let service = Service {
            id: ServiceId::new(),
            tenant_id,
            name: "Consultation".to_string(),
            duration_minutes: 30,
            price_cents: 5000,
        };
        f.catalog.add_service(service.clone());
        let appointment = Appointment::new(
            tenant_id,
            UserId::new(),
            None,
            None,
            Timestamp::now(),
            PaymentMethod::Online,
            vec![service.id],
        );
        f.appointments.insert(&appointment).await.unwrap();
        appointment
    }

    #[tokio::test]
    async fn builds_session_with_reference_and_callback() {
        let tenant_id = TenantId::new();
        let f = fixture(InMemoryTenantConfig::configured(tenant_id));
        let appointment = seed_appointment(&f, tenant_id).await;

        let session = f
            .handler
            .handle(CreateCheckoutCommand {
                tenant_id,
                appointment_id: appointment.id,
            })
            .await
            .unwrap();

        assert!(session.checkout_url.contains(&appointment.id.to_string()));

        let requests = f.gateway.checkout_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].external_reference, appointment.id.to_string());
        assert_eq!(requests[0].items.len(), 1);
        assert_eq!(requests[0].items[0].unit_price_cents, 5000);
        assert_eq!(
            requests[0].notification_url,
            format!(
                "https://api.agendly.test/payments/webhook/checkout?tenantId={}",
                tenant_id
            )
        );
    }

    #[tokio::test]
    async fn missing_gateway_token_is_rejected() {
        let tenant_id = TenantId::new();
        // email_only config has no gateway token.
        let f = fixture(InMemoryTenantConfig::email_only(tenant_id));
        let appointment = seed_appointment(&f, tenant_id).await;

        let err = f
            .handler
            .handle(CreateCheckoutCommand {
                tenant_id,
                appointment_id: appointment.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn missing_appointment_is_rejected() {
        let tenant_id = TenantId::new();
        let f = fixture(InMemoryTenantConfig::configured(tenant_id));

        let err = f
            .handler
            .handle(CreateCheckoutCommand {
                tenant_id,
                appointment_id: AppointmentId::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }
}
