//! Checkout-to-webhook reconciliation flow over the in-memory adapters.

use std::sync::Arc;

use agendly::adapters::memory::{
    InMemoryAppointments, InMemoryCatalog, InMemoryOutbox, InMemoryPayments,
    InMemoryTenantConfig, MockGateway,
};
use agendly::application::billing::{
    CreateCheckoutCommand, CreateCheckoutHandler, ProcessWebhookCommand, ProcessWebhookHandler,
    WebhookAck,
};
use agendly::domain::billing::{GatewayWebhook, PaymentMethod, PaymentStatus};
use agendly::domain::foundation::{ServiceId, TenantId, Timestamp, UserId};
use agendly::domain::scheduling::{Appointment, AppointmentStatus, Service, UserAccount};
use agendly::ports::AppointmentRepository as _;

struct World {
    tenant_id: TenantId,
    appointments: Arc<InMemoryAppointments>,
    payments: Arc<InMemoryPayments>,
    catalog: Arc<InMemoryCatalog>,
    gateway: Arc<MockGateway>,
    outbox: Arc<InMemoryOutbox>,
    checkout: CreateCheckoutHandler,
    webhook: ProcessWebhookHandler,
}

fn world() -> World {
    let tenant_id = TenantId::new();
    let appointments = Arc::new(InMemoryAppointments::new());
    let payments = Arc::new(InMemoryPayments::new());
    let catalog = Arc::new(InMemoryCatalog::new());
    let gateway = Arc::new(MockGateway::new());
    let outbox = Arc::new(InMemoryOutbox::new());
    let tenant_config = Arc::new(InMemoryTenantConfig::configured(tenant_id));

    let checkout = CreateCheckoutHandler::new(
        appointments.clone(),
        catalog.clone(),
        catalog.clone(),
        tenant_config.clone(),
        gateway.clone(),
        "https://api.agendly.test",
        "checkout",
    );
    let webhook = ProcessWebhookHandler::new(
        appointments.clone(),
        payments.clone(),
        catalog.clone(),
        catalog.clone(),
        tenant_config,
        gateway.clone(),
        outbox.clone(),
    );

    World {
        tenant_id,
        appointments,
        payments,
        catalog,
        gateway,
        outbox,
        checkout,
        webhook,
    }
}

async fn seed_online_booking(w: &World) -> Appointment {
    let user_id = UserId::new();
    w.catalog.add_user(UserAccount {
        id: user_id,
        tenant_id: w.tenant_id,
        name: "Ana".to_string(),
        email: Some("ana@example.com".to_string()),
        chat_subscriber_id: Some("sub-ana".to_string()),
    });
    let service = Service {
        id: ServiceId::new(),
        tenant_id: w.tenant_id,
        name: "Consultation".to_string(),
        duration_minutes: 30,
        price_cents: 5000,
    };
    w.catalog.add_service(service.clone());

    let appointment = Appointment::new(
        w.tenant_id,
        user_id,
        None,
        None,
        Timestamp::now(),
        PaymentMethod::Online,
        vec![service.id],
    );
    w.appointments.insert(&appointment).await.unwrap();
    appointment
}

fn payment_webhook(payment_id: &str) -> GatewayWebhook {
    serde_json::from_value(serde_json::json!({
        "type": "payment",
        "data": { "id": payment_id }
    }))
    .unwrap()
}

#[tokio::test]
async fn checkout_then_webhook_confirms_the_booking() {
    let w = world();
    let appointment = seed_online_booking(&w).await;
    assert_eq!(appointment.status, AppointmentStatus::Pending);

    // 1. Hosted checkout session tagged with the appointment id.
    let session = w
        .checkout
        .handle(CreateCheckoutCommand {
            tenant_id: w.tenant_id,
            appointment_id: appointment.id,
        })
        .await
        .unwrap();
    assert!(!session.checkout_url.is_empty());

    // 2. The gateway approves and calls back.
    w.gateway
        .approve_payment("gw-pay-1", 5000, &appointment.id.to_string());
    let ack = w
        .webhook
        .handle(ProcessWebhookCommand {
            tenant_id: w.tenant_id,
            body: payment_webhook("gw-pay-1"),
        })
        .await;
    assert_eq!(ack, WebhookAck::Ok);

    // 3. Booking confirmed, exactly one completed payment, notifications
    //    queued for client and (none here) professional.
    assert_eq!(
        w.appointments.get(appointment.id).unwrap().status,
        AppointmentStatus::Confirmed
    );
    let payments = w.payments.all();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].status, PaymentStatus::Completed);
    assert_eq!(payments[0].amount_cents, 5000);
    assert!(!w.outbox.all().is_empty());
}

#[tokio::test]
async fn replayed_webhook_is_idempotent() {
    let w = world();
    let appointment = seed_online_booking(&w).await;
    w.gateway
        .approve_payment("gw-pay-1", 5000, &appointment.id.to_string());

    for _ in 0..5 {
        let ack = w
            .webhook
            .handle(ProcessWebhookCommand {
                tenant_id: w.tenant_id,
                body: payment_webhook("gw-pay-1"),
            })
            .await;
        assert_eq!(ack, WebhookAck::Ok);
    }

    assert_eq!(w.payments.all().len(), 1);
    assert_eq!(
        w.appointments.get(appointment.id).unwrap().status,
        AppointmentStatus::Confirmed
    );
}

#[tokio::test]
async fn test_pings_are_acknowledged_without_processing() {
    let w = world();

    let ack = w
        .webhook
        .handle(ProcessWebhookCommand {
            tenant_id: w.tenant_id,
            body: serde_json::from_value(serde_json::json!({
                "action": "action.test.created",
                "type": "payment",
                "data": { "id": "ignored" }
            }))
            .unwrap(),
        })
        .await;

    assert_eq!(ack, WebhookAck::Received);
    assert_eq!(w.gateway.status_calls(), 0);
    assert!(w.payments.all().is_empty());
    assert!(w.outbox.all().is_empty());
}
