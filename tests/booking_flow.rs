//! End-to-end booking flows over the in-memory adapters.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use agendly::adapters::memory::{
    InMemoryAppointments, InMemoryCatalog, InMemoryOutbox, InMemoryPayments,
    InMemorySubscriptions, InMemoryTenantConfig, RecordingChat, RecordingEmail,
};
use agendly::application::billing::CreatePaymentHandler;
use agendly::application::notifications::{DispatcherConfig, NotificationDispatcher};
use agendly::application::scheduling::{
    AvailableSlotsQuery, CreateAppointmentCommand, CreateAppointmentHandler,
    GetAvailableSlotsHandler,
};
use agendly::domain::billing::PaymentMethod;
use agendly::domain::foundation::{ErrorCode, ProfessionalId, TenantId, Timestamp, UserId};
use agendly::domain::scheduling::{Professional, ScheduleGrid, Service, UserAccount};

fn at(h: u32, m: u32) -> Timestamp {
    Timestamp::from_date_time(
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        NaiveTime::from_hms_opt(h, m, 0).unwrap(),
    )
}

struct World {
    tenant_id: TenantId,
    appointments: Arc<InMemoryAppointments>,
    catalog: Arc<InMemoryCatalog>,
    outbox: Arc<InMemoryOutbox>,
    create: CreateAppointmentHandler,
    slots: GetAvailableSlotsHandler,
}

fn world() -> World {
    let tenant_id = TenantId::new();
    let appointments = Arc::new(InMemoryAppointments::new());
    let catalog = Arc::new(InMemoryCatalog::new());
    let outbox = Arc::new(InMemoryOutbox::new());

    let payments = CreatePaymentHandler::new(
        Arc::new(InMemoryPayments::new()),
        Arc::new(InMemorySubscriptions::new()),
        catalog.clone(),
        catalog.clone(),
        outbox.clone(),
    );
    let create = CreateAppointmentHandler::new(
        appointments.clone(),
        catalog.clone(),
        catalog.clone(),
        outbox.clone(),
        payments,
    );
    let slots = GetAvailableSlotsHandler::new(
        appointments.clone(),
        catalog.clone(),
        ScheduleGrid::default(),
    );

    World {
        tenant_id,
        appointments,
        catalog,
        outbox,
        create,
        slots,
    }
}

#[tokio::test]
async fn booked_slot_disappears_from_availability() {
    let w = world();
    let professional_id = ProfessionalId::new();

    let service = Service {
        id: agendly::domain::foundation::ServiceId::new(),
        tenant_id: w.tenant_id,
        name: "Cut".to_string(),
        duration_minutes: 30,
        price_cents: 2500,
    };
    w.catalog.add_service(service.clone());
    w.appointments.set_service_duration(service.id, 30);

    w.create
        .handle(CreateAppointmentCommand {
            tenant_id: w.tenant_id,
            user_id: UserId::new(),
            professional_id: Some(professional_id),
            location_id: None,
            date: at(10, 0),
            payment_method: PaymentMethod::Cash,
            service_ids: vec![service.id],
        })
        .await
        .unwrap();

    let slots = w
        .slots
        .handle(AvailableSlotsQuery {
            tenant_id: w.tenant_id,
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            service_id: Some(service.id),
            professional_id: Some(professional_id),
        })
        .await
        .unwrap();

    assert!(!slots.contains(&"10:00".to_string()));
    assert!(slots.contains(&"09:30".to_string()));
    assert!(slots.contains(&"10:30".to_string()));
}

#[tokio::test]
async fn double_booking_same_instant_is_rejected() {
    let w = world();
    let professional_id = ProfessionalId::new();

    let cmd = CreateAppointmentCommand {
        tenant_id: w.tenant_id,
        user_id: UserId::new(),
        professional_id: Some(professional_id),
        location_id: None,
        date: at(11, 0),
        payment_method: PaymentMethod::Cash,
        service_ids: vec![],
    };

    w.create.handle(cmd.clone()).await.unwrap();
    let err = w.create.handle(cmd).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::SchedulingConflict);
}

#[tokio::test]
async fn confirmation_notifications_flow_through_the_dispatcher() {
    let w = world();
    let user_id = UserId::new();
    let professional = Professional {
        id: ProfessionalId::new(),
        tenant_id: w.tenant_id,
        name: "Dr. Silva".to_string(),
        email: Some("silva@clinic.com".to_string()),
    };
    w.catalog.add_professional(professional.clone());
    w.catalog.add_user(UserAccount {
        id: user_id,
        tenant_id: w.tenant_id,
        name: "Ana".to_string(),
        email: Some("ana@example.com".to_string()),
        chat_subscriber_id: Some("sub-ana".to_string()),
    });

    w.create
        .handle(CreateAppointmentCommand {
            tenant_id: w.tenant_id,
            user_id,
            professional_id: Some(professional.id),
            location_id: None,
            date: at(14, 0),
            payment_method: PaymentMethod::Cash,
            service_ids: vec![],
        })
        .await
        .unwrap();

    // Drain the outbox through the dispatcher.
    let chat = Arc::new(RecordingChat::new());
    let email = Arc::new(RecordingEmail::new());
    let dispatcher = NotificationDispatcher::with_config(
        w.outbox.clone(),
        chat.clone(),
        email.clone(),
        Arc::new(InMemoryTenantConfig::configured(w.tenant_id)),
        DispatcherConfig::default(),
    );
    dispatcher.poll_once().await.unwrap();

    let chat_sent = chat.sent();
    assert_eq!(chat_sent.len(), 1);
    assert_eq!(chat_sent[0].0, "sub-ana");
    assert!(chat_sent[0].1.contains("Ana"));

    let emails = email.sent();
    assert_eq!(emails.len(), 2);
    assert!(emails.iter().any(|(to, _, _)| to == "ana@example.com"));
    assert!(emails.iter().any(|(to, _, _)| to == "silva@clinic.com"));
}
