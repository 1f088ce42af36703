//! HTTP adapters - axum routers, handlers, and DTOs.
//!
//! The shared `AppState` carries Arc-wrapped ports plus the scheduling grid
//! and the service's public URL; handlers are built on demand from it.

pub mod billing;
mod error;
mod extract;
pub mod integrations;
pub mod scheduling;

pub use error::{ApiError, ErrorResponse};
pub use extract::{AuthenticatedRequester, TenantContext};

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::application::billing::{
    CreateCheckoutHandler, CreatePaymentHandler, ProcessWebhookHandler,
};
use crate::application::scheduling::{
    CreateAppointmentHandler, DeleteAppointmentsHandler, GetAvailableSlotsHandler,
    ListAppointmentsHandler, UpdateAppointmentHandler, UpdateStatusHandler,
};
use crate::domain::scheduling::ScheduleGrid;
use crate::ports::{
    AppointmentRepository, CatalogReader, NotificationOutbox, PaymentGateway, PaymentRepository,
    SubscriptionRepository, TenantConfigReader, UserDirectory,
};

/// Shared application state containing all dependencies.
///
/// Cloned per request; every dependency is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub appointments: Arc<dyn AppointmentRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub catalog: Arc<dyn CatalogReader>,
    pub users: Arc<dyn UserDirectory>,
    pub tenant_config: Arc<dyn TenantConfigReader>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub outbox: Arc<dyn NotificationOutbox>,

    pub grid: ScheduleGrid,

    /// Public base URL of this deployment (for webhook callbacks).
    pub public_url: String,

    /// Gateway slug in the webhook path.
    pub gateway_slug: String,

    /// JWT secret for bearer auth; `None` enables the dev-header fallback
    /// only.
    pub jwt_secret: Option<String>,
}

impl AppState {
    pub fn create_payment_handler(&self) -> CreatePaymentHandler {
        CreatePaymentHandler::new(
            self.payments.clone(),
            self.subscriptions.clone(),
            self.catalog.clone(),
            self.users.clone(),
            self.outbox.clone(),
        )
    }

    pub fn create_appointment_handler(&self) -> CreateAppointmentHandler {
        CreateAppointmentHandler::new(
            self.appointments.clone(),
            self.catalog.clone(),
            self.users.clone(),
            self.outbox.clone(),
            self.create_payment_handler(),
        )
    }

    pub fn list_appointments_handler(&self) -> ListAppointmentsHandler {
        ListAppointmentsHandler::new(self.appointments.clone())
    }

    pub fn update_appointment_handler(&self) -> UpdateAppointmentHandler {
        UpdateAppointmentHandler::new(self.appointments.clone(), self.catalog.clone())
    }

    pub fn update_status_handler(&self) -> UpdateStatusHandler {
        UpdateStatusHandler::new(
            self.appointments.clone(),
            self.catalog.clone(),
            self.users.clone(),
            self.outbox.clone(),
        )
    }

    pub fn delete_appointments_handler(&self) -> DeleteAppointmentsHandler {
        DeleteAppointmentsHandler::new(self.appointments.clone(), self.payments.clone())
    }

    pub fn available_slots_handler(&self) -> GetAvailableSlotsHandler {
        GetAvailableSlotsHandler::new(self.appointments.clone(), self.catalog.clone(), self.grid)
    }

    pub fn checkout_handler(&self) -> CreateCheckoutHandler {
        CreateCheckoutHandler::new(
            self.appointments.clone(),
            self.catalog.clone(),
            self.users.clone(),
            self.tenant_config.clone(),
            self.gateway.clone(),
            self.public_url.clone(),
            self.gateway_slug.clone(),
        )
    }

    pub fn webhook_handler(&self) -> ProcessWebhookHandler {
        ProcessWebhookHandler::new(
            self.appointments.clone(),
            self.payments.clone(),
            self.catalog.clone(),
            self.users.clone(),
            self.tenant_config.clone(),
            self.gateway.clone(),
            self.outbox.clone(),
        )
    }
}

async fn health() -> &'static str {
    "ok"
}

/// Assembles the complete API router with the shared middleware stack.
pub fn router(state: AppState) -> Router {
    let x_request_id = http::HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health))
        .nest("/appointments", scheduling::routes())
        .merge(billing::routes())
        .nest("/integrations", integrations::routes())
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    x_request_id.clone(),
                    MakeRequestUuid,
                ))
                .layer(PropagateRequestIdLayer::new(x_request_id))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
