//! Ports - async trait seams between the application core and the world.
//!
//! Adapters implement these; handlers depend on them as `Arc<dyn Trait>`.

mod appointment_repository;
mod catalog_reader;
mod notification_outbox;
mod notifier;
mod payment_gateway;
mod payment_repository;
mod subscription_repository;
mod tenant_config;
mod user_directory;

pub use appointment_repository::{AppointmentQuery, AppointmentRepository, BookedSlot, Page};
pub use catalog_reader::CatalogReader;
pub use notification_outbox::NotificationOutbox;
pub use notifier::{ChatSender, EmailSender, NotifyError};
pub use payment_gateway::{
    CheckoutItem, CheckoutSession, CreateCheckoutRequest, GatewayError, GatewayErrorCode,
    GatewayPayment, GatewayPaymentStatus, PaymentGateway,
};
pub use payment_repository::PaymentRepository;
pub use subscription_repository::SubscriptionRepository;
pub use tenant_config::{SmtpSettings, TenantConfig, TenantConfigReader};
pub use user_directory::UserDirectory;
