//! PostgreSQL adapters.
//!
//! sqlx-backed implementations of the persistence ports. Each adapter owns
//! its SQL and maps rows into domain types via `TryFrom`.

mod appointment_repository;
mod catalog_reader;
mod notification_outbox;
mod payment_repository;
mod subscription_repository;
mod tenant_config_reader;
mod user_directory;

pub use appointment_repository::PostgresAppointmentRepository;
pub use catalog_reader::PostgresCatalogReader;
pub use notification_outbox::PostgresNotificationOutbox;
pub use payment_repository::PostgresPaymentRepository;
pub use subscription_repository::PostgresSubscriptionRepository;
pub use tenant_config_reader::PostgresTenantConfigReader;
pub use user_directory::PostgresUserDirectory;
