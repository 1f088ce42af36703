//! Billing application layer - payment creation, checkout, reconciliation.

mod create_checkout;
mod create_payment;
mod process_webhook;

pub use create_checkout::{CreateCheckoutCommand, CreateCheckoutHandler};
pub use create_payment::{CreatePaymentCommand, CreatePaymentHandler};
pub use process_webhook::{ProcessWebhookCommand, ProcessWebhookHandler, WebhookAck};
