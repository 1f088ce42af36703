//! Billing domain module.
//!
//! Payments, subscriptions, plans, and the inbound gateway webhook model.
//!
//! # Module Structure
//!
//! - `payment` - Payment aggregate, method/status/kind enums
//! - `subscription` - Subscription aggregate and status state machine
//! - `plan` - Read-only plan catalog entity
//! - `gateway_event` - Webhook body classification

mod gateway_event;
mod payment;
mod plan;
mod subscription;

pub use gateway_event::{GatewayWebhook, GatewayWebhookData, WebhookKind};
pub use payment::{Payment, PaymentKind, PaymentMethod, PaymentStatus};
pub use plan::{Plan, PlanInterval};
pub use subscription::{Subscription, SubscriptionStatus};
