//! Axum router for the payment endpoints.
//!
//! # Routes
//!
//! - `POST /payments` - Direct payment creation
//! - `POST /payments/checkout/:appointment_id` - Hosted checkout session
//! - `POST /payments/webhook/:gateway` - Gateway webhook (no auth; the
//!   payment is verified against the gateway API instead)

use axum::routing::post;
use axum::Router;

use super::super::AppState;
use super::handlers::{create_checkout, create_payment, payment_webhook};

/// Create the payments API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", post(create_payment))
        .route("/payments/checkout/:appointment_id", post(create_checkout))
        .route("/payments/webhook/:gateway", post(payment_webhook))
}
