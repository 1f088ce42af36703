//! Axum router for integration webhooks.
//!
//! # Routes
//!
//! - `POST /chat/webhook` - Chat-platform command webhook

use axum::routing::post;
use axum::Router;

use super::super::AppState;
use super::handlers::chat_webhook;

/// Create the integrations router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/chat/webhook", post(chat_webhook))
}
