//! Axum router for the appointment endpoints.
//!
//! # Routes
//!
//! - `GET /` - Role-scoped listing (optional day filter and pagination)
//! - `POST /` - Create an appointment
//! - `GET /available-slots` - Open slots for a day
//! - `PATCH /:id` - Reschedule/reassign
//! - `PATCH /:id/status` - Lifecycle transition
//! - `DELETE /` - Admin bulk deletion

use axum::routing::{get, patch};
use axum::Router;

use super::super::AppState;
use super::handlers::{
    available_slots, create_appointment, delete_appointments, list_appointments,
    update_appointment, update_status,
};

/// Create the appointments API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_appointments)
                .post(create_appointment)
                .delete(delete_appointments),
        )
        .route("/available-slots", get(available_slots))
        .route("/:id", patch(update_appointment))
        .route("/:id/status", patch(update_status))
}
