//! Scheduling application layer - appointment lifecycle handlers.

mod create_appointment;
mod delete_appointments;
mod get_available_slots;
mod list_appointments;
mod update_appointment;
mod update_status;

pub use create_appointment::{CreateAppointmentCommand, CreateAppointmentHandler};
pub use delete_appointments::{DeleteAppointmentsCommand, DeleteAppointmentsHandler};
pub use get_available_slots::{AvailableSlotsQuery, GetAvailableSlotsHandler};
pub use list_appointments::{
    ListAppointmentsHandler, ListAppointmentsQuery, ListAppointmentsResult, PageMeta,
};
pub use update_appointment::{UpdateAppointmentCommand, UpdateAppointmentHandler};
pub use update_status::{UpdateStatusCommand, UpdateStatusHandler};
