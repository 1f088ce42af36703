//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the booking domain.

mod errors;
mod ids;
mod requester;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    AppointmentId, LocationId, PaymentId, PlanId, ProfessionalId, ServiceId, SubscriptionId,
    TenantId, UserId,
};
pub use requester::{Requester, Role};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
