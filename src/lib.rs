//! Agendly - Multi-tenant appointment booking backend
//!
//! The core is the booking/payment orchestration engine: availability
//! computation, the appointment lifecycle state machine, idempotent
//! payment-webhook reconciliation, and best-effort multi-channel
//! notification dispatch.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
