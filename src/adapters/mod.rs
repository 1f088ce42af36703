//! Adapters - implementations of the ports against real infrastructure.

pub mod gateway;
pub mod http;
pub mod memory;
pub mod notification;
pub mod postgres;
