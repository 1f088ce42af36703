//! Payment gateway adapters.

mod rest_gateway;

pub use rest_gateway::{RestGatewayConfig, RestPaymentGateway};
