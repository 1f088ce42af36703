//! Mock payment gateway for tests and local development.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::domain::foundation::Timestamp;
use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, GatewayError, GatewayPayment, GatewayPaymentStatus,
    PaymentGateway,
};

/// Gateway whose payments are programmed by the test.
#[derive(Default)]
pub struct MockGateway {
    payments: Mutex<HashMap<String, GatewayPayment>>,
    checkout_requests: Mutex<Vec<CreateCheckoutRequest>>,
    status_calls: Mutex<u32>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an approved payment with the given external reference.
    pub fn approve_payment(&self, payment_id: &str, amount_cents: i64, external_reference: &str) {
        self.payments.lock().unwrap().insert(
            payment_id.to_string(),
            GatewayPayment {
                id: payment_id.to_string(),
                status: GatewayPaymentStatus::Approved,
                amount_cents,
                external_reference: Some(external_reference.to_string()),
                approved_at: Some(Timestamp::now()),
            },
        );
    }

    /// Registers a payment in an arbitrary state.
    pub fn set_payment(&self, payment: GatewayPayment) {
        self.payments
            .lock()
            .unwrap()
            .insert(payment.id.clone(), payment);
    }

    /// Checkout sessions requested so far.
    pub fn checkout_requests(&self) -> Vec<CreateCheckoutRequest> {
        self.checkout_requests.lock().unwrap().clone()
    }

    /// Number of `payment_status` lookups performed.
    pub fn status_calls(&self) -> u32 {
        *self.status_calls.lock().unwrap()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn payment_status(
        &self,
        _access_token: &SecretString,
        payment_id: &str,
    ) -> Result<GatewayPayment, GatewayError> {
        *self.status_calls.lock().unwrap() += 1;
        self.payments
            .lock()
            .unwrap()
            .get(payment_id)
            .cloned()
            .ok_or_else(|| GatewayError::not_found(payment_id))
    }

    async fn create_checkout_session(
        &self,
        _access_token: &SecretString,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, GatewayError> {
        let reference = request.external_reference.clone();
        self.checkout_requests.lock().unwrap().push(request);
        Ok(CheckoutSession {
            checkout_url: format!("https://checkout.gateway.test/session/{}", reference),
        })
    }
}
