//! Payment aggregate and related enums.
//!
//! Payments are created by the reconciliation layer only. Amount, method,
//! and type are immutable after creation; only `status` may change.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AppointmentId, PaymentId, SubscriptionId, TenantId, Timestamp, UserId,
};

/// How a booking or subscription is paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Settled in person, treated as instantly confirmed.
    Cash,

    /// Card charged out of band, treated as instantly confirmed.
    CreditCard,

    /// Hosted checkout at the external gateway; settles via webhook.
    Online,

    /// Settled by consuming one credit from an active subscription.
    PlanCredit,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::Online => "online",
            PaymentMethod::PlanCredit => "plan_credit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cash" => Some(PaymentMethod::Cash),
            "credit_card" => Some(PaymentMethod::CreditCard),
            "online" => Some(PaymentMethod::Online),
            "plan_credit" => Some(PaymentMethod::PlanCredit),
            _ => None,
        }
    }

    /// Whether settlement is deferred to a gateway webhook.
    pub fn is_deferred(&self) -> bool {
        matches!(self, PaymentMethod::Online)
    }
}

/// Settlement status of a payment record.
///
/// Direct payments (cash, card, plan credit) are created `Completed`;
/// there is no pending state for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "completed" => Some(PaymentStatus::Completed),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }
}

/// What a payment settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    Appointment,
    Subscription,
}

impl PaymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Appointment => "appointment",
            PaymentKind::Subscription => "subscription",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "appointment" => Some(PaymentKind::Appointment),
            "subscription" => Some(PaymentKind::Subscription),
            _ => None,
        }
    }
}

/// A settled (or failed) payment, linked to an appointment or subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub tenant_id: TenantId,
    pub user_id: UserId,
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub kind: PaymentKind,
    pub appointment_id: Option<AppointmentId>,
    pub subscription_id: Option<SubscriptionId>,
    pub created_at: Timestamp,
}

impl Payment {
    /// Creates a settled payment record.
    #[allow(clippy::too_many_arguments)]
    pub fn completed(
        tenant_id: TenantId,
        user_id: UserId,
        amount_cents: i64,
        method: PaymentMethod,
        kind: PaymentKind,
        appointment_id: Option<AppointmentId>,
        subscription_id: Option<SubscriptionId>,
    ) -> Self {
        Self {
            id: PaymentId::new(),
            tenant_id,
            user_id,
            amount_cents,
            method,
            status: PaymentStatus::Completed,
            kind,
            appointment_id,
            subscription_id,
            created_at: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_round_trips_through_strings() {
        for m in [
            PaymentMethod::Cash,
            PaymentMethod::CreditCard,
            PaymentMethod::Online,
            PaymentMethod::PlanCredit,
        ] {
            assert_eq!(PaymentMethod::parse(m.as_str()), Some(m));
        }
        assert_eq!(PaymentMethod::parse("wire"), None);
    }

    #[test]
    fn only_online_is_deferred() {
        assert!(PaymentMethod::Online.is_deferred());
        assert!(!PaymentMethod::Cash.is_deferred());
        assert!(!PaymentMethod::CreditCard.is_deferred());
        assert!(!PaymentMethod::PlanCredit.is_deferred());
    }

    #[test]
    fn completed_constructor_sets_status() {
        let p = Payment::completed(
            TenantId::new(),
            UserId::new(),
            2500,
            PaymentMethod::Cash,
            PaymentKind::Appointment,
            Some(AppointmentId::new()),
            None,
        );
        assert_eq!(p.status, PaymentStatus::Completed);
        assert_eq!(p.amount_cents, 2500);
        assert!(p.subscription_id.is_none());
    }
}
