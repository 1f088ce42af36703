//! Subscription aggregate and status state machine.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    PlanId, StateMachine, SubscriptionId, TenantId, Timestamp, UserId,
};

/// Lifecycle status of a subscription.
///
/// At most one `Active` subscription exists per (user, tenant); activating
/// a subscription cancels the user's other active ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Pending,
    Active,
    Canceled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Pending => "pending",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Canceled => "canceled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(SubscriptionStatus::Pending),
            "active" => Some(SubscriptionStatus::Active),
            "canceled" => Some(SubscriptionStatus::Canceled),
            _ => None,
        }
    }
}

impl StateMachine for SubscriptionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionStatus::*;
        matches!((self, target), (Pending, Active) | (Pending, Canceled) | (Active, Canceled))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SubscriptionStatus::*;
        match self {
            Pending => vec![Active, Canceled],
            Active => vec![Canceled],
            Canceled => vec![],
        }
    }
}

/// A user's subscription to a plan, carrying its remaining credits.
///
/// `credits_remaining` is decremented exactly once per plan-credit payment
/// and must never go negative; the decrement is performed as a conditional
/// update at the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub tenant_id: TenantId,
    pub user_id: UserId,
    pub plan_id: PlanId,
    pub status: SubscriptionStatus,
    pub credits_remaining: i32,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}

impl Subscription {
    /// Whether this subscription can settle a plan-credit payment.
    pub fn can_consume_credit(&self) -> bool {
        self.status == SubscriptionStatus::Active && self.credits_remaining > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscription(status: SubscriptionStatus, credits: i32) -> Subscription {
        Subscription {
            id: SubscriptionId::new(),
            tenant_id: TenantId::new(),
            user_id: UserId::new(),
            plan_id: PlanId::new(),
            status,
            credits_remaining: credits,
            start_date: None,
            end_date: None,
        }
    }

    #[test]
    fn canceled_is_terminal() {
        assert!(SubscriptionStatus::Canceled.is_terminal());
        assert!(!SubscriptionStatus::Pending.is_terminal());
        assert!(!SubscriptionStatus::Active.is_terminal());
    }

    #[test]
    fn pending_activates_but_not_the_reverse() {
        assert!(SubscriptionStatus::Pending.can_transition_to(&SubscriptionStatus::Active));
        assert!(!SubscriptionStatus::Active.can_transition_to(&SubscriptionStatus::Pending));
    }

    #[test]
    fn credit_consumption_requires_active_with_credits() {
        assert!(subscription(SubscriptionStatus::Active, 3).can_consume_credit());
        assert!(!subscription(SubscriptionStatus::Active, 0).can_consume_credit());
        assert!(!subscription(SubscriptionStatus::Pending, 3).can_consume_credit());
        assert!(!subscription(SubscriptionStatus::Canceled, 3).can_consume_credit());
    }
}
