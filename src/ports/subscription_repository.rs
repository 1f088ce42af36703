//! Subscription repository port.
//!
//! Credit consumption is a conditional update, not read-then-write: the
//! implementation decrements only `where credits_remaining > 0`, so
//! concurrent plan-credit payments cannot drive the counter negative.

use async_trait::async_trait;

use crate::domain::billing::Subscription;
use crate::domain::foundation::{DomainError, SubscriptionId, TenantId, UserId};

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: SubscriptionId,
    ) -> Result<Option<Subscription>, DomainError>;

    /// The user's `Active` subscription with at least one credit remaining.
    async fn find_active_with_credits(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> Result<Option<Subscription>, DomainError>;

    /// Atomically consumes one credit.
    ///
    /// Returns `false` when the subscription had no credit left (a
    /// concurrent payment won the race) or is not active.
    async fn consume_credit(
        &self,
        tenant_id: TenantId,
        id: SubscriptionId,
    ) -> Result<bool, DomainError>;

    /// Activates the subscription and cancels the owner's other active
    /// subscriptions, preserving the at-most-one-active invariant.
    async fn activate(&self, tenant_id: TenantId, id: SubscriptionId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SubscriptionRepository) {}
    }
}
