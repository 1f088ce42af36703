//! Client account lookup port.
//!
//! Notification construction needs the client's email, chat subscriber id,
//! and display name; nothing else of the user model leaks into this core.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TenantId, UserId};
use crate::domain::scheduling::UserAccount;

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn user(
        &self,
        tenant_id: TenantId,
        id: UserId,
    ) -> Result<Option<UserAccount>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_directory_is_object_safe() {
        fn _accepts_dyn(_dir: &dyn UserDirectory) {}
    }
}
