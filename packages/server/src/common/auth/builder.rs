use super::{AuthError, BusinessCapability};
use crate::common::entity_ids::{BusinessId, UserId};
use crate::kernel::BaseBusinessStore;

/// Entry point for authorization checks
///
/// Usage:
/// ```rust,ignore
/// Actor::new(user_id)
///     .can(BusinessCapability::ManageCredentials)
///     .on(business_id)
///     .check(deps.business_store.as_ref())
///     .await?;
/// ```
pub struct Actor {
    user_id: UserId,
}

impl Actor {
    /// `user_id` is the verified `sub` of the bearer token
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    /// Specify what capability the actor needs
    pub fn can(self, capability: BusinessCapability) -> CapabilityBuilder {
        CapabilityBuilder {
            user_id: self.user_id,
            capability,
        }
    }
}

/// Builder after specifying capability
pub struct CapabilityBuilder {
    user_id: UserId,
    capability: BusinessCapability,
}

impl CapabilityBuilder {
    /// Specify the business the capability applies to
    pub fn on(self, business_id: BusinessId) -> ScopedCheck {
        ScopedCheck {
            user_id: self.user_id,
            capability: self.capability,
            business_id,
        }
    }
}

/// Fully specified check, ready to run against the store
pub struct ScopedCheck {
    user_id: UserId,
    capability: BusinessCapability,
    business_id: BusinessId,
}

impl ScopedCheck {
    /// Perform the authorization check
    pub async fn check(self, store: &dyn BaseBusinessStore) -> Result<(), AuthError> {
        let access = store.access_for(self.user_id, self.business_id).await?;

        if self.capability.is_granted_by(&access) {
            Ok(())
        } else {
            tracing::warn!(
                user_id = %self.user_id,
                business_id = %self.business_id,
                capability = ?self.capability,
                "Business access denied"
            );
            Err(AuthError::PermissionDenied)
        }
    }
}
