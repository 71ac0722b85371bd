//! Current-actor types.
//!
//! The authenticated actor is stored in the session by the auth collaborator;
//! this core only reads it back.

use serde::{Deserialize, Serialize};

use herba_core::{Email, Role, TenantId, UserId};

/// Session-stored actor identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentActor {
    pub id: UserId,
    pub email: Email,
    pub role: Role,
    /// Present for tenant staff; `None` for platform operators and for
    /// customers shopping across storefronts.
    pub tenant_id: Option<TenantId>,
}

impl CurrentActor {
    /// Whether this actor may manage the given tenant.
    #[must_use]
    pub fn can_manage_tenant(&self, tenant_id: &TenantId) -> bool {
        match self.role {
            Role::SuperAdmin => true,
            Role::TenantAdmin => self.tenant_id.as_ref() == Some(tenant_id),
            Role::Customer => false,
        }
    }
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the current authenticated actor.
    pub const CURRENT_ACTOR: &str = "current_actor";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn actor(role: Role, tenant: Option<&str>) -> CurrentActor {
        CurrentActor {
            id: UserId::new("user-1"),
            email: Email::parse("staff@example.com").unwrap(),
            role,
            tenant_id: tenant.map(TenantId::new),
        }
    }

    #[test]
    fn super_admin_manages_any_tenant() {
        assert!(actor(Role::SuperAdmin, None).can_manage_tenant(&TenantId::new("acme")));
    }

    #[test]
    fn tenant_admin_manages_only_own_tenant() {
        let staff = actor(Role::TenantAdmin, Some("acme"));
        assert!(staff.can_manage_tenant(&TenantId::new("acme")));
        assert!(!staff.can_manage_tenant(&TenantId::new("other")));
    }

    #[test]
    fn customer_manages_nothing() {
        assert!(!actor(Role::Customer, Some("acme")).can_manage_tenant(&TenantId::new("acme")));
    }
}
