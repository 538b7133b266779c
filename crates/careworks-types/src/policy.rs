//! Access-control policy for the two gated portals.
//!
//! Pure functions over the closed [`Role`] and [`Portal`] enums; no state.
//! Consulted at login (before a session is minted) and by the middleware
//! guarding every dashboard data endpoint.

use crate::models::{Portal, Role};

impl Portal {
    /// Minimum role admitted to this portal.
    pub fn required_role(self) -> Role {
        match self {
            Portal::Admin => Role::Admin,
            Portal::Owner => Role::Owner,
        }
    }
}

/// Whether `role` may enter `portal`. An absent portal is always allowed;
/// callers simply skip the check.
pub fn can_enter(role: Role, portal: Portal) -> bool {
    role >= portal.required_role()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_portal_admits_admin_and_owner() {
        assert!(!can_enter(Role::User, Portal::Admin));
        assert!(can_enter(Role::Admin, Portal::Admin));
        assert!(can_enter(Role::Owner, Portal::Admin));
    }

    #[test]
    fn owner_portal_admits_only_owner() {
        assert!(!can_enter(Role::User, Portal::Owner));
        assert!(!can_enter(Role::Admin, Portal::Owner));
        assert!(can_enter(Role::Owner, Portal::Owner));
    }
}
