//! Capability model for role-gated pages. Evaluated once per navigation.

use roomdesk_shared::Role;

use crate::session::SessionSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    Anonymous,
    User,
    /// Operator role.
    Staff,
    Admin,
}

impl AccessState {
    /// Derive the access level from what the session holds. A token with
    /// no readable role counts as a plain user.
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        if !snapshot.is_authenticated() {
            return AccessState::Anonymous;
        }
        match snapshot.role() {
            Some(Role::Admin) => AccessState::Admin,
            Some(Role::Operator) => AccessState::Staff,
            _ => AccessState::User,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, AccessState::Anonymous)
    }

    /// Operators and admins.
    pub fn is_staff(&self) -> bool {
        matches!(self, AccessState::Staff | AccessState::Admin)
    }

    pub fn satisfies(&self, requirement: Requirement) -> bool {
        match requirement {
            Requirement::Public => true,
            Requirement::Authenticated => self.is_authenticated(),
            Requirement::Staff => self.is_staff(),
            Requirement::Admin => matches!(self, AccessState::Admin),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Public,
    Authenticated,
    Staff,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPermission {
    Granted(AccessState),
    /// Render the login view in place. Used both for anonymous sessions
    /// and for sessions lacking the role; the server enforces the rest.
    Login,
}

pub fn resolve(requirement: Requirement, access: AccessState) -> ViewPermission {
    if access.satisfies(requirement) {
        ViewPermission::Granted(access)
    } else {
        ViewPermission::Login
    }
}
