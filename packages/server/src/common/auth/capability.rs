use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles a user can hold on a business (`user_roles.role`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppRole {
    SuperAdmin,
    Owner,
    Manager,
    FrontDesk,
    Housekeeping,
    Auditor,
}

impl AppRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppRole::SuperAdmin => "super_admin",
            AppRole::Owner => "owner",
            AppRole::Manager => "manager",
            AppRole::FrontDesk => "front_desk",
            AppRole::Housekeeping => "housekeeping",
            AppRole::Auditor => "auditor",
        }
    }

    /// Owner, manager and super-admin administer a business.
    pub fn administers_business(&self) -> bool {
        matches!(self, AppRole::SuperAdmin | AppRole::Owner | AppRole::Manager)
    }
}

impl fmt::Display for AppRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(AppRole::SuperAdmin),
            "owner" => Ok(AppRole::Owner),
            "manager" => Ok(AppRole::Manager),
            "front_desk" => Ok(AppRole::FrontDesk),
            "housekeeping" => Ok(AppRole::Housekeeping),
            "auditor" => Ok(AppRole::Auditor),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// What the store knows about one user's relationship to one business.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessAccess {
    /// `businesses.owner_id` is the user
    pub owns: bool,
    /// Roles held on this business
    pub roles: Vec<AppRole>,
}

impl BusinessAccess {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn owner() -> Self {
        Self {
            owns: true,
            roles: Vec::new(),
        }
    }

    pub fn with_role(role: AppRole) -> Self {
        Self {
            owns: false,
            roles: vec![role],
        }
    }

    /// owns(user, business) OR has_role(user, business, {owner, manager, super_admin})
    pub fn is_authorized(&self) -> bool {
        self.owns || self.roles.iter().any(AppRole::administers_business)
    }
}

/// Operations gated on business access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessCapability {
    /// Write encrypted PMS credentials
    ManageCredentials,
    /// Read stored competitor rates
    ViewRates,
}

impl BusinessCapability {
    pub fn is_granted_by(&self, access: &BusinessAccess) -> bool {
        match self {
            BusinessCapability::ManageCredentials | BusinessCapability::ViewRates => {
                access.is_authorized()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_is_authorized_without_roles() {
        assert!(BusinessAccess::owner().is_authorized());
    }

    #[test]
    fn test_administrative_roles_are_authorized() {
        for role in [AppRole::Owner, AppRole::Manager, AppRole::SuperAdmin] {
            assert!(BusinessAccess::with_role(role).is_authorized(), "{}", role);
        }
    }

    #[test]
    fn test_staff_roles_are_not_authorized() {
        for role in [AppRole::FrontDesk, AppRole::Housekeeping, AppRole::Auditor] {
            assert!(!BusinessAccess::with_role(role).is_authorized(), "{}", role);
        }
        assert!(!BusinessAccess::none().is_authorized());
    }

    #[test]
    fn test_mixed_roles_any_grant_wins() {
        let access = BusinessAccess {
            owns: false,
            roles: vec![AppRole::Auditor, AppRole::Manager],
        };
        assert!(BusinessCapability::ManageCredentials.is_granted_by(&access));
    }

    #[test]
    fn test_role_names() {
        assert_eq!("front_desk".parse::<AppRole>(), Ok(AppRole::FrontDesk));
        assert_eq!(AppRole::SuperAdmin.to_string(), "super_admin");
        assert!("admin".parse::<AppRole>().is_err());
    }
}
