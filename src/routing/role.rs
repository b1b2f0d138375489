use crate::model::entity::{User, UserRole};
use crate::routing::LOGIN_PATH;
use crate::routing::guard::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleDecision {
    Allow,
    RedirectToLogin,
}

impl RoleDecision {
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            Self::Allow => None,
            Self::RedirectToLogin => Some(LOGIN_PATH),
        }
    }
}

/// Post-load role check against the locally cached user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleGuard {
    required: UserRole,
}

impl RoleGuard {
    pub fn new(required: UserRole) -> Self {
        Self { required }
    }

    pub fn admin() -> Self {
        Self::new(UserRole::Admin)
    }

    /// Guard for paths that need a specific role, `None` for the rest.
    pub fn for_path(path: &str) -> Option<Self> {
        let path = normalize(path);
        let admin = path == "/admin" || path.starts_with("/admin/");
        admin.then(Self::admin)
    }

    pub fn required(&self) -> UserRole {
        self.required
    }

    pub fn check(&self, user: Option<&User>) -> RoleDecision {
        match user {
            Some(user) if user.role() == self.required => RoleDecision::Allow,
            _ => RoleDecision::RedirectToLogin,
        }
    }
}
