//! Navigation-time access policy.
//!
//! Two independent checks: [`RouteTable::decide`] runs before a page loads and
//! only knows whether a session token exists; [`RoleGuard`] runs once the
//! cached user is available. Keep them separate.

mod guard;
pub use guard::{DASHBOARD_PATH, LOGIN_PATH, NavigationDecision, RouteClass, RouteTable};

mod role;
pub use role::{RoleDecision, RoleGuard};
