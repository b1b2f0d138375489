use serde::Serialize;

pub static DASHBOARD_PATH: &str = "/dashboard";
pub static LOGIN_PATH: &str = "/auth/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteClass {
    Public,
    /// Only for visitors without a session (login, register).
    AuthOnly,
    /// Only for visitors with a session.
    Protected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationDecision {
    Allow,
    RedirectToDashboard,
    RedirectToLogin,
}

impl NavigationDecision {
    /// Where the navigation ends up, `None` when it is allowed as is.
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            Self::Allow => None,
            Self::RedirectToDashboard => Some(DASHBOARD_PATH),
            Self::RedirectToLogin => Some(LOGIN_PATH),
        }
    }
}

impl std::fmt::Display for NavigationDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Allow => write!(f, "allow"),
            Self::RedirectToDashboard => write!(f, "redirect to {DASHBOARD_PATH}"),
            Self::RedirectToLogin => write!(f, "redirect to {LOGIN_PATH}"),
        }
    }
}

/// Route prefixes per class. Anything unlisted is public.
#[derive(Debug, Clone)]
pub struct RouteTable {
    auth_only: Vec<String>,
    protected: Vec<String>,
    public: Vec<String>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(
            ["/auth/login", "/auth/register"],
            ["/dashboard", "/admin", "/profile"],
            ["/", "/courses", "/certificates/verify"],
        )
    }
}

impl RouteTable {
    pub fn new<A, P, U, S>(auth_only: A, protected: P, public: U) -> Self
    where
        A: IntoIterator<Item = S>,
        P: IntoIterator<Item = S>,
        U: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let collect = |routes: Vec<S>| -> Vec<String> {
            routes
                .into_iter()
                .map(|r| r.into().trim_end_matches('/').to_string())
                .collect()
        };

        Self {
            auth_only: collect(auth_only.into_iter().collect()),
            protected: collect(protected.into_iter().collect()),
            public: collect(public.into_iter().collect()),
        }
    }

    pub fn public_routes(&self) -> &[String] {
        &self.public
    }

    pub fn classify(&self, path: &str) -> RouteClass {
        let path = normalize(path);

        if matches_any(&self.auth_only, path) {
            RouteClass::AuthOnly
        } else if matches_any(&self.protected, path) {
            RouteClass::Protected
        } else {
            RouteClass::Public
        }
    }

    /// The token is only checked for presence; expiry and signature are the
    /// backend's business.
    pub fn decide(&self, path: &str, has_token: bool) -> NavigationDecision {
        let decision = match (self.classify(path), has_token) {
            (RouteClass::AuthOnly, true) => NavigationDecision::RedirectToDashboard,
            (RouteClass::Protected, false) => NavigationDecision::RedirectToLogin,
            _ => NavigationDecision::Allow,
        };

        tracing::trace!(path, has_token, %decision, "navigation decision");
        decision
    }
}

// strips query, fragment and trailing slash
pub(crate) fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = path[..end].trim_end_matches('/');
    if path.is_empty() { "/" } else { path }
}

fn matches_any(routes: &[String], path: &str) -> bool {
    routes.iter().any(|route| {
        // an empty route is the root, which must not swallow every path
        if route.is_empty() {
            return path == "/";
        }
        path == route
            || path
                .strip_prefix(route.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    })
}
