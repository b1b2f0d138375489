mod error;
pub use error::{SessionError, SessionResult};

mod store;
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

use serde::{Deserialize, Serialize};

use crate::model::entity::User;

/// Persisted login: the bearer token and the user it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    token: String,
    #[serde(default)]
    user: Option<User>,
}

impl Session {
    pub fn new<T: Into<String>>(token: T, user: Option<User>) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }
}

/// Broadcast whenever the session changes.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    LoggedIn(User),
    LoggedOut,
    UserUpdated(User),
    /// The backend rejected the token; the session was dropped.
    Expired,
}
