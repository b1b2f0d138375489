use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::model::entity::User;
use crate::session::{Session, SessionError, SessionResult};

#[async_trait::async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    async fn load(&self) -> SessionResult<Option<Session>>;
    async fn save(&self, session: &Session) -> SessionResult<()>;
    async fn clear(&self) -> SessionResult<()>;
}

/// JSON file under the user's config directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.config/ataasil/session.json`, `%APPDATA%\ataasil\session.json`
    /// on Windows.
    pub fn default_path() -> SessionResult<PathBuf> {
        #[cfg(windows)]
        let base = std::env::var_os("APPDATA").map(PathBuf::from);
        #[cfg(not(windows))]
        let base = std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"));

        base.map(|base| base.join(crate::APPLICATION_NAME).join("session.json"))
            .ok_or(SessionError::NoHomeDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A token survives an unreadable user blob; the user then reads as absent.
fn decode_session(bytes: &[u8]) -> Option<Session> {
    let value: Value = match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("discarding unreadable session file: {e}");
            return None;
        }
    };

    let token = value.get("token")?.as_str().filter(|t| !t.is_empty())?;
    let user = value
        .get("user")
        .cloned()
        .and_then(|user| serde_json::from_value::<User>(user).ok());

    Some(Session::new(token, user))
}

#[async_trait::async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> SessionResult<Option<Session>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!("session loaded from {}", self.path.display());
        Ok(decode_session(&bytes))
    }

    async fn save(&self, session: &Session) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(session)?;
        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&self.path).await?;
        // `mode` only applies on creation, tighten an older file too
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .await?;
        }
        file.write_all(&bytes).await?;
        file.flush().await?;
        Ok(())
    }

    async fn clear(&self) -> SessionResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new(session: Option<Session>) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> SessionResult<Option<Session>> {
        Ok(self.session.lock().await.clone())
    }

    async fn save(&self, session: &Session) -> SessionResult<()> {
        *self.session.lock().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> SessionResult<()> {
        *self.session.lock().await = None;
        Ok(())
    }
}
