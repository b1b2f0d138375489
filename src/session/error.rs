use thiserror::Error;

pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("json error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("unable to locate a home directory for the session file")]
    NoHomeDir,
}
