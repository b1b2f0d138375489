use reqwest::StatusCode;
use thiserror::Error;

use crate::model::ValidationErrors;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

pub static FALLBACK_MESSAGE: &str = "An unexpected error occurred";

/// Failure of a backend call, classified the way the caller has to react.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("TransportError: {0}")]
    Transport(#[from] reqwest::Error),

    /// 401. The session must be dropped.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("NotFound: {message}")]
    NotFound { message: String },

    /// Rejected locally before the request was sent.
    #[error("ValidationError: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Rejected ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    #[error("DecodeError: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("InvalidUrl: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        let message = message
            .or_else(|| status.canonical_reason().map(String::from))
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());

        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized { message },
            StatusCode::FORBIDDEN => Self::Forbidden { message },
            StatusCode::NOT_FOUND => Self::NotFound { message },
            status => Self::Rejected { status, message },
        }
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Transport(e) => e.status(),
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::Forbidden { .. } => Some(StatusCode::FORBIDDEN),
            Self::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            Self::Rejected { status, .. } => Some(*status),
            Self::Validation(_) | Self::Decode(_) | Self::InvalidUrl(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Message shown to the user.
    pub fn client_display(&self) -> String {
        match self {
            Self::Transport(e) if e.is_timeout() => String::from("The server took too long to respond."),
            Self::Transport(e) if e.is_connect() => String::from("Unable to reach the server."),
            Self::Transport(_) => String::from(FALLBACK_MESSAGE),
            Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::Rejected { message, .. } => message.clone(),
            Self::Validation(errors) => errors.summary(),
            Self::Decode(_) => String::from("The server sent an unexpected response."),
            Self::InvalidUrl(_) => String::from(FALLBACK_MESSAGE),
        }
    }
}
