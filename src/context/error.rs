use thiserror::Error;

use crate::api::ApiError;
use crate::model::ValidationErrors;
use crate::model::entity::UserRole;
use crate::session::SessionError;

pub type ContextResult<T> = std::result::Result<T, ContextError>;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("ApiError - {0}")]
    Api(#[from] ApiError),

    #[error("SessionError - {0}")]
    Session(#[from] SessionError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("NotAuthenticated")]
    NotAuthenticated,

    #[error("RoleRequired: {role}")]
    RoleRequired { role: UserRole },

    #[error("GenerationInFlight: {course_id}")]
    GenerationInFlight { course_id: String },

    #[error("NotEligible: {course_id}")]
    NotEligible { course_id: String },

    /// The fetch was superseded or the context is shutting down.
    #[error("Cancelled")]
    Cancelled,
}

impl From<ValidationErrors> for ContextError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Api(ApiError::Validation(errors))
    }
}

impl ContextError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_not_found())
    }

    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Api(ApiError::Validation(errors)) => Some(errors),
            _ => None,
        }
    }

    /// Message for a transient user notification.
    pub fn client_display(&self) -> String {
        match self {
            Self::Api(e) => e.client_display(),
            Self::Session(_) => String::from("Unable to access the saved session."),
            Self::Io(e) => format!("Unable to save the file: {e}"),
            Self::NotAuthenticated => String::from("Please log in to continue."),
            Self::RoleRequired { role } => format!("This area requires the {role} role."),
            Self::GenerationInFlight { .. } => {
                String::from("A certificate is already being generated for this course.")
            }
            Self::NotEligible { .. } => {
                String::from("Complete every video of the course to get a certificate.")
            }
            Self::Cancelled => String::from("The request was cancelled."),
        }
    }
}
