//! # Session Errors

use thiserror::Error;
use uuid::Uuid;

use crate::model::PredictionError;

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Rejected experience value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("Experience must be a finite number")]
    NotFinite,

    #[error("Experience {value} is outside [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },

    #[error("Experience {value} is not a multiple of {step} from {min}")]
    OffStep { value: f64, min: f64, step: f64 },
}

/// Session-level failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error("Session state unavailable: {0}")]
    Internal(String),
}

impl SessionError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            SessionError::NotFound(_) => 404,
            SessionError::Input(_) => 400,
            SessionError::Prediction(e) => e.status_code(),
            SessionError::Internal(_) => 500,
        }
    }
}
