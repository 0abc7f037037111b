//! # Model Errors

use thiserror::Error;

/// Result type for prediction calls
pub type PredictionResult<T> = Result<T, PredictionError>;

/// Failure to load the model artifact
///
/// Cloneable so a cached failure can be reported on every request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelLoadError {
    #[error("Model artifact not found: {0}")]
    NotFound(String),

    #[error("I/O error reading model artifact: {0}")]
    Io(String),

    #[error("Model artifact is not valid JSON: {0}")]
    Parse(String),

    #[error("Model artifact is invalid: {0}")]
    Invalid(String),
}

/// Failure of a single prediction call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("Model unavailable: {0}")]
    ModelUnavailable(ModelLoadError),

    #[error("Input is not a finite number: {0}")]
    NonFiniteInput(f64),

    #[error("Model produced a non-finite value for input {0}")]
    NonFiniteOutput(f64),

    #[error("Prediction failed: {0}")]
    Failed(String),
}

impl PredictionError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            PredictionError::ModelUnavailable(_) => 503,
            PredictionError::NonFiniteInput(_) => 400,
            PredictionError::NonFiniteOutput(_) => 422,
            PredictionError::Failed(_) => 422,
        }
    }
}
