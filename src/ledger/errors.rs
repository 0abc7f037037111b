//! # Ledger Errors

use thiserror::Error;

/// Result type for sink writes
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Failure to mirror the ledger to its sink
///
/// Never rolls back the in-memory append that triggered it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PersistenceError {
    #[error("Failed to create log directory {path}: {message}")]
    CreateDir { path: String, message: String },

    #[error("Failed to write ledger to {path}: {message}")]
    Write { path: String, message: String },

    #[error("Sink rejected write: {0}")]
    Rejected(String),
}

/// Failure to parse a fixed-format timestamp
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid timestamp '{input}', expected YYYY-MM-DD HH:MM:SS")]
pub struct TimestampError {
    pub input: String,
}
