//! # Prediction Ledger
//!
//! Session-scoped prediction history and the artifacts derived from it:
//! - the raw CSV mirrored to disk on every append
//! - the currency-formatted CSV offered for download

pub mod errors;
pub mod format;
pub mod ledger;
pub mod record;
pub mod sink;

pub use errors::{PersistenceError, PersistenceResult, TimestampError};
pub use format::{format_currency, render_export_csv, render_raw_csv};
pub use ledger::{Appended, Ledger};
pub use record::{PredictionRecord, Timestamp, TIMESTAMP_FORMAT};
pub use sink::{FileSink, LedgerSink, MemorySink, NullSink};

/// Column-compatible default sink location
pub const DEFAULT_LOG_FILE: &str = "predictions_log.csv";

/// Download filename for the exported history
pub const EXPORT_FILE_NAME: &str = "salary_predictions_log.csv";

/// MIME type of the exported history
pub const EXPORT_MIME_TYPE: &str = "text/csv";
