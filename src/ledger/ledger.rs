//! # Prediction Ledger
//!
//! Append-only, session-scoped history of predictions.
//!
//! ## Invariants
//! - PL1: Insertion order is chronological order
//! - PL2: Length equals the number of successful predictions in the session
//! - PL3: After `append` returns, the sink holds the full history
//!   (unless the receipt reports a persistence failure)
//! - PL4: A persistence failure never rolls back the in-memory append

use std::fmt;

use super::errors::PersistenceError;
use super::format::{render_export_csv, render_raw_csv};
use super::record::{PredictionRecord, Timestamp};
use super::sink::{LedgerSink, NullSink};
use crate::observability::Event;

/// Outcome of a ledger append
#[derive(Debug, Clone, PartialEq)]
pub struct Appended {
    /// The record now stored in the ledger
    pub record: PredictionRecord,
    /// Set when the sink could not be updated
    pub persist_error: Option<PersistenceError>,
}

impl Appended {
    pub fn is_persisted(&self) -> bool {
        self.persist_error.is_none()
    }
}

/// Ordered history of one session's predictions
pub struct Ledger {
    records: Vec<PredictionRecord>,
    sink: Box<dyn LedgerSink>,
}

impl Ledger {
    /// Create an empty ledger mirrored to `sink`
    pub fn new(sink: Box<dyn LedgerSink>) -> Self {
        Self {
            records: Vec::new(),
            sink,
        }
    }

    /// Ledger that is never persisted
    pub fn in_memory() -> Self {
        Self::new(Box::new(NullSink))
    }

    /// Append a record and rewrite the sink with the whole history
    pub fn append(&mut self, input: f64, output: f64, now: Timestamp) -> Appended {
        let record = PredictionRecord::new(now, input, output);
        self.records.push(record.clone());

        let persist_error = self.persist().err();
        if let Some(e) = &persist_error {
            tracing::warn!(
                event = %Event::LedgerPersistFailed,
                sink = %self.sink.describe(),
                records = self.records.len(),
                error = %e,
                "ledger append kept in memory only"
            );
        }

        Appended {
            record,
            persist_error,
        }
    }

    fn persist(&self) -> Result<(), PersistenceError> {
        let raw = render_raw_csv(&self.records);
        self.sink.replace(raw.as_bytes())
    }

    /// Read-only view, oldest first
    pub fn all(&self) -> &[PredictionRecord] {
        &self.records
    }

    /// Currency-formatted CSV for download
    ///
    /// Independent of the sink; identical bytes until the next append.
    pub fn export(&self) -> Vec<u8> {
        render_export_csv(&self.records).into_bytes()
    }

    /// Raw numeric CSV, as mirrored to the sink
    pub fn raw_csv(&self) -> String {
        render_raw_csv(&self.records)
    }

    pub fn latest(&self) -> Option<&PredictionRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn sink_description(&self) -> String {
        self.sink.describe()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("records", &self.records.len())
            .field("sink", &self.sink)
            .finish()
    }
}
