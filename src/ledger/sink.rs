//! # Ledger Sinks
//!
//! A sink receives the full rendered history after every append and replaces
//! whatever it held before.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use uuid::Uuid;

use super::errors::{PersistenceError, PersistenceResult};

/// Destination for whole-history rewrites
pub trait LedgerSink: Send + Sync + fmt::Debug {
    /// Replace the sink contents with `contents`
    fn replace(&self, contents: &[u8]) -> PersistenceResult<()>;

    /// Where the data goes, for log lines
    fn describe(&self) -> String;
}

/// CSV file on the local filesystem
///
/// Each write goes to its own uniquely named sibling temp file which is then
/// renamed over the target. Readers never see a partially written history,
/// and concurrent writers sharing one path never clobber each other's temp
/// file; the last rename wins.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
        self.path.with_file_name(name)
    }
}

impl LedgerSink for FileSink {
    fn replace(&self, contents: &[u8]) -> PersistenceResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| PersistenceError::CreateDir {
                    path: parent.display().to_string(),
                    message: e.to_string(),
                })?;
            }
        }

        let write_err = |e: std::io::Error| PersistenceError::Write {
            path: self.path.display().to_string(),
            message: e.to_string(),
        };

        let temp = self.temp_path();
        fs::write(&temp, contents).map_err(write_err)?;
        fs::rename(&temp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp);
            write_err(e)
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Sink that discards everything (persistence disabled)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LedgerSink for NullSink {
    fn replace(&self, _contents: &[u8]) -> PersistenceResult<()> {
        Ok(())
    }

    fn describe(&self) -> String {
        "null".to_string()
    }
}

/// In-memory sink for testing
#[derive(Debug, Default)]
pub struct MemorySink {
    contents: Mutex<Vec<u8>>,
    writes: AtomicUsize,
    failing: AtomicBool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink whose writes all fail until [`MemorySink::set_failing`] clears it
    pub fn failing() -> Self {
        let sink = Self::default();
        sink.set_failing(true);
        sink
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Last successfully written contents
    pub fn contents(&self) -> Vec<u8> {
        self.contents
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    /// Number of successful writes
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl LedgerSink for MemorySink {
    fn replace(&self, contents: &[u8]) -> PersistenceResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PersistenceError::Rejected("memory sink set to fail".to_string()));
        }
        let mut current = self
            .contents
            .lock()
            .map_err(|_| PersistenceError::Rejected("Lock poisoned".to_string()))?;
        *current = contents.to_vec();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

impl<T: LedgerSink + ?Sized> LedgerSink for std::sync::Arc<T> {
    fn replace(&self, contents: &[u8]) -> PersistenceResult<()> {
        (**self).replace(contents)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
