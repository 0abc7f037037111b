//! # Session Registry
//!
//! Owns every live [`SessionContext`]. Each session gets its own ledger; no
//! ledger is ever shared.
//!
//! ## Invariants
//! - SR1: One ledger per session
//! - SR2: Ending a session drops its ledger; the sink file stays on disk

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::context::SessionContext;
use super::errors::{SessionError, SessionResult};
use crate::ledger::{FileSink, Ledger, LedgerSink, NullSink, DEFAULT_LOG_FILE};
use crate::observability::Event;

/// Shared handle to one session
pub type SessionHandle = Arc<Mutex<SessionContext>>;

/// How session ledgers map onto sink files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkScope {
    /// All sessions rewrite `<log_dir>/predictions_log.csv`; last writer wins
    #[default]
    Shared,
    /// `<log_dir>/<session-id>/predictions_log.csv`
    PerSession,
}

/// Where session ledgers are persisted
#[derive(Debug, Clone, PartialEq)]
pub struct SinkPolicy {
    pub log_dir: PathBuf,
    pub scope: SinkScope,
    pub enabled: bool,
}

impl SinkPolicy {
    pub fn new(log_dir: impl Into<PathBuf>, scope: SinkScope) -> Self {
        Self {
            log_dir: log_dir.into(),
            scope,
            enabled: true,
        }
    }

    /// Policy that never touches the filesystem
    pub fn disabled() -> Self {
        Self {
            log_dir: PathBuf::new(),
            scope: SinkScope::Shared,
            enabled: false,
        }
    }

    /// Path of the CSV file for `session`
    pub fn path_for(&self, session: Uuid) -> PathBuf {
        match self.scope {
            SinkScope::Shared => self.log_dir.join(DEFAULT_LOG_FILE),
            SinkScope::PerSession => self
                .log_dir
                .join(session.to_string())
                .join(DEFAULT_LOG_FILE),
        }
    }

    pub fn sink_for(&self, session: Uuid) -> Box<dyn LedgerSink> {
        if self.enabled {
            Box::new(FileSink::new(self.path_for(session)))
        } else {
            Box::new(NullSink)
        }
    }
}

impl Default for SinkPolicy {
    fn default() -> Self {
        Self::new("logs", SinkScope::Shared)
    }
}

/// Thread-safe map of live sessions
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
    sinks: SinkPolicy,
}

impl SessionRegistry {
    pub fn new(sinks: SinkPolicy) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            sinks,
        }
    }

    pub fn sink_policy(&self) -> &SinkPolicy {
        &self.sinks
    }

    /// Start a session with a fresh, empty ledger
    pub fn create(&self) -> SessionResult<SessionHandle> {
        let id = Uuid::new_v4();
        let ledger = Ledger::new(self.sinks.sink_for(id));
        let handle = Arc::new(Mutex::new(SessionContext::new(id, ledger)));

        let mut sessions = self.sessions.write().map_err(|_| lock_poisoned())?;
        sessions.insert(id, Arc::clone(&handle));

        tracing::info!(
            event = %Event::SessionStarted,
            session = %id,
            sink = %self.sinks.path_for(id).display(),
            live = sessions.len(),
            "session started"
        );

        Ok(handle)
    }

    pub fn get(&self, id: Uuid) -> SessionResult<SessionHandle> {
        let sessions = self.sessions.read().map_err(|_| lock_poisoned())?;
        sessions.get(&id).cloned().ok_or(SessionError::NotFound(id))
    }

    /// End a session, dropping its in-memory ledger
    pub fn end(&self, id: Uuid) -> SessionResult<()> {
        let mut sessions = self.sessions.write().map_err(|_| lock_poisoned())?;
        sessions.remove(&id).ok_or(SessionError::NotFound(id))?;

        tracing::info!(event = %Event::SessionEnded, session = %id, "session ended");
        Ok(())
    }

    /// Drop sessions idle for longer than `ttl`, returning how many went
    pub fn expire_idle(&self, ttl: Duration) -> SessionResult<usize> {
        let cutoff = Utc::now() - ttl;
        let mut sessions = self.sessions.write().map_err(|_| lock_poisoned())?;

        let before = sessions.len();
        sessions.retain(|_, handle| match handle.lock() {
            Ok(ctx) => ctx.last_seen() > cutoff,
            // A poisoned session is unusable; reclaim it
            Err(_) => false,
        });
        let expired = before - sessions.len();

        if expired > 0 {
            tracing::info!(
                event = %Event::SessionsExpired,
                expired,
                live = sessions.len(),
                "idle sessions expired"
            );
        }

        Ok(expired)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(SinkPolicy::disabled())
    }
}

fn lock_poisoned() -> SessionError {
    SessionError::Internal("Lock poisoned".to_string())
}
