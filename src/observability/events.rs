//! Observability events for the dashboard
//!
//! Every structured log line carries one of these names in its `event`
//! field, so logs can be filtered without parsing messages.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// HTTP server bound and serving
    ServerStart,
    /// HTTP server stopped
    ServerStop,

    // Model
    /// Artifact loaded and cached
    ModelLoaded,
    /// Artifact missing or corrupt
    ModelLoadFailed,

    // Sessions
    /// New session context created
    SessionStarted,
    /// Session ended explicitly
    SessionEnded,
    /// Idle sessions reclaimed
    SessionsExpired,

    // Predictions
    /// Prediction appended to a session ledger
    PredictionRecorded,
    /// Model call failed, ledger untouched
    PredictionFailed,
    /// Sink write failed after an in-memory append
    LedgerPersistFailed,
    /// History exported for download
    LedgerExported,

    // Curve
    /// Curve sampled with fallback values
    CurveDegraded,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ServerStart => "SERVER_START",
            Event::ServerStop => "SERVER_STOP",

            Event::ModelLoaded => "MODEL_LOADED",
            Event::ModelLoadFailed => "MODEL_LOAD_FAILED",

            Event::SessionStarted => "SESSION_STARTED",
            Event::SessionEnded => "SESSION_ENDED",
            Event::SessionsExpired => "SESSIONS_EXPIRED",

            Event::PredictionRecorded => "PREDICTION_RECORDED",
            Event::PredictionFailed => "PREDICTION_FAILED",
            Event::LedgerPersistFailed => "LEDGER_PERSIST_FAILED",
            Event::LedgerExported => "LEDGER_EXPORTED",

            Event::CurveDegraded => "CURVE_DEGRADED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::ModelLoaded.as_str(), "MODEL_LOADED");
        assert_eq!(Event::PredictionRecorded.to_string(), "PREDICTION_RECORDED");
    }
}
