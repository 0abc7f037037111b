//! Metrics registry
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only on process start

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters shared by all handlers
///
/// Relaxed ordering is enough: counters are independent and only read for
/// reporting.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    predictions_recorded: AtomicU64,
    prediction_failures: AtomicU64,
    persistence_failures: AtomicU64,
    sessions_started: AtomicU64,
    sessions_ended: AtomicU64,
    exports: AtomicU64,
    curves_sampled: AtomicU64,
    curves_degraded: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_predictions_recorded(&self) {
        self.predictions_recorded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_prediction_failures(&self) {
        self.prediction_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_persistence_failures(&self) {
        self.persistence_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_sessions_started(&self) {
        self.sessions_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_sessions_ended(&self, count: u64) {
        self.sessions_ended.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_exports(&self) {
        self.exports.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one curve sampling pass
    pub fn record_curve(&self, degraded: bool) {
        self.curves_sampled.fetch_add(1, Ordering::Relaxed);
        if degraded {
            self.curves_degraded.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            predictions_recorded: self.predictions_recorded.load(Ordering::Relaxed),
            prediction_failures: self.prediction_failures.load(Ordering::Relaxed),
            persistence_failures: self.persistence_failures.load(Ordering::Relaxed),
            sessions_started: self.sessions_started.load(Ordering::Relaxed),
            sessions_ended: self.sessions_ended.load(Ordering::Relaxed),
            exports: self.exports.load(Ordering::Relaxed),
            curves_sampled: self.curves_sampled.load(Ordering::Relaxed),
            curves_degraded: self.curves_degraded.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub predictions_recorded: u64,
    pub prediction_failures: u64,
    pub persistence_failures: u64,
    pub sessions_started: u64,
    pub sessions_ended: u64,
    pub exports: u64,
    pub curves_sampled: u64,
    pub curves_degraded: u64,
}
