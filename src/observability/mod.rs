//! Observability subsystem
//!
//! - Structured logging through `tracing`, one named [`Event`] per line
//! - Monotonic counters in [`MetricsRegistry`]
//!
//! Observability is read-only: a failure here never fails a request.
//!
//! ```ignore
//! use salarydash::observability::{init_logging, Event};
//!
//! init_logging(false);
//! tracing::info!(event = %Event::ServerStart, "listening");
//! ```

mod events;
mod metrics;

pub use events::Event;
pub use metrics::{MetricsRegistry, MetricsSnapshot};

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install the global `tracing` subscriber
///
/// Honors `RUST_LOG`; falls back to [`DEFAULT_LOG_FILTER`]. Safe to call more
/// than once, later calls are ignored.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { DEFAULT_LOG_FILTER })
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
