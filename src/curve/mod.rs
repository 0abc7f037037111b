//! # Curve Sampler
//!
//! Dense (input, predicted output) series for the salary trend chart.
//!
//! ## Invariants
//! - CS1: `count` points, strictly ascending when `count > 1` and `min < max`
//! - CS2: First input is `min`, last input is exactly `max`
//! - CS3: When the model cannot answer, the output is [`FALLBACK_OUTPUT`] and
//!   the series is marked degraded

pub mod cache;

pub use cache::CurveCache;

use serde::Serialize;
use thiserror::Error;

use crate::model::ModelPort;
use crate::observability::Event;

/// Output used for every point the model cannot predict
pub const FALLBACK_OUTPUT: f64 = 0.0;

/// Default chart domain and density
pub const DEFAULT_DOMAIN_MIN: f64 = 0.0;
pub const DEFAULT_DOMAIN_MAX: f64 = 20.0;
pub const DEFAULT_POINTS: usize = 100;

/// Invalid sampling request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("Invalid domain [{min}, {max}]")]
    InvalidDomain { min: f64, max: f64 },
}

impl CurveError {
    pub fn status_code(&self) -> u16 {
        400
    }
}

/// One chart point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub input: f64,
    pub output: f64,
}

/// A sampled series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveSamples {
    pub points: Vec<CurvePoint>,
    /// True when at least one output is the fallback value
    pub degraded: bool,
}

impl CurveSamples {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// `count` evenly spaced values in `[min, max]`, both ends included
pub fn linspace(min: f64, max: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let steps = (count - 1) as f64;
            let span = max - min;
            (0..count)
                .map(|i| {
                    if i == count - 1 {
                        max
                    } else {
                        min + span * (i as f64) / steps
                    }
                })
                .collect()
        }
    }
}

/// Predict every point of the domain through `port`
pub fn sample(
    port: &ModelPort,
    min: f64,
    max: f64,
    count: usize,
) -> Result<CurveSamples, CurveError> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(CurveError::InvalidDomain { min, max });
    }

    let mut degraded = false;
    let points = linspace(min, max, count)
        .into_iter()
        .map(|input| {
            let output = port.predict(input).unwrap_or_else(|_| {
                degraded = true;
                FALLBACK_OUTPUT
            });
            CurvePoint { input, output }
        })
        .collect();

    if degraded {
        tracing::warn!(
            event = %Event::CurveDegraded,
            min,
            max,
            count,
            available = port.is_available(),
            "curve sampled with fallback output"
        );
    }

    Ok(CurveSamples { points, degraded })
}
