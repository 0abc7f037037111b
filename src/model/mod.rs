//! # Model Port
//!
//! Boundary around the externally trained regression artifact.
//!
//! ## Invariants
//! - MP1: The artifact is loaded at most once per port
//! - MP2: A failed load degrades prediction, it never panics
//! - MP3: `predict` is a pure function of the loaded artifact

pub mod artifact;
pub mod errors;
pub mod port;

pub use artifact::RegressionModel;
pub use errors::{ModelLoadError, PredictionError, PredictionResult};
pub use port::{ModelPort, ModelStatus, Predictor};
