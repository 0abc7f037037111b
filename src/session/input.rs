//! # Experience Input
//!
//! Bounds of the years-of-experience slider and validation of submitted values.

use serde::{Deserialize, Serialize};

use super::errors::InputError;

/// Tolerance when checking a value sits on the step grid
const STEP_EPSILON: f64 = 1e-9;

/// Slider bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputBounds {
    #[serde(default = "default_min")]
    pub min: f64,
    #[serde(default = "default_max")]
    pub max: f64,
    #[serde(default = "default_step")]
    pub step: f64,
    #[serde(default = "default_value")]
    pub default: f64,
}

fn default_min() -> f64 {
    0.0
}
fn default_max() -> f64 {
    20.0
}
fn default_step() -> f64 {
    0.5
}
fn default_value() -> f64 {
    5.0
}

impl Default for InputBounds {
    fn default() -> Self {
        Self {
            min: default_min(),
            max: default_max(),
            step: default_step(),
            default: default_value(),
        }
    }
}

/// A validated years-of-experience value
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct ExperienceInput(f64);

impl ExperienceInput {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl InputBounds {
    /// Check the bounds themselves are usable
    pub fn is_consistent(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.step.is_finite()
            && self.min <= self.max
            && self.step > 0.0
            && self.validate(self.default).is_ok()
    }

    /// Accept `value` if it lies on the slider grid
    pub fn validate(&self, value: f64) -> Result<ExperienceInput, InputError> {
        if !value.is_finite() {
            return Err(InputError::NotFinite);
        }
        if value < self.min || value > self.max {
            return Err(InputError::OutOfRange {
                value,
                min: self.min,
                max: self.max,
            });
        }

        let steps = (value - self.min) / self.step;
        if (steps - steps.round()).abs() > STEP_EPSILON {
            return Err(InputError::OffStep {
                value,
                min: self.min,
                step: self.step,
            });
        }

        Ok(ExperienceInput(value))
    }

    /// The slider's initial value
    pub fn default_input(&self) -> ExperienceInput {
        ExperienceInput(self.default)
    }
}
