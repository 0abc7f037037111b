//! # Model Artifact
//!
//! JSON-serialized regression model. Two forms are supported:
//!
//! ```json
//! {"kind": "linear", "intercept": 25792.2, "slope": 9449.96}
//! {"kind": "polynomial", "coefficients": [25000.0, 9000.0, 12.5]}
//! ```

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{ModelLoadError, PredictionError, PredictionResult};
use super::port::Predictor;

/// Functional form of a regression model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModelForm {
    /// `intercept + slope * x`
    Linear { intercept: f64, slope: f64 },
    /// `c0 + c1*x + c2*x^2 + ...`
    Polynomial { coefficients: Vec<f64> },
}

/// A loaded, pre-trained single-input regression model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionModel {
    /// Optional human-readable model name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub form: ModelForm,
}

impl RegressionModel {
    pub fn linear(intercept: f64, slope: f64) -> Self {
        Self {
            name: None,
            form: ModelForm::Linear { intercept, slope },
        }
    }

    pub fn polynomial(coefficients: Vec<f64>) -> Self {
        Self {
            name: None,
            form: ModelForm::Polynomial { coefficients },
        }
    }

    /// Load and validate an artifact from disk
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                ModelLoadError::NotFound(path.display().to_string())
            } else {
                ModelLoadError::Io(e.to_string())
            }
        })?;

        Self::from_json(&content)
    }

    /// Parse and validate an artifact from a JSON string
    pub fn from_json(content: &str) -> Result<Self, ModelLoadError> {
        let model: RegressionModel =
            serde_json::from_str(content).map_err(|e| ModelLoadError::Parse(e.to_string()))?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelLoadError> {
        match &self.form {
            ModelForm::Linear { intercept, slope } => {
                if !intercept.is_finite() || !slope.is_finite() {
                    return Err(ModelLoadError::Invalid(
                        "linear parameters must be finite".to_string(),
                    ));
                }
            }
            ModelForm::Polynomial { coefficients } => {
                if coefficients.is_empty() {
                    return Err(ModelLoadError::Invalid(
                        "polynomial has no coefficients".to_string(),
                    ));
                }
                if coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(ModelLoadError::Invalid(
                        "polynomial coefficients must be finite".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Display name, falling back to the form
    pub fn display_name(&self) -> String {
        match (&self.name, &self.form) {
            (Some(name), _) => name.clone(),
            (None, ModelForm::Linear { .. }) => "linear".to_string(),
            (None, ModelForm::Polynomial { coefficients }) => {
                format!("polynomial(degree={})", coefficients.len() - 1)
            }
        }
    }

    fn evaluate(&self, x: f64) -> f64 {
        match &self.form {
            ModelForm::Linear { intercept, slope } => intercept + slope * x,
            // Horner's scheme, highest degree first
            ModelForm::Polynomial { coefficients } => coefficients
                .iter()
                .rev()
                .fold(0.0, |acc, c| acc * x + c),
        }
    }
}

impl Predictor for RegressionModel {
    fn predict(&self, x: f64) -> PredictionResult<f64> {
        if !x.is_finite() {
            return Err(PredictionError::NonFiniteInput(x));
        }
        let y = self.evaluate(x);
        if !y.is_finite() {
            return Err(PredictionError::NonFiniteOutput(x));
        }
        Ok(y)
    }

    fn describe(&self) -> String {
        self.display_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_linear_predict() {
        let model = RegressionModel::linear(25000.0, 9500.0);
        assert_eq!(model.predict(0.0).unwrap(), 25000.0);
        assert_eq!(model.predict(2.0).unwrap(), 44000.0);
    }

    #[test]
    fn test_polynomial_predict() {
        let model = RegressionModel::polynomial(vec![1.0, 2.0, 3.0]);
        // 1 + 2*2 + 3*4
        assert_eq!(model.predict(2.0).unwrap(), 17.0);
    }

    #[test]
    fn test_parse_tagged_json() {
        let model =
            RegressionModel::from_json(r#"{"kind":"linear","intercept":1.5,"slope":2.0,"name":"lr"}"#)
                .unwrap();
        assert_eq!(model.name.as_deref(), Some("lr"));
        assert_eq!(model.form, ModelForm::Linear { intercept: 1.5, slope: 2.0 });
    }

    #[test]
    fn test_empty_polynomial_rejected() {
        let result = RegressionModel::from_json(r#"{"kind":"polynomial","coefficients":[]}"#);
        assert!(matches!(result, Err(ModelLoadError::Invalid(_))));
    }

    #[test]
    fn test_unknown_kind_is_parse_error() {
        let result = RegressionModel::from_json(r#"{"kind":"forest"}"#);
        assert!(matches!(result, Err(ModelLoadError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = RegressionModel::load(&temp.path().join("missing.json"));
        assert!(matches!(result, Err(ModelLoadError::NotFound(_))));
    }

    #[test]
    fn test_non_finite_input() {
        let model = RegressionModel::linear(0.0, 1.0);
        assert!(matches!(
            model.predict(f64::NAN),
            Err(PredictionError::NonFiniteInput(_))
        ));
    }

    #[test]
    fn test_overflow_is_non_finite_output() {
        let model = RegressionModel::linear(0.0, f64::MAX);
        assert!(matches!(
            model.predict(10.0),
            Err(PredictionError::NonFiniteOutput(_))
        ));
    }
}
