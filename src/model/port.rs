//! # Model Port
//!
//! Lazily loads the artifact once and shares it read-only afterwards.
//! Concurrent first callers block on the same `OnceLock` initialization, so
//! the artifact is never loaded twice.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use serde::Serialize;

use super::artifact::RegressionModel;
use super::errors::{ModelLoadError, PredictionError, PredictionResult};
use crate::observability::Event;

/// Single-input, single-output numeric prediction capability
pub trait Predictor: Send + Sync + fmt::Debug {
    /// Predict the output for `x`
    fn predict(&self, x: f64) -> PredictionResult<f64>;

    /// Name shown in status reports
    fn describe(&self) -> String {
        "model".to_string()
    }
}

type Loader = Box<dyn Fn() -> Result<Arc<dyn Predictor>, ModelLoadError> + Send + Sync>;

/// Availability of the model as seen by callers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ModelStatus {
    Loaded { name: String, source: String },
    Unavailable { reason: String, source: String },
}

impl ModelStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ModelStatus::Loaded { .. })
    }
}

/// Process-scoped handle to the prediction model
pub struct ModelPort {
    source: String,
    loader: Loader,
    cell: OnceLock<Result<Arc<dyn Predictor>, ModelLoadError>>,
    loads: AtomicUsize,
}

impl ModelPort {
    /// Port that loads a JSON artifact from `path` on first use
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        let source = path.display().to_string();
        let loader: Loader = Box::new(move || {
            RegressionModel::load(Path::new(&path)).map(|m| Arc::new(m) as Arc<dyn Predictor>)
        });
        Self::with_loader(source, loader)
    }

    /// Port around an already constructed predictor
    pub fn from_predictor(predictor: Arc<dyn Predictor>) -> Self {
        let port = Self::with_loader("memory", Box::new(|| unreachable_loader()));
        let _ = port.cell.set(Ok(predictor));
        port
    }

    /// Port whose load has already failed
    pub fn unavailable(error: ModelLoadError) -> Self {
        let port = Self::with_loader("none", Box::new(|| unreachable_loader()));
        let _ = port.cell.set(Err(error));
        port
    }

    fn with_loader(source: impl Into<String>, loader: Loader) -> Self {
        Self {
            source: source.into(),
            loader,
            cell: OnceLock::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Resolve the cached load result, loading on first call
    fn resolve(&self) -> &Result<Arc<dyn Predictor>, ModelLoadError> {
        self.cell.get_or_init(|| {
            self.loads.fetch_add(1, Ordering::SeqCst);
            let result = (self.loader)();
            match &result {
                Ok(model) => tracing::info!(
                    event = %Event::ModelLoaded,
                    source = %self.source,
                    model = %model.describe(),
                    "model loaded"
                ),
                Err(e) => tracing::error!(
                    event = %Event::ModelLoadFailed,
                    source = %self.source,
                    error = %e,
                    "model could not be loaded"
                ),
            }
            result
        })
    }

    /// Force the load now (normally done at startup)
    pub fn warm_up(&self) -> Result<(), ModelLoadError> {
        self.resolve().as_ref().map(|_| ()).map_err(|e| e.clone())
    }

    /// Shared predictor, or the cached load error
    pub fn handle(&self) -> Result<Arc<dyn Predictor>, ModelLoadError> {
        self.resolve().clone()
    }

    pub fn is_available(&self) -> bool {
        self.resolve().is_ok()
    }

    pub fn status(&self) -> ModelStatus {
        match self.resolve() {
            Ok(model) => ModelStatus::Loaded {
                name: model.describe(),
                source: self.source.clone(),
            },
            Err(e) => ModelStatus::Unavailable {
                reason: e.to_string(),
                source: self.source.clone(),
            },
        }
    }

    /// Predict through the shared model
    pub fn predict(&self, x: f64) -> PredictionResult<f64> {
        match self.resolve() {
            Ok(model) => model.predict(x),
            Err(e) => Err(PredictionError::ModelUnavailable(e.clone())),
        }
    }

    /// Number of times the loader ran (at most one)
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

fn unreachable_loader() -> Result<Arc<dyn Predictor>, ModelLoadError> {
    Err(ModelLoadError::Invalid("port was constructed preloaded".to_string()))
}

impl fmt::Debug for ModelPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelPort")
            .field("source", &self.source)
            .field("initialized", &self.cell.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn test_loads_once() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("model.json");
        fs::write(&path, r#"{"kind":"linear","intercept":100.0,"slope":10.0}"#).unwrap();

        let port = Arc::new(ModelPort::from_path(&path));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let port = Arc::clone(&port);
                thread::spawn(move || port.predict(i as f64).unwrap())
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(port.load_count(), 1);
        assert_eq!(port.predict(1.0).unwrap(), 110.0);
        assert_eq!(port.load_count(), 1);
    }

    #[test]
    fn test_missing_artifact_degrades() {
        let temp = TempDir::new().unwrap();
        let port = ModelPort::from_path(temp.path().join("absent.json"));

        assert!(!port.is_available());
        assert!(matches!(
            port.predict(5.0),
            Err(PredictionError::ModelUnavailable(ModelLoadError::NotFound(_)))
        ));
        assert!(!port.status().is_loaded());
        // Failure is cached as well
        assert_eq!(port.load_count(), 1);
    }

    #[test]
    fn test_from_predictor_status() {
        let port = ModelPort::from_predictor(Arc::new(RegressionModel::linear(0.0, 1.0)));
        assert_eq!(port.load_count(), 0);
        match port.status() {
            ModelStatus::Loaded { name, .. } => assert_eq!(name, "linear"),
            other => panic!("unexpected status: {:?}", other),
        }
    }

    #[test]
    fn test_unavailable_warm_up() {
        let port = ModelPort::unavailable(ModelLoadError::Io("disk gone".into()));
        assert_eq!(port.warm_up(), Err(ModelLoadError::Io("disk gone".into())));
    }
}
