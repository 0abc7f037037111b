//! Configuration file
//!
//! JSON file, every field optional:
//!
//! ```json
//! {
//!   "model_path": "best_salary_model.json",
//!   "log_dir": "logs",
//!   "sink_scope": "shared",
//!   "persist": true,
//!   "prediction_delay_ms": 0,
//!   "session_idle_ttl_secs": 3600,
//!   "input": {"min": 0.0, "max": 20.0, "step": 0.5, "default": 5.0},
//!   "server": {"host": "127.0.0.1", "port": 8501, "cors_origins": []}
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::http_server::HttpServerConfig;
use crate::observability::Event;
use crate::session::{InputBounds, SinkPolicy, SinkScope};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Serialized regression model (default "best_salary_model.json")
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Directory for prediction logs (default "logs")
    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// Shared log file or one per session (default shared)
    #[serde(default)]
    pub sink_scope: SinkScope,

    /// Mirror ledgers to CSV files (default true)
    #[serde(default = "default_persist")]
    pub persist: bool,

    /// Pause before each prediction, for UI pacing (default 0)
    #[serde(default)]
    pub prediction_delay_ms: u64,

    /// Idle sessions older than this are dropped; 0 keeps them forever
    #[serde(default = "default_session_idle_ttl")]
    pub session_idle_ttl_secs: u64,

    #[serde(default)]
    pub input: InputBounds,

    #[serde(default)]
    pub server: HttpServerConfig,
}

fn default_model_path() -> String {
    "best_salary_model.json".to_string()
}
fn default_log_dir() -> String {
    "logs".to_string()
}
fn default_persist() -> bool {
    true
}
fn default_session_idle_ttl() -> u64 {
    3600
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            log_dir: default_log_dir(),
            sink_scope: SinkScope::default(),
            persist: default_persist(),
            prediction_delay_ms: 0,
            session_idle_ttl_secs: default_session_idle_ttl(),
            input: InputBounds::default(),
            server: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file; a missing file yields the defaults
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(
                    event = %Event::ConfigLoaded,
                    path = %path.display(),
                    "config file not found, using defaults"
                );
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(CliError::config_error(format!("Failed to read config: {}", e)))
            }
        };

        let config = Self::from_json(&content)?;
        tracing::info!(event = %Event::ConfigLoaded, path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Parse and validate configuration JSON
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.model_path.trim().is_empty() {
            return Err(CliError::config_error("model_path must not be empty"));
        }

        if self.persist && self.log_dir.trim().is_empty() {
            return Err(CliError::config_error(
                "log_dir must not be empty when persist is enabled",
            ));
        }

        if self.server.port == 0 {
            return Err(CliError::config_error("server.port must be > 0"));
        }

        if !self.input.is_consistent() {
            return Err(CliError::config_error(format!(
                "Invalid input bounds: {:?}",
                self.input
            )));
        }

        Ok(())
    }

    pub fn model_path(&self) -> PathBuf {
        PathBuf::from(&self.model_path)
    }

    /// Where session ledgers are written
    pub fn sink_policy(&self) -> SinkPolicy {
        if self.persist {
            SinkPolicy::new(&self.log_dir, self.sink_scope)
        } else {
            SinkPolicy::disabled()
        }
    }

    pub fn prediction_delay(&self) -> Duration {
        Duration::from_millis(self.prediction_delay_ms)
    }

    pub fn session_idle_ttl(&self) -> Option<Duration> {
        match self.session_idle_ttl_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
