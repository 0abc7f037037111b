//! CLI command implementations
//!
//! Each command loads the config file, wires the subsystems it needs and
//! prints a single JSON line.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::write_response;
use crate::curve;
use crate::http_server::{DashboardState, HttpServer};
use crate::ledger::format_currency;
use crate::model::ModelPort;
use crate::observability::init_logging;
use crate::session::SessionRegistry;

/// Parse arguments, install logging and dispatch
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config, port } => serve(&config, port),
        Command::Predict { config, experience } => predict(&config, experience),
        Command::Curve { config, points } => curve(&config, points),
    }
}

/// Write a default configuration file
///
/// Refuses to overwrite an existing file.
pub fn init(config_path: &Path) -> CliResult<()> {
    if config_path.exists() {
        return Err(CliError::already_initialized(config_path.display()));
    }

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = serde_json::to_string_pretty(&Config::default())?;
    fs::write(config_path, content)?;

    write_response(json!({
        "initialized": true,
        "config": config_path.display().to_string(),
    }))
}

/// Start the HTTP dashboard server
///
/// A missing or corrupt model does not stop the server: predictions report
/// the failure and the chart falls back to flat output.
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = Config::load(config_path)?;
    if let Some(port) = port {
        if port == 0 {
            return Err(CliError::config_error("port must be > 0"));
        }
        config.server.port = port;
    }

    let model = Arc::new(ModelPort::from_path(config.model_path()));
    // Load eagerly so the first request does not pay for it; failure is logged
    let _ = model.warm_up();

    let state = DashboardState::new(model, SessionRegistry::new(config.sink_policy()))
        .with_bounds(config.input)
        .with_prediction_delay(config.prediction_delay());

    let server = HttpServer::new(config.server.clone(), Arc::new(state))
        .with_session_idle_ttl(config.session_idle_ttl());

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Predict once in a fresh session and record it
pub fn predict(config_path: &Path, experience: f64) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let model = ModelPort::from_path(config.model_path());
    let registry = SessionRegistry::new(config.sink_policy());

    let handle = registry
        .create()
        .map_err(|e| CliError::prediction_failed(e.to_string()))?;
    let mut ctx = handle
        .lock()
        .map_err(|_| CliError::prediction_failed("Lock poisoned"))?;

    let appended = ctx
        .predict(&model, &config.input, experience)
        .map_err(|e| CliError::prediction_failed(e.to_string()))?;

    write_response(json!({
        "timestamp": appended.record.timestamp.to_string(),
        "experience": appended.record.input,
        "prediction": appended.record.output,
        "formatted": format_currency(appended.record.output),
        "persisted": appended.is_persisted(),
        "sink": ctx.ledger().sink_description(),
        "warning": appended.persist_error.as_ref().map(|e| e.to_string()),
    }))
}

/// Print the trend curve over the configured input range
pub fn curve(config_path: &Path, points: usize) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let model = ModelPort::from_path(config.model_path());

    let samples = curve::sample(&model, config.input.min, config.input.max, points)
        .map_err(|e| CliError::config_error(e.to_string()))?;

    write_response(json!({
        "model": model.status(),
        "degraded": samples.degraded,
        "points": samples.points,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_default_config_once() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("conf/salarydash.json");

        init(&path).unwrap();
        let written = Config::load(&path).unwrap();
        assert_eq!(written, Config::default());

        let err = init(&path).unwrap_err();
        assert_eq!(err.code_str(), "SALARY_CLI_ALREADY_INITIALIZED");
    }

    #[test]
    fn test_predict_without_model_fails() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("salarydash.json");
        let config = json!({
            "model_path": temp.path().join("missing.json"),
            "log_dir": temp.path().join("logs"),
        });
        fs::write(&config_path, config.to_string()).unwrap();

        let err = predict(&config_path, 5.0).unwrap_err();
        assert_eq!(err.code_str(), "SALARY_CLI_PREDICTION_FAILED");
        assert!(!temp.path().join("logs/predictions_log.csv").exists());
    }

    #[test]
    fn test_predict_writes_log() {
        let temp = TempDir::new().unwrap();
        let model_path = temp.path().join("model.json");
        fs::write(&model_path, r#"{"kind":"linear","intercept":25000.0,"slope":9000.0}"#).unwrap();
        let config_path = temp.path().join("salarydash.json");
        let config = json!({
            "model_path": model_path,
            "log_dir": temp.path().join("logs"),
        });
        fs::write(&config_path, config.to_string()).unwrap();

        predict(&config_path, 2.0).unwrap();

        let log = fs::read_to_string(temp.path().join("logs/predictions_log.csv")).unwrap();
        let lines: Vec<_> = log.lines().collect();
        assert_eq!(lines[0], "timestamp,experience,prediction");
        assert!(lines[1].ends_with(",2.0,43000.0"));
    }

    #[test]
    fn test_curve_with_missing_model_degrades() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("salarydash.json");
        let config = json!({ "model_path": temp.path().join("missing.json") });
        fs::write(&config_path, config.to_string()).unwrap();

        curve(&config_path, 10).unwrap();
    }
}
