//! CLI module for salarydash
//!
//! Provides command-line interface for:
//! - init: Write a default config file
//! - serve: Run the dashboard HTTP server
//! - predict: One-shot prediction, recorded to the log
//! - curve: Print the salary trend series

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{curve, init, predict, run, run_command, serve};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
