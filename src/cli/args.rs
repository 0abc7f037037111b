//! CLI argument definitions using clap
//!
//! Commands:
//! - salarydash init --config <path>
//! - salarydash serve --config <path> [--port <port>]
//! - salarydash predict --config <path> --experience <years>
//! - salarydash curve --config <path> [--points <n>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// salarydash - salary prediction dashboard service
#[derive(Parser, Debug)]
#[command(name = "salarydash")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default configuration file
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./salarydash.json")]
        config: PathBuf,
    },

    /// Start the dashboard HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./salarydash.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Predict one salary, record it and print the result
    Predict {
        /// Path to configuration file
        #[arg(long, default_value = "./salarydash.json")]
        config: PathBuf,

        /// Years of experience
        #[arg(long, short)]
        experience: f64,
    },

    /// Print the salary trend curve
    Curve {
        /// Path to configuration file
        #[arg(long, default_value = "./salarydash.json")]
        config: PathBuf,

        /// Number of evenly spaced points
        #[arg(long, default_value_t = 100)]
        points: usize,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
