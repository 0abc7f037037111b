//! # HTTP Server Module
//!
//! Axum server behind the salary dashboard. The page itself (widgets,
//! chart rendering, animations) is a client of these endpoints.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/model`, `/input` - Model status and slider bounds
//! - `/sessions/*` - Session lifecycle, predictions, history, CSV download, chart
//! - `/observability/*` - Counters

pub mod config;
pub mod dashboard_routes;
pub mod observability_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use dashboard_routes::DashboardState;
pub use server::HttpServer;
