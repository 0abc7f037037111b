//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::config::HttpServerConfig;
use super::dashboard_routes::{dashboard_routes, DashboardState};
use super::observability_routes::{health_routes, observability_routes};
use crate::observability::Event;

/// How often idle sessions are reclaimed
const REAPER_INTERVAL: Duration = Duration::from_secs(60);

/// HTTP Server for the salary dashboard
pub struct HttpServer {
    config: HttpServerConfig,
    state: Arc<DashboardState>,
    router: Router,
    session_idle_ttl: Option<Duration>,
}

impl HttpServer {
    /// Create a new HTTP server around shared dashboard state
    pub fn new(config: HttpServerConfig, state: Arc<DashboardState>) -> Self {
        let router = Self::build_router(&config, Arc::clone(&state));
        Self {
            config,
            state,
            router,
            session_idle_ttl: None,
        }
    }

    /// Reclaim sessions idle for longer than `ttl` while serving
    pub fn with_session_idle_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.session_idle_ttl = ttl;
        self
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, state: Arc<DashboardState>) -> Router {
        Router::new()
            // Health check at root level
            .merge(health_routes())
            // Counters under /observability
            .nest("/observability", observability_routes(Arc::clone(&state.metrics)))
            // Model, sessions, predictions, history, chart
            .merge(dashboard_routes(state))
            .layer(config.cors_layer())
            .layer(TraceLayer::new_for_http())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server and serve until Ctrl-C
    pub async fn start(self) -> io::Result<()> {
        let addr = self.config.bind_addr()?;

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(
            event = %Event::ServerStart,
            addr = %addr,
            model = ?self.state.model.status(),
            "dashboard API available at http://{}",
            addr
        );

        if let Some(ttl) = self.session_idle_ttl {
            spawn_session_reaper(Arc::clone(&self.state), ttl);
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!(event = %Event::ServerStop, "server stopped");
        Ok(())
    }
}

fn spawn_session_reaper(state: Arc<DashboardState>, ttl: Duration) {
    let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(36_500));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(REAPER_INTERVAL);
        loop {
            ticker.tick().await;
            match state.sessions.expire_idle(ttl) {
                Ok(expired) => state.metrics.add_sessions_ended(expired as u64),
                Err(e) => tracing::warn!(error = %e, "session reaper failed"),
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
}
