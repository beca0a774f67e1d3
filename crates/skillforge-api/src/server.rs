//! HTTP server wiring

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{config::AppConfig, middleware::logging_middleware, routes, state::AppState};

/// Configured API server
pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    /// Create a server from configuration
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            state: AppState::new(config)?,
        })
    }

    /// Create a server around prepared state
    pub fn with_state(state: AppState) -> Self {
        Self { state }
    }

    /// Full router with middleware and state applied
    pub fn router(&self) -> Router {
        routes::all_routes()
            .layer(middleware::from_fn(logging_middleware))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind and serve until Ctrl-C
    pub async fn run(self) -> anyhow::Result<()> {
        let server = &self.state.config.server;
        let listener = TcpListener::bind((server.host.as_str(), server.port)).await?;
        info!(
            address = %listener.local_addr()?,
            scoring = self.state.config.quality.enabled,
            "SkillForge API listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("SkillForge API stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
