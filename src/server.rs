//! HTTP server
//!
//! Routes:
//! - `POST /api/fetch-meta`
//! - `GET /health`, `GET /ready`, `GET /status`

use std::sync::Arc;

use axum::routing::post;
use axum::Router;
use tracing::info;

use crate::config::ServerConfig;
use crate::cors::cors_for;
use crate::error::Result;
use crate::handlers::{fetch_meta_handler, status_router, AppState};

/// Build the application router
pub fn router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    Router::new()
        .route("/api/fetch-meta", post(fetch_meta_handler))
        .merge(status_router())
        .layer(cors_for(config.permissive_cors))
        .with_state(state)
}

/// Bind `config.socket_addr()` and serve until ctrl-c
pub async fn serve(state: Arc<AppState>, config: &ServerConfig) -> Result<()> {
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        addr = %listener.local_addr()?,
        permissive_cors = config.permissive_cors,
        "Listening"
    );

    axum::serve(listener, router(state, config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
