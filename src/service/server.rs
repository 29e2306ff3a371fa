// SPDX-License-Identifier: PMPL-1.0-or-later
//! HTTP server for the suggestion service

use super::{generate, GenerateRequest, GenerateResponse};
use crate::config::Config;
use crate::error::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Shared server state
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Build the service router
pub fn router(config: Config) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/generate", post(generate_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn generate_handler(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> std::result::Result<Json<GenerateResponse>, StatusCode> {
    // Analysis is CPU-bound; keep it off the async workers
    let config = state.config.clone();
    let response = tokio::task::spawn_blocking(move || generate(&request, &config))
        .await
        .map_err(|e| {
            warn!("generate task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    Ok(Json(response))
}

/// Serve on an already bound listener
pub async fn serve_on(listener: TcpListener, config: Config) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Suggestion service listening on http://{}", addr);
    }
    axum::serve(listener, router(config)).await?;
    Ok(())
}

/// Bind `server.host:server.port` from the config and serve until shutdown
pub async fn serve(config: Config) -> Result<()> {
    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    serve_on(listener, config).await
}
