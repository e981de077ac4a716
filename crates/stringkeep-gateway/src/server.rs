// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use stringkeep_core::{RecordStore, StoreError};

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The record store every handler operates on.
    pub store: Arc<dyn RecordStore>,
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            start_time: Instant::now(),
        }
    }
}

/// Listener address (mirrors `ServerConfig` from stringkeep-config so the
/// gateway does not depend on the config crate).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind. 0 picks a free port.
    pub port: u16,
}

/// Build the application router.
///
/// - GET /api, GET /api/{id}
/// - POST /api/create, POST /api/update
/// - DELETE /api/delete?id=
/// - GET /health
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/api", get(handlers::read_all))
        .route("/api/{id}", get(handlers::read_by_id))
        .route("/api/create", post(handlers::create))
        .route("/api/update", post(handlers::update))
        .route("/api/delete", delete(handlers::delete))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the listener without serving yet.
pub async fn bind(config: &ServerConfig) -> Result<tokio::net::TcpListener, StoreError> {
    let addr = format!("{}:{}", config.host, config.port);
    tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|e| StoreError::Internal(format!("failed to bind gateway to {addr}: {e}")))
}

/// Serve on an already-bound listener until `shutdown` resolves.
///
/// In-flight requests are drained before this returns.
pub async fn serve<F>(
    listener: tokio::net::TcpListener,
    state: GatewayState,
    shutdown: F,
) -> Result<(), StoreError>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "gateway listening");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| StoreError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("gateway stopped");
    Ok(())
}
