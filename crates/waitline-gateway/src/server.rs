// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    routing::get,
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use waitline_core::{TicketStore, WaitlineError};

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The ticket store behind every endpoint.
    pub store: Arc<dyn TicketStore>,
    /// Process start time for uptime reporting on `/health`.
    pub start_time: Instant,
}

impl GatewayState {
    /// Create gateway state over a store.
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        Self {
            store,
            start_time: Instant::now(),
        }
    }
}

/// Gateway server configuration (mirrors GatewayConfig from waitline-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the gateway router.
///
/// Exposed separately from [`start_server`] so tests can drive the full HTTP
/// surface in-process:
/// - `POST /queue` — create a ticket
/// - `GET /queue` — today's tickets, descending by number
/// - `PUT /queue` — update a ticket's status
/// - `GET /status-customer` — currently-serving projection
/// - `GET /status-admin` — per-status counts
/// - `GET /health` — liveness probe
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route(
            "/queue",
            get(handlers::get_queue)
                .post(handlers::post_queue)
                .put(handlers::put_queue),
        )
        .route("/status-customer", get(handlers::get_customer_status))
        .route("/status-admin", get(handlers::get_admin_stats))
        .route("/health", get(handlers::get_health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Binds to the configured host:port and serves until `cancel` fires, then
/// drains in-flight requests and returns.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), WaitlineError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| WaitlineError::Gateway {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .map_err(|e| WaitlineError::Gateway {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
