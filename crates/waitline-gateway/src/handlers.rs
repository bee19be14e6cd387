// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Handles POST/GET/PUT /queue, GET /status-customer, GET /status-admin,
//! GET /health. Every error leaves as `{ "error": ... }` with the status the
//! taxonomy dictates: 400 for validation, 404 for unknown tickets, 500 for
//! store failures.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use waitline_core::{TicketStatus, WaitlineError};

use crate::server::GatewayState;

/// Request body for POST /queue.
#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    /// Customer name; trimmed server-side, must be non-empty.
    pub name: String,
}

/// Request body for PUT /queue.
#[derive(Debug, Deserialize)]
pub struct UpdateTicketRequest {
    /// Ticket id to update.
    pub id: String,
    /// New status; must be `Queuing`, `Processed`, or `Finished`.
    pub status: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Seconds since the gateway started.
    pub uptime_secs: u64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Map a store error onto its HTTP status and `{error}` body.
fn error_response(err: WaitlineError) -> Response {
    let status = match &err {
        WaitlineError::Validation(_) => StatusCode::BAD_REQUEST,
        WaitlineError::NotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "request failed against the store");
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// Turn a malformed/mistyped JSON body into the same 400 `{error}` shape as
/// any other validation failure, instead of axum's default rejection.
fn body_error(rejection: JsonRejection) -> Response {
    error_response(WaitlineError::Validation(rejection.body_text()))
}

/// POST /queue
///
/// Allocates the next ticket number for today and returns the new ticket.
pub async fn post_queue(
    State(state): State<GatewayState>,
    body: Result<Json<CreateTicketRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return body_error(rejection),
    };

    match state.store.create_ticket(&body.name).await {
        Ok(ticket) => (StatusCode::CREATED, Json(ticket)).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /queue
///
/// Returns all of today's tickets, descending by number.
pub async fn get_queue(State(state): State<GatewayState>) -> Response {
    match state.store.list_tickets().await {
        Ok(tickets) => (StatusCode::OK, Json(tickets)).into_response(),
        Err(err) => error_response(err),
    }
}

/// PUT /queue
///
/// Applies a new status to an existing ticket and returns the updated ticket.
pub async fn put_queue(
    State(state): State<GatewayState>,
    body: Result<Json<UpdateTicketRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return body_error(rejection),
    };

    if body.id.trim().is_empty() {
        return error_response(WaitlineError::Validation(
            "ticket id is required".to_string(),
        ));
    }

    let status = match body.status.parse::<TicketStatus>() {
        Ok(status) => status,
        Err(_) => {
            return error_response(WaitlineError::Validation(
                "valid status is required (Queuing, Processed, or Finished)".to_string(),
            ));
        }
    };

    match state.store.update_status(&body.id, status).await {
        Ok(ticket) => (StatusCode::OK, Json(ticket)).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /status-customer
///
/// Returns the currently-serving number and the waiting count.
pub async fn get_customer_status(State(state): State<GatewayState>) -> Response {
    match state.store.customer_status().await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /status-admin
///
/// Returns today's ticket counts grouped by status.
pub async fn get_admin_stats(State(state): State<GatewayState>) -> Response {
    match state.store.admin_stats().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /health
///
/// Liveness probe for process managers.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}
