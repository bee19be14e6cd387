// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Waitline queue service.

use thiserror::Error;

/// The primary error type used across the store trait and core operations.
///
/// The gateway maps variants onto HTTP statuses: `Validation` is 400,
/// `NotFound` is 404, everything store- or server-side is 500.
#[derive(Debug, Error)]
pub enum WaitlineError {
    /// Bad or missing input (empty name, unknown status value). Never retried.
    #[error("validation error: {0}")]
    Validation(String),

    /// The referenced ticket does not exist.
    #[error("ticket not found: {id}")]
    NotFound { id: String },

    /// Retryable store conflict (busy/locked connection, numbering collision).
    ///
    /// The storage layer retries these internally a bounded number of times
    /// before letting them surface.
    #[error("transient store conflict: {source}")]
    TransientStore {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The store failed in a way a retry will not fix. No partial write is
    /// visible when this is returned.
    #[error("store unavailable: {source}")]
    StoreUnavailable {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Gateway errors (bind failure, serve failure).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WaitlineError {
    /// Whether the operation that produced this error may be retried as-is.
    pub fn is_transient(&self) -> bool {
        matches!(self, WaitlineError::TransientStore { .. })
    }
}
