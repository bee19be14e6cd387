// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the store trait, the storage backend, and the
//! gateway.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::WaitlineError;

/// Lifecycle stage of a ticket.
///
/// Serialized on the wire and in the store as the variant name
/// (`"Queuing"`, `"Processed"`, `"Finished"`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum TicketStatus {
    /// Waiting to be served.
    Queuing,
    /// Currently being served.
    Processed,
    /// Service complete.
    Finished,
}

impl TicketStatus {
    /// The transition rule applied on every status update.
    ///
    /// Deliberately permissive: any status may move to any other, including
    /// backwards (staff use this for manual correction). Centralizing the
    /// rule here means a stricter state machine has exactly one place to land.
    pub fn can_transition_to(self, _next: TicketStatus) -> bool {
        true
    }
}

/// One customer's queue entry for a given calendar day.
///
/// `number` is unique and dense within `day`; both are fixed at creation.
/// The wire field for `day` is `date`, matching the published API contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Opaque unique identifier, assigned at creation.
    pub id: String,
    /// Position in the day's queue, starting at 1.
    pub number: i64,
    /// Calendar day the ticket was created on; the numbering partition key.
    #[serde(rename = "date")]
    pub day: NaiveDate,
    /// Trimmed customer name.
    pub name: String,
    /// Current lifecycle stage.
    pub status: TicketStatus,
    /// RFC 3339 creation timestamp, for display and ordering only.
    pub created_at: String,
}

/// Customer-facing projection: who is being served and how many are waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerStatus {
    /// The number currently being served. The smallest `Processed` number
    /// today, else the largest `Finished` number, else 0.
    pub current_number: i64,
    /// Count of today's tickets still `Queuing`.
    pub queue_count: i64,
}

/// Admin projection: today's ticket counts grouped by status.
///
/// `total` always equals `queuing + processed + finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStats {
    pub total: i64,
    pub queuing: i64,
    pub processed: i64,
    pub finished: i64,
}

/// Health status reported by store health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Store is fully operational.
    Healthy,
    /// Store is operational but experiencing issues.
    Degraded(String),
    /// Store is not operational.
    Unhealthy(String),
}

/// Validate and trim a customer name for ticket creation.
///
/// Whitespace-only input is a validation error; the allocator never sees it.
pub fn normalize_name(name: &str) -> Result<String, WaitlineError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(WaitlineError::Validation(
            "name is required and must be a non-empty string".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
