// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket store trait implemented by persistence backends.

use async_trait::async_trait;

use crate::error::WaitlineError;
use crate::types::{AdminStats, CustomerStatus, HealthStatus, Ticket, TicketStatus};

/// Storage seam between the gateway and the persistence backend.
///
/// All five queue operations plus lifecycle management. Implementations own
/// the numbering invariant: for any day, issued numbers are exactly
/// `1..=count` with no duplicates or gaps, under arbitrary concurrency.
/// "Today" is the implementation's local calendar day at call time.
#[async_trait]
pub trait TicketStore: Send + Sync + 'static {
    /// Initializes the backend (connection, migrations).
    async fn initialize(&self) -> Result<(), WaitlineError>;

    /// Closes the backend, flushing pending writes.
    async fn close(&self) -> Result<(), WaitlineError>;

    /// Performs a health check and returns the store's current status.
    async fn health_check(&self) -> Result<HealthStatus, WaitlineError>;

    /// Allocates the next ticket number for today and persists a new ticket
    /// atomically. Fails with `Validation` on an empty (post-trim) name.
    async fn create_ticket(&self, name: &str) -> Result<Ticket, WaitlineError>;

    /// All of today's tickets, ordered by descending number.
    async fn list_tickets(&self) -> Result<Vec<Ticket>, WaitlineError>;

    /// Applies `status` to the ticket with the given id and returns the
    /// updated ticket. Fails with `NotFound` for an unknown id.
    async fn update_status(
        &self,
        id: &str,
        status: TicketStatus,
    ) -> Result<Ticket, WaitlineError>;

    /// Customer-facing projection over today's tickets.
    async fn customer_status(&self) -> Result<CustomerStatus, WaitlineError>;

    /// Admin projection over today's tickets.
    async fn admin_stats(&self) -> Result<AdminStats, WaitlineError>;
}
