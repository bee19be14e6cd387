// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket operations: daily number allocation, status updates, and the
//! customer/admin projections.
//!
//! Allocation is the one correctness-critical path. The read-max-then-insert
//! unit runs inside an IMMEDIATE transaction on the single writer connection,
//! with the `(day, number)` UNIQUE index as a backstop; transient conflicts
//! retry the whole unit a bounded number of times.

use chrono::{NaiveDate, SecondsFormat, Utc};
use rusqlite::{TransactionBehavior, params};
use tracing::{error, warn};

use waitline_core::WaitlineError;

use crate::database::Database;
use crate::models::{AdminStats, CustomerStatus, Ticket, TicketStatus};

const SELECT_TICKET: &str = "SELECT id, number, day, name, status, created_at FROM tickets";

/// Map a `tickets` row in `SELECT_TICKET` column order.
fn ticket_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Ticket> {
    let day: String = row.get(2)?;
    let day = day.parse::<NaiveDate>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let status: String = row.get(4)?;
    let status = status.parse::<TicketStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Ticket {
        id: row.get(0)?,
        number: row.get(1)?,
        day,
        name: row.get(3)?,
        status,
        created_at: row.get(5)?,
    })
}

/// Allocate the next number for `day` and insert a new `Queuing` ticket.
///
/// `name` must already be validated and trimmed. Retries the whole
/// allocation transaction up to `retries` times on transient conflicts
/// before surfacing the error.
pub async fn create_ticket(
    db: &Database,
    name: &str,
    day: NaiveDate,
    retries: u32,
) -> Result<Ticket, WaitlineError> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match try_create_ticket(db, name, day).await {
            Ok(ticket) => return Ok(ticket),
            Err(e) if e.is_transient() && attempt < retries => {
                warn!(
                    day = %day,
                    attempt,
                    error = %e,
                    "ticket allocation conflict, retrying"
                );
            }
            Err(e) => {
                error!(day = %day, attempt, error = %e, "ticket allocation failed");
                return Err(e);
            }
        }
    }
}

/// One allocation attempt: read the day's max number and insert, atomically.
async fn try_create_ticket(
    db: &Database,
    name: &str,
    day: NaiveDate,
) -> Result<Ticket, WaitlineError> {
    let id = uuid::Uuid::new_v4().to_string();
    let name = name.to_string();
    let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    db.connection()
        .call(move |conn| {
            // IMMEDIATE takes the write lock before the read, so the max we
            // see is still the max when we insert.
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let last_number: i64 = tx.query_row(
                "SELECT COALESCE(MAX(number), 0) FROM tickets WHERE day = ?1",
                params![day.to_string()],
                |row| row.get(0),
            )?;
            let number = last_number + 1;

            tx.execute(
                "INSERT INTO tickets (id, number, day, name, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    id,
                    number,
                    day.to_string(),
                    name,
                    TicketStatus::Queuing.to_string(),
                    created_at,
                ],
            )?;
            tx.commit()?;

            Ok(Ticket {
                id,
                number,
                day,
                name,
                status: TicketStatus::Queuing,
                created_at,
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All tickets for `day`, ordered by descending number (display convention).
pub async fn list_tickets(db: &Database, day: NaiveDate) -> Result<Vec<Ticket>, WaitlineError> {
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("{SELECT_TICKET} WHERE day = ?1 ORDER BY number DESC"))?;
            let rows = stmt.query_map(params![day.to_string()], ticket_from_row)?;
            let mut tickets = Vec::new();
            for row in rows {
                tickets.push(row?);
            }
            Ok(tickets)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch a single ticket by id.
pub async fn get_ticket(db: &Database, id: &str) -> Result<Option<Ticket>, WaitlineError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_TICKET} WHERE id = ?1"))?;
            let result = stmt.query_row(params![id], ticket_from_row);
            match result {
                Ok(ticket) => Ok(Some(ticket)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Apply `status` to the ticket with the given id and return the updated row.
///
/// Returns `NotFound` if no row matches. Updates address disjoint rows by
/// primary key, so they need no coordination with the allocator beyond the
/// single writer connection.
pub async fn update_status(
    db: &Database,
    id: &str,
    status: TicketStatus,
) -> Result<Ticket, WaitlineError> {
    let id_owned = id.to_string();
    let updated = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let changed = tx.execute(
                "UPDATE tickets SET status = ?1 WHERE id = ?2",
                params![status.to_string(), id_owned],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            let ticket = tx.query_row(
                &format!("{SELECT_TICKET} WHERE id = ?1"),
                params![id_owned],
                ticket_from_row,
            )?;
            tx.commit()?;
            Ok(Some(ticket))
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    updated.ok_or_else(|| WaitlineError::NotFound { id: id.to_string() })
}

/// Customer projection for `day`: the number currently being served and the
/// count still waiting.
///
/// The current number is the smallest `Processed` number; with nobody in
/// service it falls back to the largest `Finished` number, and to 0 on an
/// empty day. The reads run as one closure on the single connection, so they
/// observe one snapshot.
pub async fn customer_status(
    db: &Database,
    day: NaiveDate,
) -> Result<CustomerStatus, WaitlineError> {
    db.connection()
        .call(move |conn| {
            let day = day.to_string();

            let in_service: Option<i64> = conn.query_row(
                "SELECT MIN(number) FROM tickets WHERE day = ?1 AND status = ?2",
                params![day, TicketStatus::Processed.to_string()],
                |row| row.get(0),
            )?;

            let current_number = match in_service {
                Some(number) => number,
                None => conn.query_row(
                    "SELECT COALESCE(MAX(number), 0) FROM tickets WHERE day = ?1 AND status = ?2",
                    params![day, TicketStatus::Finished.to_string()],
                    |row| row.get(0),
                )?,
            };

            let queue_count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM tickets WHERE day = ?1 AND status = ?2",
                params![day, TicketStatus::Queuing.to_string()],
                |row| row.get(0),
            )?;

            Ok(CustomerStatus {
                current_number,
                queue_count,
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Admin projection for `day`: ticket counts grouped by status plus the total.
pub async fn admin_stats(db: &Database, day: NaiveDate) -> Result<AdminStats, WaitlineError> {
    db.connection()
        .call(move |conn| {
            let stats = conn.query_row(
                "SELECT COUNT(*),
                        COALESCE(SUM(status = ?2), 0),
                        COALESCE(SUM(status = ?3), 0),
                        COALESCE(SUM(status = ?4), 0)
                 FROM tickets WHERE day = ?1",
                params![
                    day.to_string(),
                    TicketStatus::Queuing.to_string(),
                    TicketStatus::Processed.to_string(),
                    TicketStatus::Finished.to_string(),
                ],
                |row| {
                    Ok(AdminStats {
                        total: row.get(0)?,
                        queuing: row.get(1)?,
                        processed: row.get(2)?,
                        finished: row.get(3)?,
                    })
                },
            )?;
            Ok(stats)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
