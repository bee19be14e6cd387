// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All access is serialized through tokio-rusqlite's single background thread:
//! `Database` wraps one `tokio_rusqlite::Connection`, query modules accept
//! `&Database` and run closures via `connection().call()`. A whole closure
//! executes as one unit on that thread, which is what makes the allocator's
//! read-max-then-insert atomic with respect to every other caller.
//!
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use tokio_rusqlite::Connection;
use tracing::debug;

use waitline_core::WaitlineError;

/// Handle to the single SQLite connection.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if necessary) the database at `path`, apply PRAGMAs,
    /// and run pending migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, WaitlineError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| WaitlineError::StoreUnavailable {
                source: Box::new(e),
            })?;
        }

        let conn = Connection::open(path)
            .await
            .map_err(|e| map_tr_err(tokio_rusqlite::Error::Error(e)))?;

        conn.call(move |conn| {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")?;
                conn.pragma_update(None, "synchronous", "NORMAL")?;
            }
            conn.pragma_update(None, "busy_timeout", 5000)?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            Ok(crate::migrations::run_migrations(conn))
        })
        .await
        .map_err(map_tr_err)??;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// Returns the underlying connection for query modules.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Flush the WAL back into the main database file.
    pub async fn close(&self) -> Result<(), WaitlineError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Classify a tokio-rusqlite error into the Waitline taxonomy.
///
/// Busy/locked connections and constraint violations are transient: the only
/// constraint a healthy caller can hit is the `(day, number)` numbering
/// backstop, and re-running the allocation transaction resolves it. Everything
/// else is fatal for the request.
pub(crate) fn map_tr_err(err: tokio_rusqlite::Error) -> WaitlineError {
    let transient = matches!(
        &err,
        tokio_rusqlite::Error::Error(e) if matches!(
            e.sqlite_error_code(),
            Some(
                rusqlite::ErrorCode::DatabaseBusy
                    | rusqlite::ErrorCode::DatabaseLocked
                    | rusqlite::ErrorCode::ConstraintViolation
            )
        )
    );
    if transient {
        WaitlineError::TransientStore {
            source: Box::new(err),
        }
    } else {
        WaitlineError::StoreUnavailable {
            source: Box::new(err),
        }
    }
}
