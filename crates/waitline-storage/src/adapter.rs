// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the TicketStore trait.

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use tokio::sync::OnceCell;
use tracing::debug;

use waitline_config::model::{QueueConfig, StorageConfig};
use waitline_core::types::normalize_name;
use waitline_core::{
    AdminStats, CustomerStatus, HealthStatus, Ticket, TicketStatus, TicketStore, WaitlineError,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed ticket store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query module. The database is lazily initialized on the first
/// call to [`TicketStore::initialize`].
pub struct SqliteTicketStore {
    storage: StorageConfig,
    queue: QueueConfig,
    db: OnceCell<Database>,
}

impl SqliteTicketStore {
    /// Create a new SqliteTicketStore with the given configuration.
    ///
    /// The database connection is not opened until [`TicketStore::initialize`]
    /// is called.
    pub fn new(storage: StorageConfig, queue: QueueConfig) -> Self {
        Self {
            storage,
            queue,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, WaitlineError> {
        self.db.get().ok_or_else(|| WaitlineError::Internal(
            "storage not initialized -- call initialize() first".to_string(),
        ))
    }

    /// The current day-partition: the server's local calendar day.
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[async_trait]
impl TicketStore for SqliteTicketStore {
    async fn initialize(&self) -> Result<(), WaitlineError> {
        let db = Database::open(&self.storage.database_path, self.storage.wal_mode).await?;
        self.db.set(db).map_err(|_| {
            WaitlineError::Internal("storage already initialized".to_string())
        })?;
        debug!(path = %self.storage.database_path, "SQLite ticket store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), WaitlineError> {
        self.db()?.close().await
    }

    async fn health_check(&self) -> Result<HealthStatus, WaitlineError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn create_ticket(&self, name: &str) -> Result<Ticket, WaitlineError> {
        let name = normalize_name(name)?;
        queries::tickets::create_ticket(
            self.db()?,
            &name,
            self.today(),
            self.queue.allocation_retries,
        )
        .await
    }

    async fn list_tickets(&self) -> Result<Vec<Ticket>, WaitlineError> {
        queries::tickets::list_tickets(self.db()?, self.today()).await
    }

    async fn update_status(
        &self,
        id: &str,
        status: TicketStatus,
    ) -> Result<Ticket, WaitlineError> {
        let db = self.db()?;
        let current = queries::tickets::get_ticket(db, id)
            .await?
            .ok_or_else(|| WaitlineError::NotFound { id: id.to_string() })?;

        // The rule currently admits every pair; the check keeps enforcement
        // in one place if that ever tightens.
        if !current.status.can_transition_to(status) {
            return Err(WaitlineError::Validation(format!(
                "cannot move ticket {} from {} to {}",
                id, current.status, status
            )));
        }

        queries::tickets::update_status(db, id, status).await
    }

    async fn customer_status(&self) -> Result<CustomerStatus, WaitlineError> {
        queries::tickets::customer_status(self.db()?, self.today()).await
    }

    async fn admin_stats(&self) -> Result<AdminStats, WaitlineError> {
        queries::tickets::admin_stats(self.db()?, self.today()).await
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn make_store(path: &str) -> SqliteTicketStore {
        let storage = StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        };
        SqliteTicketStore::new(storage, QueueConfig::default())
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init_test.db");
        let store = make_store(db_path.to_str().unwrap());

        store.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let store = make_store(db_path.to_str().unwrap());

        store.initialize().await.unwrap();
        let result = store.initialize().await;
        assert!(result.is_err(), "second initialize should fail");
    }

    #[tokio::test]
    async fn health_check_returns_healthy_when_initialized() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("health.db");
        let store = make_store(db_path.to_str().unwrap());

        store.initialize().await.unwrap();
        let status = store.health_check().await.unwrap();
        assert_eq!(status, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn health_check_fails_when_not_initialized() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("no_init.db");
        let store = make_store(db_path.to_str().unwrap());

        let result = store.health_check().await;
        assert!(result.is_err(), "health_check should fail before initialize");
    }

    #[tokio::test]
    async fn full_ticket_lifecycle_through_store() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let store = make_store(db_path.to_str().unwrap());
        store.initialize().await.unwrap();

        // Walk-in joins; name arrives untrimmed from the form.
        let ticket = store.create_ticket("  Alice  ").await.unwrap();
        assert_eq!(ticket.number, 1);
        assert_eq!(ticket.name, "Alice");
        assert_eq!(ticket.status, TicketStatus::Queuing);

        let second = store.create_ticket("Bob").await.unwrap();
        assert_eq!(second.number, 2);

        let listed = store.list_tickets().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].number, 2, "listing is descending by number");

        // Staff calls Alice up.
        let updated = store
            .update_status(&ticket.id, TicketStatus::Processed)
            .await
            .unwrap();
        assert_eq!(updated.status, TicketStatus::Processed);

        let status = store.customer_status().await.unwrap();
        assert_eq!(status.current_number, 1);
        assert_eq!(status.queue_count, 1);

        let stats = store.admin_stats().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.queuing, 1);
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.finished, 0);

        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn whitespace_name_is_rejected_without_a_row() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("reject.db");
        let store = make_store(db_path.to_str().unwrap());
        store.initialize().await.unwrap();

        let result = store.create_ticket("   ").await;
        assert!(matches!(result, Err(WaitlineError::Validation(_))));

        // No orphan row was persisted.
        let stats = store.admin_stats().await.unwrap();
        assert_eq!(stats.total, 0);

        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_status_on_unknown_id_is_not_found() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("unknown.db");
        let store = make_store(db_path.to_str().unwrap());
        store.initialize().await.unwrap();

        let result = store
            .update_status("missing-id", TicketStatus::Finished)
            .await;
        assert!(matches!(result, Err(WaitlineError::NotFound { .. })));

        store.close().await.unwrap();
    }
}
