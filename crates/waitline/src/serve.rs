// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `waitline serve` command implementation.
//!
//! Wires the configured SQLite ticket store into the HTTP gateway and runs
//! the server until a shutdown signal arrives.

use std::sync::Arc;

use tracing::info;

use waitline_config::model::WaitlineConfig;
use waitline_core::{TicketStore, WaitlineError};
use waitline_gateway::{GatewayState, ServerConfig, start_server};
use waitline_storage::SqliteTicketStore;

use crate::shutdown;

/// Runs the `waitline serve` command.
///
/// Initializes storage, starts the gateway, and blocks until SIGINT/SIGTERM.
/// The store is closed (WAL checkpoint) after the server drains.
pub async fn run_serve(config: WaitlineConfig) -> Result<(), WaitlineError> {
    // Initialize tracing subscriber.
    init_tracing(&config.service.log_level);

    info!(
        service = config.service.name.as_str(),
        "starting waitline serve"
    );

    // Initialize storage.
    let store = Arc::new(SqliteTicketStore::new(
        config.storage.clone(),
        config.queue.clone(),
    ));
    store.initialize().await?;
    info!(
        path = config.storage.database_path.as_str(),
        "ticket store ready"
    );

    // Install signal handler.
    let cancel = shutdown::install_signal_handler();

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };
    let state = GatewayState::new(store.clone() as Arc<dyn TicketStore>);

    start_server(&server_config, state, cancel).await?;

    // Server has drained; flush the store.
    store.close().await?;
    info!("waitline serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("waitline={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
