// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Waitline queue service.
//!
//! This crate provides the error taxonomy, the ticket domain types, and the
//! `TicketStore` trait that storage backends implement. The gateway and the
//! binary depend only on what is defined here.

pub mod error;
pub mod store;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::WaitlineError;
pub use store::TicketStore;
pub use types::{AdminStats, CustomerStatus, HealthStatus, Ticket, TicketStatus};
