// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP/JSON gateway for the Waitline queue service.
//!
//! The gateway is the entire network-facing surface: ticket creation,
//! today's listing, status updates, and the two projections the kiosk and
//! admin screens poll. Handlers are stateless request-per-call functions
//! over a shared [`TicketStore`](waitline_core::TicketStore); all
//! coordination lives in the store.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, ServerConfig, router, start_server};
