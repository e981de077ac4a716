// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway exposing the record store as a small JSON API.
//!
//! Handlers depend only on the [`RecordStore`](stringkeep_core::RecordStore)
//! trait; the binary wires in the concrete store.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::{ApiError, ErrorResponse};
pub use server::{bind, router, serve, GatewayState, ServerConfig};
