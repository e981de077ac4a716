// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence layer for Stringkeep.
//!
//! Two [`SqlDriver`](stringkeep_core::SqlDriver) implementations, SQLite via
//! `tokio-rusqlite` and PostgreSQL via `tokio-postgres`, sit behind a single
//! [`Store`] that serializes every operation with one coarse lock.

pub mod postgres;
pub mod queries;
pub mod sqlite;
pub mod store;

pub use postgres::PostgresDriver;
pub use sqlite::SqliteDriver;
pub use store::{Store, DEFAULT_TABLE};
