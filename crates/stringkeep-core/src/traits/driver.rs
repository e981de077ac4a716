// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQL capability trait implemented once per backend.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::{Backend, Row, SqlValue};

/// The minimal set of SQL capabilities the store needs from a backend.
///
/// Each implementation owns exactly one connection. Dialect differences
/// (placeholder syntax, auto-increment DDL, row decoding) stay behind this
/// trait so the store never branches on the backend tag.
#[async_trait]
pub trait SqlDriver: Send + Sync + 'static {
    /// Returns the backend this driver talks to.
    fn backend(&self) -> Backend;

    /// Renders the placeholder for the 1-based parameter `index`.
    fn placeholder(&self, index: usize) -> String;

    /// Returns the idempotent DDL creating the records table `table`.
    fn create_table_sql(&self, table: &str) -> String;

    /// Executes a statement and returns the number of affected rows.
    async fn execute(&self, sql: &str, args: &[SqlValue]) -> Result<u64, StoreError>;

    /// Runs a query expected to return at most one row.
    async fn query_row(&self, sql: &str, args: &[SqlValue]) -> Result<Option<Row>, StoreError>;

    /// Runs a query and collects every row.
    async fn query_all(&self, sql: &str, args: &[SqlValue]) -> Result<Vec<Row>, StoreError>;

    /// Round-trips a trivial statement to prove the connection is alive.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Releases backend resources at shutdown.
    async fn close(&self) -> Result<(), StoreError>;
}
