// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record store trait consumed by the HTTP gateway.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::{Backend, HealthStatus, Record};

/// CRUD access to string records.
///
/// Update and delete report the number of rows they touched; a count of zero
/// is not an error.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Returns the backend serving this store.
    fn backend(&self) -> Backend;

    /// Inserts `value` and returns the id assigned by the backend.
    async fn create(&self, value: &str) -> Result<i64, StoreError>;

    /// Returns every record in the backend's natural order.
    async fn read_all(&self) -> Result<Vec<Record>, StoreError>;

    /// Returns the record with `id`, or [`StoreError::NotFound`].
    async fn read_by_id(&self, id: i64) -> Result<Record, StoreError>;

    /// Replaces the value of record `id`.
    async fn update(&self, id: i64, value: &str) -> Result<u64, StoreError>;

    /// Deletes record `id`.
    async fn delete(&self, id: i64) -> Result<u64, StoreError>;

    /// Pings the backend.
    async fn health_check(&self) -> Result<HealthStatus, StoreError>;
}
