// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record store that fails every operation.
//!
//! `FailingStore` drives the gateway's 500/503 paths without a broken
//! database.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use stringkeep_core::{Backend, HealthStatus, Record, RecordStore, StoreError};

/// A store whose CRUD calls all return [`StoreError::Storage`].
pub struct FailingStore {
    message: String,
    calls: AtomicUsize,
}

impl FailingStore {
    /// Create a store failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of operations attempted so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> Result<T, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::storage(std::io::Error::other(self.message.clone())))
    }
}

impl Default for FailingStore {
    fn default() -> Self {
        Self::new("mock storage failure")
    }
}

#[async_trait]
impl RecordStore for FailingStore {
    fn backend(&self) -> Backend {
        Backend::Sqlite
    }

    async fn create(&self, _value: &str) -> Result<i64, StoreError> {
        self.fail()
    }

    async fn read_all(&self) -> Result<Vec<Record>, StoreError> {
        self.fail()
    }

    async fn read_by_id(&self, _id: i64) -> Result<Record, StoreError> {
        self.fail()
    }

    async fn update(&self, _id: i64, _value: &str) -> Result<u64, StoreError> {
        self.fail()
    }

    async fn delete(&self, _id: i64) -> Result<u64, StoreError> {
        self.fail()
    }

    async fn health_check(&self) -> Result<HealthStatus, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(HealthStatus::Unhealthy(self.message.clone()))
    }
}
