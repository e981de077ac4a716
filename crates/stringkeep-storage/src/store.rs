// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The record store: one driver, one table, one lock.

use std::fmt;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use stringkeep_config::model::StorageConfig;
use stringkeep_config::PostgresSettings;
use stringkeep_core::{Backend, HealthStatus, Record, RecordStore, SqlDriver, StoreError};

use crate::postgres::PostgresDriver;
use crate::queries::records;
use crate::sqlite::SqliteDriver;

/// Table used until [`Store::ensure_table`] selects another.
pub const DEFAULT_TABLE: &str = "strings";

/// Process-wide record store.
///
/// Every operation holds `lock` for its whole duration, so no two database
/// calls ever overlap, reads included. Share it behind an `Arc`.
pub struct Store {
    driver: Box<dyn SqlDriver>,
    table: String,
    lock: Mutex<()>,
}

impl Store {
    /// Wrap an already-connected driver.
    pub fn new(driver: impl SqlDriver) -> Self {
        Self {
            driver: Box::new(driver),
            table: DEFAULT_TABLE.to_string(),
            lock: Mutex::new(()),
        }
    }

    /// Connect to the backend named by `tag` (`postgres` or `sqlite`).
    pub async fn connect_tag(tag: &str, config: &StorageConfig) -> Result<Self, StoreError> {
        Self::connect(Backend::from_tag(tag)?, config).await
    }

    /// Connect to `backend` and ping it.
    ///
    /// PostgreSQL settings come from the `POSTGRES_*` environment variables;
    /// SQLite opens `config.sqlite_path`, creating the file if needed.
    pub async fn connect(backend: Backend, config: &StorageConfig) -> Result<Self, StoreError> {
        let store = match backend {
            Backend::Postgres => {
                let settings = PostgresSettings::from_env()?;
                Self::new(PostgresDriver::connect(&settings).await?)
            }
            Backend::Sqlite => Self::new(SqliteDriver::open(&config.sqlite_path).await?),
        };
        info!(backend = %backend, "connected to {backend} successfully");
        Ok(store)
    }

    /// Create `name` if absent and direct all further operations at it.
    pub async fn ensure_table(&mut self, name: &str) -> Result<(), StoreError> {
        records::ensure_table(self.driver.as_ref(), name).await?;
        self.table = name.to_string();
        debug!(table = name, "records table ready");
        Ok(())
    }

    /// The table CRUD operations target.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Release the backend connection.
    pub async fn close(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        self.driver.close().await
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("backend", &self.driver.backend())
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RecordStore for Store {
    fn backend(&self) -> Backend {
        self.driver.backend()
    }

    async fn create(&self, value: &str) -> Result<i64, StoreError> {
        let _guard = self.lock.lock().await;
        records::insert(self.driver.as_ref(), &self.table, value).await
    }

    async fn read_all(&self) -> Result<Vec<Record>, StoreError> {
        let _guard = self.lock.lock().await;
        records::select_all(self.driver.as_ref(), &self.table).await
    }

    async fn read_by_id(&self, id: i64) -> Result<Record, StoreError> {
        let _guard = self.lock.lock().await;
        records::select_by_id(self.driver.as_ref(), &self.table, id).await
    }

    async fn update(&self, id: i64, value: &str) -> Result<u64, StoreError> {
        let _guard = self.lock.lock().await;
        records::update(self.driver.as_ref(), &self.table, id, value).await
    }

    async fn delete(&self, id: i64) -> Result<u64, StoreError> {
        let _guard = self.lock.lock().await;
        records::delete(self.driver.as_ref(), &self.table, id).await
    }

    async fn health_check(&self) -> Result<HealthStatus, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(match self.driver.ping().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }
}
