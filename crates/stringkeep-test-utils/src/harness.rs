// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` opens a temp-file SQLite store, ensures its table, seeds
//! optional records, and wires the gateway router on top. `request()`
//! drives the router in-process with `tower::ServiceExt::oneshot`.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use stringkeep_config::model::StorageConfig;
use stringkeep_config::StringkeepConfig;
use stringkeep_core::{Backend, RecordStore, StoreError};
use stringkeep_gateway::{router, GatewayState};
use stringkeep_storage::Store;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    table: String,
    seed: Vec<String>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            table: stringkeep_storage::DEFAULT_TABLE.to_string(),
            seed: Vec::new(),
        }
    }

    /// Use a table other than the default.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Create these values, in order, before handing the harness out.
    pub fn with_records<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seed.extend(values.into_iter().map(Into::into));
        self
    }

    /// Build the test harness.
    pub async fn build(self) -> Result<TestHarness, StoreError> {
        let temp_dir = tempfile::TempDir::new().map_err(StoreError::storage)?;
        let db_path = temp_dir.path().join("test.sqlite");

        let config = StringkeepConfig {
            storage: StorageConfig {
                backend: Backend::Sqlite.to_string(),
                sqlite_path: db_path.to_string_lossy().to_string(),
                table: self.table.clone(),
            },
            ..StringkeepConfig::default()
        };

        let mut store = Store::connect(Backend::Sqlite, &config.storage).await?;
        store.ensure_table(&self.table).await?;
        for value in &self.seed {
            store.create(value).await?;
        }

        Ok(TestHarness {
            store: Arc::new(store),
            config,
            db_path,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with a temp SQLite store.
pub struct TestHarness {
    /// The store the router talks to.
    pub store: Arc<Store>,
    /// Config pointing at the temp database.
    pub config: StringkeepConfig,
    /// Path of the SQLite file.
    pub db_path: PathBuf,
    _temp_dir: tempfile::TempDir,
}

/// Status and decoded body of a harness request.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse the body as JSON. Panics on invalid JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }
}

impl TestHarness {
    /// Create a builder.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Router over this harness's store.
    pub fn router(&self) -> Router {
        let store: Arc<dyn RecordStore> = self.store.clone();
        router(GatewayState::new(store))
    }

    /// Send one request through a fresh router.
    pub async fn request(&self, method: &str, uri: &str, body: &str) -> TestResponse {
        send(self.router(), method, uri, body).await
    }
}

/// Send one request through `app` and collect the response.
pub async fn send(app: Router, method: &str, uri: &str, body: &str) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body.to_string()))
        .expect("valid request");
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body")
        .to_vec();
    tracing::debug!(method, uri, status = status.as_u16(), "harness request");
    TestResponse { status, body }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn harness_builds_with_defaults() {
        let harness = TestHarness::builder().build().await.unwrap();
        assert!(harness.db_path.exists());
        assert_eq!(harness.store.table(), "strings");
        assert!(harness.store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn harness_seeds_records() {
        let harness = TestHarness::builder()
            .with_table("seeded")
            .with_records(["one", "two"])
            .build()
            .await
            .unwrap();
        assert_eq!(harness.store.table(), "seeded");

        let resp = harness.request("GET", "/api/2", "").await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.json(), serde_json::json!({"id": 2, "value": "two"}));
    }

    #[tokio::test]
    async fn harness_rejects_bad_table() {
        let result = TestHarness::builder().with_table("no spaces").build().await;
        assert!(matches!(result, Err(StoreError::InvalidTableName(_))));
    }
}
