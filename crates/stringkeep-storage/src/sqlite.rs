// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded SQLite driver.
//!
//! All statements run on tokio-rusqlite's single background thread, so the
//! driver owns exactly one connection.

use std::time::Duration;

use async_trait::async_trait;
use rusqlite::types::Value;
use tracing::debug;

use stringkeep_core::{Backend, Row, SqlDriver, SqlValue, StoreError};

/// Convert a tokio-rusqlite error into [`StoreError::Storage`].
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> StoreError {
    StoreError::storage(e)
}

fn connect_err<E>(e: E) -> StoreError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StoreError::Connect {
        backend: Backend::Sqlite,
        source: Box::new(e),
    }
}

fn to_values(args: &[SqlValue]) -> Vec<Value> {
    args.iter()
        .map(|arg| match arg {
            SqlValue::Null => Value::Null,
            SqlValue::Integer(i) => Value::Integer(*i),
            SqlValue::Text(s) => Value::Text(s.clone()),
        })
        .collect()
}

fn decode_row(row: &rusqlite::Row<'_>) -> Result<Row, rusqlite::Error> {
    let count = row.as_ref().column_count();
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let value = match row.get::<_, Value>(i)? {
            Value::Null => SqlValue::Null,
            Value::Integer(v) => SqlValue::Integer(v),
            Value::Text(s) => SqlValue::Text(s),
            other => {
                let name = row.as_ref().column_name(i)?.to_string();
                return Err(rusqlite::Error::InvalidColumnType(i, name, other.data_type()));
            }
        };
        out.push(value);
    }
    Ok(out)
}

/// SQLite driver backed by a file (or memory) database.
pub struct SqliteDriver {
    conn: tokio_rusqlite::Connection,
}

impl SqliteDriver {
    /// Open the database at `path`, creating the file if absent, and ping it.
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(connect_err)?;
        let driver = Self { conn };
        driver.configure().await?;
        debug!(path, "SQLite database opened");
        Ok(driver)
    }

    /// Open a private in-memory database.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(connect_err)?;
        let driver = Self { conn };
        driver.configure().await?;
        Ok(driver)
    }

    async fn configure(&self) -> Result<(), StoreError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                    row.get::<_, String>(0)
                })?;
                conn.busy_timeout(Duration::from_secs(5))?;
                conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
                Ok(())
            })
            .await
            .map_err(connect_err)
    }
}

#[async_trait]
impl SqlDriver for SqliteDriver {
    fn backend(&self) -> Backend {
        Backend::Sqlite
    }

    fn placeholder(&self, index: usize) -> String {
        format!("?{index}")
    }

    fn create_table_sql(&self, table: &str) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                value TEXT NOT NULL
            )"
        )
    }

    async fn execute(&self, sql: &str, args: &[SqlValue]) -> Result<u64, StoreError> {
        let sql = sql.to_string();
        let args = to_values(args);
        self.conn
            .call(move |conn| -> Result<u64, rusqlite::Error> {
                let changed = conn.execute(&sql, rusqlite::params_from_iter(args.iter()))?;
                Ok(changed as u64)
            })
            .await
            .map_err(map_tr_err)
    }

    async fn query_row(&self, sql: &str, args: &[SqlValue]) -> Result<Option<Row>, StoreError> {
        let sql = sql.to_string();
        let args = to_values(args);
        self.conn
            .call(move |conn| -> Result<Option<Row>, rusqlite::Error> {
                let mut stmt = conn.prepare(&sql)?;
                let mut rows = stmt.query(rusqlite::params_from_iter(args.iter()))?;
                let first = match rows.next()? {
                    Some(row) => Some(decode_row(row)?),
                    None => None,
                };
                // Run the statement to completion so an INSERT ... RETURNING commits.
                while rows.next()?.is_some() {}
                Ok(first)
            })
            .await
            .map_err(map_tr_err)
    }

    async fn query_all(&self, sql: &str, args: &[SqlValue]) -> Result<Vec<Row>, StoreError> {
        let sql = sql.to_string();
        let args = to_values(args);
        self.conn
            .call(move |conn| -> Result<Vec<Row>, rusqlite::Error> {
                let mut stmt = conn.prepare(&sql)?;
                let mut rows = stmt.query(rusqlite::params_from_iter(args.iter()))?;
                let mut out = Vec::new();
                while let Some(row) = rows.next()? {
                    out.push(decode_row(row)?);
                }
                Ok(out)
            })
            .await
            .map_err(map_tr_err)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("SQLite WAL checkpoint complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_database_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("created.sqlite");
        let driver = SqliteDriver::open(path.to_str().unwrap()).await.unwrap();
        assert!(path.exists(), "database file should be created");
        driver.ping().await.unwrap();
    }

    #[tokio::test]
    async fn open_in_unwritable_location_is_connect_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("db.sqlite");
        let result = SqliteDriver::open(path.to_str().unwrap()).await;
        assert!(matches!(
            result,
            Err(StoreError::Connect {
                backend: Backend::Sqlite,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn placeholders_are_numbered_question_marks() {
        let driver = SqliteDriver::open_in_memory().await.unwrap();
        assert_eq!(driver.placeholder(1), "?1");
        assert_eq!(driver.placeholder(2), "?2");
        assert!(driver.create_table_sql("t").contains("AUTOINCREMENT"));
    }

    #[tokio::test]
    async fn execute_and_query_round_trip() {
        let driver = SqliteDriver::open_in_memory().await.unwrap();
        driver
            .execute(&driver.create_table_sql("t"), &[])
            .await
            .unwrap();

        let row = driver
            .query_row(
                "INSERT INTO t(value) VALUES(?1) RETURNING id",
                &[SqlValue::from("a")],
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row, vec![SqlValue::Integer(1)]);

        let changed = driver
            .execute(
                "UPDATE t SET value = ?1 WHERE id = ?2",
                &[SqlValue::from("b"), SqlValue::from(1)],
            )
            .await
            .unwrap();
        assert_eq!(changed, 1);

        let rows = driver.query_all("SELECT id, value FROM t", &[]).await.unwrap();
        assert_eq!(rows, vec![vec![SqlValue::Integer(1), SqlValue::Text("b".into())]]);
    }

    #[tokio::test]
    async fn query_row_without_match_is_none() {
        let driver = SqliteDriver::open_in_memory().await.unwrap();
        driver
            .execute(&driver.create_table_sql("t"), &[])
            .await
            .unwrap();
        let row = driver
            .query_row("SELECT id, value FROM t WHERE id = ?1", &[SqlValue::from(9)])
            .await
            .unwrap();
        assert!(row.is_none());
    }

    #[tokio::test]
    async fn real_columns_are_rejected() {
        let driver = SqliteDriver::open_in_memory().await.unwrap();
        let result = driver.query_all("SELECT 1.5", &[]).await;
        assert!(matches!(result, Err(StoreError::Storage { .. })));
    }

    #[tokio::test]
    async fn bad_sql_is_storage_error() {
        let driver = SqliteDriver::open_in_memory().await.unwrap();
        let result = driver.execute("UPDATE nowhere SET x = 1", &[]).await;
        assert!(matches!(result, Err(StoreError::Storage { .. })));
    }
}
