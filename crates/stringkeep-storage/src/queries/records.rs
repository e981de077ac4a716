// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record CRUD statements, rendered per dialect through [`SqlDriver`].
//!
//! These functions take no lock; [`crate::Store`] serializes them.

use stringkeep_core::types::is_valid_table_name;
use stringkeep_core::{Record, SqlDriver, SqlValue, StoreError};

/// Reject anything that is not a plain identifier before it reaches SQL text.
pub fn check_table(table: &str) -> Result<(), StoreError> {
    if is_valid_table_name(table) {
        Ok(())
    } else {
        Err(StoreError::InvalidTableName(table.to_string()))
    }
}

/// `INSERT` returning the assigned id, with `placeholder` rendering `$N`/`?N`.
pub fn insert_sql(table: &str, placeholder: impl Fn(usize) -> String) -> String {
    format!(
        "INSERT INTO {table}(value) VALUES({}) RETURNING id",
        placeholder(1)
    )
}

pub fn select_by_id_sql(table: &str, placeholder: impl Fn(usize) -> String) -> String {
    format!("SELECT id, value FROM {table} WHERE id = {}", placeholder(1))
}

/// Value is bound first, id second.
pub fn update_sql(table: &str, placeholder: impl Fn(usize) -> String) -> String {
    format!(
        "UPDATE {table} SET value = {} WHERE id = {}",
        placeholder(1),
        placeholder(2)
    )
}

pub fn delete_sql(table: &str, placeholder: impl Fn(usize) -> String) -> String {
    format!("DELETE FROM {table} WHERE id = {}", placeholder(1))
}

/// Create the records table if it does not exist.
pub async fn ensure_table(driver: &dyn SqlDriver, table: &str) -> Result<(), StoreError> {
    check_table(table)?;
    driver.execute(&driver.create_table_sql(table), &[]).await?;
    Ok(())
}

/// Insert a record and return the id the backend assigned, in one round trip.
pub async fn insert(driver: &dyn SqlDriver, table: &str, value: &str) -> Result<i64, StoreError> {
    let sql = insert_sql(table, |i| driver.placeholder(i));
    let row = driver
        .query_row(&sql, &[SqlValue::from(value)])
        .await?
        .ok_or_else(|| StoreError::Internal("insert returned no id".to_string()))?;
    match row.as_slice() {
        [SqlValue::Integer(id)] => Ok(*id),
        other => Err(StoreError::Internal(format!(
            "insert returned unexpected row {other:?}"
        ))),
    }
}

/// Select every record. No ORDER BY: order is whatever the backend yields.
pub async fn select_all(driver: &dyn SqlDriver, table: &str) -> Result<Vec<Record>, StoreError> {
    let sql = format!("SELECT id, value FROM {table}");
    driver
        .query_all(&sql, &[])
        .await?
        .into_iter()
        .map(Record::try_from)
        .collect()
}

/// Select one record by id.
pub async fn select_by_id(
    driver: &dyn SqlDriver,
    table: &str,
    id: i64,
) -> Result<Record, StoreError> {
    let sql = select_by_id_sql(table, |i| driver.placeholder(i));
    match driver.query_row(&sql, &[SqlValue::from(id)]).await? {
        Some(row) => Record::try_from(row),
        None => Err(StoreError::NotFound { id }),
    }
}

/// Replace the value of record `id`. Returns the number of rows changed.
pub async fn update(
    driver: &dyn SqlDriver,
    table: &str,
    id: i64,
    value: &str,
) -> Result<u64, StoreError> {
    let sql = update_sql(table, |i| driver.placeholder(i));
    driver
        .execute(&sql, &[SqlValue::from(value), SqlValue::from(id)])
        .await
}

/// Delete record `id`. Returns the number of rows removed.
pub async fn delete(driver: &dyn SqlDriver, table: &str, id: i64) -> Result<u64, StoreError> {
    let sql = delete_sql(table, |i| driver.placeholder(i));
    driver.execute(&sql, &[SqlValue::from(id)]).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::SqliteDriver;

    async fn setup() -> SqliteDriver {
        let driver = SqliteDriver::open_in_memory().await.unwrap();
        ensure_table(&driver, "strings").await.unwrap();
        driver
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let driver = setup().await;
        let a = insert(&driver, "strings", "a").await.unwrap();
        let b = insert(&driver, "strings", "b").await.unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[tokio::test]
    async fn select_all_on_empty_table_is_empty() {
        let driver = setup().await;
        assert!(select_all(&driver, "strings").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn select_by_missing_id_is_not_found() {
        let driver = setup().await;
        let err = select_by_id(&driver, "strings", 42).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id: 42 }));
    }

    #[tokio::test]
    async fn update_and_delete_report_affected_rows() {
        let driver = setup().await;
        let id = insert(&driver, "strings", "a").await.unwrap();
        assert_eq!(update(&driver, "strings", id, "b").await.unwrap(), 1);
        assert_eq!(update(&driver, "strings", 999, "b").await.unwrap(), 0);
        assert_eq!(delete(&driver, "strings", id).await.unwrap(), 1);
        assert_eq!(delete(&driver, "strings", id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn ensure_table_rejects_bad_identifier() {
        let driver = SqliteDriver::open_in_memory().await.unwrap();
        let err = ensure_table(&driver, "x; DROP TABLE y").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidTableName(_)));
    }

    #[tokio::test]
    async fn missing_table_is_storage_error() {
        let driver = SqliteDriver::open_in_memory().await.unwrap();
        let err = select_all(&driver, "strings").await.unwrap_err();
        assert!(matches!(err, StoreError::Storage { .. }));
    }
}
