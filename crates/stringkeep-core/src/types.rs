// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the store, the drivers, and the gateway.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::StoreError;

/// A persisted string record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Backend-assigned identifier.
    pub id: i64,
    /// The stored text.
    pub value: String,
}

impl Record {
    pub fn new(id: i64, value: impl Into<String>) -> Self {
        Self {
            id,
            value: value.into(),
        }
    }
}

/// Identifies which SQL engine backs the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Client/server engine reached over the network.
    Postgres,
    /// Embedded engine persisting to a local file.
    Sqlite,
}

impl Backend {
    /// All recognized backend tags.
    pub const TAGS: [&'static str; 2] = ["postgres", "sqlite"];

    /// Parse a backend tag, rejecting anything but the two supported engines.
    pub fn from_tag(tag: &str) -> Result<Self, StoreError> {
        Backend::from_str(tag).map_err(|_| StoreError::UnsupportedBackend(tag.to_string()))
    }
}

/// Health status reported by store health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// The backend answered a ping.
    Healthy,
    /// The backend is not reachable.
    Unhealthy(String),
}

/// A single SQL parameter or column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Text(String),
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

/// One result row, columns in select order.
pub type Row = Vec<SqlValue>;

impl TryFrom<Row> for Record {
    type Error = StoreError;

    fn try_from(row: Row) -> Result<Self, Self::Error> {
        let mut cols = row.into_iter();
        match (cols.next(), cols.next(), cols.next()) {
            (Some(SqlValue::Integer(id)), Some(SqlValue::Text(value)), None) => {
                Ok(Record { id, value })
            }
            (id, value, extra) => Err(StoreError::Internal(format!(
                "unexpected row shape: id={id:?}, value={value:?}, extra={}",
                extra.is_some()
            ))),
        }
    }
}

/// Returns true if `name` is a plain SQL identifier safe to splice into DDL.
///
/// Accepts an ASCII letter or underscore followed by letters, digits, or underscores.
pub fn is_valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
