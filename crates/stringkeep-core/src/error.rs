// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Stringkeep.

use thiserror::Error;

use crate::types::Backend;

/// The primary error type used across the store, its drivers, and the gateway.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Configuration errors (missing environment values, malformed settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// The requested backend tag is not one of the supported backends.
    #[error("unsupported backend `{0}`: use 'postgres' or 'sqlite'")]
    UnsupportedBackend(String),

    /// The backend could not be opened or did not answer a ping.
    #[error("failed to connect to {backend}: {source}")]
    Connect {
        backend: Backend,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A table name that is not a plain SQL identifier.
    #[error("invalid table name `{0}`")]
    InvalidTableName(String),

    /// SQL execution or row decoding failure.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No record exists with the requested id.
    #[error("record {id} not found")]
    NotFound { id: i64 },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Wrap any driver error as a [`StoreError::Storage`].
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::Storage {
            source: Box::new(err),
        }
    }

    /// Returns true if this is a [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
