// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Stringkeep.
//!
//! This crate provides the error type, the record and backend types, and the
//! two traits the rest of the workspace is wired through: [`SqlDriver`] for
//! backend-specific SQL and [`RecordStore`] for CRUD access from the gateway.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::StoreError;
pub use traits::{RecordStore, SqlDriver};
pub use types::{Backend, HealthStatus, Record, Row, SqlValue};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::is_valid_table_name;

    #[test]
    fn store_error_has_all_variants() {
        let _config = StoreError::Config("test".into());
        let _unsupported = StoreError::UnsupportedBackend("mysql".into());
        let _connect = StoreError::Connect {
            backend: Backend::Sqlite,
            source: Box::new(std::io::Error::other("test")),
        };
        let _table = StoreError::InvalidTableName("bad name".into());
        let _storage = StoreError::storage(std::io::Error::other("test"));
        let _not_found = StoreError::NotFound { id: 7 };
        let _internal = StoreError::Internal("test".into());
    }

    #[test]
    fn unsupported_backend_names_both_tags() {
        let err = Backend::from_tag("mysql").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("mysql"));
        assert!(msg.contains("postgres"));
        assert!(msg.contains("sqlite"));
    }

    #[test]
    fn backend_tags_round_trip() {
        for tag in Backend::TAGS {
            let backend = Backend::from_tag(tag).expect("known tag");
            assert_eq!(backend.to_string(), tag);
        }
        assert_eq!(Backend::from_tag("sqlite").unwrap(), Backend::Sqlite);
        assert!(Backend::from_tag("Postgres ").is_err());
        assert!(Backend::from_tag("").is_err());
    }

    #[test]
    fn backend_serializes_lowercase() {
        let json = serde_json::to_string(&Backend::Postgres).unwrap();
        assert_eq!(json, "\"postgres\"");
    }

    #[test]
    fn record_json_shape() {
        let record = Record::new(1, "Hello, World!");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"id":1,"value":"Hello, World!"}"#);
    }

    #[test]
    fn record_from_row() {
        let row = vec![SqlValue::Integer(3), SqlValue::Text("three".into())];
        let record = Record::try_from(row).unwrap();
        assert_eq!(record, Record::new(3, "three"));
    }

    #[test]
    fn record_from_malformed_row_fails() {
        let row = vec![SqlValue::Text("3".into()), SqlValue::Text("three".into())];
        assert!(Record::try_from(row).is_err());

        let row = vec![SqlValue::Integer(3)];
        assert!(Record::try_from(row).is_err());

        let row = vec![
            SqlValue::Integer(3),
            SqlValue::Text("three".into()),
            SqlValue::Null,
        ];
        assert!(Record::try_from(row).is_err());
    }

    #[test]
    fn table_name_validation() {
        assert!(is_valid_table_name("strings"));
        assert!(is_valid_table_name("_unit_test2"));
        assert!(!is_valid_table_name(""));
        assert!(!is_valid_table_name("2strings"));
        assert!(!is_valid_table_name("strings; DROP TABLE x"));
        assert!(!is_valid_table_name("my-table"));
    }

    #[test]
    fn not_found_is_distinguishable() {
        assert!(StoreError::NotFound { id: 1 }.is_not_found());
        assert!(!StoreError::Internal("x".into()).is_not_found());
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_driver<T: SqlDriver>() {}
        fn _assert_store<T: RecordStore>() {}
    }
}
