// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Stringkeep integration tests.
//!
//! Everything runs against throwaway SQLite files, so no database server is
//! needed.
//!
//! # Components
//!
//! - [`TestHarness`] - temp SQLite store plus the gateway router
//! - [`FailingStore`] - store whose operations all fail, for error paths

pub mod harness;
pub mod mock_store;

pub use harness::{TestHarness, TestResponse};
pub use mock_store::FailingStore;
