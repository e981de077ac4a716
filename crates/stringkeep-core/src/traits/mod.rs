// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions at the seams between the gateway, the store, and the
//! SQL drivers.
//!
//! Both traits use `#[async_trait]` so they can be held as trait objects.

pub mod driver;
pub mod storage;

pub use driver::SqlDriver;
pub use storage::RecordStore;
