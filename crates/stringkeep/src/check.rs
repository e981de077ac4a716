// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `stringkeep check` command implementation.
//!
//! Connects to the configured backend, ensures the records table, and pings,
//! reporting each step.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use stringkeep_config::StringkeepConfig;
use stringkeep_core::{Backend, HealthStatus, RecordStore, StoreError};
use stringkeep_storage::Store;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed successfully.
    Pass,
    /// Check failed.
    Fail,
    /// Not run because an earlier check failed.
    Skipped,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn pass(name: &str, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Pass,
            message: message.into(),
            duration: start.elapsed(),
        }
    }

    fn fail(name: &str, err: &StoreError, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Fail,
            message: err.to_string(),
            duration: start.elapsed(),
        }
    }

    fn skipped(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Skipped,
            message: "skipped".to_string(),
            duration: Duration::ZERO,
        }
    }
}

/// Run every check in order; later checks are skipped once one fails.
pub async fn run_checks(config: &StringkeepConfig) -> Vec<CheckResult> {
    let mut results = Vec::with_capacity(3);

    let start = Instant::now();
    let backend = match Backend::from_tag(&config.storage.backend) {
        Ok(backend) => backend,
        Err(e) => {
            results.push(CheckResult::fail("Connect", &e, start));
            results.push(CheckResult::skipped("Table"));
            results.push(CheckResult::skipped("Ping"));
            return results;
        }
    };
    let mut store = match Store::connect(backend, &config.storage).await {
        Ok(store) => {
            results.push(CheckResult::pass("Connect", format!("{backend} reachable"), start));
            store
        }
        Err(e) => {
            results.push(CheckResult::fail("Connect", &e, start));
            results.push(CheckResult::skipped("Table"));
            results.push(CheckResult::skipped("Ping"));
            return results;
        }
    };

    let start = Instant::now();
    match store.ensure_table(&config.storage.table).await {
        Ok(()) => results.push(CheckResult::pass(
            "Table",
            format!("`{}` ready", config.storage.table),
            start,
        )),
        Err(e) => results.push(CheckResult::fail("Table", &e, start)),
    }

    let start = Instant::now();
    match store.health_check().await {
        Ok(HealthStatus::Healthy) => results.push(CheckResult::pass("Ping", "ok", start)),
        Ok(HealthStatus::Unhealthy(reason)) => results.push(CheckResult::fail(
            "Ping",
            &StoreError::Internal(reason),
            start,
        )),
        Err(e) => results.push(CheckResult::fail("Ping", &e, start)),
    }

    if let Err(e) = store.close().await {
        tracing::warn!(error = %e, "failed to close store after checks");
    }
    results
}

/// Run the `stringkeep check` command.
///
/// Returns an error if any check failed so the process exits non-zero.
pub async fn run_check(config: &StringkeepConfig, plain: bool) -> Result<(), StoreError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let results = run_checks(config).await;

    println!();
    println!("  stringkeep check ({})", config.storage.backend);
    println!("  {}", "-".repeat(50));

    for result in &results {
        println!("{}", render_line(result, use_color));
    }
    println!();

    let failures = results
        .iter()
        .filter(|r| r.status == CheckStatus::Fail)
        .count();
    if failures == 0 {
        println!("  All checks passed.");
        println!();
        Ok(())
    } else {
        let word = if failures == 1 { "check" } else { "checks" };
        println!("  {failures} {word} failed.");
        println!();
        Err(StoreError::Internal(format!("{failures} {word} failed")))
    }
}

fn render_line(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green().to_string(), result.message.normal().to_string()),
            CheckStatus::Fail => ("✗".red().to_string(), result.message.red().to_string()),
            CheckStatus::Skipped => ("-".dimmed().to_string(), result.message.dimmed().to_string()),
        };
        format!("    {symbol} {:<12} {message} ({duration_ms}ms)", result.name)
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Fail => "[FAIL]",
            CheckStatus::Skipped => "[SKIP]",
        };
        format!(
            "    {tag} {:<12} {} ({duration_ms}ms)",
            result.name, result.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stringkeep_config::model::StorageConfig;

    fn config_with(backend: &str, dir: &tempfile::TempDir, table: &str) -> StringkeepConfig {
        StringkeepConfig {
            storage: StorageConfig {
                backend: backend.to_string(),
                sqlite_path: dir.path().join("check.sqlite").to_string_lossy().to_string(),
                table: table.to_string(),
            },
            ..StringkeepConfig::default()
        }
    }

    #[tokio::test]
    async fn sqlite_checks_all_pass() {
        let dir = tempfile::tempdir().unwrap();
        let results = run_checks(&config_with("sqlite", &dir, "strings")).await;
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.status == CheckStatus::Pass));
    }

    #[tokio::test]
    async fn unknown_backend_skips_remaining_checks() {
        let dir = tempfile::tempdir().unwrap();
        let results = run_checks(&config_with("oracle", &dir, "strings")).await;
        assert_eq!(results[0].status, CheckStatus::Fail);
        assert!(results[0].message.contains("oracle"));
        assert_eq!(results[1].status, CheckStatus::Skipped);
        assert_eq!(results[2].status, CheckStatus::Skipped);
    }

    #[tokio::test]
    async fn bad_table_fails_table_check_only() {
        let dir = tempfile::tempdir().unwrap();
        let results = run_checks(&config_with("sqlite", &dir, "bad table")).await;
        assert_eq!(results[0].status, CheckStatus::Pass);
        assert_eq!(results[1].status, CheckStatus::Fail);
        assert_eq!(results[2].status, CheckStatus::Pass);
    }

    #[test]
    fn plain_lines_are_tagged() {
        let result = CheckResult {
            name: "Ping".to_string(),
            status: CheckStatus::Fail,
            message: "refused".to_string(),
            duration: Duration::from_millis(5),
        };
        let line = render_line(&result, false);
        assert!(line.contains("[FAIL]"));
        assert!(line.contains("refused"));
        assert!(line.contains("(5ms)"));
    }
}
