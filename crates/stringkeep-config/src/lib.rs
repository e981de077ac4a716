// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for Stringkeep.
//!
//! TOML files and `STRINGKEEP_*` environment variables are merged with
//! Figment, validated, and reported through miette diagnostics. PostgreSQL
//! credentials come from the `POSTGRES_*` variables via [`PostgresSettings`].
//!
//! # Usage
//!
//! ```no_run
//! use stringkeep_config::load_and_validate;
//!
//! let config = load_and_validate(None).expect("config errors");
//! println!("backend: {}", config.storage.backend);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod postgres;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::StringkeepConfig;
pub use postgres::PostgresSettings;

/// Load the layered configuration and validate it.
///
/// `explicit` replaces `./stringkeep.toml` when given. Figment errors are
/// converted to diagnostics with source spans from whichever files exist.
pub fn load_and_validate(explicit: Option<&Path>) -> Result<StringkeepConfig, Vec<ConfigError>> {
    let loaded = match explicit {
        Some(path) => loader::load_config_from_path(path),
        None => loader::load_config(),
    };
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(
            err,
            &collect_toml_sources(explicit),
        )),
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<StringkeepConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Read every config file that could have contributed, keyed by the path
/// Figment records in error metadata.
fn collect_toml_sources(explicit: Option<&Path>) -> Vec<(String, String)> {
    let local = match explicit {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()
            .map(|d| d.join(loader::LOCAL_CONFIG_FILE))
            .unwrap_or_else(|_| loader::LOCAL_CONFIG_FILE.into()),
    };

    [
        Some(local),
        loader::user_config_path(),
        Some(loader::SYSTEM_CONFIG_PATH.into()),
    ]
    .into_iter()
    .flatten()
    .filter_map(|path| {
        let content = std::fs::read_to_string(&path).ok()?;
        Some((path.display().to_string(), content))
    })
    .collect()
}
