// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks the constraints serde cannot express: addresses, backend tags,
//! table identifiers, and log levels.

use stringkeep_core::types::is_valid_table_name;
use stringkeep_core::Backend;

use crate::diagnostic::ConfigError;
use crate::model::StringkeepConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &StringkeepConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.server.shutdown_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "server.shutdown_timeout_secs must be at least 1".to_string(),
        });
    }

    if let Err(e) = Backend::from_tag(&config.storage.backend) {
        errors.push(ConfigError::Validation {
            message: format!("storage.backend: {e}"),
        });
    }

    if config.storage.sqlite_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.sqlite_path must not be empty".to_string(),
        });
    }

    if !is_valid_table_name(&config.storage.table) {
        errors.push(ConfigError::Validation {
            message: format!(
                "storage.table `{}` must start with a letter or underscore and contain only \
                 letters, digits, and underscores",
                config.storage.table
            ),
        });
    }

    if !LOG_LEVELS.contains(&config.log.level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` must be one of: {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
