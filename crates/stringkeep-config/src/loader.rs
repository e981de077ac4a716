// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Merge order (later overrides earlier):
//! 1. Compiled defaults
//! 2. `/etc/stringkeep/stringkeep.toml`
//! 3. `~/.config/stringkeep/stringkeep.toml`
//! 4. `./stringkeep.toml`, or an explicit path
//! 5. `STRINGKEEP_*` environment variables

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::StringkeepConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/stringkeep/stringkeep.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "stringkeep.toml";

/// Returns `~/.config/stringkeep/stringkeep.toml` when a config dir is known.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("stringkeep").join(LOCAL_CONFIG_FILE))
}

/// Build the full Figment without extracting it.
///
/// `explicit` replaces the working-directory file when given.
pub fn build_figment(explicit: Option<&Path>) -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(StringkeepConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    let figment = match explicit {
        Some(path) => figment.merge(Toml::file(path)),
        None => figment.merge(Toml::file(LOCAL_CONFIG_FILE)),
    };
    figment.merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<StringkeepConfig, figment::Error> {
    build_figment(None).extract()
}

/// Load configuration with an explicit file in place of `./stringkeep.toml`.
pub fn load_config_from_path(path: &Path) -> Result<StringkeepConfig, figment::Error> {
    build_figment(Some(path)).extract()
}

/// Load configuration from a TOML string over the defaults only.
pub fn load_config_from_str(toml_content: &str) -> Result<StringkeepConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StringkeepConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// `STRINGKEEP_<SECTION>_<KEY>` maps to `<section>.<key>`.
///
/// Only the first underscore after the section name is a separator, so
/// `STRINGKEEP_STORAGE_SQLITE_PATH` becomes `storage.sqlite_path`. Keys
/// arrive here in their original case.
fn env_provider() -> Env {
    Env::prefixed("STRINGKEEP_").map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        let section = ["server_", "storage_", "log_"]
            .into_iter()
            .find(|section| key_str.starts_with(section));
        let mapped = match section {
            Some(section) => key_str.replacen(section, &section.replace('_', "."), 1),
            None => key_str,
        };
        mapped.into()
    })
}
