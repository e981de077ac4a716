// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stringkeep - a small HTTP service storing strings in PostgreSQL or SQLite.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod check;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stringkeep_config::StringkeepConfig;
use stringkeep_core::StoreError;

/// Stringkeep - a small HTTP service storing strings in PostgreSQL or SQLite.
#[derive(Parser, Debug)]
#[command(name = "stringkeep", version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of ./stringkeep.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server (default).
    Serve {
        /// Backend tag: `postgres` or `sqlite`.
        #[arg(long)]
        db: Option<String>,
        /// Port to listen on.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the resolved configuration as TOML.
    Config,
    /// Connect to the backend, ensure the table, and ping it.
    Check {
        /// Backend tag: `postgres` or `sqlite`.
        #[arg(long)]
        db: Option<String>,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

/// Apply command-line flags on top of the loaded configuration.
fn apply_overrides(config: &mut StringkeepConfig, db: Option<String>, port: Option<u16>) {
    if let Some(db) = db {
        config.storage.backend = db;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
}

fn render_config(config: &StringkeepConfig) -> Result<String, StoreError> {
    toml::to_string_pretty(config)
        .map_err(|e| StoreError::Internal(format!("failed to render config: {e}")))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match stringkeep_config::load_and_validate(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            stringkeep_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let command = cli.command.unwrap_or(Commands::Serve {
        db: None,
        port: None,
    });

    let result = match command {
        Commands::Serve { db, port } => {
            apply_overrides(&mut config, db, port);
            serve::run_serve(config).await
        }
        Commands::Config => render_config(&config).map(|rendered| print!("{rendered}")),
        Commands::Check { db, plain } => {
            apply_overrides(&mut config, db, None);
            check::run_check(&config, plain).await
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_parses_serve_flags() {
        let cli = Cli::parse_from(["stringkeep", "serve", "--db", "sqlite", "--port", "9000"]);
        match cli.command {
            Some(Commands::Serve { db, port }) => {
                assert_eq!(db.as_deref(), Some("sqlite"));
                assert_eq!(port, Some(9000));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_accepts_global_config_flag() {
        let cli = Cli::parse_from(["stringkeep", "check", "--config", "/tmp/x.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x.toml")));
        assert!(matches!(cli.command, Some(Commands::Check { plain: false, .. })));
    }

    #[test]
    fn cli_rejects_non_numeric_port() {
        assert!(Cli::try_parse_from(["stringkeep", "serve", "--port", "http"]).is_err());
    }

    #[test]
    fn overrides_replace_loaded_values() {
        let mut config = StringkeepConfig::default();
        apply_overrides(&mut config, Some("sqlite".into()), Some(9090));
        assert_eq!(config.storage.backend, "sqlite");
        assert_eq!(config.server.port, 9090);

        apply_overrides(&mut config, None, None);
        assert_eq!(config.storage.backend, "sqlite");
    }

    #[test]
    fn rendered_config_round_trips() {
        let config = StringkeepConfig::default();
        let rendered = render_config(&config).unwrap();
        assert!(rendered.contains("[storage]"));
        let reparsed = stringkeep_config::load_and_validate_str(&rendered).unwrap();
        assert_eq!(reparsed.storage.table, config.storage.table);
        assert_eq!(reparsed.server.port, config.server.port);
    }
}
