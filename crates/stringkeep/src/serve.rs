// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `stringkeep serve` command implementation.
//!
//! Connects the store, ensures its table, and serves the HTTP API until a
//! shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use stringkeep_config::StringkeepConfig;
use stringkeep_core::{RecordStore, StoreError};
use stringkeep_gateway::{GatewayState, ServerConfig};
use stringkeep_storage::Store;
use tracing::{error, info};

use crate::shutdown;

/// Open the configured backend and make sure the records table exists.
pub async fn open_store(config: &StringkeepConfig) -> Result<Store, StoreError> {
    let mut store = Store::connect_tag(&config.storage.backend, &config.storage).await?;
    store.ensure_table(&config.storage.table).await?;
    Ok(store)
}

/// Run the server with an already-loaded config.
pub async fn run_serve(config: StringkeepConfig) -> Result<(), StoreError> {
    init_tracing(&config.log.level);

    info!(backend = %config.storage.backend, "starting stringkeep serve");

    let store = Arc::new(open_store(&config).await?);

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let listener = stringkeep_gateway::bind(&server_config).await?;

    let cancel = shutdown::install_signal_handler();
    let state = GatewayState::new(Arc::clone(&store) as Arc<dyn RecordStore>);
    let server = stringkeep_gateway::serve(listener, state, cancel.clone().cancelled_owned());

    let timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    let result = shutdown::drain(&cancel, server, timeout)
        .await
        .unwrap_or(Ok(()));

    if let Err(e) = store.close().await {
        error!(error = %e, "failed to close store");
    }

    result?;
    info!("stringkeep serve shutdown complete");
    Ok(())
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "stringkeep={log_level},tower_http={log_level},warn"
        ))
    });

    // Subsequent calls (tests) keep the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .try_init();
}
