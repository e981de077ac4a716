// SPDX-FileCopyrightText: 2026 Stringkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graceful shutdown coordination with signal handling.
//!
//! Installs handlers for SIGTERM and SIGINT (Ctrl+C), triggering a
//! [`CancellationToken`] that the HTTP server monitors.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is received.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm =
                signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

            tokio::select! {
                _ = ctrl_c => {
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
                _ = sigterm.recv() => {
                    info!("received SIGTERM, initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

/// Waits for `server` to finish draining once `token` fires, giving up
/// after `timeout`.
///
/// Returns `None` if the drain timed out, otherwise the server's output.
pub async fn drain<F, T>(token: &CancellationToken, server: F, timeout: Duration) -> Option<T>
where
    F: Future<Output = T>,
{
    tokio::pin!(server);

    tokio::select! {
        out = &mut server => return Some(out),
        _ = token.cancelled() => {}
    }

    match tokio::time::timeout(timeout, server).await {
        Ok(out) => Some(out),
        Err(_) => {
            warn!(
                timeout_secs = timeout.as_secs(),
                "in-flight requests did not finish in time, forcing shutdown"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn drain_returns_server_output_before_cancel() {
        let token = CancellationToken::new();
        let out = drain(&token, async { 7 }, Duration::from_secs(1)).await;
        assert_eq!(out, Some(7));
    }

    #[tokio::test]
    async fn drain_waits_for_server_after_cancel() {
        let token = CancellationToken::new();
        let server_token = token.clone();
        token.cancel();
        let out = drain(
            &token,
            async move {
                server_token.cancelled().await;
                "drained"
            },
            Duration::from_secs(1),
        )
        .await;
        assert_eq!(out, Some("drained"));
    }

    #[tokio::test(start_paused = true)]
    async fn drain_gives_up_after_timeout() {
        let token = CancellationToken::new();
        token.cancel();
        let out = drain(&token, std::future::pending::<()>(), Duration::from_secs(30)).await;
        assert_eq!(out, None);
    }
}
