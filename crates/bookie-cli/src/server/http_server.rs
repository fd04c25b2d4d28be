//! HTTP server startup and lifecycle management.

use std::future::IntoFuture;
use std::time::Instant;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::config::ServerConfig;
use crate::server::{Result, ServerError, shutdown_signal};
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Serves `app` until a shutdown signal arrives.
///
/// After the signal, in-flight requests get up to the configured shutdown
/// timeout to complete before the server stops waiting for them.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails
/// while running.
pub async fn serve(app: Router, server_config: ServerConfig) -> Result<()> {
    let server_addr = server_config.server_addr();

    let listener = TcpListener::bind(server_addr).await.map_err(|source| {
        let error = ServerError::Bind {
            address: server_addr.to_string(),
            source,
        };

        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            error = %error,
            suggestion = error.suggestion(),
            "Failed to bind to address"
        );

        error
    })?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %server_addr,
        "Server is ready and listening for connections"
    );

    if server_config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_SERVER_STARTUP,
            "Server is bound to all interfaces. Ensure firewall rules are properly configured."
        );
    }

    let start_time = Instant::now();
    let (signal_tx, mut signal_rx) = watch::channel(false);
    let shutdown = async move {
        shutdown_signal().await;
        let _ = signal_tx.send(true);
    };

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .into_future();

    let shutdown_timeout = server_config.shutdown_timeout();
    let deadline = async move {
        if signal_rx.wait_for(|received| *received).await.is_err() {
            std::future::pending::<()>().await;
        }
        tokio::time::sleep(shutdown_timeout).await;
    };

    tokio::select! {
        result = server => {
            result.map_err(|err| {
                let error = ServerError::Runtime(err);
                tracing::error!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    error = %error,
                    uptime_secs = start_time.elapsed().as_secs(),
                    "Server encountered an error"
                );
                error
            })?;

            tracing::info!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                uptime_secs = start_time.elapsed().as_secs(),
                "Server shut down gracefully"
            );
        }
        () = deadline => {
            tracing::warn!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                timeout_secs = shutdown_timeout.as_secs(),
                "Shutdown timeout elapsed, dropping in-flight requests"
            );
        }
    }

    Ok(())
}
