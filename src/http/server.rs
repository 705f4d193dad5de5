//! HTTP server startup logic.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::config::{AppConfig, SHUTDOWN_GRACE_SECS};

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid http.host or http.port: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind server: {0}")]
    Bind(std::io::Error),

    #[error("Server error: {0}")]
    Serve(std::io::Error),
}

/// Bind the configured address and serve `app` until a shutdown signal.
///
/// This function blocks until the server shuts down. After the signal,
/// in-flight requests get `SHUTDOWN_GRACE_SECS` to finish.
pub async fn start_server(app: Router, config: &AppConfig) -> Result<(), ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.http.host, config.http.port)
        .parse()
        .map_err(|e| ServerError::InvalidAddress(format!("{}", e)))?;

    let listener = TcpListener::bind(addr).await.map_err(ServerError::Bind)?;
    let local = listener.local_addr().map_err(ServerError::Bind)?;
    tracing::info!(%local, "Server is running on port {}", local.port());

    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();

    let serve = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown::shutdown_signal().await;
            let _ = signalled_tx.send(());
        })
        .into_future();

    let deadline = async move {
        match signalled_rx.await {
            Ok(()) => {
                tracing::info!(
                    "Graceful shutdown initiated, waiting up to {} seconds for connections to close",
                    SHUTDOWN_GRACE_SECS
                );
                tokio::time::sleep(Duration::from_secs(SHUTDOWN_GRACE_SECS)).await;
            }
            // Server ended on its own
            Err(_) => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        result = serve => {
            result.map_err(ServerError::Serve)?;
            tracing::info!("Server stopped");
            Ok(())
        }
        _ = deadline => {
            tracing::warn!("Shutdown grace period elapsed, dropping remaining connections");
            Ok(())
        }
    }
}
