//! Server module for managing HTTP server lifecycle
//!
//! This module handles router assembly, binding, and graceful shutdown.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::state::AppState;

/// HTTP server manager
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a server for already-built application state
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Start the server and run until shutdown signal
    ///
    /// # Errors
    /// - Invalid bind address or CORS origin
    /// - Address binding errors
    /// - Server runtime errors
    pub async fn run(self) -> anyhow::Result<()> {
        let settings = self.state.settings.clone();

        tracing::info!(
            app_version = %crate::pkg_version(),
            "Application starting"
        );

        for (group, route) in settings.mounted_routes() {
            tracing::info!(group, route = %route, "Route mounted");
        }
        tracing::info!(
            allow_origin = settings.allow_origin.as_deref().unwrap_or("<none>"),
            "CORS configuration loaded"
        );

        let address = settings.socket_address()?;
        let router = create_router(self.state)?;
        tracing::info!("Router configured");

        let listener = TcpListener::bind(address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        // Peer addresses reach the logging middleware through ConnectInfo
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
///
/// A handler that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
