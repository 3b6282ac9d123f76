//! Axum HTTP server: listener, request tracing, graceful shutdown.

use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::dispatcher::Dispatcher;

/// Serve `dispatcher` until Ctrl+C.
pub async fn run(config: &ServerConfig, dispatcher: Dispatcher) -> anyhow::Result<()> {
    let app = dispatcher.into_router().layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.listen_address).await?;
    tracing::info!(address = %config.listen_address, "protocol-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("protocol-server shut down gracefully");
    Ok(())
}

/// Resolves on SIGINT (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C, shutting down");
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
