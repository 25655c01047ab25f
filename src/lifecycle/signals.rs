//! OS signal handling.
//!
//! Translates SIGINT/SIGTERM into the internal shutdown event using
//! Tokio's async-safe signal handling.

use crate::lifecycle::Shutdown;

/// Wait for an interrupt and trigger graceful shutdown.
///
/// Runs as a background task; returns after the first signal. Repeated
/// signals are absorbed by the one-shot shutdown channel.
pub async fn shutdown_on_signal(shutdown: Shutdown) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::warn!("shutdown signal received");
    shutdown.trigger();
}
