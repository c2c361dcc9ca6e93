// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::Arc;
use tokio::sync::Notify;

/// Spawn a task that notifies `shutdown` on SIGTERM or SIGINT
#[cfg(unix)]
pub fn start_signal_handler(shutdown: Arc<Notify>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("Failed to register SIGTERM handler: {e}, using Ctrl+C only");
                wait_for_ctrl_c(&shutdown).await;
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => tracing::info!("[SIGNAL] SIGTERM received, initiating graceful shutdown"),
            _ = tokio::signal::ctrl_c() => tracing::info!("[SIGNAL] SIGINT received, initiating graceful shutdown"),
        }
        shutdown.notify_one();
    });
}

/// Non-Unix fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(shutdown: Arc<Notify>) {
    tokio::spawn(async move {
        wait_for_ctrl_c(&shutdown).await;
    });
}

async fn wait_for_ctrl_c(shutdown: &Notify) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("[SIGNAL] Ctrl+C received, initiating graceful shutdown");
            shutdown.notify_one();
        }
        Err(e) => tracing::error!("Failed to listen for Ctrl+C: {e}"),
    }
}
