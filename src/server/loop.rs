// Server loop module
// Accepts connections until a shutdown signal arrives

use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;

/// Accept connections until `shutdown` is notified
///
/// Connections already being served keep running in their own tasks.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> std::io::Result<()> {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => tracing::error!("Failed to accept connection: {e}"),
                }
            }

            () = shutdown.notified() => {
                tracing::info!(
                    active = state.active_connections.load(Ordering::SeqCst),
                    "Shutdown requested, no longer accepting connections"
                );
                return Ok(());
            }
        }
    }
}
