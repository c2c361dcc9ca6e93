//! Logger module
//!
//! Initializes `tracing` for the demo server and provides:
//! - Server lifecycle logging
//! - Access logging with multiple formats under the `access` target
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use std::io;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;
use writer::LogTarget;

/// Initialize the global subscriber
///
/// `RUST_LOG` overrides the configured level. Should be called once at
/// application startup.
pub fn init(config: &LoggingConfig) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid log level '{}': {e}", config.level),
            )
        })?;

    let target = LogTarget::open(config.log_file.as_deref())?;
    let ansi = !target.is_file();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_writer(target.into_make_writer())
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("======================================");
    tracing::info!("Static resource server started");
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Document root: {}", config.server.root);
    tracing::info!("Log level: {}", config.logging.level);
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    if let Some(ref path) = config.logging.log_file {
        tracing::info!("Log file: {path}");
    }
    tracing::info!(
        "Gzip: {}, buffer size: {} bytes",
        config.sender.gzip,
        config.sender.buffer_size
    );
    tracing::info!("======================================");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}
