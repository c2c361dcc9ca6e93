// Application state module
// Immutable state shared by every connection

use std::path::PathBuf;
use std::sync::atomic::AtomicUsize;

use super::types::Config;
use webresources::WebResourceSender;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Canonical document root
    pub root: PathBuf,
    pub sender: WebResourceSender,
    pub active_connections: AtomicUsize,
}

impl AppState {
    /// Resolve the document root and build the sender
    pub fn new(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let root = PathBuf::from(&config.server.root)
            .canonicalize()
            .map_err(|e| format!("Document root '{}' is not accessible: {e}", config.server.root))?;
        let sender = config.sender.clone().into_sender()?;

        Ok(Self {
            config,
            root,
            sender,
            active_connections: AtomicUsize::new(0),
        })
    }
}
