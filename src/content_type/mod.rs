//! Content type resolution
//!
//! Maps a resource name to a MIME type. The backend is chosen once per
//! process by probing an ordered list of candidates:
//!
//! 1. `mime_guess` (when the `mime-guess` feature is enabled)
//! 2. the built-in extension table
//!
//! Names that no backend can classify resolve to
//! `application/octet-stream`; resolution never fails.

pub mod table;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

pub use table::ExtensionTableResolver;

/// Content type used when nothing more specific is known
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Which implementation backs a resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    MimeGuess,
    ExtensionTable,
    Fixed,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MimeGuess => "mime_guess",
            Self::ExtensionTable => "extension-table",
            Self::Fixed => "fixed",
        };
        f.write_str(name)
    }
}

/// Maps resource names (file names or paths) to content types
pub trait ContentTypeResolver: Send + Sync + fmt::Debug {
    /// Backend tag of this resolver
    fn backend(&self) -> Backend;

    /// Content type for `name`, or `None` when the backend cannot classify it
    fn detect(&self, name: &str) -> Option<String>;

    /// Content type for `name`, falling back to `application/octet-stream`
    fn resolve(&self, name: &str) -> String {
        self.detect(name)
            .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string())
    }
}

/// Resolver backed by the `mime_guess` crate
#[cfg(feature = "mime-guess")]
#[derive(Debug, Default, Clone, Copy)]
pub struct MimeGuessResolver;

#[cfg(feature = "mime-guess")]
impl ContentTypeResolver for MimeGuessResolver {
    fn backend(&self) -> Backend {
        Backend::MimeGuess
    }

    fn detect(&self, name: &str) -> Option<String> {
        mime_guess::from_path(name).first_raw().map(ToString::to_string)
    }
}

/// Resolver with a caller-supplied extension mapping
///
/// ```
/// use webresources::content_type::{ContentTypeResolver, FixedResolver};
///
/// let resolver = FixedResolver::new().with("txt", "text/x-custom");
/// assert_eq!(resolver.resolve("a.txt"), "text/x-custom");
/// assert_eq!(resolver.resolve("a.png"), "application/octet-stream");
/// ```
#[derive(Debug, Default, Clone)]
pub struct FixedResolver {
    by_extension: HashMap<String, String>,
    default: Option<String>,
}

impl FixedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver answering `content_type` for every name
    pub fn always(content_type: impl Into<String>) -> Self {
        Self {
            by_extension: HashMap::new(),
            default: Some(content_type.into()),
        }
    }

    /// Map an extension (without dot, case-insensitive) to a content type
    #[must_use]
    pub fn with(mut self, extension: &str, content_type: impl Into<String>) -> Self {
        self.by_extension
            .insert(extension.to_ascii_lowercase(), content_type.into());
        self
    }
}

impl ContentTypeResolver for FixedResolver {
    fn backend(&self) -> Backend {
        Backend::Fixed
    }

    fn detect(&self, name: &str) -> Option<String> {
        name.rsplit_once('.')
            .and_then(|(_, ext)| self.by_extension.get(&ext.to_ascii_lowercase()))
            .or(self.default.as_ref())
            .cloned()
    }
}

type Probe = fn() -> Option<Arc<dyn ContentTypeResolver>>;

#[cfg(feature = "mime-guess")]
fn probe_mime_guess() -> Option<Arc<dyn ContentTypeResolver>> {
    Some(Arc::new(MimeGuessResolver))
}

#[cfg(not(feature = "mime-guess"))]
fn probe_mime_guess() -> Option<Arc<dyn ContentTypeResolver>> {
    None
}

#[allow(clippy::unnecessary_wraps)]
fn probe_extension_table() -> Option<Arc<dyn ContentTypeResolver>> {
    Some(Arc::new(ExtensionTableResolver))
}

/// Candidate backends in priority order
const PROBES: &[Probe] = &[probe_mime_guess, probe_extension_table];

/// Pick the first available backend
pub fn select() -> Arc<dyn ContentTypeResolver> {
    let resolver = PROBES
        .iter()
        .find_map(|probe| probe())
        .unwrap_or_else(|| Arc::new(ExtensionTableResolver));
    tracing::debug!(backend = %resolver.backend(), "content type resolver selected");
    resolver
}

static SHARED: OnceLock<Arc<dyn ContentTypeResolver>> = OnceLock::new();

/// Process-wide resolver, selected on first use and never replaced
pub fn shared() -> Arc<dyn ContentTypeResolver> {
    Arc::clone(SHARED.get_or_init(select))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_is_stable() {
        let a = shared();
        let b = shared();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[cfg(feature = "mime-guess")]
    #[test]
    fn test_select_prefers_mime_guess() {
        assert_eq!(select().backend(), Backend::MimeGuess);
    }

    #[cfg(not(feature = "mime-guess"))]
    #[test]
    fn test_select_falls_back_to_table() {
        assert_eq!(select().backend(), Backend::ExtensionTable);
    }

    #[test]
    fn test_selected_backend_agrees_on_common_types() {
        let resolver = select();
        assert_eq!(resolver.resolve("hello.txt"), "text/plain");
        assert_eq!(resolver.resolve("/static/logo.png"), "image/png");
        assert_eq!(resolver.resolve("icon.svg"), "image/svg+xml");
    }

    #[test]
    fn test_unknown_falls_back() {
        assert_eq!(select().resolve("data.unknownext"), FALLBACK_CONTENT_TYPE);
    }

    #[test]
    fn test_fixed_resolver() {
        let resolver = FixedResolver::new()
            .with("TXT", "text/x-a")
            .with("md", "text/x-b");
        assert_eq!(resolver.resolve("dir/readme.txt"), "text/x-a");
        assert_eq!(resolver.resolve("notes.MD"), "text/x-b");
        assert_eq!(resolver.resolve("notes"), FALLBACK_CONTENT_TYPE);
        assert_eq!(resolver.backend(), Backend::Fixed);

        let always = FixedResolver::always("text/plain");
        assert_eq!(always.resolve("anything.bin"), "text/plain");
    }
}
