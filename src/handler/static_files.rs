//! Static file lookup module
//!
//! Maps a request path onto a file below the document root.

use std::path::{Component, Path, PathBuf};

/// Resolve `request_path` to a regular file below `root`
///
/// `root` must already be canonical. Directories are resolved through
/// `index_files` in order. Paths escaping the root, through `..` or a
/// symlink, are rejected.
pub fn resolve(root: &Path, request_path: &str, index_files: &[String]) -> Option<PathBuf> {
    let relative = Path::new(request_path.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        tracing::warn!("Path traversal attempt blocked: {request_path}");
        return None;
    }

    let mut file_path = root.join(relative);
    if file_path.is_dir() {
        file_path = index_files
            .iter()
            .map(|index| file_path.join(index))
            .find(|candidate| candidate.is_file())?;
    }

    // File not found is common (404), no need to log at warning level
    let canonical = file_path.canonicalize().ok()?;
    if !canonical.starts_with(root) {
        tracing::warn!(
            "Path traversal attempt blocked: {} -> {}",
            request_path,
            canonical.display()
        );
        return None;
    }

    canonical.is_file().then_some(canonical)
}
