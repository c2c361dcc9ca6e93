//! `ETag` generation

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

/// Strong `ETag` from the full content, e.g. `"abc123def"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Weak `ETag` from resource metadata, e.g. `W/"1f2e-5-6553f100"`
///
/// Built from the name hash, size and modification second, so it never
/// reads the content.
pub fn weak_etag(name: &str, size: u64, modified: SystemTime) -> String {
    let mut hasher = DefaultHasher::new();
    name.hash(&mut hasher);
    let name_hash = hasher.finish();
    let secs = modified
        .duration_since(UNIX_EPOCH)
        .map_or(0, |since| since.as_secs());
    format!("W/\"{name_hash:x}-{size:x}-{secs:x}\"")
}
