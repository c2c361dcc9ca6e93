//! Built-in extension table
//!
//! Last resort backend; always available.

use super::{Backend, ContentTypeResolver};

/// Resolves content types from a fixed extension table
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtensionTableResolver;

impl ContentTypeResolver for ExtensionTableResolver {
    fn backend(&self) -> Backend {
        Backend::ExtensionTable
    }

    fn detect(&self, name: &str) -> Option<String> {
        let extension = extension_of(name)?.to_ascii_lowercase();
        lookup(&extension).map(ToString::to_string)
    }
}

/// Extension of the final path segment, without the dot
fn extension_of(name: &str) -> Option<&str> {
    let file_name = name.rsplit(['/', '\\']).next()?;
    let (stem, extension) = file_name.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() {
        return None;
    }
    Some(extension)
}

/// Get MIME type for a lower-case extension
///
/// # Examples
/// ```
/// use webresources::content_type::table::lookup;
/// assert_eq!(lookup("html"), Some("text/html"));
/// assert_eq!(lookup("mp4"), Some("video/mp4"));
/// assert_eq!(lookup("xyz"), None);
/// ```
pub fn lookup(extension: &str) -> Option<&'static str> {
    let content_type = match extension {
        // Text
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "txt" | "text" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "xml" => "application/xml",

        // JavaScript/WASM
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",

        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogv" => "video/ogg",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",

        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",

        // Documents
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "gzip" => "application/gzip",
        "tar" => "application/x-tar",

        _ => return None,
    };
    Some(content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        let resolver = ExtensionTableResolver;
        assert_eq!(resolver.detect("index.html").as_deref(), Some("text/html"));
        assert_eq!(resolver.detect("hello.txt").as_deref(), Some("text/plain"));
        assert_eq!(resolver.detect("app.js").as_deref(), Some("application/javascript"));
        assert_eq!(resolver.detect("logo.svg").as_deref(), Some("image/svg+xml"));
        assert_eq!(resolver.detect("movie.mp4").as_deref(), Some("video/mp4"));
    }

    #[test]
    fn test_full_paths_and_case() {
        let resolver = ExtensionTableResolver;
        assert_eq!(
            resolver.detect("/var/www/static/PHOTO.PNG").as_deref(),
            Some("image/png")
        );
        assert_eq!(
            resolver.detect("C:\\assets\\style.css").as_deref(),
            Some("text/css")
        );
    }

    #[test]
    fn test_unknown_extension() {
        let resolver = ExtensionTableResolver;
        assert_eq!(resolver.detect("archive.xyz"), None);
        assert_eq!(resolver.detect("Makefile"), None);
        assert_eq!(resolver.detect(".bashrc"), None);
        assert_eq!(resolver.resolve("Makefile"), "application/octet-stream");
    }
}
