//! Resource construction from the filesystem and URLs
//!
//! Metadata comes from the underlying store (file stat, HTTP response
//! headers); the content itself is never read to build a descriptor.

use super::{Content, Resource, WebResourceBuilder};
use crate::content_type::{self, ContentTypeResolver};
use crate::error::{Error, Result};
use crate::http::{date, etag};
use reqwest::blocking::{Client, Response};
use reqwest::header::{CONTENT_LENGTH, LAST_MODIFIED};
use reqwest::Url;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// Builds descriptors for paths, files and URLs
#[derive(Debug, Clone)]
pub struct ResourceFactory {
    resolver: Arc<dyn ContentTypeResolver>,
}

impl Default for ResourceFactory {
    fn default() -> Self {
        Self::new(content_type::shared())
    }
}

impl ResourceFactory {
    pub fn new(resolver: Arc<dyn ContentTypeResolver>) -> Self {
        Self { resolver }
    }

    /// Descriptor for a regular file
    ///
    /// Length and modification time come from the file metadata and the weak
    /// `ETag` is derived from name, size and modification second. On platforms
    /// without modification times the descriptor has neither `Last-Modified`
    /// nor `ETag`.
    pub fn from_path(&self, path: impl AsRef<Path>) -> Result<Resource> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let metadata = fs::metadata(&path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' is not a regular file", path.display()),
            )
            .into());
        }

        let name = name_of_path(&path);
        let size = metadata.len();
        let modified = match metadata.modified() {
            Ok(modified) => Some(date::truncate_to_seconds(modified)),
            Err(e) => {
                tracing::debug!(path = %path.display(), "no modification time: {e}");
                None
            }
        };
        let content_type = self.resolver.resolve(&path.to_string_lossy());

        tracing::trace!(path = %path.display(), size, %content_type, "file resource");

        let open_path = path.clone();
        let builder = WebResourceBuilder::new(name.clone(), move || {
            Ok(Box::new(File::open(&open_path)?) as Content)
        })
        .content_length(size)
        .content_type(content_type);

        Ok(with_modified(builder, &name, Some(size), modified).build())
    }

    /// Descriptor for an opened file's path; alias of [`Self::from_path`]
    pub fn from_file(&self, path: impl AsRef<Path>) -> Result<Resource> {
        self.from_path(path)
    }

    /// Descriptor for a URL
    ///
    /// `file:` URLs are served from the filesystem. Other schemes are
    /// inspected with a `HEAD` request, falling back to the headers of a `GET`
    /// when the server refuses it. Length and modification time are used when
    /// the server reports them and the `ETag` is only synthesized when both
    /// are known.
    pub fn from_url(&self, url: &Url) -> Result<Resource> {
        if url.scheme() == "file" {
            let path = url.to_file_path().map_err(|()| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("failed to get path from url '{url}'"),
                )
            })?;
            return self.from_path(path);
        }

        let remote = |source| Error::Remote {
            url: url.to_string(),
            source,
        };

        let client = Client::builder().build().map_err(remote)?;
        let head = match client
            .head(url.clone())
            .send()
            .and_then(Response::error_for_status)
        {
            Ok(head) => head,
            Err(e) => {
                tracing::debug!(%url, "HEAD failed, reading metadata from GET: {e}");
                client
                    .get(url.clone())
                    .send()
                    .and_then(Response::error_for_status)
                    .map_err(remote)?
            }
        };

        let size = head
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let modified = head
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .and_then(date::parse);
        drop(head);

        let name = name_of_url_path(url.path()).to_string();
        let content_type = self.resolver.resolve(url.path());

        tracing::trace!(%url, ?size, %content_type, "remote resource");

        let open_url = url.clone();
        let mut builder = WebResourceBuilder::new(name.clone(), move || {
            client
                .get(open_url.clone())
                .send()
                .and_then(Response::error_for_status)
                .map(|response| Box::new(response) as Content)
                .map_err(|source| Error::Remote {
                    url: open_url.to_string(),
                    source,
                })
        })
        .content_type(content_type);
        if let Some(size) = size {
            builder = builder.content_length(size);
        }

        Ok(with_modified(builder, &name, size, modified).build())
    }

    /// Parse and build a descriptor for a URL string
    pub fn from_url_str(&self, url: &str) -> Result<Resource> {
        let url = Url::parse(url).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("invalid url '{url}': {e}"))
        })?;
        self.from_url(&url)
    }
}

fn with_modified(
    builder: WebResourceBuilder,
    name: &str,
    size: Option<u64>,
    modified: Option<SystemTime>,
) -> WebResourceBuilder {
    let Some(modified) = modified else {
        return builder;
    };
    let builder = builder.last_modified(modified);
    match size {
        Some(size) => builder.etag(etag::weak_etag(name, size, modified)),
        None => builder,
    }
}

/// Final path segment, or the whole path when there is none
fn name_of_path(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.to_string_lossy().into_owned(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Final segment of a URL path, or the whole path when it is empty
fn name_of_url_path(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some((_, last)) if !last.is_empty() => last,
        _ => path,
    }
}
