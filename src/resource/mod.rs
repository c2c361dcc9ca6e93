//! Resource descriptors
//!
//! A [`WebResource`] names a piece of content, knows how to open it and
//! carries optional metadata used for caching decisions. Descriptors are
//! immutable once built; [`WebResource::open_content`] may be called any
//! number of times and yields the same content each time.

pub mod factory;

use crate::error::Result;
use crate::http::etag;
use hyper::body::Bytes;
use std::fmt;
use std::io::{Cursor, Read};
use std::time::SystemTime;

pub use factory::ResourceFactory;

/// Readable content stream owned by the caller
pub type Content = Box<dyn Read + Send>;

/// Something the sender can serve
pub trait WebResource: Send + Sync {
    /// Name used for the content disposition and type detection
    fn name(&self) -> &str;

    /// Open a fresh stream over the content
    fn open_content(&self) -> Result<Content>;

    fn content_length(&self) -> Option<u64>;

    fn content_type(&self) -> Option<&str>;

    /// Opaque `ETag`, strong (`"..."`) or weak (`W/"..."`)
    fn etag(&self) -> Option<&str>;

    fn last_modified(&self) -> Option<SystemTime>;
}

macro_rules! forward_web_resource {
    ($($ty:ty),*) => {$(
        impl<T: WebResource + ?Sized> WebResource for $ty {
            fn name(&self) -> &str {
                (**self).name()
            }

            fn open_content(&self) -> Result<Content> {
                (**self).open_content()
            }

            fn content_length(&self) -> Option<u64> {
                (**self).content_length()
            }

            fn content_type(&self) -> Option<&str> {
                (**self).content_type()
            }

            fn etag(&self) -> Option<&str> {
                (**self).etag()
            }

            fn last_modified(&self) -> Option<SystemTime> {
                (**self).last_modified()
            }
        }
    )*};
}

forward_web_resource!(&T, Box<T>, std::sync::Arc<T>);

/// Factory producing a fresh content stream per call
pub type ContentProvider = Box<dyn Fn() -> Result<Content> + Send + Sync>;

/// Descriptor produced by [`WebResourceBuilder`]
pub struct Resource {
    name: String,
    provider: ContentProvider,
    content_length: Option<u64>,
    content_type: Option<String>,
    etag: Option<String>,
    last_modified: Option<SystemTime>,
}

impl Resource {
    /// Start building a descriptor
    pub fn builder<F>(name: impl Into<String>, provider: F) -> WebResourceBuilder
    where
        F: Fn() -> Result<Content> + Send + Sync + 'static,
    {
        WebResourceBuilder::new(name, provider)
    }

    /// In-memory resource with known length and a content-hash `ETag`
    ///
    /// The content type is left open so that it is resolved from the name.
    pub fn from_bytes(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content: Bytes = content.into();
        let etag = etag::generate_etag(&content);
        let length = content.len() as u64;
        Self::builder(name, move || Ok(Box::new(Cursor::new(content.clone())) as Content))
            .content_length(length)
            .etag(etag)
            .build()
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("content_length", &self.content_length)
            .field("content_type", &self.content_type)
            .field("etag", &self.etag)
            .field("last_modified", &self.last_modified)
            .finish_non_exhaustive()
    }
}

impl WebResource for Resource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open_content(&self) -> Result<Content> {
        (self.provider)()
    }

    fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    fn last_modified(&self) -> Option<SystemTime> {
        self.last_modified
    }
}

/// Builder for [`Resource`]
pub struct WebResourceBuilder {
    resource: Resource,
}

impl WebResourceBuilder {
    pub fn new<F>(name: impl Into<String>, provider: F) -> Self
    where
        F: Fn() -> Result<Content> + Send + Sync + 'static,
    {
        Self {
            resource: Resource {
                name: name.into(),
                provider: Box::new(provider),
                content_length: None,
                content_type: None,
                etag: None,
                last_modified: None,
            },
        }
    }

    #[must_use]
    pub const fn content_length(mut self, length: u64) -> Self {
        self.resource.content_length = Some(length);
        self
    }

    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.resource.content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub fn etag(mut self, etag: impl Into<String>) -> Self {
        self.resource.etag = Some(etag.into());
        self
    }

    #[must_use]
    pub const fn last_modified(mut self, last_modified: SystemTime) -> Self {
        self.resource.last_modified = Some(last_modified);
        self
    }

    pub fn build(self) -> Resource {
        self.resource
    }
}
