//! Resource sender
//!
//! A [`WebResourceSender`] holds immutable configuration and is shared across
//! requests. Binding a resource with [`WebResourceSender::resource`] yields a
//! [`Sender`] that evaluates one request and writes the outcome to a
//! [`ResponseSink`].

mod body;
pub mod evaluate;
mod settings;

use crate::cache_control::CacheControl;
use crate::content_type::{self, ContentTypeResolver};
use crate::error::{Error, Result};
use crate::http::{date, RequestHeaders, ResponseSink};
use crate::resource::{Resource, ResourceFactory, WebResource};
use body::send_body;
use evaluate::header_value;
use http::header::{ETAG, LAST_MODIFIED};
use http::{HeaderMap, Method, Request, StatusCode};
use reqwest::Url;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

pub use evaluate::{evaluate, BodyMode, Outcome};
pub use settings::SenderSettings;

/// Default copy buffer size in bytes
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Immutable sender configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderConfig {
    pub gzip: bool,
    /// Compress only when the length is unknown or exceeds this
    pub gzip_min_length: Option<u64>,
    pub buffer_size: usize,
    /// Never empty when set
    pub cache_control: Option<String>,
    /// Offset added to the current time for `Expires`
    pub expires: Option<Duration>,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            gzip: false,
            gzip_min_length: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
            cache_control: None,
            expires: None,
        }
    }
}

/// Fluent builder for [`WebResourceSender`]
///
/// ```
/// use std::time::Duration;
/// use webresources::{CacheControl, WebResourceSender};
///
/// let sender = WebResourceSender::builder()
///     .with_gzip()
///     .with_gzip_min_length(256)
///     .with_expires(Duration::from_secs(3600))?
///     .with_cache_control(CacheControl::new().public_cache())
///     .build();
/// assert!(sender.config().gzip);
/// # Ok::<(), webresources::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SenderBuilder {
    config: SenderConfig,
    resolver: Option<Arc<dyn ContentTypeResolver>>,
}

impl SenderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_gzip(mut self) -> Self {
        self.config.gzip = true;
        self
    }

    #[must_use]
    pub const fn with_gzip_min_length(mut self, min_length: u64) -> Self {
        self.config.gzip_min_length = Some(min_length);
        self
    }

    /// Copy buffer size; must be greater than zero
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Result<Self> {
        if buffer_size == 0 {
            return Err(Error::config("buffer size must be greater than zero"));
        }
        self.config.buffer_size = buffer_size;
        Ok(self)
    }

    /// `Expires` offset; must be at least one millisecond
    pub fn with_expires(mut self, offset: Duration) -> Result<Self> {
        if offset.as_millis() == 0 {
            return Err(Error::config(format!(
                "expiry offset must be positive, got {offset:?}"
            )));
        }
        self.config.expires = Some(offset);
        Ok(self)
    }

    /// Cache-Control directives; an empty builder is ignored
    #[must_use]
    pub fn with_cache_control(self, cache_control: impl Into<CacheControl>) -> Self {
        self.with_cache_control_value(cache_control.into().build())
    }

    /// Raw Cache-Control value; an empty string is ignored
    #[must_use]
    pub fn with_cache_control_value(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.trim().is_empty() {
            self.config.cache_control = Some(value);
        }
        self
    }

    /// Replace the process-wide content type resolver
    #[must_use]
    pub fn with_content_type_resolver(mut self, resolver: Arc<dyn ContentTypeResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn build(self) -> WebResourceSender {
        let resolver = self.resolver.unwrap_or_else(content_type::shared);
        tracing::debug!(
            gzip = self.config.gzip,
            buffer_size = self.config.buffer_size,
            resolver = %resolver.backend(),
            "sender configured"
        );
        WebResourceSender {
            factory: ResourceFactory::new(Arc::clone(&resolver)),
            config: self.config,
            resolver,
        }
    }
}

/// Shared, read-only sender
#[derive(Debug, Clone)]
pub struct WebResourceSender {
    config: SenderConfig,
    resolver: Arc<dyn ContentTypeResolver>,
    factory: ResourceFactory,
}

impl Default for WebResourceSender {
    fn default() -> Self {
        Self::create()
    }
}

impl WebResourceSender {
    pub fn builder() -> SenderBuilder {
        SenderBuilder::new()
    }

    /// Sender with default configuration
    pub fn create() -> Self {
        SenderBuilder::new().build()
    }

    pub const fn config(&self) -> &SenderConfig {
        &self.config
    }

    /// Factory sharing this sender's resolver
    pub const fn factory(&self) -> &ResourceFactory {
        &self.factory
    }

    /// Bind a resource for sending
    pub fn resource<R: WebResource>(&self, resource: R) -> Sender<'_, R> {
        Sender {
            sender: self,
            resource,
        }
    }

    /// Bind a file from the filesystem
    pub fn path(&self, path: impl AsRef<Path>) -> Result<Sender<'_, Resource>> {
        Ok(self.resource(self.factory.from_path(path)?))
    }

    /// Bind a `file:` or remote URL
    pub fn url(&self, url: &Url) -> Result<Sender<'_, Resource>> {
        Ok(self.resource(self.factory.from_url(url)?))
    }

    pub fn url_str(&self, url: &str) -> Result<Sender<'_, Resource>> {
        Ok(self.resource(self.factory.from_url_str(url)?))
    }
}

/// What was written to the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub status: StatusCode,
    pub body: BodyMode,
    /// Bytes read from the content source
    pub bytes: u64,
}

/// A resource bound to a sender
#[derive(Debug)]
pub struct Sender<'a, R> {
    sender: &'a WebResourceSender,
    resource: R,
}

impl<R: WebResource> Sender<'_, R> {
    pub const fn resource(&self) -> &R {
        &self.resource
    }

    /// Decide the response without writing anything
    pub fn evaluate(&self, with_body: bool, request: &RequestHeaders) -> Result<Outcome> {
        evaluate(
            &self.sender.config,
            self.sender.resolver.as_ref(),
            &self.resource,
            request,
            with_body,
            SystemTime::now(),
        )
    }

    /// Respond to `method`; HEAD never carries a body
    pub fn send<S>(&self, method: &Method, headers: &HeaderMap, sink: &mut S) -> Result<Delivery>
    where
        S: ResponseSink + ?Sized,
    {
        self.send_with(*method != Method::HEAD, &RequestHeaders::from(headers), sink)
    }

    /// Respond with a body
    pub fn get<S>(&self, headers: &HeaderMap, sink: &mut S) -> Result<Delivery>
    where
        S: ResponseSink + ?Sized,
    {
        self.send_with(true, &RequestHeaders::from(headers), sink)
    }

    /// Respond with headers only
    pub fn head<S>(&self, headers: &HeaderMap, sink: &mut S) -> Result<Delivery>
    where
        S: ResponseSink + ?Sized,
    {
        self.send_with(false, &RequestHeaders::from(headers), sink)
    }

    pub fn send_request<B, S>(&self, request: &Request<B>, sink: &mut S) -> Result<Delivery>
    where
        S: ResponseSink + ?Sized,
    {
        self.send(request.method(), request.headers(), sink)
    }

    /// Evaluate and write the outcome to `sink`
    pub fn send_with<S>(
        &self,
        with_body: bool,
        request: &RequestHeaders,
        sink: &mut S,
    ) -> Result<Delivery>
    where
        S: ResponseSink + ?Sized,
    {
        let outcome = self.evaluate(with_body, request)?;
        let status = outcome.status();
        let mode = outcome.body();

        match outcome {
            Outcome::NotModified {
                etag,
                last_modified,
            } => {
                sink.set_status(status);
                if let Some(etag) = etag {
                    sink.set_header(ETAG, header_value(&ETAG, &etag)?);
                }
                if let Some(modified) = last_modified {
                    sink.set_header(
                        LAST_MODIFIED,
                        header_value(&LAST_MODIFIED, &date::format(modified))?,
                    );
                }
                Ok(Delivery {
                    status,
                    body: mode,
                    bytes: 0,
                })
            }
            Outcome::PreconditionFailed => {
                sink.send_error(status);
                Ok(Delivery {
                    status,
                    body: mode,
                    bytes: 0,
                })
            }
            Outcome::Ok { headers, body } => {
                sink.set_status(status);
                for (name, value) in &headers {
                    sink.set_header(name.clone(), value.clone());
                }
                let bytes = send_body(&self.resource, body, self.sender.config.buffer_size, sink)?;
                Ok(Delivery {
                    status,
                    body,
                    bytes,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_type::FixedResolver;
    use crate::http::BufferedResponse;
    use crate::resource::Content;
    use flate2::read::GzDecoder;
    use http::header::{
        ACCEPT_ENCODING, CACHE_CONTROL, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE,
        IF_MODIFIED_SINCE, IF_NONE_MATCH,
    };
    use http::HeaderValue;
    use std::io::{Read, Write};
    use std::time::UNIX_EPOCH;

    fn hello() -> Resource {
        Resource::builder("hello.txt", || {
            Ok(Box::new(std::io::Cursor::new(b"hello".to_vec())) as Content)
        })
        .build()
    }

    fn gzip_request() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
        headers
    }

    #[test]
    fn test_hello_plain() {
        let sender = WebResourceSender::create();
        let mut sink = BufferedResponse::new();
        let delivery = sender
            .resource(hello())
            .get(&HeaderMap::new(), &mut sink)
            .unwrap();

        assert_eq!(delivery.status, StatusCode::OK);
        assert_eq!(delivery.body, BodyMode::Raw);
        assert_eq!(delivery.bytes, 5);
        assert_eq!(sink.status(), StatusCode::OK);
        assert_eq!(sink.header("content-type"), Some("text/plain"));
        assert_eq!(sink.header("content-encoding"), None);
        assert_eq!(sink.body(), b"hello");
    }

    #[test]
    fn test_hello_gzip() {
        let sender = WebResourceSender::builder().with_gzip().build();
        let mut sink = BufferedResponse::new();
        let delivery = sender
            .resource(hello())
            .get(&gzip_request(), &mut sink)
            .unwrap();

        assert_eq!(delivery.body, BodyMode::Gzip);
        assert_eq!(sink.header("content-encoding"), Some("gzip"));
        assert_eq!(sink.header("content-length"), None);

        let mut decoded = String::new();
        GzDecoder::new(sink.body()).read_to_string(&mut decoded).unwrap();
        assert_eq!(decoded, "hello");
    }

    #[test]
    fn test_small_buffer_size() {
        let content = "0123456789".repeat(100);
        let sender = WebResourceSender::builder()
            .with_buffer_size(16)
            .unwrap()
            .build();
        assert_eq!(sender.config().buffer_size, 16);

        let mut sink = BufferedResponse::new();
        sender
            .resource(Resource::from_bytes("digits.txt", content.clone()))
            .get(&HeaderMap::new(), &mut sink)
            .unwrap();
        assert_eq!(sink.body(), content.as_bytes());
        assert_eq!(sink.header("content-length"), Some("1000"));
    }

    #[test]
    fn test_configuration_errors() {
        let err = WebResourceSender::builder().with_buffer_size(0).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));

        let err = WebResourceSender::builder()
            .with_expires(Duration::ZERO)
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));

        let err = WebResourceSender::builder()
            .with_expires(Duration::from_micros(999))
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));

        assert!(WebResourceSender::builder()
            .with_expires(Duration::from_millis(1))
            .is_ok());
    }

    #[test]
    fn test_empty_cache_control_ignored() {
        let sender = WebResourceSender::builder()
            .with_cache_control(CacheControl::new())
            .with_cache_control_value("")
            .build();
        assert_eq!(sender.config().cache_control, None);

        let sender = WebResourceSender::builder()
            .with_cache_control(CacheControl::new().no_cache().no_store())
            .with_cache_control_value("  ")
            .build();
        assert_eq!(
            sender.config().cache_control.as_deref(),
            Some("no-cache, no-store")
        );
    }

    #[test]
    fn test_cache_control_header_sent() {
        let sender = WebResourceSender::builder()
            .with_cache_control(crate::cache_control::CachePolicy::Public(60))
            .build();
        let mut sink = BufferedResponse::new();
        sender
            .resource(hello())
            .get(&HeaderMap::new(), &mut sink)
            .unwrap();
        assert_eq!(
            sink.headers().get(CACHE_CONTROL).and_then(|v| v.to_str().ok()),
            Some("public, max-age=60")
        );
    }

    #[test]
    fn test_head_writes_no_body() {
        let sender = WebResourceSender::builder().with_gzip().build();
        let mut sink = BufferedResponse::new();
        let delivery = sender
            .resource(hello())
            .send(&Method::HEAD, &gzip_request(), &mut sink)
            .unwrap();
        assert_eq!(delivery.status, StatusCode::OK);
        assert_eq!(delivery.body, BodyMode::None);
        assert_eq!(delivery.bytes, 0);
        assert!(sink.body().is_empty());
        assert!(sink.headers().get(CONTENT_TYPE).is_some());
        assert!(sink.headers().get(CONTENT_LENGTH).is_none());
        assert!(sink.headers().get(CONTENT_ENCODING).is_none());

        let mut sink = BufferedResponse::new();
        sender
            .resource(hello())
            .head(&HeaderMap::new(), &mut sink)
            .unwrap();
        assert!(sink.body().is_empty());
    }

    #[test]
    fn test_not_modified_echoes_etag() {
        let sender = WebResourceSender::create();
        let resource = Resource::from_bytes("app.js", "let x = 1;");
        let etag = resource.etag().unwrap().to_string();

        let mut headers = HeaderMap::new();
        headers.insert(IF_NONE_MATCH, HeaderValue::from_str(&etag).unwrap());
        let mut sink = BufferedResponse::new();
        let delivery = sender.resource(&resource).get(&headers, &mut sink).unwrap();

        assert_eq!(delivery.status, StatusCode::NOT_MODIFIED);
        assert_eq!(sink.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(sink.header("etag"), Some(etag.as_str()));
        assert_eq!(sink.header("last-modified"), None);
        assert!(sink.body().is_empty());
    }

    #[test]
    fn test_not_modified_by_date() {
        let modified = UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        let resource = Resource::builder("a.css", || Ok(Box::new(std::io::empty()) as Content))
            .last_modified(modified)
            .build();

        let mut headers = HeaderMap::new();
        headers.insert(
            IF_MODIFIED_SINCE,
            HeaderValue::from_str(&date::format(modified)).unwrap(),
        );
        let mut sink = BufferedResponse::new();
        WebResourceSender::create()
            .resource(resource)
            .get(&headers, &mut sink)
            .unwrap();

        assert_eq!(sink.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(sink.header("last-modified"), Some(date::format(modified).as_str()));
        assert_eq!(sink.header("etag"), None);
    }

    #[test]
    fn test_precondition_failed_uses_send_error() {
        #[derive(Default)]
        struct RecordingSink {
            inner: BufferedResponse,
            errors: Vec<StatusCode>,
        }

        impl ResponseSink for RecordingSink {
            fn set_status(&mut self, status: StatusCode) {
                self.inner.set_status(status);
            }

            fn set_header(&mut self, name: http::HeaderName, value: HeaderValue) {
                self.inner.set_header(name, value);
            }

            fn send_error(&mut self, status: StatusCode) {
                self.errors.push(status);
            }

            fn body_writer(&mut self) -> std::io::Result<&mut dyn Write> {
                self.inner.body_writer()
            }
        }

        let request = Request::builder()
            .method(Method::GET)
            .header("if-match", "\"nope\"")
            .body(())
            .unwrap();
        let mut sink = RecordingSink::default();
        let delivery = WebResourceSender::create()
            .resource(Resource::from_bytes("a.txt", "a"))
            .send_request(&request, &mut sink)
            .unwrap();

        assert_eq!(delivery.status, StatusCode::PRECONDITION_FAILED);
        assert_eq!(sink.errors, vec![StatusCode::PRECONDITION_FAILED]);
        assert!(sink.inner.headers().is_empty());
        assert!(sink.inner.body().is_empty());
    }

    #[test]
    fn test_injected_resolver() {
        let sender = WebResourceSender::builder()
            .with_content_type_resolver(Arc::new(FixedResolver::always("text/x-custom")))
            .build();
        let outcome = sender
            .resource(hello())
            .evaluate(true, &RequestHeaders::default())
            .unwrap();
        match outcome {
            Outcome::Ok { headers, .. } => {
                assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/x-custom");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_path_convenience() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, "<h1>hi</h1>").unwrap();

        let sender = WebResourceSender::create();
        let bound = sender.path(&path).unwrap();
        assert_eq!(bound.resource().name(), "index.html");

        let mut sink = BufferedResponse::new();
        bound.get(&HeaderMap::new(), &mut sink).unwrap();
        assert_eq!(sink.header("content-type"), Some("text/html"));
        assert_eq!(sink.body(), b"<h1>hi</h1>");
        assert!(sink.header("etag").unwrap().starts_with("W/\""));
        assert!(sink.header("last-modified").is_some());

        assert!(sender.path(dir.path().join("missing.html")).is_err());
    }

    #[test]
    fn test_url_convenience() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "{}").unwrap();

        let sender = WebResourceSender::create();
        let url = Url::from_file_path(&path).unwrap();
        let mut sink = BufferedResponse::new();
        sender
            .url(&url)
            .unwrap()
            .get(&HeaderMap::new(), &mut sink)
            .unwrap();
        assert_eq!(sink.header("content-type"), Some("application/json"));
        assert_eq!(sink.body(), b"{}");

        assert!(sender.url_str(url.as_str()).is_ok());
    }

    #[test]
    fn test_shared_across_threads() {
        let sender = Arc::new(WebResourceSender::builder().with_gzip().build());
        let resource = Arc::new(Resource::from_bytes("shared.txt", "x".repeat(4096)));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let sender = Arc::clone(&sender);
                let resource = Arc::clone(&resource);
                std::thread::spawn(move || {
                    let mut sink = BufferedResponse::new();
                    sender
                        .resource(resource)
                        .get(&gzip_request(), &mut sink)
                        .unwrap();
                    let mut decoded = String::new();
                    GzDecoder::new(sink.body()).read_to_string(&mut decoded).unwrap();
                    decoded.len()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 4096);
        }
    }
}
