//! Response sinks
//!
//! The sender writes status, headers and body through [`ResponseSink`], so it
//! can drive any transport. [`BufferedResponse`] collects everything in memory
//! and converts into a hyper response.

use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io::{self, Write};

/// Destination of a sent resource
pub trait ResponseSink {
    fn set_status(&mut self, status: StatusCode);

    /// Set a header, replacing any previous value
    fn set_header(&mut self, name: HeaderName, value: HeaderValue);

    /// Signal an error status without a body
    fn send_error(&mut self, status: StatusCode) {
        self.set_status(status);
    }

    /// Body output; status and headers are final once this is called
    fn body_writer(&mut self) -> io::Result<&mut dyn Write>;
}

/// In-memory response
#[derive(Debug, Clone)]
pub struct BufferedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Default for BufferedResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as text, if present and visible ASCII
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Convert into a hyper response
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(Bytes::from(self.body)));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseSink for BufferedResponse {
    fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    fn body_writer(&mut self) -> io::Result<&mut dyn Write> {
        Ok(&mut self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::CONTENT_TYPE;

    #[test]
    fn test_buffered_response() {
        let mut sink = BufferedResponse::new();
        sink.set_status(StatusCode::NOT_MODIFIED);
        sink.set_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        sink.set_header(CONTENT_TYPE, HeaderValue::from_static("text/css"));
        sink.body_writer().unwrap().write_all(b"abc").unwrap();

        assert_eq!(sink.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(sink.header("content-type"), Some("text/css"));
        assert_eq!(sink.body(), b"abc");

        let response = sink.into_response();
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(response.headers().len(), 1);
    }

    #[test]
    fn test_send_error_sets_status() {
        let mut sink = BufferedResponse::new();
        sink.send_error(StatusCode::PRECONDITION_FAILED);
        assert_eq!(sink.status(), StatusCode::PRECONDITION_FAILED);
        assert!(sink.body().is_empty());
    }
}
