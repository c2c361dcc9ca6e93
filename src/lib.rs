//! Static resource sending with conditional caching and gzip negotiation
//!
//! A [`WebResourceSender`] answers one request for one [`WebResource`]:
//! `304 Not Modified` when the client's validators still match,
//! `412 Precondition Failed` when its preconditions do not hold, and
//! otherwise `200 OK` with caching headers and a raw or gzip body.
//!
//! ```
//! use http::HeaderMap;
//! use webresources::{BufferedResponse, Resource, WebResourceSender};
//!
//! let sender = WebResourceSender::builder().with_gzip().build();
//! let mut response = BufferedResponse::new();
//! sender
//!     .resource(Resource::from_bytes("hello.txt", "hello"))
//!     .get(&HeaderMap::new(), &mut response)?;
//! assert_eq!(response.header("content-type"), Some("text/plain"));
//! assert_eq!(response.body(), b"hello");
//! # Ok::<(), webresources::Error>(())
//! ```

pub mod cache_control;
pub mod content_type;
pub mod error;
pub mod http;
pub mod resource;
pub mod sender;

pub use cache_control::{CacheControl, CachePolicy};
pub use content_type::ContentTypeResolver;
pub use error::{Error, Result};
pub use http::{BufferedResponse, RequestHeaders, ResponseSink};
pub use resource::{Resource, ResourceFactory, WebResource, WebResourceBuilder};
pub use sender::{
    BodyMode, Delivery, Outcome, Sender, SenderBuilder, SenderConfig, SenderSettings,
    WebResourceSender,
};
