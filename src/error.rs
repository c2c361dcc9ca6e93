//! Error types
//!
//! Configuration problems are reported when the sender is built, I/O problems
//! while a resource is inspected or streamed.

use http::header::{HeaderName, InvalidHeaderValue};
use thiserror::Error;

/// Errors produced by resource construction and sending
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid sender configuration (zero buffer size, zero expiry, ...)
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Opening, reading or writing a content stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A non-file URL could not be inspected or opened
    #[error("failed to fetch '{url}': {source}")]
    Remote {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A resource attribute cannot be encoded as a header value
    #[error("invalid value for header {name}: {source}")]
    InvalidHeader {
        name: HeaderName,
        #[source]
        source: InvalidHeaderValue,
    },
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Whether this error belongs to the I/O class (local or remote)
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Remote { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
