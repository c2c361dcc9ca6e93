//! Request headers consulted by the sender
//!
//! Extracted once per request; header names are matched case-insensitively
//! by `HeaderMap`.

use super::date;
use http::header::{
    ACCEPT, ACCEPT_ENCODING, IF_MATCH, IF_MODIFIED_SINCE, IF_NONE_MATCH, IF_UNMODIFIED_SINCE,
};
use http::{HeaderMap, HeaderName};
use std::time::SystemTime;

/// Conditional and negotiation headers of one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHeaders {
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<SystemTime>,
    pub if_match: Option<String>,
    pub if_unmodified_since: Option<SystemTime>,
    pub accept: Option<String>,
    pub accept_encoding: Option<String>,
}

impl RequestHeaders {
    /// Extract from a header map
    ///
    /// Unparseable dates are ignored. Repeated `Accept` and
    /// `Accept-Encoding` fields are joined into one list.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            if_none_match: first(headers, &IF_NONE_MATCH),
            if_modified_since: date_header(headers, &IF_MODIFIED_SINCE),
            if_match: first(headers, &IF_MATCH),
            if_unmodified_since: date_header(headers, &IF_UNMODIFIED_SINCE),
            accept: joined(headers, &ACCEPT),
            accept_encoding: joined(headers, &ACCEPT_ENCODING),
        }
    }
}

impl From<&HeaderMap> for RequestHeaders {
    fn from(headers: &HeaderMap) -> Self {
        Self::from_headers(headers)
    }
}

fn first(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).trim().to_string())
}

fn joined(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    let values: Vec<_> = headers
        .get_all(name)
        .iter()
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}

fn date_header(headers: &HeaderMap, name: &HeaderName) -> Option<SystemTime> {
    let raw = first(headers, name)?;
    let parsed = date::parse(&raw);
    if parsed.is_none() {
        tracing::warn!(header = %name, value = %raw, "ignoring unparseable date header");
    }
    parsed
}
