//! Request evaluation
//!
//! Decides, for one resource and one request, between `304 Not Modified`,
//! `412 Precondition Failed` and `200 OK` with its headers and body mode.
//! Branches are checked in a fixed order and the first match wins:
//!
//! 1. `If-None-Match` is `*` or equals the `ETag` -> 304
//! 2. no `If-None-Match` and `If-Modified-Since` >= last modified -> 304
//! 3. `If-Match` is neither `*` nor the `ETag` -> 412
//! 4. `If-Unmodified-Since` <= last modified -> 412
//! 5. otherwise 200
//!
//! Dates are compared at second resolution on both sides.

use super::SenderConfig;
use crate::content_type::ContentTypeResolver;
use crate::error::{Error, Result};
use crate::http::accept::accepts;
use crate::http::{date, RequestHeaders};
use crate::resource::WebResource;
use http::header::{
    CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE, ETAG,
    EXPIRES, LAST_MODIFIED,
};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use std::time::SystemTime;

/// How the body of a `200 OK` is emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    /// Headers only (HEAD, 304, 412)
    None,
    /// Content copied unmodified
    Raw,
    /// Content streamed through a gzip encoder
    Gzip,
}

/// Result of evaluating a request against a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 304; echoes the validator that matched
    NotModified {
        etag: Option<String>,
        last_modified: Option<SystemTime>,
    },
    /// 412; no body and no resource headers
    PreconditionFailed,
    /// 200 with the response headers and body mode
    Ok { headers: HeaderMap, body: BodyMode },
}

impl Outcome {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotModified { .. } => StatusCode::NOT_MODIFIED,
            Self::PreconditionFailed => StatusCode::PRECONDITION_FAILED,
            Self::Ok { .. } => StatusCode::OK,
        }
    }

    pub const fn body(&self) -> BodyMode {
        match self {
            Self::Ok { body, .. } => *body,
            _ => BodyMode::None,
        }
    }
}

/// Evaluate `request` against `resource`
///
/// `with_body` is false for HEAD-style calls; `now` is the base of the
/// `Expires` header.
pub fn evaluate(
    config: &SenderConfig,
    resolver: &dyn ContentTypeResolver,
    resource: &dyn WebResource,
    request: &RequestHeaders,
    with_body: bool,
    now: SystemTime,
) -> Result<Outcome> {
    let etag = resource.etag();
    let last_modified = resource.last_modified().map(date::truncate_to_seconds);

    if let Some(if_none_match) = request.if_none_match.as_deref() {
        if let Some(etag) = etag.filter(|etag| matches_etag(if_none_match, etag)) {
            tracing::debug!(resource = resource.name(), "If-None-Match matched, not modified");
            return Ok(Outcome::NotModified {
                etag: Some(etag.to_string()),
                last_modified: None,
            });
        }
    } else if let (Some(since), Some(modified)) = (request.if_modified_since, last_modified) {
        if date::truncate_to_seconds(since) >= modified {
            tracing::debug!(resource = resource.name(), "If-Modified-Since matched, not modified");
            return Ok(Outcome::NotModified {
                etag: None,
                last_modified: Some(modified),
            });
        }
    }

    if let Some(if_match) = request.if_match.as_deref() {
        if if_match != "*" && etag != Some(if_match) {
            tracing::debug!(resource = resource.name(), "If-Match failed");
            return Ok(Outcome::PreconditionFailed);
        }
    }

    if let (Some(since), Some(modified)) = (request.if_unmodified_since, last_modified) {
        if date::truncate_to_seconds(since) <= modified {
            tracing::debug!(resource = resource.name(), "If-Unmodified-Since failed");
            return Ok(Outcome::PreconditionFailed);
        }
    }

    let content_type = resource
        .content_type()
        .map_or_else(|| resolver.resolve(resource.name()), ToString::to_string);

    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_DISPOSITION,
        header_value(
            &CONTENT_DISPOSITION,
            &content_disposition(resource.name(), &content_type, request.accept.as_deref()),
        )?,
    );
    headers.insert(CONTENT_TYPE, header_value(&CONTENT_TYPE, &content_type)?);
    if let Some(modified) = last_modified {
        headers.insert(LAST_MODIFIED, header_value(&LAST_MODIFIED, &date::format(modified))?);
    }
    if let Some(etag) = etag {
        headers.insert(ETAG, header_value(&ETAG, etag)?);
    }
    if let Some(cache_control) = config.cache_control.as_deref() {
        headers.insert(CACHE_CONTROL, header_value(&CACHE_CONTROL, cache_control)?);
    }
    if let Some(expires) = config.expires.and_then(|offset| now.checked_add(offset)) {
        headers.insert(EXPIRES, header_value(&EXPIRES, &date::format(expires))?);
    }

    let body = if !with_body {
        BodyMode::None
    } else if use_gzip(config, resource, &content_type, request) {
        headers.insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
        BodyMode::Gzip
    } else {
        if let Some(length) = resource.content_length() {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
        }
        BodyMode::Raw
    };

    tracing::debug!(
        resource = resource.name(),
        content_type = %content_type,
        body = ?body,
        "sending resource"
    );

    Ok(Outcome::Ok { headers, body })
}

fn matches_etag(header: &str, etag: &str) -> bool {
    header == "*" || header == etag
}

fn use_gzip(
    config: &SenderConfig,
    resource: &dyn WebResource,
    content_type: &str,
    request: &RequestHeaders,
) -> bool {
    config.gzip
        && request
            .accept_encoding
            .as_deref()
            .is_some_and(|accept_encoding| accepts(accept_encoding, "gzip"))
        && is_compressible(content_type)
        && passes_min_length(resource.content_length(), config.gzip_min_length)
}

/// Images and videos are already compressed, except SVG which is text
pub fn is_compressible(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "image/svg+xml" || !(essence.starts_with("image") || essence.starts_with("video"))
}

/// Unknown length or no configured minimum always passes
pub const fn passes_min_length(length: Option<u64>, min_length: Option<u64>) -> bool {
    match (length, min_length) {
        (Some(length), Some(min_length)) => length > min_length,
        _ => true,
    }
}

/// `inline` unless an image the client did not declare acceptable
fn content_disposition(name: &str, content_type: &str, accept: Option<&str>) -> String {
    let attachment =
        content_type.starts_with("image") && !accept.is_some_and(|a| accepts(a, content_type));
    let disposition = if attachment { "attachment" } else { "inline" };
    let filename = name.replace('\\', "\\\\").replace('"', "\\\"");
    format!("{disposition};filename=\"{filename}\"")
}

pub(crate) fn header_value(name: &HeaderName, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_bytes(value.as_bytes()).map_err(|source| Error::InvalidHeader {
        name: name.clone(),
        source,
    })
}
