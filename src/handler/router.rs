//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, file lookup
//! and handing the file to the resource sender.

use crate::config::AppState;
use crate::handler::{response, static_files};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::header::{CONTENT_ENCODING, REFERER, USER_AGENT};
use hyper::{HeaderMap, Method, Request, Response, Version};
use std::convert::Infallible;
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use webresources::{BufferedResponse, Error};

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let start = Instant::now();

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_str(req.version()).to_string();
    entry.referer = header_string(req.headers(), &REFERER);
    entry.user_agent = header_string(req.headers(), &USER_AGENT);

    let response = route_request(req, &state).await;

    if state.config.logging.access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.encoding = header_string(response.headers(), &CONTENT_ENCODING);
        entry.request_time_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Serve GET and HEAD from the document root
async fn route_request<B>(req: Request<B>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    if !matches!(*req.method(), Method::GET | Method::HEAD) {
        tracing::warn!("Method not allowed: {}", req.method());
        return response::build_405_response();
    }

    let Some(file) = static_files::resolve(
        &state.root,
        req.uri().path(),
        &state.config.server.index_files,
    ) else {
        return response::build_404_response();
    };

    // GET and HEAD bodies carry nothing the sender needs
    let (parts, body) = req.into_parts();
    drop(body);
    let state = Arc::clone(state);
    let sent = tokio::task::spawn_blocking(move || {
        send_file(&state, &file, &parts.method, &parts.headers).map_err(|e| (file, e))
    })
    .await;

    match sent {
        Ok(Ok(sink)) => sink.into_response(),
        Ok(Err((file, Error::Io(e)))) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("File vanished before it could be sent: {}", file.display());
            response::build_404_response()
        }
        Ok(Err((file, e))) => {
            if e.is_io() {
                tracing::warn!("I/O failure sending '{}': {e}", file.display());
            } else {
                tracing::error!("Failed to send '{}': {e}", file.display());
            }
            response::build_500_response()
        }
        Err(e) => {
            tracing::error!("Send task failed: {e}");
            response::build_500_response()
        }
    }
}

/// Blocking part: stat the file and run the sender into a buffer
fn send_file(
    state: &AppState,
    file: &Path,
    method: &Method,
    headers: &HeaderMap,
) -> webresources::Result<BufferedResponse> {
    let mut sink = BufferedResponse::new();
    let delivery = state.sender.path(file)?.send(method, headers, &mut sink)?;
    tracing::trace!(
        file = %file.display(),
        status = %delivery.status,
        bytes = delivery.bytes,
        "file sent"
    );
    Ok(sink)
}

fn header_string(headers: &HeaderMap, name: &hyper::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
