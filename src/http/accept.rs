//! Accept-style header matching
//!
//! Used for both `Accept` (content disposition) and `Accept-Encoding` (gzip)
//! negotiation. Quality values and parameters are not interpreted; every
//! comma or semicolon separated token is compared as-is.

/// Whether `header` accepts `value`
///
/// A token matches when it equals `value`, the wildcard family of `value`
/// (`image/*` for `image/png`) or `*/*`.
///
/// ```
/// use webresources::http::accept::accepts;
///
/// assert!(accepts("text/html, image/*;q=0.8", "image/png"));
/// assert!(accepts("deflate, gzip;q=1.0", "gzip"));
/// assert!(!accepts("text/html", "image/png"));
/// ```
pub fn accepts(header: &str, value: &str) -> bool {
    let family = value
        .split_once('/')
        .map(|(main_type, _)| format!("{main_type}/*"));

    header
        .split([',', ';'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .any(|token| token == value || token == "*/*" || family.as_deref() == Some(token))
}
