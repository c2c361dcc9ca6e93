//! HTTP date handling
//!
//! All comparisons happen at second resolution, the precision of textual
//! HTTP dates.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Largest instant an HTTP date can express (9999-12-31T23:59:59Z)
const MAX_HTTP_DATE_SECS: u64 = 253_402_300_799;

/// Drop the sub-second part, rounding toward the past
pub fn truncate_to_seconds(time: SystemTime) -> SystemTime {
    match time.duration_since(UNIX_EPOCH) {
        Ok(since) => UNIX_EPOCH + Duration::from_secs(since.as_secs()),
        Err(err) => {
            let before = err.duration();
            let secs = before.as_secs() + u64::from(before.subsec_nanos() > 0);
            UNIX_EPOCH - Duration::from_secs(secs)
        }
    }
}

/// Parse an HTTP date (IMF-fixdate, RFC 850 or asctime)
pub fn parse(value: &str) -> Option<SystemTime> {
    httpdate::parse_http_date(value.trim()).ok()
}

/// Format as IMF-fixdate, clamped to the range HTTP dates can express
pub fn format(time: SystemTime) -> String {
    let secs = time
        .duration_since(UNIX_EPOCH)
        .map_or(0, |since| since.as_secs().min(MAX_HTTP_DATE_SECS));
    httpdate::fmt_http_date(UNIX_EPOCH + Duration::from_secs(secs))
}
