//! HTTP date handling, fixed to GMT.
//!
//! Two formats live here: the wire format used in `Last-Modified`,
//! `Expires` and `If-Modified-Since` headers, and the plain timestamp
//! format carried inside the `lasttime` visit cookie.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::time::SystemTime;

/// `EEE, dd MMM yyyy HH:mm:ss 'GMT'` in chrono notation.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Timestamp format stored in the visit cookie.
const COOKIE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a timestamp as an HTTP date, e.g. `Sat, 29 Aug 2026 12:00:00 GMT`.
///
/// Sub-second precision is dropped; parsing the result back recovers
/// the time truncated to whole seconds.
pub fn format_http_date(t: SystemTime) -> String {
    let dt: DateTime<Utc> = t.into();
    dt.format(HTTP_DATE_FORMAT).to_string()
}

/// Parse an HTTP date back into a timestamp.
///
/// Returns `None` for anything that does not match the fixed GMT
/// format; callers treat that as "no usable date" rather than an error.
pub fn parse_http_date(s: &str) -> Option<SystemTime> {
    NaiveDateTime::parse_from_str(s.trim(), HTTP_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc().into())
}

/// Format a timestamp the way the visit cookie stores it,
/// e.g. `2026-08-29 12:00:00`.
pub fn format_cookie_date(t: SystemTime) -> String {
    let dt: DateTime<Utc> = t.into();
    dt.format(COOKIE_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn round_trip_truncates_to_whole_seconds() {
        let t = UNIX_EPOCH + Duration::new(1_700_000_000, 123_456_789);
        let parsed = parse_http_date(&format_http_date(t)).unwrap();
        assert_eq!(parsed, UNIX_EPOCH + Duration::from_secs(1_700_000_000));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_http_date("not a date").is_none());
        assert!(parse_http_date("").is_none());
    }
}
