//! Cookie-based welcome page
//!
//! GET responses carry a `Set-Cookie: lasttime=<urlencoded timestamp>`
//! header and an HTML page generated in memory: a "first visit" page
//! when no usable cookie came with the request, a "welcome back" page
//! embedding the previous visit's timestamp otherwise. Nothing is
//! persisted server-side; the cookie is the only state.

use std::time::SystemTime;

use crate::http::date;
use crate::http::request::Request;
use crate::http::response::{Response, ResponseBuilder, StatusCode};

/// Percent-encode a cookie timestamp (space becomes `+`).
pub fn url_encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Decode a cookie timestamp. Empty input yields `None`.
pub fn url_decode(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    url::form_urlencoded::parse(value.as_bytes())
        .next()
        .map(|(decoded, _)| decoded.into_owned())
}

/// Builds the welcome response for a GET request.
///
/// The previous-visit timestamp is compared to "now" as formatted
/// strings, not as instants: a decoded timestamp sorting after the
/// current one is treated as a first visit. Kept as-is from the system
/// this replaces.
pub fn render(request: &Request) -> Response {
    let now = date::format_cookie_date(SystemTime::now());

    let body = match request.cookie_last_time().and_then(url_decode) {
        Some(last_visit) if last_visit.as_str() <= now.as_str() => {
            returning_visitor_page(&last_visit)
        }
        _ => first_visit_page(),
    };

    ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/html")
        .header("Set-Cookie", format!("lasttime={}", url_encode(&now)))
        .body(body.into_bytes())
        .build()
}

pub fn first_visit_page() -> String {
    "<html>\n<body>\n<h1>Welcome Page</h1>\n<p>\nWelcome! We have not seen you before.\n<p>\n</body>\n</html>".to_string()
}

pub fn returning_visitor_page(last_visit: &str) -> String {
    format!(
        "<html>\n<body>\n<h1>Welcome Page</h1>\n<p>\nWelcome back! Your last visit was at: {last_visit}\n<p>\n</body>\n</html>"
    )
}
