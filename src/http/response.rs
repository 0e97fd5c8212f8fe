use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::http::{date, mime};

/// Milliseconds added to "now" for the `Expires` header.
pub const EXPIRES_OFFSET_MS: u64 = 10_000_000;

/// HTTP status codes used by the server.
///
/// This is a closed set: every response carries exactly one of these
/// codes with its fixed reason phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 304 Not Modified
    NotModified,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 408 Request Timeout
    RequestTimeout,
    /// 411 Length Required
    LengthRequired,
    /// 500 Internal Service Error
    InternalServiceError,
    /// 501 Not Implemented
    NotImplemented,
    /// 503 Service Unavailable
    ServiceUnavailable,
    /// 505 HTTP Version Not Supported
    HttpVersionNotSupported,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use tinyhttpd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NotModified => 304,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::RequestTimeout => 408,
            StatusCode::LengthRequired => 411,
            StatusCode::InternalServiceError => 500,
            StatusCode::NotImplemented => 501,
            StatusCode::ServiceUnavailable => 503,
            StatusCode::HttpVersionNotSupported => 505,
        }
    }

    /// Returns the fixed reason phrase for this status code.
    ///
    /// Note the 500 phrase is "Internal Service Error", kept for wire
    /// compatibility with the system this replaces.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotModified => "Not Modified",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::RequestTimeout => "Request Timeout",
            StatusCode::LengthRequired => "Length Required",
            StatusCode::InternalServiceError => "Internal Service Error",
            StatusCode::NotImplemented => "Not Implemented",
            StatusCode::ServiceUnavailable => "Service Unavailable",
            StatusCode::HttpVersionNotSupported => "HTTP Version Not Supported",
        }
    }
}

/// A complete HTTP response ready to be serialized.
#[derive(Debug)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Response headers as key-value pairs
    pub headers: HashMap<String, String>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// use tinyhttpd::http::response::{ResponseBuilder, StatusCode};
///
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/html")
///     .body(b"<html></html>".to_vec())
///     .build();
/// assert_eq!(response.headers.get("Content-Length").unwrap(), "13");
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response.
    ///
    /// Adds a Content-Length header from the body size unless one was
    /// set explicitly (HEAD responses set the real file length while
    /// carrying no body).
    pub fn build(mut self) -> Response {
        self.headers
            .entry("Content-Length".to_string())
            .or_insert_with(|| self.body.len().to_string());

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// Error/status-only response: no body.
    ///
    /// 304 additionally carries a freshly computed `Expires` header.
    pub fn error(status: StatusCode) -> Self {
        let mut builder = ResponseBuilder::new(status);
        if status == StatusCode::NotModified {
            builder = builder.header("Expires", date::format_http_date(expires_at()));
        }
        builder.build()
    }

    /// Success headers for a file resource, without a body.
    ///
    /// `length` is the file's real size; used verbatim for HEAD, where
    /// the body is omitted but Content-Length must still be accurate.
    pub fn file_headers(path: &Path, modified: SystemTime, length: usize) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", mime::mime_type(path))
            .header("Content-Length", length.to_string())
            .header("Last-Modified", date::format_http_date(modified))
            .header("Content-Encoding", "identity")
            .header("Allow", "GET, POST, HEAD")
            .header("Expires", date::format_http_date(expires_at()))
            .build()
    }
}

/// Expiry timestamp for the `Expires` header: now + 10,000,000 ms.
pub fn expires_at() -> SystemTime {
    SystemTime::now() + Duration::from_millis(EXPIRES_OFFSET_MS)
}
