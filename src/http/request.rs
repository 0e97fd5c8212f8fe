use std::collections::HashMap;
use std::path::PathBuf;

use crate::http::parser::RequestLine;

/// Recognized request methods.
///
/// Only these three are dispatched; DELETE, PUT, LINK and UNLINK are
/// rejected during parsing with 501, everything else with 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - conditional GET plus the cookie-based welcome page
    Get,
    /// POST - CGI invocation
    Post,
    /// HEAD - file headers without a body
    Head,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Head => "HEAD",
        }
    }
}

/// The request lines exactly as received, in order.
///
/// Line 0 is the request line. Line 1, when present, is captured as
/// the If-Modified-Since candidate: the conditional-GET check is
/// positional, whatever the header on that line is actually named.
/// Immutable once captured.
#[derive(Debug, Clone)]
pub struct RawRequest {
    lines: Vec<String>,
}

impl RawRequest {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn request_line(&self) -> &str {
        self.lines.first().map(String::as_str).unwrap_or("")
    }

    pub fn if_modified_candidate(&self) -> Option<&str> {
        self.lines.get(1).map(String::as_str)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// A fully parsed request: the validated request line plus a header
/// map built once from the captured lines.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Target as received on the wire.
    pub raw_target: String,
    /// Target resolved against the document root.
    pub target: PathBuf,
    pub version: String,
    raw: RawRequest,
    headers: HashMap<String, String>,
}

impl Request {
    pub fn new(line: RequestLine, raw: RawRequest) -> Self {
        let mut headers = HashMap::new();
        for captured in raw.lines().iter().skip(1) {
            if let Some((key, value)) = captured.split_once(':') {
                headers.insert(key.trim().to_string(), value.trim().to_string());
            }
        }

        Self {
            method: line.method,
            raw_target: line.raw_target,
            target: line.target,
            version: line.version,
            raw,
            headers,
        }
    }

    /// Header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Second request line, the positional If-Modified-Since candidate.
    pub fn if_modified_candidate(&self) -> Option<&str> {
        self.raw.if_modified_candidate()
    }

    /// The still-encoded `lasttime` value of the `Cookie:` header.
    pub fn cookie_last_time(&self) -> Option<&str> {
        self.header("Cookie")?
            .split_whitespace()
            .find_map(|token| token.strip_prefix("lasttime="))
    }

    /// First captured line that looks like a body/query payload: not
    /// empty and containing no colon.
    pub fn query_line(&self) -> Option<&str> {
        self.raw
            .lines()
            .iter()
            .skip(1)
            .map(String::as_str)
            .find(|line| !line.is_empty() && !line.contains(':'))
    }
}
