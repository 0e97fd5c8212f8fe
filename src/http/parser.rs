use std::path::{Component, Path, PathBuf};

use crate::http::request::Method;
use crate::http::response::StatusCode;

/// A validated request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    /// Target exactly as it appeared on the wire, e.g. `/cgi/add.cgi`.
    pub raw_target: String,
    /// Target resolved against the document root (the working directory).
    pub target: PathBuf,
    pub version: String,
}

/// Validates a raw request line.
///
/// Rules are applied in order, first match wins; a rejection carries
/// the status code to answer with:
///
/// 1. empty or whitespace-only line -> 400
/// 2. method GET/POST/HEAD accepted; DELETE/PUT/LINK/UNLINK -> 501;
///    anything else -> 400
/// 3. target missing or unresolvable -> 400
/// 4. version missing -> 400; `HTTP/0.x` and `HTTP/1.0` accepted;
///    any other `HTTP/d.d` -> 505; malformed -> 400
pub fn parse_request_line(line: &str) -> Result<RequestLine, StatusCode> {
    if line.trim().is_empty() {
        return Err(StatusCode::BadRequest);
    }

    let mut tokens = line.split_whitespace();

    let method = match tokens.next().ok_or(StatusCode::BadRequest)? {
        "GET" => Method::Get,
        "POST" => Method::Post,
        "HEAD" => Method::Head,
        "DELETE" | "PUT" | "LINK" | "UNLINK" => return Err(StatusCode::NotImplemented),
        _ => return Err(StatusCode::BadRequest),
    };

    let raw_target = tokens.next().ok_or(StatusCode::BadRequest)?;
    let target = resolve_target(raw_target)?;

    let version = tokens.next().ok_or(StatusCode::BadRequest)?;
    check_version(version)?;

    Ok(RequestLine {
        method,
        raw_target: raw_target.to_string(),
        target,
        version: version.to_string(),
    })
}

/// Rewrites the request target relative to the document root and
/// resolves it lexically.
///
/// A leading `/` gets a `.` prefix, making the path relative to the
/// working directory. Resolution folds `.` and `..` components without
/// consulting the filesystem, so a missing file still reaches the
/// existence check downstream. A target that cannot form a valid path
/// is rejected with 400.
fn resolve_target(raw: &str) -> Result<PathBuf, StatusCode> {
    if raw.is_empty() || raw.contains('\0') {
        return Err(StatusCode::BadRequest);
    }

    let rewritten = if let Some(rest) = raw.strip_prefix('/') {
        format!("./{rest}")
    } else {
        raw.to_string()
    };

    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in Path::new(&rewritten).components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::ParentDir => {
                parts.pop();
            }
            // the rewrite above already made the path relative
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    let mut resolved = PathBuf::from(".");
    for part in parts {
        resolved.push(part);
    }
    Ok(resolved)
}

/// `HTTP/0.<digit>` and `HTTP/1.0` are accepted; every other
/// `HTTP/<digit>.<digit>` is 505; anything else is malformed.
fn check_version(version: &str) -> Result<(), StatusCode> {
    let digits = version
        .strip_prefix("HTTP/")
        .ok_or(StatusCode::BadRequest)?
        .as_bytes();

    match digits {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => {
            if *major == b'0' || (*major == b'1' && *minor == b'0') {
                Ok(())
            } else {
                Err(StatusCode::HttpVersionNotSupported)
            }
        }
        _ => Err(StatusCode::BadRequest),
    }
}
