use std::fs::Metadata;
use std::time::SystemTime;
use tokio::fs;
use tracing::error;

use crate::config::Config;
use crate::handler::{cgi, welcome};
use crate::http::date;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};

/// Executes the method-specific behavior for a parsed request.
///
/// All three methods share the resource checks: a target that does not
/// exist is 404, one that exists but cannot be opened is 403.
pub async fn dispatch(request: &Request, cfg: &Config) -> Response {
    let meta = match fs::metadata(&request.target).await {
        Ok(meta) => meta,
        Err(_) => return Response::error(StatusCode::NotFound),
    };
    if fs::File::open(&request.target).await.is_err() {
        return Response::error(StatusCode::Forbidden);
    }

    match request.method {
        Method::Head => head(request, &meta).await,
        Method::Get => get(request, &meta),
        Method::Post => post(request, cfg).await,
    }
}

/// HEAD: the file's success headers with its real length, no body.
async fn head(request: &Request, meta: &Metadata) -> Response {
    let bytes = match fs::read(&request.target).await {
        Ok(bytes) => bytes,
        // resource was already validated readable, so this is on us
        Err(_) => return Response::error(StatusCode::InternalServiceError),
    };

    let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
    Response::file_headers(&request.target, modified, bytes.len())
}

/// GET: conditional GET first, then the cookie-based welcome page.
///
/// The candidate line is positional (the line right after the request
/// line); its date is everything after the first space. An unparseable
/// date disables the conditional check instead of failing the request.
fn get(request: &Request, meta: &Metadata) -> Response {
    if let Some(candidate) = request.if_modified_candidate() {
        let candidate = candidate.trim();
        if !candidate.is_empty() {
            let date_part = candidate
                .find(' ')
                .map(|i| &candidate[i + 1..])
                .unwrap_or(candidate);
            if let Some(since) = date::parse_http_date(date_part) {
                let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                if modified <= since {
                    return Response::error(StatusCode::NotModified);
                }
            }
        }
    }

    // GET answers with the generated welcome page, not the target
    // file's bytes; the target only gates the 404/403 checks.
    welcome::render(request)
}

/// POST: validates the CGI contract, runs the program, and returns its
/// standard output as the response body.
async fn post(request: &Request, cfg: &Config) -> Response {
    if request.header("Content-Type").is_none() {
        return Response::error(StatusCode::InternalServiceError);
    }
    let content_length = match request.header("Content-Length") {
        Some(value) => value.to_string(),
        None => return Response::error(StatusCode::LengthRequired),
    };
    if !request.raw_target.ends_with(".cgi") {
        return Response::error(StatusCode::MethodNotAllowed);
    }

    let argument = request.query_line().map(cgi::unescape_query);
    let invocation = cgi::CgiInvocation::new(request, cfg, argument, content_length);

    match invocation.run().await {
        Ok(stdout) => ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", "text/html")
            .body(stdout)
            .build(),
        Err(e) => {
            error!(script = %request.raw_target, error = %e, "CGI invocation failed");
            Response::error(StatusCode::InternalServiceError)
        }
    }
}
