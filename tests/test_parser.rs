use std::path::PathBuf;
use tinyhttpd::http::parser::parse_request_line;
use tinyhttpd::http::request::Method;
use tinyhttpd::http::response::StatusCode;

#[test]
fn test_parse_simple_get() {
    let line = parse_request_line("GET /index.html HTTP/1.0").unwrap();

    assert_eq!(line.method, Method::Get);
    assert_eq!(line.raw_target, "/index.html");
    assert_eq!(line.target, PathBuf::from("./index.html"));
    assert_eq!(line.version, "HTTP/1.0");
}

#[test]
fn test_parse_post_and_head() {
    assert_eq!(
        parse_request_line("POST /cgi/add.cgi HTTP/1.0").unwrap().method,
        Method::Post
    );
    assert_eq!(
        parse_request_line("HEAD /a.txt HTTP/1.0").unwrap().method,
        Method::Head
    );
}

#[test]
fn test_empty_line_is_bad_request() {
    assert_eq!(parse_request_line("").unwrap_err(), StatusCode::BadRequest);
    assert_eq!(parse_request_line("   ").unwrap_err(), StatusCode::BadRequest);
}

#[test]
fn test_recognized_but_unimplemented_methods() {
    for method in ["DELETE", "PUT", "LINK", "UNLINK"] {
        let line = format!("{method} /x HTTP/1.0");
        assert_eq!(
            parse_request_line(&line).unwrap_err(),
            StatusCode::NotImplemented,
            "{method} should be 501"
        );
    }
}

#[test]
fn test_unknown_method_is_bad_request() {
    assert_eq!(
        parse_request_line("FOO / HTTP/1.0").unwrap_err(),
        StatusCode::BadRequest
    );
    // method matching is case-sensitive
    assert_eq!(
        parse_request_line("get / HTTP/1.0").unwrap_err(),
        StatusCode::BadRequest
    );
}

#[test]
fn test_missing_target_is_bad_request() {
    assert_eq!(parse_request_line("GET").unwrap_err(), StatusCode::BadRequest);
}

#[test]
fn test_missing_version_is_bad_request() {
    assert_eq!(
        parse_request_line("GET /index.html").unwrap_err(),
        StatusCode::BadRequest
    );
}

#[test]
fn test_accepted_versions() {
    assert!(parse_request_line("GET / HTTP/1.0").is_ok());
    for minor in 0..=9 {
        let line = format!("GET / HTTP/0.{minor}");
        assert!(parse_request_line(&line).is_ok(), "{line} should be accepted");
    }
}

#[test]
fn test_unsupported_versions() {
    for version in ["HTTP/1.1", "HTTP/2.0", "HTTP/9.9"] {
        let line = format!("GET / {version}");
        assert_eq!(
            parse_request_line(&line).unwrap_err(),
            StatusCode::HttpVersionNotSupported,
            "{version} should be 505"
        );
    }
}

#[test]
fn test_malformed_versions() {
    for version in ["FTP/1.0", "HTTP/10.0", "HTTP/1", "http/1.0", "HTTP/1.x"] {
        let line = format!("GET / {version}");
        assert_eq!(
            parse_request_line(&line).unwrap_err(),
            StatusCode::BadRequest,
            "{version} should be 400"
        );
    }
}

#[test]
fn test_target_rewritten_relative_to_document_root() {
    assert_eq!(
        parse_request_line("GET / HTTP/1.0").unwrap().target,
        PathBuf::from(".")
    );
    assert_eq!(
        parse_request_line("GET /dir/file.txt HTTP/1.0").unwrap().target,
        PathBuf::from("./dir/file.txt")
    );
}

#[test]
fn test_target_resolved_lexically() {
    assert_eq!(
        parse_request_line("GET /a/../b.txt HTTP/1.0").unwrap().target,
        PathBuf::from("./b.txt")
    );
    assert_eq!(
        parse_request_line("GET /./x.html HTTP/1.0").unwrap().target,
        PathBuf::from("./x.html")
    );
}
