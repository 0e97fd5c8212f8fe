//! End-to-end tests over real sockets on ephemeral ports.

use std::net::SocketAddr;
use std::time::{Duration, SystemTime};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use tinyhttpd::config::Config;
use tinyhttpd::http::date::format_http_date;
use tinyhttpd::server::Listener;

fn test_config() -> Config {
    let mut cfg = Config::with_port(0);
    cfg.host = "127.0.0.1".to_string();
    cfg.io_timeout = Duration::from_millis(500);
    cfg.write_grace = Duration::from_millis(10);
    cfg
}

async fn spawn_server(cfg: Config) -> SocketAddr {
    let listener = Listener::bind(cfg).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(listener.run());
    addr
}

async fn roundtrip(addr: SocketAddr, request: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    String::from_utf8_lossy(&buf).into_owned()
}

/// Removes a scratch CGI script when the test is done.
struct ScriptGuard(String);

impl Drop for ScriptGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

fn write_cgi_script(name: &str, contents: &str) -> ScriptGuard {
    use std::os::unix::fs::PermissionsExt;

    std::fs::write(name, contents).unwrap();
    let mut perms = std::fs::metadata(name).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(name, perms).unwrap();
    ScriptGuard(name.to_string())
}

#[tokio::test]
async fn test_get_first_visit_sets_cookie() {
    let addr = spawn_server(test_config()).await;

    let response = roundtrip(addr, b"GET /Cargo.toml HTTP/1.0\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.0 200 OK\r\n"));
    assert!(response.contains("Set-Cookie: lasttime="));
    assert!(response.contains("Content-Type: text/html"));
    assert!(response.contains("We have not seen you before"));
}

#[tokio::test]
async fn test_get_returning_visitor() {
    let addr = spawn_server(test_config()).await;

    let response = roundtrip(
        addr,
        b"GET /Cargo.toml HTTP/1.0\r\nCookie: lasttime=2020-01-01+00%3A00%3A00\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.0 200 OK\r\n"));
    assert!(response.contains("Welcome back! Your last visit was at: 2020-01-01 00:00:00"));
    assert!(response.contains("Set-Cookie: lasttime="));
}

#[tokio::test]
async fn test_get_future_cookie_is_first_visit() {
    let addr = spawn_server(test_config()).await;

    let response = roundtrip(
        addr,
        b"GET /Cargo.toml HTTP/1.0\r\nCookie: lasttime=9999-01-01+00%3A00%3A00\r\n\r\n",
    )
    .await;

    assert!(response.contains("We have not seen you before"));
    assert!(!response.contains("Welcome back"));
}

#[tokio::test]
async fn test_get_missing_resource_is_404() {
    let addr = spawn_server(test_config()).await;

    let response = roundtrip(addr, b"GET /definitely-not-here.html HTTP/1.0\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.0 404 Not Found\r\n"));
    assert!(response.ends_with("\r\n\r\n"), "404 must carry no body");
}

#[tokio::test]
async fn test_conditional_get_not_modified() {
    let addr = spawn_server(test_config()).await;

    // a date far in the future: the file cannot be newer than it
    let since = format_http_date(SystemTime::now() + Duration::from_secs(86_400));
    let request = format!("GET /Cargo.toml HTTP/1.0\r\nIf-Modified-Since: {since}\r\n\r\n");
    let response = roundtrip(addr, request.as_bytes()).await;

    assert!(response.starts_with("HTTP/1.0 304 Not Modified\r\n"));
    assert!(response.contains("Expires: "));
}

#[tokio::test]
async fn test_conditional_get_modified_since_past_date() {
    let addr = spawn_server(test_config()).await;

    let request = "GET /Cargo.toml HTTP/1.0\r\nIf-Modified-Since: Thu, 01 Jan 1970 00:00:00 GMT\r\n\r\n";
    let response = roundtrip(addr, request.as_bytes()).await;

    // modified since the epoch: the welcome page is served
    assert!(response.starts_with("HTTP/1.0 200 OK\r\n"));
}

#[tokio::test]
async fn test_head_returns_headers_without_body() {
    let addr = spawn_server(test_config()).await;

    let response = roundtrip(addr, b"HEAD /Cargo.toml HTTP/1.0\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.0 200 OK\r\n"));
    assert!(response.contains("Content-Length: "));
    assert!(response.contains("Content-Encoding: identity"));
    assert!(response.contains("Allow: GET, POST, HEAD"));
    assert!(response.contains("Last-Modified: "));
    assert!(response.ends_with("\r\n\r\n"), "HEAD must carry no body");
    assert!(!response.contains("[package]"));
}

#[tokio::test]
async fn test_unimplemented_method_is_501() {
    let addr = spawn_server(test_config()).await;

    let response = roundtrip(addr, b"DELETE /Cargo.toml HTTP/1.0\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.0 501 Not Implemented\r\n"));
}

#[tokio::test]
async fn test_unsupported_version_is_505() {
    let addr = spawn_server(test_config()).await;

    let response = roundtrip(addr, b"GET /Cargo.toml HTTP/2.0\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.0 505 HTTP Version Not Supported\r\n"));
}

#[tokio::test]
async fn test_malformed_request_is_400() {
    let addr = spawn_server(test_config()).await;

    let response = roundtrip(addr, b"FOO /Cargo.toml HTTP/1.0\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.0 400 Bad Request\r\n"));
}

#[tokio::test]
async fn test_silent_client_gets_408() {
    let addr = spawn_server(test_config()).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    // send nothing: the read deadline must expire
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    let response = String::from_utf8_lossy(&buf);

    assert!(response.starts_with("HTTP/1.0 408 Request Timeout\r\n"));
}

#[tokio::test]
async fn test_saturated_pool_rejects_with_503() {
    let mut cfg = test_config();
    cfg.pool_max = 1;
    cfg.io_timeout = Duration::from_secs(3);
    let addr = spawn_server(cfg).await;

    // occupy the only worker: connect and leave it waiting in its read
    let _busy = TcpStream::connect(addr).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let response = roundtrip(addr, b"GET /Cargo.toml HTTP/1.0\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.0 503 Service Unavailable\r\n"));
}

#[tokio::test]
async fn test_post_runs_cgi_and_returns_stdout() {
    let addr = spawn_server(test_config()).await;

    let name = format!("scratch_add_{}.cgi", std::process::id());
    let _guard = write_cgi_script(
        &name,
        "#!/bin/sh\necho \"arg: $1\"\necho \"script: $SCRIPT_NAME from: $HTTP_FROM\"\n",
    );

    let request = format!(
        "POST /{name} HTTP/1.0\r\n\
         From: tester@example.org\r\n\
         Content-Type: application/x-www-form-urlencoded\r\n\
         Content-Length: 7\r\n\
         \r\n\
         num!@x7\r\n"
    );
    let response = roundtrip(addr, request.as_bytes()).await;

    assert!(response.starts_with("HTTP/1.0 200 OK\r\n"));
    assert!(response.contains("arg: num@x7"));
    assert!(response.contains(&format!("script: /{name} from: tester@example.org")));
}

#[tokio::test]
async fn test_post_without_content_type_is_500() {
    let addr = spawn_server(test_config()).await;

    let response = roundtrip(
        addr,
        b"POST /Cargo.toml HTTP/1.0\r\nContent-Length: 0\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.0 500 Internal Service Error\r\n"));
}

#[tokio::test]
async fn test_post_without_content_length_is_411() {
    let addr = spawn_server(test_config()).await;

    let response = roundtrip(
        addr,
        b"POST /Cargo.toml HTTP/1.0\r\nContent-Type: text/plain\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.0 411 Length Required\r\n"));
}

#[tokio::test]
async fn test_post_non_cgi_target_is_405() {
    let addr = spawn_server(test_config()).await;

    let response = roundtrip(
        addr,
        b"POST /Cargo.toml HTTP/1.0\r\nContent-Type: text/plain\r\nContent-Length: 0\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.0 405 Method Not Allowed\r\n"));
}
