//! Tinyhttpd - minimal HTTP/1.0 request server
//!
//! Core library: connection admission, protocol handling and request
//! dispatch. One request per connection, no keep-alive.

pub mod config;
pub mod handler;
pub mod http;
pub mod server;
