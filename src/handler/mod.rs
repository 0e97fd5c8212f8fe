//! Request dispatch
//!
//! Method-specific behavior for GET, HEAD and POST, built on the
//! response types in [`crate::http`].

pub mod cgi;
pub mod dispatch;
pub mod welcome;

pub use dispatch::dispatch;
