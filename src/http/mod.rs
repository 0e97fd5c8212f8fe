//! HTTP/1.0 protocol implementation.
//!
//! One request per connection; the server closes the connection after
//! writing the response. Persistent connections, chunked transfer and
//! HTTP/1.1 semantics are out of scope.
//!
//! # Architecture
//!
//! - **`connection`**: per-connection state machine (read, parse, dispatch, write)
//! - **`parser`**: request-line validation and target resolution
//! - **`request`**: captured request lines and the structured header view
//! - **`response`**: status codes and response construction
//! - **`writer`**: response serialization and socket writes
//! - **`mime`**: file extension to MIME type table
//! - **`date`**: HTTP date formatting and parsing, fixed to GMT
//!
//! # Connection State Machine
//!
//! ```text
//!   Reading ──→ Parsing ──→ Dispatching ──→ Writing ──→ Closed
//!      │
//!      ├─ deadline elapsed ──→ TimedOut  (408 written, then Closed)
//!      └─ transport error  ──→ Failed    (closed silently)
//! ```

pub mod connection;
pub mod date;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
