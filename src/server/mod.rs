//! Connection admission
//!
//! Accept loop plus the bounded worker pool. Overload is converted into
//! an explicit 503 rejection at this layer, never into queuing.

pub mod listener;
pub mod pool;

pub use listener::Listener;
pub use pool::WorkerPool;
