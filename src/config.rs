use anyhow::Context;
use std::time::Duration;

/// Runtime configuration.
///
/// The CLI surface is a single positional argument, the listening TCP
/// port. Everything else is a tunable default; tests shrink the pool
/// and the deadlines through these fields.
#[derive(Clone, Debug)]
pub struct Config {
    /// Interface to bind on.
    pub host: String,
    /// Listening TCP port. Zero picks an ephemeral port.
    pub port: u16,
    /// Lower bound of the worker pool.
    pub pool_min: usize,
    /// Concurrency ceiling: connections beyond this are rejected with 503.
    pub pool_max: usize,
    /// Read/write deadline applied to every connection.
    pub io_timeout: Duration,
    /// Pause after the last write so the response can flush before close.
    pub write_grace: Duration,
    /// Value exported to CGI programs as SERVER_NAME.
    pub server_name: String,
}

impl Config {
    /// Configuration with the documented defaults and the given port.
    pub fn with_port(port: u16) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port,
            pool_min: 5,
            pool_max: 50,
            io_timeout: Duration::from_secs(5),
            write_grace: Duration::from_millis(250),
            server_name: "localhost".to_string(),
        }
    }

    /// Builds the configuration from the process arguments.
    ///
    /// Exactly one positional argument is accepted: the port number.
    pub fn from_args() -> anyhow::Result<Self> {
        let mut args = std::env::args().skip(1);
        let port = args.next().context("usage: tinyhttpd <port>")?;
        if args.next().is_some() {
            anyhow::bail!("usage: tinyhttpd <port>");
        }
        let port = port
            .parse::<u16>()
            .with_context(|| format!("invalid port: {port}"))?;
        Ok(Self::with_port(port))
    }
}
