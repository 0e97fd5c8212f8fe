use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::config::Config;
use crate::handler;
use crate::http::parser::parse_request_line;
use crate::http::request::{RawRequest, Request};
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;

/// One socket's lifecycle, owned end-to-end by a single worker.
///
/// The stream is owned by this struct, so it is closed exactly once on
/// every exit path, including panics inside a state.
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    cfg: Config,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Parsing(RawRequest),
    Dispatching(Request),
    Writing(Response),
    /// Deadline elapsed while reading; answer 408 and close.
    TimedOut,
    /// Transport failure; the peer is assumed gone, close silently.
    Failed,
    Closed,
}

impl Connection {
    pub fn new(stream: TcpStream, peer: SocketAddr, cfg: Config) -> Self {
        Self {
            stream,
            peer,
            cfg,
            state: ConnectionState::Reading,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state =
                        match timeout(self.cfg.io_timeout, read_request(&mut self.stream)).await {
                            Ok(Ok(raw)) => ConnectionState::Parsing(raw),
                            Ok(Err(e)) => {
                                debug!(peer = %self.peer, error = %e, "Read failed");
                                ConnectionState::Failed
                            }
                            Err(_) => ConnectionState::TimedOut,
                        };
                }

                ConnectionState::Parsing(raw) => {
                    self.state = match parse_request_line(raw.request_line()) {
                        Ok(line) => ConnectionState::Dispatching(Request::new(line, raw)),
                        Err(status) => {
                            debug!(peer = %self.peer, status = status.as_u16(), "Request rejected");
                            ConnectionState::Writing(Response::error(status))
                        }
                    };
                }

                ConnectionState::Dispatching(request) => {
                    let response = handler::dispatch(&request, &self.cfg).await;
                    info!(
                        peer = %self.peer,
                        method = request.method.as_str(),
                        target = %request.raw_target,
                        status = response.status.as_u16(),
                        "Request handled"
                    );
                    self.state = ConnectionState::Writing(response);
                }

                ConnectionState::Writing(response) => {
                    self.state = match self.write_response(&response).await {
                        Ok(()) => ConnectionState::Closed,
                        Err(e) => {
                            debug!(peer = %self.peer, error = %e, "Write failed");
                            ConnectionState::Failed
                        }
                    };
                }

                ConnectionState::TimedOut => {
                    // best effort; the peer may already be gone
                    let _ = self
                        .write_response(&Response::error(StatusCode::RequestTimeout))
                        .await;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Failed => {
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    let _ = self.stream.shutdown().await;
                    return Ok(());
                }
            }
        }
    }

    /// Writes a full response under the I/O deadline, then pauses so
    /// the bytes can flush before the unconditional close.
    async fn write_response(&mut self, response: &Response) -> anyhow::Result<()> {
        let mut writer = ResponseWriter::new(response);
        timeout(self.cfg.io_timeout, writer.write_to_stream(&mut self.stream))
            .await
            .map_err(|_| anyhow::anyhow!("write deadline elapsed"))??;
        tokio::time::sleep(self.cfg.write_grace).await;
        Ok(())
    }
}

/// How long to wait for further lines the client may have already
/// sent. Stands in for "drain what is buffered" so a request body
/// below the headers is captured without waiting out the connection
/// deadline on clients that keep the socket open.
const READY_POLL: Duration = Duration::from_millis(50);

/// Reads one request: the request line, the line after it (captured as
/// the If-Modified-Since candidate), then every remaining available
/// line, blanks included, in order.
///
/// An immediate EOF yields an empty request line, which the parser
/// rejects with 400 like any other blank request.
async fn read_request(stream: &mut TcpStream) -> std::io::Result<RawRequest> {
    let mut reader = BufReader::new(stream);
    let mut lines = Vec::new();

    let mut line = String::new();
    reader.read_line(&mut line).await?;
    lines.push(trim_line(&line));

    line.clear();
    if reader.read_line(&mut line).await? > 0 {
        lines.push(trim_line(&line));

        loop {
            line.clear();
            match timeout(READY_POLL, reader.read_line(&mut line)).await {
                Ok(Ok(0)) => break,
                Ok(Ok(_)) => lines.push(trim_line(&line)),
                Ok(Err(e)) => return Err(e),
                // nothing more in flight
                Err(_) => break,
            }
        }
    }

    Ok(RawRequest::new(lines))
}

fn trim_line(line: &str) -> String {
    line.trim_end_matches(['\r', '\n']).to_string()
}
