use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::http::connection::Connection;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::server::pool::WorkerPool;

/// Listening socket plus the worker pool that owns admitted connections.
pub struct Listener {
    inner: TcpListener,
    pool: WorkerPool,
    cfg: Config,
}

impl Listener {
    pub async fn bind(cfg: Config) -> anyhow::Result<Self> {
        let inner = TcpListener::bind((cfg.host.as_str(), cfg.port)).await?;
        info!(addr = %inner.local_addr()?, "Listening");
        let pool = WorkerPool::new(cfg.pool_max);
        Ok(Self { inner, pool, cfg })
    }

    /// Address the socket actually bound to (relevant for port 0).
    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.inner.local_addr()?)
    }

    /// Accept loop. Runs until the task is dropped; a single accept
    /// failure is logged and the loop continues.
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            let (socket, peer) = match self.inner.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(error = %e, "Accept failed");
                    continue;
                }
            };
            debug!(peer = %peer, "Accepted connection");

            match self.pool.try_admit() {
                Ok(permit) => {
                    let cfg = self.cfg.clone();
                    tokio::spawn(async move {
                        let _permit = permit;
                        if let Err(e) = Connection::new(socket, peer, cfg).run().await {
                            debug!(peer = %peer, error = %e, "Connection error");
                        }
                    });
                }
                Err(_) => {
                    warn!(peer = %peer, "Worker pool saturated, rejecting with 503");
                    tokio::spawn(reject_overload(socket, self.cfg.write_grace));
                }
            }
        }
    }
}

pub async fn run(cfg: Config) -> anyhow::Result<()> {
    Listener::bind(cfg).await?.run().await
}

/// Overload answer written by the admission layer itself: a bare 503
/// status line, a short pause so the write can flush, then close.
async fn reject_overload(mut socket: TcpStream, grace: Duration) {
    let mut writer = ResponseWriter::new(&Response::error(StatusCode::ServiceUnavailable));
    if writer.write_to_stream(&mut socket).await.is_ok() {
        tokio::time::sleep(grace).await;
    }
    let _ = socket.shutdown().await;
}
