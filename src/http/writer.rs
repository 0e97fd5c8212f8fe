use bytes::{Buf, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

/// Every status line is written with this version, whatever version
/// the request carried.
pub const HTTP_VERSION: &str = "HTTP/1.0";

/// Serializes a response into wire bytes: status line, headers, blank
/// line, body.
pub fn serialize_response(resp: &Response) -> BytesMut {
    let mut buf = BytesMut::new();

    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    for (k, v) in &resp.headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    buf.extend_from_slice(b"\r\n");
    buf.extend_from_slice(&resp.body);

    buf
}

/// Writes one serialized response to a socket.
pub struct ResponseWriter {
    buffer: BytesMut,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
        }
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.buffer.has_remaining() {
            let n = stream.write_buf(&mut self.buffer).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }
        }

        stream.flush().await?;
        Ok(())
    }
}
