//! TCP transport: one length-prefixed frame after another.

use std::io::ErrorKind;
use std::sync::atomic::{AtomicU64, Ordering};

use pobattle_protocol::{decode_frame_len, encode_frame, Profile};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::{Connection, ConnectionId, TransportError};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Widest frame length prefix any profile uses.
const MAX_PREFIX_WIDTH: usize = 4;

/// A framed TCP connection.
///
/// The read and write halves sit behind separate locks, so a pending
/// `recv` never blocks a `send`.
pub struct TcpConnection {
    id: ConnectionId,
    profile: Profile,
    reader: Mutex<OwnedReadHalf>,
    writer: Mutex<OwnedWriteHalf>,
}

impl TcpConnection {
    /// Connects to `addr` and frames traffic according to `profile`.
    pub async fn connect(addr: &str, profile: Profile) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| TransportError::ConnectFailed {
                addr: addr.to_string(),
                source,
            })?;
        let conn = Self::from_stream(stream, profile);
        tracing::info!(id = %conn.id, addr, "connected");
        Ok(conn)
    }

    /// Wraps an already connected stream.
    pub fn from_stream(stream: TcpStream, profile: Profile) -> Self {
        // Frames are small and latency matters more than packet count.
        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(error = %e, "could not disable Nagle");
        }
        let (reader, writer) = stream.into_split();
        Self {
            id: ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed)),
            profile,
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
        }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }
}

impl Connection for TcpConnection {
    type Error = TransportError;

    async fn send(&self, body: &[u8]) -> Result<(), Self::Error> {
        let frame = encode_frame(self.profile, body)?;
        let mut writer = self.writer.lock().await;
        writer
            .write_all(&frame)
            .await
            .map_err(TransportError::SendFailed)?;
        writer.flush().await.map_err(TransportError::SendFailed)
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        let width = self.profile.frame_length.width();
        let mut header = [0u8; MAX_PREFIX_WIDTH];
        let mut reader = self.reader.lock().await;

        let mut filled = 0;
        while filled < width {
            let n = reader
                .read(&mut header[filled..width])
                .await
                .map_err(TransportError::ReceiveFailed)?;
            if n == 0 {
                if filled == 0 {
                    return Ok(None);
                }
                return Err(TransportError::ConnectionClosed(format!(
                    "stream ended after {filled} of {width} length bytes"
                )));
            }
            filled += n;
        }

        let len = decode_frame_len(self.profile, &header[..width])?;
        let mut body = vec![0u8; len];
        reader.read_exact(&mut body).await.map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                TransportError::ConnectionClosed(format!("stream ended inside a {len} byte frame"))
            } else {
                TransportError::ReceiveFailed(e)
            }
        })?;
        tracing::trace!(id = %self.id, len, "frame received");
        Ok(Some(body))
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.writer
            .lock()
            .await
            .shutdown()
            .await
            .map_err(TransportError::SendFailed)
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
