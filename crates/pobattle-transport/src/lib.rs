//! Transport layer for the battle protocol client.
//!
//! Provides the [`Connection`] trait the client talks to, and
//! [`TcpConnection`], which carries length-prefixed frames over a plain
//! TCP stream. The frame length width comes from the
//! [`Profile`](pobattle_protocol::Profile) the connection was opened with.
//!
//! A connection moves frame *bodies*: callers hand over `event id + args`
//! and get the same back. Adding and stripping the length prefix is the
//! transport's job.

#![allow(async_fn_in_trait)]

mod error;
mod tcp;

pub use error::TransportError;
pub use tcp::TcpConnection;

use std::fmt;

/// Opaque identifier for a connection, used in log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A single connection that exchanges frame bodies with the server.
///
/// `send` and `recv` take `&self` so one task can wait for the next frame
/// while another sends.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Frames `body` and sends it to the peer.
    async fn send(&self, body: &[u8]) -> Result<(), Self::Error>;

    /// Receives the next frame body.
    ///
    /// Returns `Ok(None)` when the peer closes the stream between frames.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Shuts down the write side of the connection.
    async fn close(&self) -> Result<(), Self::Error>;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_new_and_into_inner() {
        let id = ConnectionId::new(42);
        assert_eq!(id.into_inner(), 42);
    }

    #[test]
    fn test_connection_id_display() {
        assert_eq!(ConnectionId::new(7).to_string(), "conn-7");
    }
}
