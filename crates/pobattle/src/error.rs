//! Unified error types for the client crate.

use std::time::Duration;

use pobattle_protocol::{EventKind, ProtocolError};
use pobattle_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each wrapped variant generates a `From`
/// impl, so `?` converts transport and protocol errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A transport-level error (connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// An encode-time protocol error, returned to the caller that built
    /// the command.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// No frame arrived within the configured idle timeout.
    #[error("no frame received for {0:?}")]
    IdleTimeout(Duration),

    /// The configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Why a single inbound frame produced no event.
///
/// These never end the connection; the client loop reports them to the
/// observer and moves on to the next frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The frame was empty, so there was no event byte to read.
    #[error("empty frame")]
    EmptyFrame,

    /// The leading byte is outside the event table.
    #[error("unknown event id {id} ({} payload bytes)", .payload.len())]
    UnknownEvent { id: u8, payload: Vec<u8> },

    /// The event is in the table but this client has no decoder for it.
    #[error("event {event} not implemented ({} payload bytes)", .payload.len())]
    NotImplemented { event: EventKind, payload: Vec<u8> },

    /// The payload did not decode as the event's layout.
    #[error("malformed {event} frame: {source}")]
    Malformed {
        event: EventKind,
        #[source]
        source: ProtocolError,
    },
}
