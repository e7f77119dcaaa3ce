//! Error types for the protocol layer.
//!
//! Every codec in this crate returns [`ProtocolError`]. Decoding is strict:
//! a read past the end of a buffer is an error, never a fabricated zero.

/// Errors that can occur while encoding or decoding protocol structures.
///
/// `#[derive(thiserror::Error)]` generates the `std::error::Error` impl;
/// each `#[error("...")]` is the message that ends up in logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// A read needed more bytes than the buffer had left.
    #[error("buffer underrun: needed {needed} bytes, {available} available")]
    BufferUnderrun { needed: usize, available: usize },

    /// The leading event byte is not in the network event table.
    #[error("unknown event id {0}")]
    UnknownEventId(u8),

    /// The battle sub-protocol command byte is not in the command table.
    #[error("unknown battle command id {0}")]
    UnknownBattleCommandId(u8),

    /// A `TempPokeChange` sub-type with no known payload layout.
    #[error("unknown temporary pokemon change kind {0}")]
    UnknownTempPokeChange(u8),

    /// A battle choice type other than cancel, attack, switch or rearrange.
    #[error("unknown battle choice type {0}")]
    UnknownChoiceType(u8),

    /// A battle outcome code outside Forfeit/Win/Tie/Close.
    #[error("unknown battle result {0}")]
    UnknownBattleResult(i8),

    /// Text bytes are not valid under the profile's text encoding.
    #[error("malformed text: {0}")]
    MalformedText(String),

    /// A versioned block's inner decoder read past the declared length.
    #[error("versioned block overrun: declared {declared} bytes, consumed {consumed}")]
    BlockOverrun { declared: usize, consumed: usize },

    /// A count field exceeds the fixed number of slots for that array.
    #[error("too many {what}: {count} (max {max})")]
    TooManyEntries {
        what: &'static str,
        count: usize,
        max: usize,
    },

    /// A flag value cannot be written so that it decodes back unchanged
    /// under the profile's continuation rule.
    #[error("flag value {0:#x} has no valid continuation encoding")]
    UnencodableFlags(u64),

    /// A string, byte blob or block is too long for its length prefix.
    #[error("{what} too long for its length prefix: {len} bytes")]
    FieldTooLong { what: &'static str, len: usize },

    /// A frame declares a length above the profile's limit.
    #[error("frame of {len} bytes exceeds the {max} byte limit")]
    FrameTooLarge { len: usize, max: usize },
}

/// Result alias used throughout the protocol crate.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
