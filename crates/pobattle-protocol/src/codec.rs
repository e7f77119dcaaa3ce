//! The [`WireCodec`] trait shared by every protocol structure.
//!
//! A codec pairs a strict decoder with a canonical encoder. Decoding
//! accepts whatever optional fields the peer chose to send; encoding
//! always emits the full field set, so `decode(encode(x))` gives back `x`
//! but `encode(decode(bytes))` need not reproduce `bytes`.

use crate::{Cursor, Profile, ProtocolResult, Writer};

/// A structure with a fixed binary layout.
///
/// Implementations read and write in place; the cursor or writer carries
/// the [`Profile`] that decides text encoding and flag rules.
pub trait WireCodec: Sized {
    /// Reads one value, advancing the cursor past it.
    ///
    /// # Errors
    /// Fails with [`ProtocolError::BufferUnderrun`](crate::ProtocolError::BufferUnderrun)
    /// if the buffer ends early, or with a more specific error when a
    /// field holds a value the layout doesn't allow.
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self>;

    /// Appends the canonical encoding of `self`.
    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()>;

    /// Decodes one value from the start of `bytes`. Trailing bytes are
    /// ignored.
    fn from_bytes(bytes: &[u8], profile: Profile) -> ProtocolResult<Self> {
        Self::decode(&mut Cursor::new(bytes, profile))
    }

    /// Encodes `self` into a fresh buffer.
    fn to_bytes(&self, profile: Profile) -> ProtocolResult<Vec<u8>> {
        let mut writer = Writer::new(profile);
        self.encode(&mut writer)?;
        Ok(writer.into_bytes())
    }
}

impl WireCodec for String {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        cursor.read_string()
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        writer.write_string(self)
    }
}

impl<T: WireCodec> WireCodec for Vec<T> {
    /// A `u32` count followed by that many items.
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        cursor.read_list(T::decode)
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        writer.write_list(self, |w, item| item.encode(w))
    }
}
