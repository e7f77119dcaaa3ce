//! Versioned blocks.
//!
//! Structures that may grow between server releases are wrapped as
//! `u16 length | u8 version | body`. The length counts every byte after
//! the length field itself, version byte included. A reader built for an
//! older layout decodes what it knows and then skips to the block end, so
//! fields appended by a newer server are ignored rather than misread as
//! the start of the next structure.

use crate::cursor::VersionMismatch;
use crate::{Cursor, ProtocolError, ProtocolResult, Writer};

/// Layout version this client understands for every versioned structure.
pub const CURRENT_BLOCK_VERSION: u8 = 0;

/// Decodes a versioned block with `inner`, then moves the cursor to the
/// declared end of the block.
///
/// A version tag other than `expected` is recorded on the cursor (see
/// [`Cursor::diagnostics`]) and decoding proceeds with the known layout.
/// If `inner` reads past the declared end the block fails with
/// [`ProtocolError::BlockOverrun`].
pub fn decode_versioned<T>(
    cursor: &mut Cursor<'_>,
    expected: u8,
    inner: impl FnOnce(&mut Cursor<'_>) -> ProtocolResult<T>,
) -> ProtocolResult<T> {
    let length = usize::from(cursor.read_u16()?);
    let start = cursor.position();
    let version = cursor.read_u8()?;
    if version != expected {
        tracing::warn!(
            offset = start,
            expected,
            found = version,
            "versioned block has unexpected version, decoding known layout"
        );
        cursor.record_mismatch(VersionMismatch {
            offset: start,
            expected,
            found: version,
        });
    }

    let value = inner(cursor)?;

    let consumed = cursor.position() - start;
    if consumed > length {
        return Err(ProtocolError::BlockOverrun {
            declared: length,
            consumed,
        });
    }
    cursor.advance_to(start + length)?;
    Ok(value)
}

/// Writes `version` and the output of `inner` as a versioned block,
/// back-filling the `u16` length once the body size is known.
pub fn encode_versioned(
    writer: &mut Writer,
    version: u8,
    inner: impl FnOnce(&mut Writer) -> ProtocolResult<()>,
) -> ProtocolResult<()> {
    let length_at = writer.len();
    writer.write_u16(0);
    writer.write_u8(version);
    inner(writer)?;

    let body = writer.len() - length_at - 2;
    let length = u16::try_from(body).map_err(|_| ProtocolError::FieldTooLong {
        what: "versioned block",
        len: body,
    })?;
    writer.patch_u16(length_at, length);
    Ok(())
}
