//! Big-endian writer, the mirror of [`Cursor`](crate::Cursor).

use crate::cursor::ABSENT_LENGTH;
use crate::flags::Flags;
use crate::{Profile, ProtocolError, ProtocolResult};

/// Accumulates an outgoing payload.
///
/// Fixed-width writes can't fail because the buffer grows. Length-prefixed
/// writes return an error when the value doesn't fit its prefix.
#[derive(Debug, Clone)]
pub struct Writer {
    buf: Vec<u8>,
    profile: Profile,
}

impl Writer {
    pub fn new(profile: Profile) -> Self {
        Self {
            buf: Vec::new(),
            profile,
        }
    }

    pub fn with_capacity(profile: Profile, capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            profile,
        }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i16(&mut self, value: i16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    /// Appends bytes with no length prefix.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a `u32` length followed by the bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> ProtocolResult<()> {
        let len = u32::try_from(bytes.len())
            .ok()
            .filter(|&len| len != ABSENT_LENGTH)
            .ok_or(ProtocolError::FieldTooLong {
                what: "byte blob",
                len: bytes.len(),
            })?;
        self.write_u32(len);
        self.write_raw(bytes);
        Ok(())
    }

    /// Writes a string in the profile's text encoding with a `u32` byte
    /// length prefix.
    pub fn write_string(&mut self, text: &str) -> ProtocolResult<()> {
        let encoded = self.profile.text_encoding.encode(text);
        self.write_bytes(&encoded).map_err(|_| ProtocolError::FieldTooLong {
            what: "string",
            len: encoded.len(),
        })
    }

    /// Writes a continuation-bit flag sequence.
    pub fn write_flags(&mut self, flags: Flags) -> ProtocolResult<()> {
        flags.encode(self)
    }

    /// Writes a `u32` count followed by each item.
    pub fn write_list<T>(
        &mut self,
        items: &[T],
        mut write: impl FnMut(&mut Self, &T) -> ProtocolResult<()>,
    ) -> ProtocolResult<()> {
        let count = u32::try_from(items.len()).map_err(|_| {
            ProtocolError::FieldTooLong {
                what: "list",
                len: items.len(),
            }
        })?;
        self.write_u32(count);
        for item in items {
            write(self, item)?;
        }
        Ok(())
    }

    /// Overwrites two bytes at `offset` with a big-endian `u16`.
    pub(crate) fn patch_u16(&mut self, offset: usize, value: u16) {
        self.buf[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
    }
}
