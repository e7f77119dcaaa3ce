//! Sequential big-endian reader over a received frame.

use crate::flags::Flags;
use crate::{Profile, ProtocolError, ProtocolResult};

/// Length value reserved to mean "absent" for strings and byte blobs.
pub const ABSENT_LENGTH: u32 = 0xFFFF_FFFF;

/// A versioned block whose version byte differs from the layout this
/// client was built against. Decoding continues with the known layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionMismatch {
    /// Byte offset of the block's version tag.
    pub offset: usize,
    pub expected: u8,
    pub found: u8,
}

/// A bounds-checked, big-endian reader.
///
/// The position only moves forward. Every read checks the remaining length
/// first and fails with [`ProtocolError::BufferUnderrun`] instead of
/// inventing zeros.
#[derive(Debug)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    profile: Profile,
    diagnostics: Vec<VersionMismatch>,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of `data`.
    pub fn new(data: &'a [u8], profile: Profile) -> Self {
        Self {
            data,
            pos: 0,
            profile,
            diagnostics: Vec::new(),
        }
    }

    /// The profile this cursor decodes under.
    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Current byte offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns `true` if every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The unread tail of the buffer, without consuming it.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Version mismatches seen by versioned blocks so far.
    pub fn diagnostics(&self) -> &[VersionMismatch] {
        &self.diagnostics
    }

    pub(crate) fn record_mismatch(&mut self, mismatch: VersionMismatch) {
        self.diagnostics.push(mismatch);
    }

    /// Moves forward to `target`. Used to skip trailing fields a newer
    /// peer appended to a versioned block.
    pub fn advance_to(&mut self, target: usize) -> ProtocolResult<()> {
        if target < self.pos {
            return Err(ProtocolError::BlockOverrun {
                declared: target,
                consumed: self.pos,
            });
        }
        if target > self.data.len() {
            return Err(ProtocolError::BufferUnderrun {
                needed: target - self.pos,
                available: self.remaining(),
            });
        }
        self.pos = target;
        Ok(())
    }

    /// Consumes and returns the next `len` bytes.
    pub fn take(&mut self, len: usize) -> ProtocolResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(ProtocolError::BufferUnderrun {
                needed: len,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> ProtocolResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> ProtocolResult<u8> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> ProtocolResult<i8> {
        Ok(i8::from_be_bytes(self.take_array()?))
    }

    pub fn read_u16(&mut self) -> ProtocolResult<u16> {
        Ok(u16::from_be_bytes(self.take_array()?))
    }

    pub fn read_i16(&mut self) -> ProtocolResult<i16> {
        Ok(i16::from_be_bytes(self.take_array()?))
    }

    pub fn read_u32(&mut self) -> ProtocolResult<u32> {
        Ok(u32::from_be_bytes(self.take_array()?))
    }

    pub fn read_i32(&mut self) -> ProtocolResult<i32> {
        Ok(i32::from_be_bytes(self.take_array()?))
    }

    /// Reads one byte; any nonzero value is `true`.
    pub fn read_bool(&mut self) -> ProtocolResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Reads a `u32`-length-prefixed byte blob. The absent sentinel
    /// decodes as an empty blob.
    pub fn read_bytes(&mut self) -> ProtocolResult<Vec<u8>> {
        let len = self.read_u32()?;
        if len == ABSENT_LENGTH {
            return Ok(Vec::new());
        }
        Ok(self.take(len as usize)?.to_vec())
    }

    /// Reads a `u32`-length-prefixed string in the profile's text encoding.
    /// The absent sentinel decodes as an empty string.
    pub fn read_string(&mut self) -> ProtocolResult<String> {
        let len = self.read_u32()?;
        if len == ABSENT_LENGTH {
            return Ok(String::new());
        }
        let raw = self.take(len as usize)?;
        self.profile.text_encoding.decode(raw)
    }

    /// Reads a continuation-bit flag sequence.
    pub fn read_flags(&mut self) -> ProtocolResult<Flags> {
        Flags::decode(self)
    }

    /// Reads exactly `N` items with `read`, positionally.
    pub fn read_array<T, const N: usize>(
        &mut self,
        mut read: impl FnMut(&mut Self) -> ProtocolResult<T>,
    ) -> ProtocolResult<[T; N]> {
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(read(self)?);
        }
        // The vector holds exactly N items here.
        items.try_into().map_err(|_| ProtocolError::TooManyEntries {
            what: "array items",
            count: N,
            max: N,
        })
    }

    /// Reads a `u32` count followed by that many items.
    pub fn read_list<T>(
        &mut self,
        mut read: impl FnMut(&mut Self) -> ProtocolResult<T>,
    ) -> ProtocolResult<Vec<T>> {
        let count = self.read_u32()? as usize;
        // Every item takes at least one byte; don't pre-allocate beyond that.
        let mut items = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            items.push(read(self)?);
        }
        Ok(items)
    }
}
