//! Continuation-bit flag sets.
//!
//! Most structures open with one or two flag values: *network flags* say
//! which optional fields are physically present, *data flags* carry
//! booleans about fields that are always there. Both use the same
//! encoding. Bytes are accumulated big-endian (`acc = acc << 8 | byte`)
//! until the profile's terminal byte is reached. The continuation marker
//! is part of the value, so bit 7 of a multi-byte set is never a real
//! flag.

use serde::{Deserialize, Serialize};

use crate::{Cursor, ProtocolError, ProtocolResult, Writer};

/// Longest flag sequence that still fits the accumulator.
const MAX_FLAG_BYTES: usize = 8;

/// A decoded flag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flags(pub u64);

impl Flags {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Builds a flag set with the given bit positions set.
    pub fn from_bits(bits: &[u32]) -> Self {
        Self(bits.iter().fold(0, |acc, bit| acc | (1 << bit)))
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    /// Returns `true` if bit `bit` is set.
    pub fn has(self, bit: u32) -> bool {
        self.0 & (1 << bit) != 0
    }

    /// Returns a copy with bit `bit` set to `on`.
    #[must_use]
    pub fn with(self, bit: u32, on: bool) -> Self {
        if on {
            Self(self.0 | (1 << bit))
        } else {
            Self(self.0 & !(1 << bit))
        }
    }

    /// Reads one flag sequence from the cursor.
    pub fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        let rule = cursor.profile().flag_termination;
        let mut acc: u64 = 0;
        for _ in 0..MAX_FLAG_BYTES {
            let byte = cursor.read_u8()?;
            acc = (acc << 8) | u64::from(byte);
            if rule.is_terminal(byte) {
                return Ok(Self(acc));
            }
        }
        Err(ProtocolError::TooManyEntries {
            what: "flag bytes",
            count: MAX_FLAG_BYTES + 1,
            max: MAX_FLAG_BYTES,
        })
    }

    /// Writes the flag set as the shortest byte sequence that decodes back
    /// to the same value under the writer's profile.
    ///
    /// Fails if no such sequence exists, e.g. a value whose lowest byte has
    /// the continuation marker set under `HighBitClear`.
    pub fn encode(self, writer: &mut Writer) -> ProtocolResult<()> {
        let rule = writer.profile().flag_termination;
        let bytes = self.0.to_be_bytes();
        let first = bytes
            .iter()
            .position(|&b| b != 0)
            .unwrap_or(bytes.len() - 1);
        let seq = &bytes[first..];

        let (last, body) = seq
            .split_last()
            .ok_or(ProtocolError::UnencodableFlags(self.0))?;
        if !rule.is_terminal(*last) || body.iter().any(|&b| rule.is_terminal(b)) {
            return Err(ProtocolError::UnencodableFlags(self.0));
        }
        writer.write_raw(seq);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FlagTermination, Profile};

    fn decode(data: &[u8]) -> ProtocolResult<Flags> {
        let mut c = Cursor::new(data, Profile::current());
        Flags::decode(&mut c)
    }

    #[test]
    fn test_two_byte_sequence_accumulates_big_endian() {
        assert_eq!(decode(&[0x82, 0x05]).unwrap(), Flags(33541));
    }

    #[test]
    fn test_single_byte_sequence() {
        assert_eq!(decode(&[0x05]).unwrap(), Flags(5));
    }

    #[test]
    fn test_decode_stops_at_terminal_byte() {
        let data = [0x0B, 0x10];
        let mut c = Cursor::new(&data, Profile::current());
        assert_eq!(c.read_flags().unwrap(), Flags(0x0B));
        assert_eq!(c.remaining(), 1);
    }

    #[test]
    fn test_unterminated_sequence_is_underrun() {
        assert!(matches!(
            decode(&[0x81, 0x82]),
            Err(ProtocolError::BufferUnderrun { .. })
        ));
    }

    #[test]
    fn test_overlong_sequence_is_rejected() {
        assert!(matches!(
            decode(&[0x81; 9]),
            Err(ProtocolError::TooManyEntries { .. })
        ));
    }

    #[test]
    fn test_low_bits_zero_rule() {
        let profile = Profile {
            flag_termination: FlagTermination::LowBitsZero,
            ..Profile::current()
        };
        let mut c = Cursor::new(&[0x05, 0x80], profile);
        assert_eq!(Flags::decode(&mut c).unwrap(), Flags(0x0580));
    }

    #[test]
    fn test_low_bits_zero_only_encodes_empty_low_bits() {
        let profile = Profile {
            flag_termination: FlagTermination::LowBitsZero,
            ..Profile::current()
        };
        let mut w = Writer::new(profile);
        assert_eq!(
            Flags::from_bits(&[0]).encode(&mut w),
            Err(ProtocolError::UnencodableFlags(1))
        );
        Flags::empty().encode(&mut w).unwrap();
        assert_eq!(w.into_bytes(), vec![0x00]);

        // The same byte still decodes as a sequence opener.
        let mut c = Cursor::new(&[0x01, 0x00], profile);
        assert_eq!(Flags::decode(&mut c).unwrap(), Flags(0x0100));
    }

    #[test]
    fn test_encode_single_byte() {
        let mut w = Writer::new(Profile::current());
        Flags::from_bits(&[0, 1, 3]).encode(&mut w).unwrap();
        assert_eq!(w.into_bytes(), vec![0x0B]);
    }

    #[test]
    fn test_encode_zero_is_one_byte() {
        let mut w = Writer::new(Profile::current());
        Flags::empty().encode(&mut w).unwrap();
        assert_eq!(w.into_bytes(), vec![0x00]);
    }

    #[test]
    fn test_encode_multi_byte_keeps_marker() {
        let mut w = Writer::new(Profile::current());
        Flags(0x8205).encode(&mut w).unwrap();
        assert_eq!(w.into_bytes(), vec![0x82, 0x05]);
    }

    #[test]
    fn test_encode_rejects_value_without_valid_sequence() {
        let mut w = Writer::new(Profile::current());
        assert_eq!(
            Flags(0x80).encode(&mut w),
            Err(ProtocolError::UnencodableFlags(0x80))
        );
        // Missing continuation marker on the leading byte.
        assert_eq!(
            Flags(0x0105).encode(&mut w),
            Err(ProtocolError::UnencodableFlags(0x0105))
        );
    }

    #[test]
    fn test_has_and_with() {
        let flags = Flags::empty().with(4, true).with(0, true).with(0, false);
        assert!(flags.has(4));
        assert!(!flags.has(0));
        assert_eq!(flags.bits(), 16);
    }
}
