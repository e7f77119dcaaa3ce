//! Protocol profiles: the knobs that distinguish one server revision from
//! another.
//!
//! Two revisions of the protocol exist in the wild. They share every
//! structure layout but differ in how text is encoded and how wide the
//! frame length prefix is. A [`Profile`] captures those choices so a single
//! set of codecs can reproduce either revision's bytes.

use serde::{Deserialize, Serialize};

use crate::{ProtocolError, ProtocolResult};

/// How strings are turned into bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// Big-endian UTF-16, the native string layout of the older server.
    /// The length prefix still counts bytes, not code units.
    Utf16Be,
}

impl TextEncoding {
    /// Decodes raw string bytes.
    pub fn decode(self, bytes: &[u8]) -> ProtocolResult<String> {
        match self {
            Self::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| ProtocolError::MalformedText(e.to_string())),
            Self::Utf16Be => {
                if bytes.len() % 2 != 0 {
                    return Err(ProtocolError::MalformedText(format!(
                        "odd byte count {} for UTF-16",
                        bytes.len()
                    )));
                }
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16(&units)
                    .map_err(|e| ProtocolError::MalformedText(e.to_string()))
            }
        }
    }

    /// Encodes a string into raw bytes (without the length prefix).
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            Self::Utf16Be => text
                .encode_utf16()
                .flat_map(|unit| unit.to_be_bytes())
                .collect(),
        }
    }
}

/// Width of the length prefix in front of every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthPrefix {
    U16,
    #[default]
    U32,
}

impl LengthPrefix {
    /// Number of bytes the prefix itself occupies.
    pub fn width(self) -> usize {
        match self {
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }

    /// Largest body length the prefix can describe.
    pub fn max_len(self) -> usize {
        match self {
            Self::U16 => usize::from(u16::MAX),
            Self::U32 => u32::MAX as usize,
        }
    }
}

/// Which byte ends a continuation-bit flag sequence.
///
/// Captured traffic from current servers terminates on a byte whose high
/// bit is clear: bit 7 of each byte is the "more bytes follow" marker and
/// stays part of the accumulated value. `LowBitsZero` reproduces the older
/// client reading, which stopped only on `0x00` or `0x80`.
///
/// `LowBitsZero` is a decode rule. Under it every set whose low seven bits
/// are not all zero is unencodable, so writers fail with
/// [`ProtocolError::UnencodableFlags`](crate::ProtocolError::UnencodableFlags)
/// as soon as any flag below bit 7 is set. Don't send with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagTermination {
    #[default]
    HighBitClear,
    LowBitsZero,
}

impl FlagTermination {
    /// Returns `true` if `byte` is the last byte of a flag sequence.
    pub fn is_terminal(self, byte: u8) -> bool {
        match self {
            Self::HighBitClear => byte & 0x80 == 0,
            Self::LowBitsZero => byte & 0x7F == 0,
        }
    }
}

/// One protocol revision: text encoding, frame framing and flag rules.
///
/// Profiles are plain values; copy them into every cursor and writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub text_encoding: TextEncoding,
    pub frame_length: LengthPrefix,
    pub flag_termination: FlagTermination,
    /// Upper bound accepted for an inbound frame body.
    pub max_frame_len: usize,
}

impl Profile {
    /// Default frame size limit: generous for team and player lists,
    /// small enough that a corrupt prefix can't trigger a huge allocation.
    pub const DEFAULT_MAX_FRAME_LEN: usize = 4 * 1024 * 1024;

    /// The current server revision: UTF-8 text, 4-byte frame lengths.
    pub const fn current() -> Self {
        Self {
            text_encoding: TextEncoding::Utf8,
            frame_length: LengthPrefix::U32,
            flag_termination: FlagTermination::HighBitClear,
            max_frame_len: Self::DEFAULT_MAX_FRAME_LEN,
        }
    }

    /// The older revision: UTF-16BE text, 2-byte frame lengths.
    pub const fn legacy() -> Self {
        Self {
            text_encoding: TextEncoding::Utf16Be,
            frame_length: LengthPrefix::U16,
            flag_termination: FlagTermination::HighBitClear,
            max_frame_len: u16::MAX as usize,
        }
    }

    /// Looks up a built-in profile by name (`"current"` or `"legacy"`).
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "current" => Some(Self::current()),
            "legacy" => Some(Self::legacy()),
            _ => None,
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf16_round_trip_uses_big_endian_units() {
        let bytes = TextEncoding::Utf16Be.encode("Hé");
        assert_eq!(bytes, vec![0x00, b'H', 0x00, 0xE9]);
        assert_eq!(TextEncoding::Utf16Be.decode(&bytes).unwrap(), "Hé");
    }

    #[test]
    fn test_utf16_odd_length_is_malformed() {
        let err = TextEncoding::Utf16Be.decode(&[0x00, 0x41, 0x00]).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedText(_)));
    }

    #[test]
    fn test_utf8_invalid_bytes_are_malformed() {
        let err = TextEncoding::Utf8.decode(&[0xFF, 0xFE]).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedText(_)));
    }

    #[test]
    fn test_high_bit_clear_termination() {
        let rule = FlagTermination::HighBitClear;
        assert!(rule.is_terminal(0x05));
        assert!(rule.is_terminal(0x00));
        assert!(!rule.is_terminal(0x82));
    }

    #[test]
    fn test_low_bits_zero_termination() {
        let rule = FlagTermination::LowBitsZero;
        assert!(rule.is_terminal(0x00));
        assert!(rule.is_terminal(0x80));
        assert!(!rule.is_terminal(0x05));
    }

    #[test]
    fn test_builtin_profiles_by_name() {
        assert_eq!(Profile::by_name("current"), Some(Profile::current()));
        assert_eq!(Profile::by_name("legacy"), Some(Profile::legacy()));
        assert_eq!(Profile::by_name("v3"), None);
        assert_eq!(Profile::legacy().frame_length.width(), 2);
        assert_eq!(Profile::default().frame_length.width(), 4);
    }

    #[test]
    fn test_profile_deserializes_with_defaults() {
        let profile: Profile =
            serde_json::from_str(r#"{ "text_encoding": "utf16_be" }"#).unwrap();
        assert_eq!(profile.text_encoding, TextEncoding::Utf16Be);
        assert_eq!(profile.frame_length, LengthPrefix::U32);
    }
}
