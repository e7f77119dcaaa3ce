//! Small value types that appear inside most other structures: ids,
//! colors, pokemon identities and the generation number.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Cursor, ProtocolResult, WireCodec, Writer};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Server-assigned id of a connected player. Sent as `i32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub i32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Server-assigned id of a running battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BattleId(pub i32);

impl fmt::Display for BattleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B-{}", self.0)
    }
}

/// Server-assigned id of a chat channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub i32);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C-{}", self.0)
    }
}

macro_rules! i32_id_codec {
    ($($ty:ty),*) => {
        $(
            impl WireCodec for $ty {
                fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
                    Ok(Self(cursor.read_i32()?))
                }

                fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
                    writer.write_i32(self.0);
                    Ok(())
                }
            }
        )*
    };
}

i32_id_codec!(PlayerId, BattleId, ChannelId);

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Game generation a team or pokemon was built for.
///
/// The generation decides which fields a pokemon-shaped structure carries:
/// held items exist from generation 2, abilities and natures from 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation(pub u8);

impl Generation {
    pub const FIRST_WITH_ITEMS: Self = Self(2);
    pub const FIRST_WITH_ABILITIES: Self = Self(3);
    /// Assumed when a pokemon doesn't say and no team context exists.
    pub const DEFAULT: Self = Self(5);

    pub fn has_items(self) -> bool {
        self >= Self::FIRST_WITH_ITEMS
    }

    /// Abilities and natures are gated together.
    pub fn has_abilities(self) -> bool {
        self >= Self::FIRST_WITH_ABILITIES
    }
}

impl Default for Generation {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen {}", self.0)
    }
}

impl WireCodec for Generation {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        Ok(Self(cursor.read_u8()?))
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        writer.write_u8(self.0);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Protocol version
// ---------------------------------------------------------------------------

/// `(version, subversion)` pair exchanged at login and in
/// `VersionControl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ProtocolVersion {
    pub version: u16,
    pub subversion: u16,
}

impl ProtocolVersion {
    pub const fn new(version: u16, subversion: u16) -> Self {
        Self {
            version,
            subversion,
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.version, self.subversion)
    }
}

impl WireCodec for ProtocolVersion {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            version: cursor.read_u16()?,
            subversion: cursor.read_u16()?,
        })
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        writer.write_u16(self.version);
        writer.write_u16(self.subversion);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// A name color in the layout of the server's native color type: a spec
/// byte followed by five 16-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub spec: i8,
    pub alpha: u16,
    pub red: u16,
    pub green: u16,
    pub blue: u16,
    pub pad: u16,
}

impl Color {
    /// Spec value of a valid RGB color.
    pub const SPEC_RGB: i8 = 1;

    /// An opaque RGB color from 8-bit channels, scaled to 16 bits the way
    /// the server stores them.
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        let scale = |c: u8| u16::from(c) * 0x101;
        Self {
            spec: Self::SPEC_RGB,
            alpha: 0xFFFF,
            red: scale(red),
            green: scale(green),
            blue: scale(blue),
            pad: 0,
        }
    }
}

impl WireCodec for Color {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            spec: cursor.read_i8()?,
            alpha: cursor.read_u16()?,
            red: cursor.read_u16()?,
            green: cursor.read_u16()?,
            blue: cursor.read_u16()?,
            pad: cursor.read_u16()?,
        })
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        writer.write_i8(self.spec);
        for channel in [self.alpha, self.red, self.green, self.blue, self.pad] {
            writer.write_u16(channel);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PokeUniqueId
// ---------------------------------------------------------------------------

/// Species number plus forme number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PokeUniqueId {
    pub pokenum: u16,
    pub subnum: u8,
}

impl PokeUniqueId {
    pub const fn new(pokenum: u16, subnum: u8) -> Self {
        Self { pokenum, subnum }
    }
}

impl fmt::Display for PokeUniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subnum == 0 {
            write!(f, "#{}", self.pokenum)
        } else {
            write!(f, "#{}-{}", self.pokenum, self.subnum)
        }
    }
}

impl WireCodec for PokeUniqueId {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            pokenum: cursor.read_u16()?,
            subnum: cursor.read_u8()?,
        })
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        writer.write_u16(self.pokenum);
        writer.write_u8(self.subnum);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Profile;

    #[test]
    fn test_id_display() {
        assert_eq!(PlayerId(42).to_string(), "P-42");
        assert_eq!(BattleId(7).to_string(), "B-7");
        assert_eq!(ChannelId(0).to_string(), "C-0");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        assert_eq!(serde_json::to_string(&PlayerId(-1)).unwrap(), "-1");
    }

    #[test]
    fn test_generation_gates() {
        assert!(!Generation(1).has_items());
        assert!(Generation(2).has_items());
        assert!(!Generation(2).has_abilities());
        assert!(Generation(3).has_abilities());
        assert_eq!(Generation::default(), Generation(5));
    }

    #[test]
    fn test_color_layout() {
        let color = Color::rgb(0xFF, 0x00, 0x80);
        let bytes = color.to_bytes(Profile::current()).unwrap();
        assert_eq!(bytes.len(), 11);
        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[3..5], &[0xFF, 0xFF]);
        assert_eq!(&bytes[9..11], &[0x80, 0x80]);
        assert_eq!(Color::from_bytes(&bytes, Profile::current()).unwrap(), color);
    }

    #[test]
    fn test_unique_id_layout() {
        let bytes = [0x01, 0xE0, 0x02];
        let uid = PokeUniqueId::from_bytes(&bytes, Profile::current()).unwrap();
        assert_eq!(uid, PokeUniqueId::new(480, 2));
        assert_eq!(uid.to_string(), "#480-2");
    }
}
