//! Player-facing structures: the public player record, trainer profile
//! and challenge requests.

use serde::{Deserialize, Serialize};

use crate::versioned::{decode_versioned, encode_versioned, CURRENT_BLOCK_VERSION};
use crate::{
    ChallengeDesc, Color, Cursor, Flags, Generation, PlayerId, ProtocolError, ProtocolResult,
    WireCodec, Writer,
};

/// Writes a collection length as a single byte.
pub(crate) fn write_u8_count(
    writer: &mut Writer,
    what: &'static str,
    count: usize,
) -> ProtocolResult<()> {
    let count_byte = u8::try_from(count).map_err(|_| ProtocolError::TooManyEntries {
        what,
        count,
        max: usize::from(u8::MAX),
    })?;
    writer.write_u8(count_byte);
    Ok(())
}

// ---------------------------------------------------------------------------
// PlayerInfo
// ---------------------------------------------------------------------------

/// A player's rating in one tier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TierRating {
    pub tier: String,
    pub rating: i16,
}

/// Public record of a connected player, as sent in player lists, login
/// replies and team updates. Versioned block, version 0.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub away: bool,
    pub has_ladder: bool,
    pub name: String,
    pub color: Color,
    pub avatar: u16,
    pub info: String,
    pub auth: i8,
    pub ratings: Vec<TierRating>,
}

impl PlayerInfo {
    const AWAY: u32 = 0;
    const HAS_LADDER: u32 = 1;
}

impl WireCodec for PlayerInfo {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        decode_versioned(cursor, CURRENT_BLOCK_VERSION, |c| {
            let id = PlayerId::decode(c)?;
            // No optional fields are defined for this version.
            let _network = c.read_flags()?;
            let data = c.read_flags()?;
            let name = c.read_string()?;
            let color = Color::decode(c)?;
            let avatar = c.read_u16()?;
            let info = c.read_string()?;
            let auth = c.read_i8()?;
            let count = c.read_u8()?;
            let mut ratings = Vec::with_capacity(usize::from(count));
            for _ in 0..count {
                ratings.push(TierRating {
                    tier: c.read_string()?,
                    rating: c.read_i16()?,
                });
            }
            Ok(Self {
                id,
                away: data.has(Self::AWAY),
                has_ladder: data.has(Self::HAS_LADDER),
                name,
                color,
                avatar,
                info,
                auth,
                ratings,
            })
        })
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        encode_versioned(writer, CURRENT_BLOCK_VERSION, |w| {
            self.id.encode(w)?;
            w.write_flags(Flags::empty())?;
            w.write_flags(
                Flags::empty()
                    .with(Self::AWAY, self.away)
                    .with(Self::HAS_LADDER, self.has_ladder),
            )?;
            w.write_string(&self.name)?;
            self.color.encode(w)?;
            w.write_u16(self.avatar);
            w.write_string(&self.info)?;
            w.write_i8(self.auth);
            write_u8_count(w, "tier ratings", self.ratings.len())?;
            for r in &self.ratings {
                w.write_string(&r.tier)?;
                w.write_i16(r.rating);
            }
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// TrainerInfo
// ---------------------------------------------------------------------------

/// Lines a trainer says at the end of a battle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BattleQuotes {
    pub lose: String,
    pub win: String,
    pub tie: String,
}

/// Trainer profile sent at login. Versioned block, version 0.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrainerInfo {
    pub avatar: u16,
    pub info: String,
    pub quotes: Option<BattleQuotes>,
}

impl TrainerInfo {
    const HAS_BATTLE_MESSAGES: u32 = 0;
}

impl WireCodec for TrainerInfo {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        decode_versioned(cursor, CURRENT_BLOCK_VERSION, |c| {
            let network = c.read_flags()?;
            let avatar = c.read_u16()?;
            let info = c.read_string()?;
            let quotes = if network.has(Self::HAS_BATTLE_MESSAGES) {
                Some(BattleQuotes {
                    lose: c.read_string()?,
                    win: c.read_string()?,
                    tie: c.read_string()?,
                })
            } else {
                None
            };
            Ok(Self {
                avatar,
                info,
                quotes,
            })
        })
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        encode_versioned(writer, CURRENT_BLOCK_VERSION, |w| {
            w.write_flags(Flags::empty().with(Self::HAS_BATTLE_MESSAGES, self.quotes.is_some()))?;
            w.write_u16(self.avatar);
            w.write_string(&self.info)?;
            if let Some(q) = &self.quotes {
                w.write_string(&q.lose)?;
                w.write_string(&q.win)?;
                w.write_string(&q.tie)?;
            }
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// ChallengeInfo
// ---------------------------------------------------------------------------

/// A challenge request or reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeInfo {
    pub desc: ChallengeDesc,
    /// The other player: the opponent when sending, the challenger when
    /// receiving.
    pub player: PlayerId,
    pub clauses: u32,
    pub mode: u8,
    /// Index of the team to battle with.
    pub team: u8,
    pub generation: Generation,
    pub src_tier: String,
    pub dest_tier: String,
}

impl WireCodec for ChallengeInfo {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            desc: ChallengeDesc::from_code(cursor.read_i8()?),
            player: PlayerId::decode(cursor)?,
            clauses: cursor.read_u32()?,
            mode: cursor.read_u8()?,
            team: cursor.read_u8()?,
            generation: Generation::decode(cursor)?,
            src_tier: cursor.read_string()?,
            dest_tier: cursor.read_string()?,
        })
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        writer.write_i8(self.desc.code());
        self.player.encode(writer)?;
        writer.write_u32(self.clauses);
        writer.write_u8(self.mode);
        writer.write_u8(self.team);
        self.generation.encode(writer)?;
        writer.write_string(&self.src_tier)?;
        writer.write_string(&self.dest_tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Profile;

    fn sample_player() -> PlayerInfo {
        PlayerInfo {
            id: PlayerId(12),
            away: true,
            has_ladder: false,
            name: "Misty".into(),
            color: Color::rgb(0, 0, 255),
            avatar: 3,
            info: "water only".into(),
            auth: 1,
            ratings: vec![TierRating {
                tier: "OU".into(),
                rating: 1120,
            }],
        }
    }

    #[test]
    fn test_player_info_round_trip() {
        let player = sample_player();
        let bytes = player.to_bytes(Profile::current()).unwrap();
        assert_eq!(PlayerInfo::from_bytes(&bytes, Profile::current()).unwrap(), player);
    }

    #[test]
    fn test_player_info_layout_prefix() {
        let bytes = sample_player().to_bytes(Profile::current()).unwrap();
        let declared = u16::from_be_bytes([bytes[0], bytes[1]]) as usize;
        assert_eq!(declared, bytes.len() - 2);
        // version, id, network flags, data flags (away only).
        assert_eq!(&bytes[2..9], &[0, 0, 0, 0, 12, 0x00, 0x01]);
    }

    #[test]
    fn test_player_info_skips_newer_trailing_fields() {
        let mut bytes = sample_player().to_bytes(Profile::current()).unwrap();
        // Append two unknown bytes inside the block, then a marker after it.
        let declared = u16::from_be_bytes([bytes[0], bytes[1]]) + 2;
        bytes[..2].copy_from_slice(&declared.to_be_bytes());
        bytes.extend_from_slice(&[0xAA, 0xBB, 0x42]);

        let mut c = Cursor::new(&bytes, Profile::current());
        assert_eq!(PlayerInfo::decode(&mut c).unwrap(), sample_player());
        assert_eq!(c.read_u8().unwrap(), 0x42);
    }

    #[test]
    fn test_trainer_info_quotes_are_optional() {
        let plain = TrainerInfo {
            avatar: 1,
            info: "hi".into(),
            quotes: None,
        };
        let bytes = plain.to_bytes(Profile::current()).unwrap();
        assert_eq!(bytes[3], 0x00);
        assert_eq!(TrainerInfo::from_bytes(&bytes, Profile::current()).unwrap(), plain);

        let chatty = TrainerInfo {
            quotes: Some(BattleQuotes {
                lose: "oh".into(),
                win: "yes".into(),
                tie: "hm".into(),
            }),
            ..plain
        };
        let bytes = chatty.to_bytes(Profile::current()).unwrap();
        assert_eq!(bytes[3], 0x01);
        assert_eq!(TrainerInfo::from_bytes(&bytes, Profile::current()).unwrap(), chatty);
    }

    #[test]
    fn test_challenge_info_layout() {
        let challenge = ChallengeInfo {
            desc: ChallengeDesc::Sent,
            player: PlayerId(5),
            clauses: 0x10,
            mode: 0,
            team: 0,
            generation: Generation(5),
            src_tier: String::new(),
            dest_tier: "OU".into(),
        };
        let bytes = challenge.to_bytes(Profile::current()).unwrap();
        assert_eq!(&bytes[..13], &[0, 0, 0, 0, 5, 0, 0, 0, 0x10, 0, 0, 5, 0]);
        assert_eq!(ChallengeInfo::from_bytes(&bytes, Profile::current()).unwrap(), challenge);
    }
}
