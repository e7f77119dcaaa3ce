//! Team building structures: [`PokePersonal`], [`Team`], [`TrainerTeam`]
//! and [`FullInfo`].
//!
//! These are the teams a player owns, not the in-battle view of them (see
//! [`crate::battle`]).

use serde::{Deserialize, Serialize};

use crate::player::write_u8_count;
use crate::versioned::{decode_versioned, encode_versioned, CURRENT_BLOCK_VERSION};
use crate::{
    Color, Cursor, Flags, Generation, PokeUniqueId, ProtocolError, ProtocolResult, WireCodec,
    Writer,
};

/// Maximum pokemon per team.
pub const TEAM_SIZE: usize = 6;

/// IV value assumed when a pokemon omits its IVs.
pub const DEFAULT_IV: u8 = 31;

// ---------------------------------------------------------------------------
// PokePersonal
// ---------------------------------------------------------------------------

/// One pokemon as built by its trainer. Versioned block, version 0.
///
/// Field presence depends on both the network flags and the generation:
/// item, gender and happiness exist from generation 2, ability and nature
/// from generation 3. Gated fields read as zero when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokePersonal {
    pub generation: Generation,
    pub uid: PokeUniqueId,
    pub level: u8,
    pub shiny: bool,
    pub nickname: String,
    pub ball: u16,
    pub item: u16,
    pub ability: u16,
    pub nature: u8,
    pub gender: u8,
    pub happiness: u8,
    pub pp_ups: u8,
    pub moves: [u32; 4],
    pub evs: [u8; 6],
    pub ivs: [u8; 6],
}

impl Default for PokePersonal {
    fn default() -> Self {
        Self {
            generation: Generation::default(),
            uid: PokeUniqueId::default(),
            level: 100,
            shiny: false,
            nickname: String::new(),
            ball: 0,
            item: 0,
            ability: 0,
            nature: 0,
            gender: 0,
            happiness: 0,
            pp_ups: 0,
            moves: [0; 4],
            evs: [0; 6],
            ivs: [DEFAULT_IV; 6],
        }
    }
}

impl PokePersonal {
    // Network flag bits.
    const HAS_GEN: u32 = 0;
    const HAS_NICKNAME: u32 = 1;
    const HAS_POKEBALL: u32 = 2;
    const HAS_HAPPINESS: u32 = 3;
    const HAS_PP_UPS: u32 = 4;
    const HAS_IVS: u32 = 5;
    // Data flag bits.
    const SHINY: u32 = 0;

    /// Decodes a pokemon that belongs to a team of generation `team_gen`.
    /// A generation carried by the pokemon itself overrides it.
    pub fn decode_in(cursor: &mut Cursor<'_>, team_gen: Generation) -> ProtocolResult<Self> {
        decode_versioned(cursor, CURRENT_BLOCK_VERSION, |c| {
            let network = c.read_flags()?;
            let generation = if network.has(Self::HAS_GEN) {
                Generation::decode(c)?
            } else {
                team_gen
            };
            let uid = PokeUniqueId::decode(c)?;
            let level = c.read_u8()?;
            let data = c.read_flags()?;

            let mut poke = Self {
                generation,
                uid,
                level,
                shiny: data.has(Self::SHINY),
                ..Self::default()
            };
            if network.has(Self::HAS_NICKNAME) {
                poke.nickname = c.read_string()?;
            }
            if network.has(Self::HAS_POKEBALL) {
                poke.ball = c.read_u16()?;
            }
            if generation.has_items() {
                poke.item = c.read_u16()?;
                if generation.has_abilities() {
                    poke.ability = c.read_u16()?;
                    poke.nature = c.read_u8()?;
                }
                poke.gender = c.read_u8()?;
                if network.has(Self::HAS_HAPPINESS) {
                    poke.happiness = c.read_u8()?;
                }
            }
            if network.has(Self::HAS_PP_UPS) {
                poke.pp_ups = c.read_u8()?;
            }
            poke.moves = c.read_array(|c| c.read_u32())?;
            poke.evs = c.read_array(|c| c.read_u8())?;
            if network.has(Self::HAS_IVS) {
                poke.ivs = c.read_array(|c| c.read_u8())?;
            }
            Ok(poke)
        })
    }
}

impl WireCodec for PokePersonal {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        Self::decode_in(cursor, Generation::DEFAULT)
    }

    /// Always writes every optional field, generation included. Fields the
    /// generation doesn't have are not written.
    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        encode_versioned(writer, CURRENT_BLOCK_VERSION, |w| {
            let network = Flags::from_bits(&[
                Self::HAS_GEN,
                Self::HAS_NICKNAME,
                Self::HAS_POKEBALL,
                Self::HAS_HAPPINESS,
                Self::HAS_PP_UPS,
                Self::HAS_IVS,
            ]);
            w.write_flags(network)?;
            self.generation.encode(w)?;
            self.uid.encode(w)?;
            w.write_u8(self.level);
            w.write_flags(Flags::empty().with(Self::SHINY, self.shiny))?;
            w.write_string(&self.nickname)?;
            w.write_u16(self.ball);
            if self.generation.has_items() {
                w.write_u16(self.item);
                if self.generation.has_abilities() {
                    w.write_u16(self.ability);
                    w.write_u8(self.nature);
                }
                w.write_u8(self.gender);
                w.write_u8(self.happiness);
            }
            w.write_u8(self.pp_ups);
            self.moves.iter().for_each(|&m| w.write_u32(m));
            w.write_raw(&self.evs);
            w.write_raw(&self.ivs);
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// A team of up to six pokemon. Versioned block, version 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub default_tier: Option<String>,
    pub generation: Generation,
    pub pokes: Vec<PokePersonal>,
}

impl Default for Team {
    fn default() -> Self {
        Self {
            default_tier: None,
            generation: Generation::default(),
            pokes: vec![PokePersonal::default(); TEAM_SIZE],
        }
    }
}

impl Team {
    const HAS_DEFAULT_TIER: u32 = 0;
    const HAS_NUMBER_OF_POKEMON: u32 = 1;
}

impl WireCodec for Team {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        decode_versioned(cursor, CURRENT_BLOCK_VERSION, |c| {
            let network = c.read_flags()?;
            let default_tier = if network.has(Self::HAS_DEFAULT_TIER) {
                Some(c.read_string()?)
            } else {
                None
            };
            let generation = Generation::decode(c)?;
            let count = if network.has(Self::HAS_NUMBER_OF_POKEMON) {
                usize::from(c.read_u8()?)
            } else {
                TEAM_SIZE
            };
            if count > TEAM_SIZE {
                return Err(ProtocolError::TooManyEntries {
                    what: "team pokemon",
                    count,
                    max: TEAM_SIZE,
                });
            }
            let pokes = (0..count)
                .map(|_| PokePersonal::decode_in(c, generation))
                .collect::<ProtocolResult<_>>()?;
            Ok(Self {
                default_tier,
                generation,
                pokes,
            })
        })
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        if self.pokes.len() > TEAM_SIZE {
            return Err(ProtocolError::TooManyEntries {
                what: "team pokemon",
                count: self.pokes.len(),
                max: TEAM_SIZE,
            });
        }
        encode_versioned(writer, CURRENT_BLOCK_VERSION, |w| {
            let network = Flags::empty()
                .with(Self::HAS_DEFAULT_TIER, self.default_tier.is_some())
                .with(Self::HAS_NUMBER_OF_POKEMON, true);
            w.write_flags(network)?;
            if let Some(tier) = &self.default_tier {
                w.write_string(tier)?;
            }
            self.generation.encode(w)?;
            write_u8_count(w, "team pokemon", self.pokes.len())?;
            for poke in &self.pokes {
                poke.encode(w)?;
            }
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// TrainerTeam / FullInfo
// ---------------------------------------------------------------------------

/// A team together with the trainer's profile, as uploaded by `SendTeam`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrainerTeam {
    pub nick: String,
    pub info: String,
    pub lose: String,
    pub win: String,
    pub avatar: u16,
    pub default_tier: String,
    pub team: Team,
}

impl WireCodec for TrainerTeam {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            nick: cursor.read_string()?,
            info: cursor.read_string()?,
            lose: cursor.read_string()?,
            win: cursor.read_string()?,
            avatar: cursor.read_u16()?,
            default_tier: cursor.read_string()?,
            team: Team::decode(cursor)?,
        })
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        writer.write_string(&self.nick)?;
        writer.write_string(&self.info)?;
        writer.write_string(&self.lose)?;
        writer.write_string(&self.win)?;
        writer.write_u16(self.avatar);
        writer.write_string(&self.default_tier)?;
        self.team.encode(writer)
    }
}

/// Everything a client publishes about itself in one go.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FullInfo {
    pub team: TrainerTeam,
    pub ladder: bool,
    pub show_team: bool,
    pub name_color: Color,
}

impl WireCodec for FullInfo {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            team: TrainerTeam::decode(cursor)?,
            ladder: cursor.read_bool()?,
            show_team: cursor.read_bool()?,
            name_color: Color::decode(cursor)?,
        })
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        self.team.encode(writer)?;
        writer.write_bool(self.ladder);
        writer.write_bool(self.show_team);
        self.name_color.encode(writer)
    }
}
