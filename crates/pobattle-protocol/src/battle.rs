//! Battle structures: the configuration announced when a battle starts,
//! the player's own battle team, and the reduced views of pokemon that
//! battle commands carry.

use serde::{Deserialize, Serialize};

use crate::player::write_u8_count;
use crate::team::TEAM_SIZE;
use crate::versioned::{decode_versioned, encode_versioned, CURRENT_BLOCK_VERSION};
use crate::{
    Cursor, Flags, Generation, PlayerId, PokeUniqueId, ProtocolError, ProtocolResult, WireCodec,
    Writer,
};

// ---------------------------------------------------------------------------
// BattleConfiguration
// ---------------------------------------------------------------------------

/// Rules and participants of a battle. Not versioned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleConfiguration {
    pub rated: bool,
    pub generation: Generation,
    pub mode: u8,
    pub clauses: u32,
    pub players: Vec<PlayerId>,
}

impl BattleConfiguration {
    const HAS_NUMBER_OF_IDS: u32 = 0;
    const RATED: u32 = 0;
    /// Participants when the count is omitted.
    pub const DEFAULT_PLAYERS: usize = 2;
}

impl WireCodec for BattleConfiguration {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        let network = cursor.read_flags()?;
        let data = cursor.read_flags()?;
        let generation = Generation::decode(cursor)?;
        let mode = cursor.read_u8()?;
        let clauses = cursor.read_u32()?;
        let count = if network.has(Self::HAS_NUMBER_OF_IDS) {
            usize::from(cursor.read_u8()?)
        } else {
            Self::DEFAULT_PLAYERS
        };
        let players = (0..count)
            .map(|_| PlayerId::decode(cursor))
            .collect::<ProtocolResult<_>>()?;
        Ok(Self {
            rated: data.has(Self::RATED),
            generation,
            mode,
            clauses,
            players,
        })
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        writer.write_flags(Flags::empty().with(Self::HAS_NUMBER_OF_IDS, true))?;
        writer.write_flags(Flags::empty().with(Self::RATED, self.rated))?;
        self.generation.encode(writer)?;
        writer.write_u8(self.mode);
        writer.write_u32(self.clauses);
        write_u8_count(writer, "battle participants", self.players.len())?;
        for id in &self.players {
            id.encode(writer)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PokeBattle / TeamBattle
// ---------------------------------------------------------------------------

/// A move slot with its remaining and maximum PP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BattleMove {
    pub num: u16,
    pub pp: u8,
    pub total_pp: u8,
}

impl WireCodec for BattleMove {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            num: cursor.read_u16()?,
            pp: cursor.read_u8()?,
            total_pp: cursor.read_u8()?,
        })
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        writer.write_u16(self.num);
        writer.write_u8(self.pp);
        writer.write_u8(self.total_pp);
        Ok(())
    }
}

/// A pokemon of the player's own side, as the battle engine sees it.
/// Versioned block, version 0.
///
/// Item and ability are always on the wire for this structure, whatever
/// the battle's generation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PokeBattle {
    pub uid: PokeUniqueId,
    pub shiny: bool,
    pub nick: String,
    pub total_life: u16,
    pub life: u16,
    pub gender: u8,
    pub level: u8,
    pub item: u16,
    pub ability: u16,
    pub happiness: u8,
    /// Attack, defense, special attack, special defense, speed.
    pub stats: [u16; 5],
    pub moves: [BattleMove; 4],
    pub evs: [u8; 6],
    pub dvs: [u8; 6],
}

impl PokeBattle {
    const SHINY: u32 = 0;
}

impl WireCodec for PokeBattle {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        decode_versioned(cursor, CURRENT_BLOCK_VERSION, |c| {
            let uid = PokeUniqueId::decode(c)?;
            let data = c.read_flags()?;
            Ok(Self {
                uid,
                shiny: data.has(Self::SHINY),
                nick: c.read_string()?,
                total_life: c.read_u16()?,
                life: c.read_u16()?,
                gender: c.read_u8()?,
                level: c.read_u8()?,
                item: c.read_u16()?,
                ability: c.read_u16()?,
                happiness: c.read_u8()?,
                stats: c.read_array(|c| c.read_u16())?,
                moves: c.read_array(BattleMove::decode)?,
                evs: c.read_array(|c| c.read_u8())?,
                dvs: c.read_array(|c| c.read_u8())?,
            })
        })
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        encode_versioned(writer, CURRENT_BLOCK_VERSION, |w| {
            self.uid.encode(w)?;
            w.write_flags(Flags::empty().with(Self::SHINY, self.shiny))?;
            w.write_string(&self.nick)?;
            w.write_u16(self.total_life);
            w.write_u16(self.life);
            w.write_u8(self.gender);
            w.write_u8(self.level);
            w.write_u16(self.item);
            w.write_u16(self.ability);
            w.write_u8(self.happiness);
            self.stats.iter().for_each(|&s| w.write_u16(s));
            for m in &self.moves {
                m.encode(w)?;
            }
            w.write_raw(&self.evs);
            w.write_raw(&self.dvs);
            Ok(())
        })
    }
}

/// The player's six battle pokemon, positionally.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamBattle {
    pub pokes: [PokeBattle; TEAM_SIZE],
}

impl WireCodec for TeamBattle {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            pokes: cursor.read_array(PokeBattle::decode)?,
        })
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        self.pokes.iter().try_for_each(|p| p.encode(writer))
    }
}

// ---------------------------------------------------------------------------
// Shallow views
// ---------------------------------------------------------------------------

/// What every spectator knows about a pokemon on the field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShallowBattlePoke {
    pub uid: PokeUniqueId,
    pub nick: String,
    pub life_percent: u8,
    pub full_status: u32,
    pub gender: u8,
    pub shiny: bool,
    pub level: u8,
}

impl WireCodec for ShallowBattlePoke {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            uid: PokeUniqueId::decode(cursor)?,
            nick: cursor.read_string()?,
            life_percent: cursor.read_u8()?,
            full_status: cursor.read_u32()?,
            gender: cursor.read_u8()?,
            shiny: cursor.read_bool()?,
            level: cursor.read_u8()?,
        })
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        self.uid.encode(writer)?;
        writer.write_string(&self.nick)?;
        writer.write_u8(self.life_percent);
        writer.write_u32(self.full_status);
        writer.write_u8(self.gender);
        writer.write_bool(self.shiny);
        writer.write_u8(self.level);
        Ok(())
    }
}

/// One entry of team preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShallowShownPoke {
    pub uid: PokeUniqueId,
    pub level: u8,
    pub gender: u8,
    pub has_item: bool,
}

impl WireCodec for ShallowShownPoke {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            uid: PokeUniqueId::decode(cursor)?,
            level: cursor.read_u8()?,
            gender: cursor.read_u8()?,
            has_item: cursor.read_bool()?,
        })
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        self.uid.encode(writer)?;
        writer.write_u8(self.level);
        writer.write_u8(self.gender);
        writer.write_bool(self.has_item);
        Ok(())
    }
}

/// The opponent's team as shown during team preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShallowShownTeam {
    pub pokes: [ShallowShownPoke; TEAM_SIZE],
}

impl WireCodec for ShallowShownTeam {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            pokes: cursor.read_array(ShallowShownPoke::decode)?,
        })
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        self.pokes.iter().try_for_each(|p| p.encode(writer))
    }
}

/// Current stat values after boosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BattleStats {
    pub stats: [i16; 5],
}

impl WireCodec for BattleStats {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            stats: cursor.read_array(|c| c.read_i16())?,
        })
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        self.stats.iter().for_each(|&s| writer.write_i16(s));
        Ok(())
    }
}

/// Entry hazard on one side of the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hazard {
    Spikes,
    SpikesLv2,
    SpikesLv3,
    StealthRock,
    ToxicSpikes,
    ToxicSpikesLv2,
}

impl Hazard {
    pub const ALL: [Self; 6] = [
        Self::Spikes,
        Self::SpikesLv2,
        Self::SpikesLv3,
        Self::StealthRock,
        Self::ToxicSpikes,
        Self::ToxicSpikesLv2,
    ];

    /// Bit in [`BattleDynamicInfo::flags`].
    pub fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

/// Stat boosts and field hazards of one spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BattleDynamicInfo {
    pub boosts: [i8; 7],
    pub flags: u8,
}

impl BattleDynamicInfo {
    /// Hazards whose bit is set, in bit order.
    pub fn hazards(&self) -> Vec<Hazard> {
        Hazard::ALL
            .into_iter()
            .filter(|h| self.flags & h.mask() != 0)
            .collect()
    }
}

impl WireCodec for BattleDynamicInfo {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            boosts: cursor.read_array(|c| c.read_i8())?,
            flags: cursor.read_u8()?,
        })
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        self.boosts.iter().for_each(|&b| writer.write_i8(b));
        writer.write_u8(self.flags);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Choices
// ---------------------------------------------------------------------------

/// The options the server offers a spot at the start of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BattleChoices {
    pub num_slot: u8,
    pub switch_allowed: bool,
    pub attacks_allowed: bool,
    pub attack_allowed: [bool; 4],
}

impl WireCodec for BattleChoices {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            num_slot: cursor.read_u8()?,
            switch_allowed: cursor.read_bool()?,
            attacks_allowed: cursor.read_bool()?,
            attack_allowed: cursor.read_array(|c| c.read_bool())?,
        })
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        writer.write_u8(self.num_slot);
        writer.write_bool(self.switch_allowed);
        writer.write_bool(self.attacks_allowed);
        self.attack_allowed.iter().for_each(|&a| writer.write_bool(a));
        Ok(())
    }
}

/// What the player does with one spot this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceAction {
    Cancel,
    Attack { attack_slot: i8, target: i8 },
    Switch { poke_slot: i8 },
    /// New team order for team preview, as six slot indices.
    Rearrange([i8; TEAM_SIZE]),
}

impl ChoiceAction {
    pub fn type_code(&self) -> u8 {
        match self {
            Self::Cancel => 0,
            Self::Attack { .. } => 1,
            Self::Switch { .. } => 2,
            Self::Rearrange(_) => 3,
        }
    }
}

/// A player's decision for one spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleChoice {
    pub slot: u8,
    pub action: ChoiceAction,
}

impl WireCodec for BattleChoice {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        let slot = cursor.read_u8()?;
        let action = match cursor.read_u8()? {
            0 => ChoiceAction::Cancel,
            1 => ChoiceAction::Attack {
                attack_slot: cursor.read_i8()?,
                target: cursor.read_i8()?,
            },
            2 => ChoiceAction::Switch {
                poke_slot: cursor.read_i8()?,
            },
            3 => ChoiceAction::Rearrange(cursor.read_array(|c| c.read_i8())?),
            other => return Err(ProtocolError::UnknownChoiceType(other)),
        };
        Ok(Self { slot, action })
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        writer.write_u8(self.slot);
        writer.write_u8(self.action.type_code());
        match self.action {
            ChoiceAction::Cancel => {}
            ChoiceAction::Attack {
                attack_slot,
                target,
            } => {
                writer.write_i8(attack_slot);
                writer.write_i8(target);
            }
            ChoiceAction::Switch { poke_slot } => writer.write_i8(poke_slot),
            ChoiceAction::Rearrange(order) => order.iter().for_each(|&i| writer.write_i8(i)),
        }
        Ok(())
    }
}
