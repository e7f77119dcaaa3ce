//! The battle sub-protocol.
//!
//! `BattleMessage` and `SpectatingBattleMessage` events carry an opaque
//! blob per battle. Inside it is one [`BattleMessage`]: a command id byte,
//! the spot the command concerns, and a command-specific payload. One
//! command, `TempPokeChange`, nests a third level of tagging.

use pobattle_protocol::{
    BattleChoices, BattleCommandKind, BattleDynamicInfo, BattleResult, BattleStats, Cursor,
    PlayerId, PokeUniqueId, ProtocolError, ProtocolResult, ShallowBattlePoke, ShallowShownTeam,
    TempPokeChangeKind, WireCodec, Writer,
};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Code sets
// ---------------------------------------------------------------------------

/// Sub-code of a `StatusMessage` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusFeeling {
    FeelConfusion,
    HurtConfusion,
    FreeConfusion,
    PrevParalysed,
    PrevFrozen,
    FreeFrozen,
    FeelAsleep,
    FreeAsleep,
    HurtBurn,
    HurtPoison,
    Unknown(i8),
}

impl StatusFeeling {
    const TABLE: [Self; 10] = [
        Self::FeelConfusion,
        Self::HurtConfusion,
        Self::FreeConfusion,
        Self::PrevParalysed,
        Self::PrevFrozen,
        Self::FreeFrozen,
        Self::FeelAsleep,
        Self::FreeAsleep,
        Self::HurtBurn,
        Self::HurtPoison,
    ];

    pub fn from_code(code: i8) -> Self {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::TABLE.get(i).copied())
            .unwrap_or(Self::Unknown(code))
    }

    pub fn code(self) -> i8 {
        match self {
            Self::Unknown(code) => code,
            // The table has ten entries, so the index always fits.
            known => Self::TABLE.iter().position(|&f| f == known).unwrap_or(0) as i8,
        }
    }
}

/// What happened to the weather this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherStatus {
    Continue,
    End,
    Hurt,
    Unknown(u8),
}

impl WeatherStatus {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Continue,
            1 => Self::End,
            2 => Self::Hurt,
            other => Self::Unknown(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Continue => 0,
            Self::End => 1,
            Self::Hurt => 2,
            Self::Unknown(code) => code,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    Normal,
    Hail,
    Rain,
    SandStorm,
    Sunny,
    Unknown(u8),
}

impl Weather {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Normal,
            1 => Self::Hail,
            2 => Self::Rain,
            3 => Self::SandStorm,
            4 => Self::Sunny,
            other => Self::Unknown(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Hail => 1,
            Self::Rain => 2,
            Self::SandStorm => 3,
            Self::Sunny => 4,
            Self::Unknown(code) => code,
        }
    }
}

// ---------------------------------------------------------------------------
// TempPokeChange
// ---------------------------------------------------------------------------

/// A temporary or permanent change to a pokemon in battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TempPokeChange {
    /// A move slot now holds a different move. `permanent` is set for
    /// definite changes (`DefMove`), clear for temporary ones (`TempMove`).
    MoveChange {
        slot: i8,
        move_num: i16,
        permanent: bool,
    },
    PpChange { slot: u8, pp: u8 },
    /// The pokemon's sprite disappeared (e.g. during Fly or Dig).
    Vanish,
    /// The pokemon's sprite came back.
    Reappear,
    SpriteChange(PokeUniqueId),
    DefiniteForme { slot: u8, uid: PokeUniqueId },
    AestheticForme { forme: u16 },
}

impl TempPokeChange {
    /// Sprite pokenum meaning the pokemon vanished.
    pub const VANISH_POKENUM: u16 = 0xFFFF;
    /// Sprite pokenum meaning the pokemon's normal sprite is back.
    pub const REAPPEAR_POKENUM: u16 = 0;

    pub fn kind(&self) -> TempPokeChangeKind {
        match self {
            Self::MoveChange {
                permanent: false, ..
            } => TempPokeChangeKind::TempMove,
            Self::MoveChange {
                permanent: true, ..
            } => TempPokeChangeKind::DefMove,
            Self::PpChange { .. } => TempPokeChangeKind::TempPP,
            Self::Vanish | Self::Reappear | Self::SpriteChange(_) => {
                TempPokeChangeKind::TempSprite
            }
            Self::DefiniteForme { .. } => TempPokeChangeKind::DefiniteForme,
            Self::AestheticForme { .. } => TempPokeChangeKind::AestheticForme,
        }
    }
}

impl WireCodec for TempPokeChange {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        let kind = TempPokeChangeKind::try_from(cursor.read_u8()?)?;
        Ok(match kind {
            TempPokeChangeKind::TempMove | TempPokeChangeKind::DefMove => Self::MoveChange {
                slot: cursor.read_i8()?,
                move_num: cursor.read_i16()?,
                permanent: kind == TempPokeChangeKind::DefMove,
            },
            TempPokeChangeKind::TempPP => Self::PpChange {
                slot: cursor.read_u8()?,
                pp: cursor.read_u8()?,
            },
            TempPokeChangeKind::TempSprite => {
                let uid = PokeUniqueId::decode(cursor)?;
                match uid.pokenum {
                    Self::VANISH_POKENUM => Self::Vanish,
                    Self::REAPPEAR_POKENUM => Self::Reappear,
                    _ => Self::SpriteChange(uid),
                }
            }
            TempPokeChangeKind::DefiniteForme => Self::DefiniteForme {
                slot: cursor.read_u8()?,
                uid: PokeUniqueId::decode(cursor)?,
            },
            TempPokeChangeKind::AestheticForme => Self::AestheticForme {
                forme: cursor.read_u16()?,
            },
            // The server never fills these in for clients.
            TempPokeChangeKind::TempAbility | TempPokeChangeKind::TempItem => {
                return Err(ProtocolError::UnknownTempPokeChange(kind as u8));
            }
        })
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        writer.write_u8(self.kind() as u8);
        match *self {
            Self::MoveChange { slot, move_num, .. } => {
                writer.write_i8(slot);
                writer.write_i16(move_num);
            }
            Self::PpChange { slot, pp } => {
                writer.write_u8(slot);
                writer.write_u8(pp);
            }
            Self::Vanish => PokeUniqueId::new(Self::VANISH_POKENUM, 0).encode(writer)?,
            Self::Reappear => PokeUniqueId::new(Self::REAPPEAR_POKENUM, 0).encode(writer)?,
            Self::SpriteChange(uid) => uid.encode(writer)?,
            Self::DefiniteForme { slot, uid } => {
                writer.write_u8(slot);
                uid.encode(writer)?;
            }
            Self::AestheticForme { forme } => writer.write_u16(forme),
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Message payloads
// ---------------------------------------------------------------------------

// The client looks the text up by (number, part); `foe`, `other` and
// `text` fill the placeholders.

/// Scripted text attached to a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveMessage {
    pub move_num: u16,
    pub part: u8,
    pub move_type: i8,
    pub foe: i8,
    pub other: i16,
    pub text: String,
}

impl WireCodec for MoveMessage {
    fn decode(c: &mut Cursor<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            move_num: c.read_u16()?,
            part: c.read_u8()?,
            move_type: c.read_i8()?,
            foe: c.read_i8()?,
            other: c.read_i16()?,
            text: c.read_string()?,
        })
    }

    fn encode(&self, w: &mut Writer) -> ProtocolResult<()> {
        w.write_u16(self.move_num);
        w.write_u8(self.part);
        w.write_i8(self.move_type);
        w.write_i8(self.foe);
        w.write_i16(self.other);
        w.write_string(&self.text)
    }
}

/// Scripted text attached to a held item or berry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMessage {
    pub item: u16,
    pub part: u8,
    pub foe: i8,
    pub berry: u16,
    pub other: u16,
}

impl WireCodec for ItemMessage {
    fn decode(c: &mut Cursor<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            item: c.read_u16()?,
            part: c.read_u8()?,
            foe: c.read_i8()?,
            berry: c.read_u16()?,
            other: c.read_u16()?,
        })
    }

    fn encode(&self, w: &mut Writer) -> ProtocolResult<()> {
        w.write_u16(self.item);
        w.write_u8(self.part);
        w.write_i8(self.foe);
        w.write_u16(self.berry);
        w.write_u16(self.other);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityMessage {
    pub ability: u16,
    pub part: u8,
    pub ability_type: i8,
    pub foe: i8,
    pub other: i16,
}

impl WireCodec for AbilityMessage {
    fn decode(c: &mut Cursor<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            ability: c.read_u16()?,
            part: c.read_u8()?,
            ability_type: c.read_i8()?,
            foe: c.read_i8()?,
            other: c.read_i16()?,
        })
    }

    fn encode(&self, w: &mut Writer) -> ProtocolResult<()> {
        w.write_u16(self.ability);
        w.write_u8(self.part);
        w.write_i8(self.ability_type);
        w.write_i8(self.foe);
        w.write_i16(self.other);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// BattleCommand
// ---------------------------------------------------------------------------

/// A decoded battle command payload. The variant matches the command id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleCommand {
    SendOut {
        silent: bool,
        prev_index: u8,
        poke: ShallowBattlePoke,
    },
    SendBack,
    UseAttack {
        attack: u16,
    },
    OfferChoice(BattleChoices),
    BeginTurn {
        turn: i32,
    },
    ChangePp {
        move_slot: u8,
        pp: u8,
    },
    /// Absolute HP for the player's own pokemon, a percentage for foes.
    ChangeHp {
        hp: u16,
    },
    Ko,
    Effective {
        effectiveness: u8,
    },
    Miss,
    CriticalHit,
    Hit,
    StatChange {
        stat: i8,
        boost: i8,
    },
    StatusChange {
        status: i8,
        multi_turn: bool,
    },
    StatusMessage(StatusFeeling),
    Failed {
        silent: bool,
    },
    BattleChat {
        message: String,
    },
    MoveMessage(MoveMessage),
    ItemMessage(ItemMessage),
    NoOpponent,
    Flinch,
    Recoil {
        damage: u8,
    },
    WeatherMessage {
        status: WeatherStatus,
        weather: Weather,
    },
    StraightDamage {
        damage: u16,
    },
    AbilityMessage(AbilityMessage),
    AbsStatusChange {
        poke: i8,
        status: i8,
    },
    Substitute {
        active: bool,
    },
    BattleEnd(BattleResult),
    BlankMessage,
    CancelMove,
    Clause,
    DynamicInfo(BattleDynamicInfo),
    DynamicStats(BattleStats),
    Spectating {
        joining: bool,
        player: PlayerId,
        name: Option<String>,
    },
    SpectatorChat {
        player: PlayerId,
        message: String,
    },
    AlreadyStatusMessage {
        status: u8,
    },
    TempPokeChange(TempPokeChange),
    ClockStart {
        seconds: u16,
    },
    ClockStop {
        seconds: u16,
    },
    Rated {
        rated: bool,
    },
    TierSection {
        tier: String,
    },
    EndMessage {
        message: String,
    },
    PointEstimate {
        first: u8,
        second: u8,
    },
    MakeYourChoice,
    Avoid,
    RearrangeTeam(ShallowShownTeam),
    SpotShifts {
        spot1: u8,
        spot2: u8,
        silent: bool,
    },
}

impl BattleCommand {
    /// The command id this payload belongs to.
    pub fn kind(&self) -> BattleCommandKind {
        use BattleCommandKind as K;
        match self {
            Self::SendOut { .. } => K::SendOut,
            Self::SendBack => K::SendBack,
            Self::UseAttack { .. } => K::UseAttack,
            Self::OfferChoice(_) => K::OfferChoice,
            Self::BeginTurn { .. } => K::BeginTurn,
            Self::ChangePp { .. } => K::ChangePP,
            Self::ChangeHp { .. } => K::ChangeHp,
            Self::Ko => K::Ko,
            Self::Effective { .. } => K::Effective,
            Self::Miss => K::Miss,
            Self::CriticalHit => K::CriticalHit,
            Self::Hit => K::Hit,
            Self::StatChange { .. } => K::StatChange,
            Self::StatusChange { .. } => K::StatusChange,
            Self::StatusMessage(_) => K::StatusMessage,
            Self::Failed { .. } => K::Failed,
            Self::BattleChat { .. } => K::BattleChat,
            Self::MoveMessage(_) => K::MoveMessage,
            Self::ItemMessage(_) => K::ItemMessage,
            Self::NoOpponent => K::NoOpponent,
            Self::Flinch => K::Flinch,
            Self::Recoil { .. } => K::Recoil,
            Self::WeatherMessage { .. } => K::WeatherMessage,
            Self::StraightDamage { .. } => K::StraightDamage,
            Self::AbilityMessage(_) => K::AbilityMessage,
            Self::AbsStatusChange { .. } => K::AbsStatusChange,
            Self::Substitute { .. } => K::Substitute,
            Self::BattleEnd(_) => K::BattleEnd,
            Self::BlankMessage => K::BlankMessage,
            Self::CancelMove => K::CancelMove,
            Self::Clause => K::Clause,
            Self::DynamicInfo(_) => K::DynamicInfo,
            Self::DynamicStats(_) => K::DynamicStats,
            Self::Spectating { .. } => K::Spectating,
            Self::SpectatorChat { .. } => K::SpectatorChat,
            Self::AlreadyStatusMessage { .. } => K::AlreadyStatusMessage,
            Self::TempPokeChange(_) => K::TempPokeChange,
            Self::ClockStart { .. } => K::ClockStart,
            Self::ClockStop { .. } => K::ClockStop,
            Self::Rated { .. } => K::Rated,
            Self::TierSection { .. } => K::TierSection,
            Self::EndMessage { .. } => K::EndMessage,
            Self::PointEstimate { .. } => K::PointEstimate,
            Self::MakeYourChoice => K::MakeYourChoice,
            Self::Avoid => K::Avoid,
            Self::RearrangeTeam(_) => K::RearrangeTeam,
            Self::SpotShifts { .. } => K::SpotShifts,
        }
    }

    /// Wire name of the command, e.g. `"UseAttack"`.
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Decodes the payload that follows the id and spot bytes.
    pub fn decode_payload(kind: BattleCommandKind, c: &mut Cursor<'_>) -> ProtocolResult<Self> {
        use BattleCommandKind as K;
        Ok(match kind {
            K::SendOut => Self::SendOut {
                silent: c.read_bool()?,
                prev_index: c.read_u8()?,
                poke: ShallowBattlePoke::decode(c)?,
            },
            K::SendBack => Self::SendBack,
            K::UseAttack => Self::UseAttack {
                attack: c.read_u16()?,
            },
            K::OfferChoice => Self::OfferChoice(BattleChoices::decode(c)?),
            K::BeginTurn => Self::BeginTurn {
                turn: c.read_i32()?,
            },
            K::ChangePP => Self::ChangePp {
                move_slot: c.read_u8()?,
                pp: c.read_u8()?,
            },
            K::ChangeHp => Self::ChangeHp { hp: c.read_u16()? },
            K::Ko => Self::Ko,
            K::Effective => Self::Effective {
                effectiveness: c.read_u8()?,
            },
            K::Miss => Self::Miss,
            K::CriticalHit => Self::CriticalHit,
            K::Hit => Self::Hit,
            K::StatChange => Self::StatChange {
                stat: c.read_i8()?,
                boost: c.read_i8()?,
            },
            K::StatusChange => Self::StatusChange {
                status: c.read_i8()?,
                multi_turn: c.read_bool()?,
            },
            K::StatusMessage => Self::StatusMessage(StatusFeeling::from_code(c.read_i8()?)),
            K::Failed => Self::Failed {
                silent: c.read_bool()?,
            },
            K::BattleChat => Self::BattleChat {
                message: c.read_string()?,
            },
            K::MoveMessage => Self::MoveMessage(MoveMessage::decode(c)?),
            K::ItemMessage => Self::ItemMessage(ItemMessage::decode(c)?),
            K::NoOpponent => Self::NoOpponent,
            K::Flinch => Self::Flinch,
            K::Recoil => Self::Recoil {
                damage: c.read_u8()?,
            },
            K::WeatherMessage => Self::WeatherMessage {
                status: WeatherStatus::from_code(c.read_u8()?),
                weather: Weather::from_code(c.read_u8()?),
            },
            K::StraightDamage => Self::StraightDamage {
                damage: c.read_u16()?,
            },
            K::AbilityMessage => Self::AbilityMessage(AbilityMessage::decode(c)?),
            K::AbsStatusChange => Self::AbsStatusChange {
                poke: c.read_i8()?,
                status: c.read_i8()?,
            },
            K::Substitute => Self::Substitute {
                active: c.read_i8()? > 0,
            },
            K::BattleEnd => Self::BattleEnd(BattleResult::try_from(c.read_i8()?)?),
            K::BlankMessage => Self::BlankMessage,
            K::CancelMove => Self::CancelMove,
            K::Clause => Self::Clause,
            K::DynamicInfo => Self::DynamicInfo(BattleDynamicInfo::decode(c)?),
            K::DynamicStats => Self::DynamicStats(BattleStats::decode(c)?),
            K::Spectating => Self::Spectating {
                joining: c.read_i8()? > 0,
                player: PlayerId::decode(c)?,
                // Older servers stop after the player id. A garbled name
                // costs only the name.
                name: if c.is_empty() {
                    None
                } else {
                    c.read_string().ok()
                },
            },
            K::SpectatorChat => Self::SpectatorChat {
                player: PlayerId::decode(c)?,
                message: c.read_string()?,
            },
            K::AlreadyStatusMessage => Self::AlreadyStatusMessage {
                status: c.read_u8()?,
            },
            K::TempPokeChange => Self::TempPokeChange(TempPokeChange::decode(c)?),
            K::ClockStart => Self::ClockStart {
                seconds: c.read_u16()?,
            },
            K::ClockStop => Self::ClockStop {
                seconds: c.read_u16()?,
            },
            K::Rated => Self::Rated {
                rated: c.read_bool()?,
            },
            K::TierSection => Self::TierSection {
                tier: c.read_string()?,
            },
            K::EndMessage => Self::EndMessage {
                message: c.read_string()?,
            },
            K::PointEstimate => Self::PointEstimate {
                first: c.read_u8()?,
                second: c.read_u8()?,
            },
            K::MakeYourChoice => Self::MakeYourChoice,
            K::Avoid => Self::Avoid,
            K::RearrangeTeam => Self::RearrangeTeam(ShallowShownTeam::decode(c)?),
            K::SpotShifts => Self::SpotShifts {
                spot1: c.read_u8()?,
                spot2: c.read_u8()?,
                silent: c.read_bool()?,
            },
        })
    }

    /// Writes the payload only, without id and spot.
    pub fn encode_payload(&self, w: &mut Writer) -> ProtocolResult<()> {
        match self {
            Self::SendOut {
                silent,
                prev_index,
                poke,
            } => {
                w.write_bool(*silent);
                w.write_u8(*prev_index);
                poke.encode(w)?;
            }
            Self::SendBack
            | Self::Ko
            | Self::Miss
            | Self::CriticalHit
            | Self::Hit
            | Self::NoOpponent
            | Self::Flinch
            | Self::BlankMessage
            | Self::CancelMove
            | Self::Clause
            | Self::MakeYourChoice
            | Self::Avoid => {}
            Self::UseAttack { attack } => w.write_u16(*attack),
            Self::OfferChoice(choices) => choices.encode(w)?,
            Self::BeginTurn { turn } => w.write_i32(*turn),
            Self::ChangePp { move_slot, pp } => {
                w.write_u8(*move_slot);
                w.write_u8(*pp);
            }
            Self::ChangeHp { hp } => w.write_u16(*hp),
            Self::Effective { effectiveness } => w.write_u8(*effectiveness),
            Self::StatChange { stat, boost } => {
                w.write_i8(*stat);
                w.write_i8(*boost);
            }
            Self::StatusChange { status, multi_turn } => {
                w.write_i8(*status);
                w.write_bool(*multi_turn);
            }
            Self::StatusMessage(feeling) => w.write_i8(feeling.code()),
            Self::Failed { silent } => w.write_bool(*silent),
            Self::BattleChat { message }
            | Self::EndMessage { message } => w.write_string(message)?,
            Self::TierSection { tier } => w.write_string(tier)?,
            Self::MoveMessage(msg) => msg.encode(w)?,
            Self::ItemMessage(msg) => msg.encode(w)?,
            Self::Recoil { damage } => w.write_u8(*damage),
            Self::WeatherMessage { status, weather } => {
                w.write_u8(status.code());
                w.write_u8(weather.code());
            }
            Self::StraightDamage { damage } => w.write_u16(*damage),
            Self::AbilityMessage(msg) => msg.encode(w)?,
            Self::AbsStatusChange { poke, status } => {
                w.write_i8(*poke);
                w.write_i8(*status);
            }
            Self::Substitute { active } => w.write_i8(i8::from(*active)),
            Self::BattleEnd(result) => w.write_i8(result.code()),
            Self::DynamicInfo(info) => info.encode(w)?,
            Self::DynamicStats(stats) => stats.encode(w)?,
            Self::Spectating {
                joining,
                player,
                name,
            } => {
                w.write_i8(i8::from(*joining));
                player.encode(w)?;
                if let Some(name) = name {
                    w.write_string(name)?;
                }
            }
            Self::SpectatorChat { player, message } => {
                player.encode(w)?;
                w.write_string(message)?;
            }
            Self::AlreadyStatusMessage { status } => w.write_u8(*status),
            Self::TempPokeChange(change) => change.encode(w)?,
            Self::ClockStart { seconds } | Self::ClockStop { seconds } => w.write_u16(*seconds),
            Self::Rated { rated } => w.write_bool(*rated),
            Self::PointEstimate { first, second } => {
                w.write_u8(*first);
                w.write_u8(*second);
            }
            Self::RearrangeTeam(team) => team.encode(w)?,
            Self::SpotShifts {
                spot1,
                spot2,
                silent,
            } => {
                w.write_u8(*spot1);
                w.write_u8(*spot2);
                w.write_bool(*silent);
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// BattleMessage
// ---------------------------------------------------------------------------

/// One complete battle sub-protocol message: `command id | spot | payload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleMessage {
    /// The side or field slot the command concerns.
    pub spot: u8,
    pub command: BattleCommand,
}

impl WireCodec for BattleMessage {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        let id = cursor.read_u8()?;
        let spot = cursor.read_u8()?;
        let kind =
            BattleCommandKind::from_id(id).ok_or(ProtocolError::UnknownBattleCommandId(id))?;
        Ok(Self {
            spot,
            command: BattleCommand::decode_payload(kind, cursor)?,
        })
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        writer.write_u8(self.command.kind().id());
        writer.write_u8(self.spot);
        self.command.encode_payload(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pobattle_protocol::Profile;

    fn decode(bytes: &[u8]) -> ProtocolResult<BattleMessage> {
        BattleMessage::from_bytes(bytes, Profile::current())
    }

    #[test]
    fn test_use_attack() {
        let msg = decode(&[2, 1, 0x00, 0x05]).unwrap();
        assert_eq!(msg.spot, 1);
        assert_eq!(msg.command, BattleCommand::UseAttack { attack: 5 });
        assert_eq!(msg.command.name(), "UseAttack");
    }

    #[test]
    fn test_unknown_command_id() {
        assert_eq!(
            decode(&[47, 0]),
            Err(ProtocolError::UnknownBattleCommandId(47))
        );
    }

    #[test]
    fn test_status_feeling_codes() {
        let msg = decode(&[14, 0, 9]).unwrap();
        assert_eq!(
            msg.command,
            BattleCommand::StatusMessage(StatusFeeling::HurtPoison)
        );
        let msg = decode(&[14, 0, 42]).unwrap();
        assert_eq!(
            msg.command,
            BattleCommand::StatusMessage(StatusFeeling::Unknown(42))
        );
        assert_eq!(StatusFeeling::PrevFrozen.code(), 4);
    }

    #[test]
    fn test_weather_message() {
        let msg = decode(&[22, 0, 1, 3]).unwrap();
        assert_eq!(
            msg.command,
            BattleCommand::WeatherMessage {
                status: WeatherStatus::End,
                weather: Weather::SandStorm,
            }
        );
        let msg = decode(&[22, 0, 9, 9]).unwrap();
        assert_eq!(
            msg.command,
            BattleCommand::WeatherMessage {
                status: WeatherStatus::Unknown(9),
                weather: Weather::Unknown(9),
            }
        );
    }

    #[test]
    fn test_battle_end_outcomes() {
        assert_eq!(
            decode(&[27, 0, 1]).unwrap().command,
            BattleCommand::BattleEnd(BattleResult::Win)
        );
        assert_eq!(
            decode(&[27, 0, 5]),
            Err(ProtocolError::UnknownBattleResult(5))
        );
    }

    #[test]
    fn test_spectating_name_is_optional() {
        let without = decode(&[33, 0, 1, 0, 0, 0, 9]).unwrap();
        assert_eq!(
            without.command,
            BattleCommand::Spectating {
                joining: true,
                player: PlayerId(9),
                name: None,
            }
        );
        let with = decode(&[33, 0, 0, 0, 0, 0, 9, 0, 0, 0, 2, b'A', b's']).unwrap();
        assert_eq!(
            with.command,
            BattleCommand::Spectating {
                joining: false,
                player: PlayerId(9),
                name: Some("As".into()),
            }
        );
    }

    #[test]
    fn test_spectating_malformed_name_is_dropped() {
        // Length claims 16 bytes, only 2 follow.
        let short = decode(&[33, 0, 1, 0, 0, 0, 4, 0, 0, 0, 16, b'A', b's']).unwrap();
        assert_eq!(
            short.command,
            BattleCommand::Spectating {
                joining: true,
                player: PlayerId(4),
                name: None,
            }
        );
        // Stray trailing byte shorter than a length prefix.
        let stray = decode(&[33, 0, 0, 0, 0, 0, 4, 7]).unwrap();
        assert!(matches!(
            stray.command,
            BattleCommand::Spectating { name: None, .. }
        ));
    }

    #[test]
    fn test_temp_poke_change_variants() {
        let cases: [(&[u8], TempPokeChange); 7] = [
            (
                &[0, 2, 0x00, 0x39],
                TempPokeChange::MoveChange {
                    slot: 2,
                    move_num: 57,
                    permanent: false,
                },
            ),
            (
                &[6, 1, 0xFF, 0xFF],
                TempPokeChange::MoveChange {
                    slot: 1,
                    move_num: -1,
                    permanent: true,
                },
            ),
            (&[7, 3, 10], TempPokeChange::PpChange { slot: 3, pp: 10 }),
            (&[3, 0xFF, 0xFF, 0], TempPokeChange::Vanish),
            (&[3, 0, 0, 0], TempPokeChange::Reappear),
            (
                &[4, 2, 0x01, 0xE7, 1],
                TempPokeChange::DefiniteForme {
                    slot: 2,
                    uid: PokeUniqueId::new(487, 1),
                },
            ),
            (&[5, 0, 3], TempPokeChange::AestheticForme { forme: 3 }),
        ];
        for (payload, expected) in cases {
            let mut bytes = vec![36, 0];
            bytes.extend_from_slice(payload);
            assert_eq!(
                decode(&bytes).unwrap().command,
                BattleCommand::TempPokeChange(expected)
            );
        }
        assert_eq!(
            decode(&[36, 0, 3, 0x00, 0x19, 0]).unwrap().command,
            BattleCommand::TempPokeChange(TempPokeChange::SpriteChange(PokeUniqueId::new(25, 0)))
        );
    }

    #[test]
    fn test_temp_poke_change_without_payload_layout() {
        assert_eq!(
            decode(&[36, 0, 1]),
            Err(ProtocolError::UnknownTempPokeChange(1))
        );
        assert_eq!(
            decode(&[36, 0, 8]),
            Err(ProtocolError::UnknownTempPokeChange(8))
        );
    }

    #[test]
    fn test_truncated_payload_is_underrun() {
        assert!(matches!(
            decode(&[6, 0, 0x01]),
            Err(ProtocolError::BufferUnderrun { .. })
        ));
    }

    #[test]
    fn test_encoded_messages_decode_back() {
        let messages = [
            BattleMessage {
                spot: 0,
                command: BattleCommand::SendOut {
                    silent: false,
                    prev_index: 3,
                    poke: ShallowBattlePoke {
                        uid: PokeUniqueId::new(150, 0),
                        nick: "Mew2".into(),
                        life_percent: 100,
                        full_status: 0,
                        gender: 0,
                        shiny: true,
                        level: 70,
                    },
                },
            },
            BattleMessage {
                spot: 1,
                command: BattleCommand::MoveMessage(MoveMessage {
                    move_num: 1,
                    part: 0,
                    move_type: 2,
                    foe: 1,
                    other: -4,
                    text: "x".into(),
                }),
            },
            BattleMessage {
                spot: 1,
                command: BattleCommand::TempPokeChange(TempPokeChange::Vanish),
            },
            BattleMessage {
                spot: 0,
                command: BattleCommand::SpotShifts {
                    spot1: 0,
                    spot2: 2,
                    silent: true,
                },
            },
        ];
        for msg in messages {
            let bytes = msg.to_bytes(Profile::current()).unwrap();
            assert_eq!(decode(&bytes).unwrap(), msg);
        }
    }
}
