//! Wire protocol for the Pokemon Online battle server.
//!
//! This crate is the pure, synchronous half of the client:
//!
//! - **Primitives** ([`Cursor`], [`Writer`], [`Flags`]): big-endian reads
//!   and writes, length-prefixed strings and continuation-bit flag sets.
//! - **Framing** ([`Envelope`], [`encode_frame`], versioned blocks): the
//!   outer frame and the forward-compatible wrapper around growing
//!   structures.
//! - **Structures** ([`PlayerInfo`], [`Team`], [`PokeBattle`], ...): one
//!   [`WireCodec`] impl per protocol struct.
//! - **Id tables** ([`EventKind`], [`BattleCommandKind`]): the fixed event
//!   and battle command enumerations.
//!
//! Nothing here touches a socket. The transport crate moves frames; the
//! client crate decides what to do with them.
//!
//! ```text
//! Transport (frames) → Envelope → Cursor → structure codecs → client events
//! ```

mod codec;
mod cursor;
mod error;
mod events;
mod flags;
mod frame;
mod profile;
mod types;
mod writer;

pub mod battle;
pub mod player;
pub mod team;
pub mod versioned;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use battle::{
    BattleChoice, BattleChoices, BattleConfiguration, BattleDynamicInfo, BattleMove, BattleStats,
    ChoiceAction, Hazard, PokeBattle, ShallowBattlePoke, ShallowShownPoke, ShallowShownTeam,
    TeamBattle,
};
pub use codec::WireCodec;
pub use cursor::{Cursor, VersionMismatch, ABSENT_LENGTH};
pub use error::{ProtocolError, ProtocolResult};
pub use events::{BattleCommandKind, BattleResult, ChallengeDesc, EventKind, TempPokeChangeKind};
pub use flags::Flags;
pub use frame::{decode_frame_len, encode_frame, max_body_len, Envelope};
pub use player::{BattleQuotes, ChallengeInfo, PlayerInfo, TierRating, TrainerInfo};
pub use profile::{FlagTermination, LengthPrefix, Profile, TextEncoding};
pub use team::{FullInfo, PokePersonal, Team, TrainerTeam, DEFAULT_IV, TEAM_SIZE};
pub use types::{BattleId, ChannelId, Color, Generation, PlayerId, PokeUniqueId, ProtocolVersion};
pub use writer::Writer;
