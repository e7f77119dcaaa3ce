//! Id tables: network events, battle commands and the small code sets
//! that appear inside their payloads.
//!
//! These are plain `const` tables. Nothing is built at runtime, so any
//! number of threads can consult them without synchronization.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ProtocolError, ProtocolResult};

// ---------------------------------------------------------------------------
// Network events
// ---------------------------------------------------------------------------

/// Top-level event ids. Shared by both peers; the numbering is the wire
/// contract and must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventKind {
    ZipCommand = 0,
    Login = 1,
    Reconnect = 2,
    Logout = 3,
    SendMessage = 4,
    PlayersList = 5,
    SendTeam = 6,
    ChallengeStuff = 7,
    EngageBattle = 8,
    BattleFinished = 9,
    BattleMessage = 10,
    BattleChat = 11,
    KeepAlive = 12,
    AskForPass = 13,
    Register = 14,
    PlayerKick = 15,
    PlayerBan = 16,
    ServNumChange = 17,
    ServDescChange = 18,
    ServNameChange = 19,
    SendPM = 20,
    Away = 21,
    GetUserInfo = 22,
    GetUserAlias = 23,
    GetBanList = 24,
    CPBan = 25,
    CPUnban = 26,
    SpectateBattle = 27,
    SpectatingBattleMessage = 28,
    SpectatingBattleChat = 29,
    SpectatingBattleFinished = 30,
    LadderChange = 31,
    ShowTeamChange = 32,
    VersionControl = 33,
    TierSelection = 34,
    ServMaxChange = 35,
    FindBattle = 36,
    ShowRankings = 37,
    Announcement = 38,
    CPTBan = 39,
    CPTUnban = 40,
    PlayerTBan = 41,
    GetTBanList = 42,
    BattleList = 43,
    ChannelsList = 44,
    ChannelPlayers = 45,
    JoinChannel = 46,
    LeaveChannel = 47,
    ChannelBattle = 48,
    RemoveChannel = 49,
    AddChannel = 50,
    ChannelMessage = 51,
    ChanNameChange = 52,
    HtmlMessage = 53,
    HtmlChannel = 54,
    ServerName = 55,
    SpecialPass = 56,
    ServerListEnd = 57,
    SetIP = 58,
    ServerPass = 59,
}

impl EventKind {
    /// Every variant, indexed by its wire id.
    pub const ALL: [Self; 60] = [
        Self::ZipCommand,
        Self::Login,
        Self::Reconnect,
        Self::Logout,
        Self::SendMessage,
        Self::PlayersList,
        Self::SendTeam,
        Self::ChallengeStuff,
        Self::EngageBattle,
        Self::BattleFinished,
        Self::BattleMessage,
        Self::BattleChat,
        Self::KeepAlive,
        Self::AskForPass,
        Self::Register,
        Self::PlayerKick,
        Self::PlayerBan,
        Self::ServNumChange,
        Self::ServDescChange,
        Self::ServNameChange,
        Self::SendPM,
        Self::Away,
        Self::GetUserInfo,
        Self::GetUserAlias,
        Self::GetBanList,
        Self::CPBan,
        Self::CPUnban,
        Self::SpectateBattle,
        Self::SpectatingBattleMessage,
        Self::SpectatingBattleChat,
        Self::SpectatingBattleFinished,
        Self::LadderChange,
        Self::ShowTeamChange,
        Self::VersionControl,
        Self::TierSelection,
        Self::ServMaxChange,
        Self::FindBattle,
        Self::ShowRankings,
        Self::Announcement,
        Self::CPTBan,
        Self::CPTUnban,
        Self::PlayerTBan,
        Self::GetTBanList,
        Self::BattleList,
        Self::ChannelsList,
        Self::ChannelPlayers,
        Self::JoinChannel,
        Self::LeaveChannel,
        Self::ChannelBattle,
        Self::RemoveChannel,
        Self::AddChannel,
        Self::ChannelMessage,
        Self::ChanNameChange,
        Self::HtmlMessage,
        Self::HtmlChannel,
        Self::ServerName,
        Self::SpecialPass,
        Self::ServerListEnd,
        Self::SetIP,
        Self::ServerPass,
    ];

    /// Looks up a wire id. Returns `None` for ids outside the table.
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id)).copied()
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ZipCommand => "ZipCommand",
            Self::Login => "Login",
            Self::Reconnect => "Reconnect",
            Self::Logout => "Logout",
            Self::SendMessage => "SendMessage",
            Self::PlayersList => "PlayersList",
            Self::SendTeam => "SendTeam",
            Self::ChallengeStuff => "ChallengeStuff",
            Self::EngageBattle => "EngageBattle",
            Self::BattleFinished => "BattleFinished",
            Self::BattleMessage => "BattleMessage",
            Self::BattleChat => "BattleChat",
            Self::KeepAlive => "KeepAlive",
            Self::AskForPass => "AskForPass",
            Self::Register => "Register",
            Self::PlayerKick => "PlayerKick",
            Self::PlayerBan => "PlayerBan",
            Self::ServNumChange => "ServNumChange",
            Self::ServDescChange => "ServDescChange",
            Self::ServNameChange => "ServNameChange",
            Self::SendPM => "SendPM",
            Self::Away => "Away",
            Self::GetUserInfo => "GetUserInfo",
            Self::GetUserAlias => "GetUserAlias",
            Self::GetBanList => "GetBanList",
            Self::CPBan => "CPBan",
            Self::CPUnban => "CPUnban",
            Self::SpectateBattle => "SpectateBattle",
            Self::SpectatingBattleMessage => "SpectatingBattleMessage",
            Self::SpectatingBattleChat => "SpectatingBattleChat",
            Self::SpectatingBattleFinished => "SpectatingBattleFinished",
            Self::LadderChange => "LadderChange",
            Self::ShowTeamChange => "ShowTeamChange",
            Self::VersionControl => "VersionControl",
            Self::TierSelection => "TierSelection",
            Self::ServMaxChange => "ServMaxChange",
            Self::FindBattle => "FindBattle",
            Self::ShowRankings => "ShowRankings",
            Self::Announcement => "Announcement",
            Self::CPTBan => "CPTBan",
            Self::CPTUnban => "CPTUnban",
            Self::PlayerTBan => "PlayerTBan",
            Self::GetTBanList => "GetTBanList",
            Self::BattleList => "BattleList",
            Self::ChannelsList => "ChannelsList",
            Self::ChannelPlayers => "ChannelPlayers",
            Self::JoinChannel => "JoinChannel",
            Self::LeaveChannel => "LeaveChannel",
            Self::ChannelBattle => "ChannelBattle",
            Self::RemoveChannel => "RemoveChannel",
            Self::AddChannel => "AddChannel",
            Self::ChannelMessage => "ChannelMessage",
            Self::ChanNameChange => "ChanNameChange",
            Self::HtmlMessage => "HtmlMessage",
            Self::HtmlChannel => "HtmlChannel",
            Self::ServerName => "ServerName",
            Self::SpecialPass => "SpecialPass",
            Self::ServerListEnd => "ServerListEnd",
            Self::SetIP => "SetIP",
            Self::ServerPass => "ServerPass",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Battle commands
// ---------------------------------------------------------------------------

/// Command ids of the battle sub-protocol carried inside
/// `BattleMessage` and `SpectatingBattleMessage` blobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum BattleCommandKind {
    SendOut = 0,
    SendBack = 1,
    UseAttack = 2,
    OfferChoice = 3,
    BeginTurn = 4,
    ChangePP = 5,
    ChangeHp = 6,
    Ko = 7,
    Effective = 8,
    Miss = 9,
    CriticalHit = 10,
    Hit = 11,
    StatChange = 12,
    StatusChange = 13,
    StatusMessage = 14,
    Failed = 15,
    BattleChat = 16,
    MoveMessage = 17,
    ItemMessage = 18,
    NoOpponent = 19,
    Flinch = 20,
    Recoil = 21,
    WeatherMessage = 22,
    StraightDamage = 23,
    AbilityMessage = 24,
    AbsStatusChange = 25,
    Substitute = 26,
    BattleEnd = 27,
    BlankMessage = 28,
    CancelMove = 29,
    Clause = 30,
    DynamicInfo = 31,
    DynamicStats = 32,
    Spectating = 33,
    SpectatorChat = 34,
    AlreadyStatusMessage = 35,
    TempPokeChange = 36,
    ClockStart = 37,
    ClockStop = 38,
    Rated = 39,
    TierSection = 40,
    EndMessage = 41,
    PointEstimate = 42,
    MakeYourChoice = 43,
    Avoid = 44,
    RearrangeTeam = 45,
    SpotShifts = 46,
}

impl BattleCommandKind {
    /// Every variant, indexed by its wire id.
    pub const ALL: [Self; 47] = [
        Self::SendOut,
        Self::SendBack,
        Self::UseAttack,
        Self::OfferChoice,
        Self::BeginTurn,
        Self::ChangePP,
        Self::ChangeHp,
        Self::Ko,
        Self::Effective,
        Self::Miss,
        Self::CriticalHit,
        Self::Hit,
        Self::StatChange,
        Self::StatusChange,
        Self::StatusMessage,
        Self::Failed,
        Self::BattleChat,
        Self::MoveMessage,
        Self::ItemMessage,
        Self::NoOpponent,
        Self::Flinch,
        Self::Recoil,
        Self::WeatherMessage,
        Self::StraightDamage,
        Self::AbilityMessage,
        Self::AbsStatusChange,
        Self::Substitute,
        Self::BattleEnd,
        Self::BlankMessage,
        Self::CancelMove,
        Self::Clause,
        Self::DynamicInfo,
        Self::DynamicStats,
        Self::Spectating,
        Self::SpectatorChat,
        Self::AlreadyStatusMessage,
        Self::TempPokeChange,
        Self::ClockStart,
        Self::ClockStop,
        Self::Rated,
        Self::TierSection,
        Self::EndMessage,
        Self::PointEstimate,
        Self::MakeYourChoice,
        Self::Avoid,
        Self::RearrangeTeam,
        Self::SpotShifts,
    ];

    /// Looks up a wire id. Returns `None` for ids outside the table.
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id)).copied()
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::SendOut => "SendOut",
            Self::SendBack => "SendBack",
            Self::UseAttack => "UseAttack",
            Self::OfferChoice => "OfferChoice",
            Self::BeginTurn => "BeginTurn",
            Self::ChangePP => "ChangePP",
            Self::ChangeHp => "ChangeHp",
            Self::Ko => "Ko",
            Self::Effective => "Effective",
            Self::Miss => "Miss",
            Self::CriticalHit => "CriticalHit",
            Self::Hit => "Hit",
            Self::StatChange => "StatChange",
            Self::StatusChange => "StatusChange",
            Self::StatusMessage => "StatusMessage",
            Self::Failed => "Failed",
            Self::BattleChat => "BattleChat",
            Self::MoveMessage => "MoveMessage",
            Self::ItemMessage => "ItemMessage",
            Self::NoOpponent => "NoOpponent",
            Self::Flinch => "Flinch",
            Self::Recoil => "Recoil",
            Self::WeatherMessage => "WeatherMessage",
            Self::StraightDamage => "StraightDamage",
            Self::AbilityMessage => "AbilityMessage",
            Self::AbsStatusChange => "AbsStatusChange",
            Self::Substitute => "Substitute",
            Self::BattleEnd => "BattleEnd",
            Self::BlankMessage => "BlankMessage",
            Self::CancelMove => "CancelMove",
            Self::Clause => "Clause",
            Self::DynamicInfo => "DynamicInfo",
            Self::DynamicStats => "DynamicStats",
            Self::Spectating => "Spectating",
            Self::SpectatorChat => "SpectatorChat",
            Self::AlreadyStatusMessage => "AlreadyStatusMessage",
            Self::TempPokeChange => "TempPokeChange",
            Self::ClockStart => "ClockStart",
            Self::ClockStop => "ClockStop",
            Self::Rated => "Rated",
            Self::TierSection => "TierSection",
            Self::EndMessage => "EndMessage",
            Self::PointEstimate => "PointEstimate",
            Self::MakeYourChoice => "MakeYourChoice",
            Self::Avoid => "Avoid",
            Self::RearrangeTeam => "RearrangeTeam",
            Self::SpotShifts => "SpotShifts",
        }
    }
}

impl fmt::Display for BattleCommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
// ---------------------------------------------------------------------------
// Payload code sets
// ---------------------------------------------------------------------------

/// Sub-type byte of a `TempPokeChange` battle command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TempPokeChangeKind {
    TempMove = 0,
    TempAbility = 1,
    TempItem = 2,
    TempSprite = 3,
    DefiniteForme = 4,
    AestheticForme = 5,
    DefMove = 6,
    TempPP = 7,
}

impl TryFrom<u8> for TempPokeChangeKind {
    type Error = ProtocolError;

    fn try_from(value: u8) -> ProtocolResult<Self> {
        Ok(match value {
            0 => Self::TempMove,
            1 => Self::TempAbility,
            2 => Self::TempItem,
            3 => Self::TempSprite,
            4 => Self::DefiniteForme,
            5 => Self::AestheticForme,
            6 => Self::DefMove,
            7 => Self::TempPP,
            other => return Err(ProtocolError::UnknownTempPokeChange(other)),
        })
    }
}

/// How a finished battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i8)]
pub enum BattleResult {
    Forfeit = 0,
    Win = 1,
    Tie = 2,
    Close = 3,
}

impl BattleResult {
    pub fn code(self) -> i8 {
        self as i8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Forfeit => "Forfeit",
            Self::Win => "Win",
            Self::Tie => "Tie",
            Self::Close => "Close",
        }
    }
}

impl TryFrom<i8> for BattleResult {
    type Error = ProtocolError;

    fn try_from(value: i8) -> ProtocolResult<Self> {
        match value {
            0 => Ok(Self::Forfeit),
            1 => Ok(Self::Win),
            2 => Ok(Self::Tie),
            3 => Ok(Self::Close),
            other => Err(ProtocolError::UnknownBattleResult(other)),
        }
    }
}

impl fmt::Display for BattleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Description byte of a `ChallengeStuff` exchange.
///
/// Values past `InvalidGen` are kept as `Other` so a challenge from a newer
/// server still decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChallengeDesc {
    Sent,
    Accepted,
    Cancelled,
    Busy,
    Refused,
    InvalidTeam,
    InvalidGen,
    Other(i8),
}

impl ChallengeDesc {
    pub fn from_code(code: i8) -> Self {
        match code {
            0 => Self::Sent,
            1 => Self::Accepted,
            2 => Self::Cancelled,
            3 => Self::Busy,
            4 => Self::Refused,
            5 => Self::InvalidTeam,
            6 => Self::InvalidGen,
            other => Self::Other(other),
        }
    }

    pub fn code(self) -> i8 {
        match self {
            Self::Sent => 0,
            Self::Accepted => 1,
            Self::Cancelled => 2,
            Self::Busy => 3,
            Self::Refused => 4,
            Self::InvalidTeam => 5,
            Self::InvalidGen => 6,
            Self::Other(code) => code,
        }
    }
}
