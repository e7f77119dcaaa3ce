//! Outbound commands: every action the client can ask the server for.
//!
//! A [`Command`] encodes to an [`Envelope`] (`event id + arguments`); the
//! transport adds the length prefix.

use pobattle_protocol::{
    BattleChoice, BattleId, BattleResult, ChallengeInfo, ChannelId, Color, EventKind, Envelope,
    Flags, PlayerId, Profile, ProtocolResult, ProtocolVersion, TrainerInfo, TrainerTeam,
    WireCodec, Writer,
};
use serde::{Deserialize, Serialize};

/// Client name sent at login unless configured otherwise.
pub const DEFAULT_CLIENT_TYPE: &str = "pobattle";

/// Client build number sent at login unless configured otherwise.
pub const DEFAULT_CLIENT_VERSION: u16 = 0x200;

/// Channel requested at login unless configured otherwise.
pub const DEFAULT_CHANNEL: &str = "default";

/// Everything the login frame can carry.
///
/// Optional fields are announced through the login's network flags and
/// only written when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub version: ProtocolVersion,
    pub client_type: Option<String>,
    pub client_version: Option<u16>,
    pub name: String,
    pub zip: bool,
    pub show_team: bool,
    pub ladder: bool,
    pub idle: bool,
    /// Ask the server to tag chat messages with sender ids.
    pub ids_with_messages: bool,
    pub default_channel: Option<String>,
    pub additional_channels: Vec<String>,
    pub color: Option<Color>,
    pub trainer_info: Option<TrainerInfo>,
}

impl LoginRequest {
    // Network flag bits.
    const HAS_CLIENT_TYPE: u32 = 0;
    const HAS_VERSION_NUMBER: u32 = 1;
    const HAS_DEFAULT_CHANNEL: u32 = 3;
    const HAS_ADDITIONAL_CHANNELS: u32 = 4;
    const HAS_COLOR: u32 = 5;
    const HAS_TRAINER_INFO: u32 = 6;

    // Data flag bits.
    const SUPPORTS_ZIP: u32 = 0;
    const SHOW_TEAM: u32 = 1;
    const LADDER: u32 = 2;
    const IDLE: u32 = 3;
    const IDS_WITH_MESSAGES: u32 = 4;

    /// A login for `name` with this client's type and build number, sender
    /// ids on chat messages and [`DEFAULT_CHANNEL`] as the channel to join.
    /// Clear `default_channel` to leave the choice to the server.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: ProtocolVersion::default(),
            client_type: Some(DEFAULT_CLIENT_TYPE.to_string()),
            client_version: Some(DEFAULT_CLIENT_VERSION),
            name: name.into(),
            zip: false,
            show_team: false,
            ladder: false,
            idle: false,
            ids_with_messages: true,
            default_channel: Some(DEFAULT_CHANNEL.to_string()),
            additional_channels: Vec::new(),
            color: None,
            trainer_info: None,
        }
    }

    fn network_flags(&self) -> Flags {
        Flags::empty()
            .with(Self::HAS_CLIENT_TYPE, self.client_type.is_some())
            .with(Self::HAS_VERSION_NUMBER, self.client_version.is_some())
            .with(Self::HAS_DEFAULT_CHANNEL, self.default_channel.is_some())
            .with(
                Self::HAS_ADDITIONAL_CHANNELS,
                !self.additional_channels.is_empty(),
            )
            .with(Self::HAS_COLOR, self.color.is_some())
            .with(Self::HAS_TRAINER_INFO, self.trainer_info.is_some())
    }

    fn data_flags(&self) -> Flags {
        Flags::empty()
            .with(Self::SUPPORTS_ZIP, self.zip)
            .with(Self::SHOW_TEAM, self.show_team)
            .with(Self::LADDER, self.ladder)
            .with(Self::IDLE, self.idle)
            .with(Self::IDS_WITH_MESSAGES, self.ids_with_messages)
    }

    fn encode(&self, w: &mut Writer) -> ProtocolResult<()> {
        self.version.encode(w)?;
        w.write_flags(self.network_flags())?;
        if let Some(client_type) = &self.client_type {
            w.write_string(client_type)?;
        }
        if let Some(client_version) = self.client_version {
            w.write_u16(client_version);
        }
        w.write_string(&self.name)?;
        w.write_flags(self.data_flags())?;
        if let Some(channel) = &self.default_channel {
            w.write_string(channel)?;
        }
        if !self.additional_channels.is_empty() {
            self.additional_channels.encode(w)?;
        }
        if let Some(color) = &self.color {
            color.encode(w)?;
        }
        if let Some(info) = &self.trainer_info {
            info.encode(w)?;
        }
        Ok(())
    }
}

/// A client-to-server action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Login(Box<LoginRequest>),
    /// Server-wide chat line.
    SendMessage { message: String },
    /// Register the name we logged in with.
    Register,
    /// Answer to `AskForPass`: the salted password hash.
    AskForPass { hash: String },
    SendTeam(TrainerTeam),
    ChallengeStuff(ChallengeInfo),
    SpectateBattle { battle: BattleId },
    StopSpectating { battle: BattleId },
    /// Our decision for one spot in a battle we are fighting.
    BattleChoice { battle: BattleId, choice: BattleChoice },
    /// Leave a battle, e.g. forfeit or close after the end.
    BattleFinished { battle: BattleId, result: BattleResult },
    BattleChat { battle: BattleId, message: String },
    SpectatingBattleChat { battle: BattleId, message: String },
    SendPM { player: PlayerId, message: String },
    ChannelMessage { channel: ChannelId, message: String },
    JoinChannel { name: String },
    LeaveChannel { channel: ChannelId },
    Kick { player: PlayerId },
    Ban { player: PlayerId },
    NameBan { name: String },
    Away { away: bool },
    /// Real client address, sent by a trusted proxy.
    SetIp { ip: String },
}

impl Command {
    pub fn login(request: LoginRequest) -> Self {
        Self::Login(Box::new(request))
    }

    /// The event id the command is sent under.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Login(_) => EventKind::Login,
            Self::SendMessage { .. } => EventKind::SendMessage,
            Self::Register => EventKind::Register,
            Self::AskForPass { .. } => EventKind::AskForPass,
            Self::SendTeam(_) => EventKind::SendTeam,
            Self::ChallengeStuff(_) => EventKind::ChallengeStuff,
            Self::SpectateBattle { .. } => EventKind::SpectateBattle,
            Self::StopSpectating { .. } => EventKind::SpectatingBattleFinished,
            Self::BattleChoice { .. } => EventKind::BattleMessage,
            Self::BattleFinished { .. } => EventKind::BattleFinished,
            Self::BattleChat { .. } => EventKind::BattleChat,
            Self::SpectatingBattleChat { .. } => EventKind::SpectatingBattleChat,
            Self::SendPM { .. } => EventKind::SendPM,
            Self::ChannelMessage { .. } => EventKind::ChannelMessage,
            Self::JoinChannel { .. } => EventKind::JoinChannel,
            Self::LeaveChannel { .. } => EventKind::LeaveChannel,
            Self::Kick { .. } => EventKind::PlayerKick,
            Self::Ban { .. } => EventKind::PlayerBan,
            Self::NameBan { .. } => EventKind::CPBan,
            Self::Away { .. } => EventKind::Away,
            Self::SetIp { .. } => EventKind::SetIP,
        }
    }

    /// Encodes the command as `event id + arguments`.
    ///
    /// # Errors
    /// Returns the protocol error if an argument can't be represented,
    /// e.g. a string too long for its length prefix.
    pub fn encode(&self, profile: Profile) -> ProtocolResult<Envelope> {
        let mut w = Writer::new(profile);
        match self {
            Self::Login(request) => request.encode(&mut w)?,
            Self::Register => {}
            Self::SendMessage { message } => w.write_string(message)?,
            Self::AskForPass { hash } => w.write_string(hash)?,
            Self::JoinChannel { name } => w.write_string(name)?,
            Self::NameBan { name } => w.write_string(name)?,
            Self::SetIp { ip } => w.write_string(ip)?,
            Self::SendTeam(team) => team.encode(&mut w)?,
            Self::ChallengeStuff(challenge) => challenge.encode(&mut w)?,
            Self::SpectateBattle { battle } | Self::StopSpectating { battle } => {
                battle.encode(&mut w)?
            }
            Self::BattleChoice { battle, choice } => {
                battle.encode(&mut w)?;
                choice.encode(&mut w)?;
            }
            Self::BattleFinished { battle, result } => {
                battle.encode(&mut w)?;
                w.write_i32(i32::from(result.code()));
            }
            Self::BattleChat { battle, message }
            | Self::SpectatingBattleChat { battle, message } => {
                battle.encode(&mut w)?;
                w.write_string(message)?;
            }
            Self::SendPM { player, message } => {
                player.encode(&mut w)?;
                w.write_string(message)?;
            }
            Self::ChannelMessage { channel, message } => {
                channel.encode(&mut w)?;
                w.write_string(message)?;
            }
            Self::LeaveChannel { channel } => channel.encode(&mut w)?,
            Self::Kick { player } | Self::Ban { player } => player.encode(&mut w)?,
            Self::Away { away } => w.write_u8(u8::from(*away)),
        }
        Ok(Envelope::new(self.kind().id(), w.into_bytes()))
    }
}
