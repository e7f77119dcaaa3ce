//! Decoded top-level events.
//!
//! [`NetworkEvent`] has one variant per event this client understands.
//! [`NetworkEvent::decoder_for`] is the closed table from [`EventKind`] to
//! the routine that decodes its payload; kinds without an entry are
//! reported as not implemented by the dispatcher.
//!
//! Encoding is provided as well so a test server (or a proxy) can produce
//! the exact frames a real server would send.

use pobattle_protocol::{
    BattleConfiguration, BattleId, BattleResult, ChallengeInfo, ChannelId, Cursor, Envelope,
    EventKind, PlayerId, PlayerInfo, Profile, ProtocolResult, ProtocolVersion, TeamBattle,
    WireCodec, Writer,
};
use serde::{Deserialize, Serialize};

/// Decodes one event payload. The cursor starts just after the event byte.
pub type EventDecoder = fn(&mut Cursor<'_>) -> ProtocolResult<NetworkEvent>;

// ---------------------------------------------------------------------------
// Payload structures
// ---------------------------------------------------------------------------

/// Server identification sent right after connecting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub server_version: ProtocolVersion,
    pub has_zip: bool,
    /// Newest protocol revision the server knows about.
    pub latest: ProtocolVersion,
    /// Clients older than this may see minor problems.
    pub compat: ProtocolVersion,
    /// Clients older than this will see major problems.
    pub major_compat: ProtocolVersion,
    pub server_name: String,
}

impl VersionInfo {
    /// Compatibility warnings for a client speaking `ours`, most severe last.
    pub fn compat_warnings(&self, ours: ProtocolVersion) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if ours < self.compat {
            warnings.push("server expects problems with this client version");
        }
        if ours < self.major_compat {
            warnings.push("server expects major problems with this client version");
        }
        warnings
    }
}

/// The server accepted our login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginInfo {
    /// Pass for resuming the session later, if the server offers one.
    pub reconnect_pass: Option<Vec<u8>>,
    pub player: PlayerInfo,
    pub tiers: Vec<String>,
}

/// One node of the tier tree, flattened: `level` is the depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierEntry {
    pub level: u8,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEntry {
    pub id: ChannelId,
    pub name: String,
}

/// A battle as listed to bystanders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleSummary {
    pub battle: BattleId,
    pub player1: PlayerId,
    pub player2: PlayerId,
}

impl WireCodec for BattleSummary {
    fn decode(cursor: &mut Cursor<'_>) -> ProtocolResult<Self> {
        Ok(Self {
            battle: BattleId::decode(cursor)?,
            player1: PlayerId::decode(cursor)?,
            player2: PlayerId::decode(cursor)?,
        })
    }

    fn encode(&self, writer: &mut Writer) -> ProtocolResult<()> {
        self.battle.encode(writer)?;
        self.player1.encode(writer)?;
        self.player2.encode(writer)
    }
}

/// Configuration and team for a battle this client is fighting in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnBattle {
    pub configuration: BattleConfiguration,
    pub team: TeamBattle,
}

/// A battle started.
///
/// `player1` is zero when we are one of the fighters; only then does the
/// server attach the configuration and our team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngageBattle {
    pub summary: BattleSummary,
    pub own: Option<OwnBattle>,
}

/// A server-wide or channel message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub channel: Option<ChannelId>,
    /// Sender id, when the server sends ids with messages.
    pub player: Option<PlayerId>,
    pub html: bool,
    /// Sender name split off the text. `None` when `player` is set.
    pub user: Option<String>,
    pub message: String,
}

impl ChatMessage {
    const HAS_CHANNEL: u8 = 1 << 0;
    const HAS_ID: u8 = 1 << 1;
    const IS_HTML: u8 = 1 << 0;
}

/// Splits `"user: text"` on the first colon. Without a colon the whole
/// line is the text and the user is empty.
pub fn split_speaker(line: &str) -> (String, String) {
    match line.split_once(':') {
        Some((user, text)) => (user.to_string(), text.trim_start().to_string()),
        None => (String::new(), line.to_string()),
    }
}

fn join_speaker(user: &str, text: &str) -> String {
    if user.is_empty() {
        text.to_string()
    } else {
        format!("{user}: {text}")
    }
}

// ---------------------------------------------------------------------------
// NetworkEvent
// ---------------------------------------------------------------------------

/// A decoded server-to-client event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkEvent {
    VersionControl(VersionInfo),
    /// The name we tried is free and can be registered.
    Register,
    AskForPass {
        salt: String,
    },
    Login(LoginInfo),
    Logout {
        player: PlayerId,
    },
    Announcement {
        text: String,
    },
    KeepAlive,
    TierSelection {
        tiers: Vec<TierEntry>,
    },
    ChannelsList {
        channels: Vec<ChannelEntry>,
    },
    PlayersList {
        players: Vec<PlayerInfo>,
    },
    PlayerKick {
        player: PlayerId,
        src: PlayerId,
    },
    PlayerBan {
        player: PlayerId,
        src: PlayerId,
    },
    BattleList {
        channel: ChannelId,
        battles: Vec<BattleSummary>,
    },
    SpectateBattle {
        battle: BattleId,
        configuration: BattleConfiguration,
    },
    SpectatingBattleMessage {
        battle: BattleId,
        blob: Vec<u8>,
    },
    SpectatingBattleFinished {
        battle: BattleId,
    },
    SendTeam {
        player: PlayerInfo,
    },
    ChallengeStuff(ChallengeInfo),
    EngageBattle(EngageBattle),
    BattleMessage {
        battle: BattleId,
        blob: Vec<u8>,
    },
    BattleFinished {
        battle: BattleId,
        result: BattleResult,
        winner: PlayerId,
        loser: PlayerId,
    },
    ChannelPlayers {
        channel: ChannelId,
        players: Vec<PlayerId>,
    },
    JoinChannel {
        channel: ChannelId,
        player: PlayerId,
    },
    LeaveChannel {
        channel: ChannelId,
        player: PlayerId,
    },
    ChannelBattle {
        channel: ChannelId,
        summary: BattleSummary,
    },
    ChannelMessage {
        channel: ChannelId,
        user: String,
        message: String,
    },
    RemoveChannel {
        channel: ChannelId,
    },
    AddChannel {
        name: String,
        channel: ChannelId,
    },
    HtmlChannel {
        channel: ChannelId,
        html: String,
    },
    SendPM {
        player: PlayerId,
        message: String,
    },
    Away {
        player: PlayerId,
        away: bool,
    },
    SendMessage(ChatMessage),
}

impl NetworkEvent {
    /// The decoder for `kind`, or `None` if this client doesn't handle it.
    pub fn decoder_for(kind: EventKind) -> Option<EventDecoder> {
        use EventKind as K;
        let decoder: EventDecoder = match kind {
            K::VersionControl => decode_version_control,
            K::Register => |_| Ok(Self::Register),
            K::AskForPass => |c| {
                Ok(Self::AskForPass {
                    salt: c.read_string()?,
                })
            },
            K::Login => decode_login,
            K::Logout => |c| {
                Ok(Self::Logout {
                    player: PlayerId::decode(c)?,
                })
            },
            K::Announcement => |c| {
                Ok(Self::Announcement {
                    text: c.read_string()?,
                })
            },
            K::KeepAlive => |_| Ok(Self::KeepAlive),
            K::TierSelection => decode_tier_selection,
            K::ChannelsList => |c| {
                Ok(Self::ChannelsList {
                    channels: c.read_list(|c| {
                        Ok(ChannelEntry {
                            id: ChannelId::decode(c)?,
                            name: c.read_string()?,
                        })
                    })?,
                })
            },
            K::PlayersList => decode_players_list,
            K::PlayerKick => |c| {
                Ok(Self::PlayerKick {
                    player: PlayerId::decode(c)?,
                    src: PlayerId::decode(c)?,
                })
            },
            K::PlayerBan => |c| {
                Ok(Self::PlayerBan {
                    player: PlayerId::decode(c)?,
                    src: PlayerId::decode(c)?,
                })
            },
            K::BattleList => |c| {
                Ok(Self::BattleList {
                    channel: ChannelId::decode(c)?,
                    battles: Vec::<BattleSummary>::decode(c)?,
                })
            },
            K::SpectateBattle => |c| {
                Ok(Self::SpectateBattle {
                    battle: BattleId::decode(c)?,
                    configuration: BattleConfiguration::decode(c)?,
                })
            },
            K::SpectatingBattleMessage => |c| {
                Ok(Self::SpectatingBattleMessage {
                    battle: BattleId::decode(c)?,
                    blob: c.read_bytes()?,
                })
            },
            K::SpectatingBattleFinished => |c| {
                Ok(Self::SpectatingBattleFinished {
                    battle: BattleId::decode(c)?,
                })
            },
            K::SendTeam => |c| {
                Ok(Self::SendTeam {
                    player: PlayerInfo::decode(c)?,
                })
            },
            K::ChallengeStuff => |c| Ok(Self::ChallengeStuff(ChallengeInfo::decode(c)?)),
            K::EngageBattle => decode_engage_battle,
            K::BattleMessage => |c| {
                Ok(Self::BattleMessage {
                    battle: BattleId::decode(c)?,
                    blob: c.read_bytes()?,
                })
            },
            K::BattleFinished => |c| {
                Ok(Self::BattleFinished {
                    battle: BattleId::decode(c)?,
                    result: BattleResult::try_from(c.read_i8()?)?,
                    winner: PlayerId::decode(c)?,
                    loser: PlayerId::decode(c)?,
                })
            },
            K::ChannelPlayers => |c| {
                Ok(Self::ChannelPlayers {
                    channel: ChannelId::decode(c)?,
                    players: Vec::<PlayerId>::decode(c)?,
                })
            },
            K::JoinChannel => |c| {
                Ok(Self::JoinChannel {
                    channel: ChannelId::decode(c)?,
                    player: PlayerId::decode(c)?,
                })
            },
            K::LeaveChannel => |c| {
                Ok(Self::LeaveChannel {
                    channel: ChannelId::decode(c)?,
                    player: PlayerId::decode(c)?,
                })
            },
            K::ChannelBattle => |c| {
                Ok(Self::ChannelBattle {
                    channel: ChannelId::decode(c)?,
                    summary: BattleSummary::decode(c)?,
                })
            },
            K::ChannelMessage => |c| {
                let channel = ChannelId::decode(c)?;
                let (user, message) = split_speaker(&c.read_string()?);
                Ok(Self::ChannelMessage {
                    channel,
                    user,
                    message,
                })
            },
            K::RemoveChannel => |c| {
                Ok(Self::RemoveChannel {
                    channel: ChannelId::decode(c)?,
                })
            },
            K::AddChannel => |c| {
                Ok(Self::AddChannel {
                    name: c.read_string()?,
                    channel: ChannelId::decode(c)?,
                })
            },
            K::HtmlChannel => |c| {
                Ok(Self::HtmlChannel {
                    channel: ChannelId::decode(c)?,
                    html: c.read_string()?,
                })
            },
            K::SendPM => |c| {
                Ok(Self::SendPM {
                    player: PlayerId::decode(c)?,
                    message: c.read_string()?,
                })
            },
            K::Away => |c| {
                Ok(Self::Away {
                    player: PlayerId::decode(c)?,
                    away: c.read_u8()? > 0,
                })
            },
            K::SendMessage => decode_send_message,
            _ => return None,
        };
        Some(decoder)
    }

    /// The event id this variant is sent under.
    pub fn kind(&self) -> EventKind {
        use EventKind as K;
        match self {
            Self::VersionControl(_) => K::VersionControl,
            Self::Register => K::Register,
            Self::AskForPass { .. } => K::AskForPass,
            Self::Login(_) => K::Login,
            Self::Logout { .. } => K::Logout,
            Self::Announcement { .. } => K::Announcement,
            Self::KeepAlive => K::KeepAlive,
            Self::TierSelection { .. } => K::TierSelection,
            Self::ChannelsList { .. } => K::ChannelsList,
            Self::PlayersList { .. } => K::PlayersList,
            Self::PlayerKick { .. } => K::PlayerKick,
            Self::PlayerBan { .. } => K::PlayerBan,
            Self::BattleList { .. } => K::BattleList,
            Self::SpectateBattle { .. } => K::SpectateBattle,
            Self::SpectatingBattleMessage { .. } => K::SpectatingBattleMessage,
            Self::SpectatingBattleFinished { .. } => K::SpectatingBattleFinished,
            Self::SendTeam { .. } => K::SendTeam,
            Self::ChallengeStuff(_) => K::ChallengeStuff,
            Self::EngageBattle(_) => K::EngageBattle,
            Self::BattleMessage { .. } => K::BattleMessage,
            Self::BattleFinished { .. } => K::BattleFinished,
            Self::ChannelPlayers { .. } => K::ChannelPlayers,
            Self::JoinChannel { .. } => K::JoinChannel,
            Self::LeaveChannel { .. } => K::LeaveChannel,
            Self::ChannelBattle { .. } => K::ChannelBattle,
            Self::ChannelMessage { .. } => K::ChannelMessage,
            Self::RemoveChannel { .. } => K::RemoveChannel,
            Self::AddChannel { .. } => K::AddChannel,
            Self::HtmlChannel { .. } => K::HtmlChannel,
            Self::SendPM { .. } => K::SendPM,
            Self::Away { .. } => K::Away,
            Self::SendMessage(_) => K::SendMessage,
        }
    }

    /// Encodes the event the way a server sends it.
    ///
    /// Chat text is re-joined as `"user: text"`, so a speaker name
    /// containing a colon does not survive the trip.
    pub fn to_envelope(&self, profile: Profile) -> ProtocolResult<Envelope> {
        let mut w = Writer::new(profile);
        self.encode_payload(&mut w)?;
        Ok(Envelope::new(self.kind().id(), w.into_bytes()))
    }

    fn encode_payload(&self, w: &mut Writer) -> ProtocolResult<()> {
        match self {
            Self::VersionControl(info) => {
                info.server_version.encode(w)?;
                w.write_u8(u8::from(info.has_zip));
                info.latest.encode(w)?;
                info.compat.encode(w)?;
                info.major_compat.encode(w)?;
                w.write_string(&info.server_name)?;
            }
            Self::Register | Self::KeepAlive => {}
            Self::AskForPass { salt } => w.write_string(salt)?,
            Self::Login(login) => {
                match &login.reconnect_pass {
                    Some(pass) => {
                        w.write_u8(1);
                        w.write_bytes(pass)?;
                    }
                    None => w.write_u8(0),
                }
                login.player.encode(w)?;
                login.tiers.encode(w)?;
            }
            Self::Logout { player } => player.encode(w)?,
            Self::Announcement { text } => w.write_string(text)?,
            Self::TierSelection { tiers } => {
                let mut inner = Writer::new(w.profile());
                for tier in tiers {
                    inner.write_u8(tier.level);
                    inner.write_string(&tier.name)?;
                }
                w.write_bytes(inner.as_bytes())?;
            }
            Self::ChannelsList { channels } => w.write_list(channels, |w, entry| {
                entry.id.encode(w)?;
                w.write_string(&entry.name)
            })?,
            Self::PlayersList { players } => {
                for player in players {
                    player.encode(w)?;
                }
            }
            Self::PlayerKick { player, src } | Self::PlayerBan { player, src } => {
                player.encode(w)?;
                src.encode(w)?;
            }
            Self::BattleList { channel, battles } => {
                channel.encode(w)?;
                battles.encode(w)?;
            }
            Self::SpectateBattle {
                battle,
                configuration,
            } => {
                battle.encode(w)?;
                configuration.encode(w)?;
            }
            Self::SpectatingBattleMessage { battle, blob }
            | Self::BattleMessage { battle, blob } => {
                battle.encode(w)?;
                w.write_bytes(blob)?;
            }
            Self::SpectatingBattleFinished { battle } => battle.encode(w)?,
            Self::SendTeam { player } => player.encode(w)?,
            Self::ChallengeStuff(challenge) => challenge.encode(w)?,
            Self::EngageBattle(engage) => {
                engage.summary.encode(w)?;
                if let Some(own) = &engage.own {
                    own.configuration.encode(w)?;
                    own.team.encode(w)?;
                }
            }
            Self::BattleFinished {
                battle,
                result,
                winner,
                loser,
            } => {
                battle.encode(w)?;
                w.write_i8(result.code());
                winner.encode(w)?;
                loser.encode(w)?;
            }
            Self::ChannelPlayers { channel, players } => {
                channel.encode(w)?;
                players.encode(w)?;
            }
            Self::JoinChannel { channel, player } | Self::LeaveChannel { channel, player } => {
                channel.encode(w)?;
                player.encode(w)?;
            }
            Self::ChannelBattle { channel, summary } => {
                channel.encode(w)?;
                summary.encode(w)?;
            }
            Self::ChannelMessage {
                channel,
                user,
                message,
            } => {
                channel.encode(w)?;
                w.write_string(&join_speaker(user, message))?;
            }
            Self::RemoveChannel { channel } => channel.encode(w)?,
            Self::AddChannel { name, channel } => {
                w.write_string(name)?;
                channel.encode(w)?;
            }
            Self::HtmlChannel { channel, html } => {
                channel.encode(w)?;
                w.write_string(html)?;
            }
            Self::SendPM { player, message } => {
                player.encode(w)?;
                w.write_string(message)?;
            }
            Self::Away { player, away } => {
                player.encode(w)?;
                w.write_u8(u8::from(*away));
            }
            Self::SendMessage(chat) => {
                let mut network = 0;
                if chat.channel.is_some() {
                    network |= ChatMessage::HAS_CHANNEL;
                }
                if chat.player.is_some() {
                    network |= ChatMessage::HAS_ID;
                }
                w.write_u8(network);
                w.write_u8(if chat.html { ChatMessage::IS_HTML } else { 0 });
                if let Some(channel) = chat.channel {
                    channel.encode(w)?;
                }
                if let Some(player) = chat.player {
                    player.encode(w)?;
                }
                let text = match (&chat.player, &chat.user) {
                    (None, Some(user)) => join_speaker(user, &chat.message),
                    _ => chat.message.clone(),
                };
                w.write_string(&text)?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Longer decoders
// ---------------------------------------------------------------------------

fn decode_version_control(c: &mut Cursor<'_>) -> ProtocolResult<NetworkEvent> {
    Ok(NetworkEvent::VersionControl(VersionInfo {
        server_version: ProtocolVersion::decode(c)?,
        has_zip: c.read_u8()? > 0,
        latest: ProtocolVersion::decode(c)?,
        compat: ProtocolVersion::decode(c)?,
        major_compat: ProtocolVersion::decode(c)?,
        server_name: c.read_string()?,
    }))
}

fn decode_login(c: &mut Cursor<'_>) -> ProtocolResult<NetworkEvent> {
    let reconnect_pass = if c.read_u8()? > 0 {
        Some(c.read_bytes()?)
    } else {
        None
    };
    Ok(NetworkEvent::Login(LoginInfo {
        reconnect_pass,
        player: PlayerInfo::decode(c)?,
        tiers: Vec::<String>::decode(c)?,
    }))
}

/// The tier tree arrives as a nested blob of `(level, name)` pairs that
/// runs to the end of the blob.
fn decode_tier_selection(c: &mut Cursor<'_>) -> ProtocolResult<NetworkEvent> {
    let raw = c.read_bytes()?;
    let mut inner = Cursor::new(&raw, c.profile());
    let mut tiers = Vec::new();
    while !inner.is_empty() {
        tiers.push(TierEntry {
            level: inner.read_u8()?,
            name: inner.read_string()?,
        });
    }
    Ok(NetworkEvent::TierSelection { tiers })
}

/// Player records repeat until the frame runs out.
fn decode_players_list(c: &mut Cursor<'_>) -> ProtocolResult<NetworkEvent> {
    let mut players = Vec::new();
    while !c.is_empty() {
        players.push(PlayerInfo::decode(c)?);
    }
    Ok(NetworkEvent::PlayersList { players })
}

fn decode_engage_battle(c: &mut Cursor<'_>) -> ProtocolResult<NetworkEvent> {
    let summary = BattleSummary::decode(c)?;
    let own = if summary.player1 == PlayerId(0) {
        Some(OwnBattle {
            configuration: BattleConfiguration::decode(c)?,
            team: TeamBattle::decode(c)?,
        })
    } else {
        None
    };
    Ok(NetworkEvent::EngageBattle(EngageBattle { summary, own }))
}

fn decode_send_message(c: &mut Cursor<'_>) -> ProtocolResult<NetworkEvent> {
    let network = c.read_u8()?;
    let data = c.read_u8()?;
    let channel = if network & ChatMessage::HAS_CHANNEL != 0 {
        Some(ChannelId::decode(c)?)
    } else {
        None
    };
    let player = if network & ChatMessage::HAS_ID != 0 {
        Some(PlayerId::decode(c)?)
    } else {
        None
    };
    let text = c.read_string()?;
    let (user, message) = match player {
        Some(_) => (None, text),
        None => {
            let (user, message) = split_speaker(&text);
            (Some(user), message)
        }
    };
    Ok(NetworkEvent::SendMessage(ChatMessage {
        channel,
        player,
        html: data & ChatMessage::IS_HTML != 0,
        user,
        message,
    }))
}
