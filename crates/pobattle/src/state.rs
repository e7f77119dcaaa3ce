//! What the client knows about the server, rebuilt from events.
//!
//! [`ClientState::apply`] folds one decoded event into the picture. The
//! client run loop applies every event before the observer sees it, so
//! callbacks can look things up through [`crate::Client::state`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

use pobattle_protocol::{BattleConfiguration, BattleId, ChannelId, PlayerId, PlayerInfo, TeamBattle};
use serde::Serialize;

use crate::event::{ChannelEntry, NetworkEvent};

/// A chat channel and who is in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
    pub players: BTreeSet<PlayerId>,
}

impl Channel {
    pub fn new(id: ChannelId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            players: BTreeSet::new(),
        }
    }
}

/// A battle we are fighting in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Battle {
    pub id: BattleId,
    pub opponent: PlayerId,
    pub configuration: BattleConfiguration,
    pub team: TeamBattle,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClientState {
    /// Our own record, once logged in.
    pub me: Option<PlayerInfo>,
    pub players: HashMap<PlayerId, PlayerInfo>,
    pub channels: BTreeMap<ChannelId, Channel>,
    pub battles: HashMap<BattleId, Battle>,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerInfo> {
        self.players.get(&id)
    }

    pub fn player_by_name(&self, name: &str) -> Option<&PlayerInfo> {
        self.players.values().find(|p| p.name == name)
    }

    pub fn channel(&self, id: ChannelId) -> Option<&Channel> {
        self.channels.get(&id)
    }

    pub fn channel_by_name(&self, name: &str) -> Option<&Channel> {
        self.channels.values().find(|c| c.name == name)
    }

    pub fn battle(&self, id: BattleId) -> Option<&Battle> {
        self.battles.get(&id)
    }

    /// Folds `event` into the state. Events that carry nothing to
    /// remember are ignored.
    pub fn apply(&mut self, event: &NetworkEvent) {
        match event {
            NetworkEvent::Login(login) => {
                self.players.insert(login.player.id, login.player.clone());
                self.me = Some(login.player.clone());
            }
            NetworkEvent::PlayersList { players } => {
                for player in players {
                    self.upsert_player(player);
                }
            }
            NetworkEvent::SendTeam { player } => self.upsert_player(player),
            NetworkEvent::Logout { player } => {
                self.players.remove(player);
                for channel in self.channels.values_mut() {
                    channel.players.remove(player);
                }
            }
            NetworkEvent::Away { player, away } => {
                if let Some(info) = self.players.get_mut(player) {
                    info.away = *away;
                }
            }
            NetworkEvent::ChannelsList { channels } => {
                for ChannelEntry { id, name } in channels {
                    self.channels
                        .entry(*id)
                        .and_modify(|c| c.name.clone_from(name))
                        .or_insert_with(|| Channel::new(*id, name.clone()));
                }
            }
            NetworkEvent::AddChannel { name, channel } => {
                self.channels
                    .insert(*channel, Channel::new(*channel, name.clone()));
            }
            NetworkEvent::RemoveChannel { channel } => {
                self.channels.remove(channel);
            }
            NetworkEvent::ChannelPlayers { channel, players } => {
                if let Some(c) = self.channels.get_mut(channel) {
                    c.players = players.iter().copied().collect();
                }
            }
            NetworkEvent::JoinChannel { channel, player } => {
                if let Some(c) = self.channels.get_mut(channel) {
                    c.players.insert(*player);
                }
            }
            NetworkEvent::LeaveChannel { channel, player } => {
                if let Some(c) = self.channels.get_mut(channel) {
                    c.players.remove(player);
                }
            }
            NetworkEvent::EngageBattle(engage) => {
                if let Some(own) = &engage.own {
                    let id = engage.summary.battle;
                    self.battles.insert(
                        id,
                        Battle {
                            id,
                            opponent: engage.summary.player2,
                            configuration: own.configuration.clone(),
                            team: own.team.clone(),
                        },
                    );
                }
            }
            NetworkEvent::BattleFinished { battle, .. } => {
                self.battles.remove(battle);
            }
            _ => {}
        }
    }

    fn upsert_player(&mut self, player: &PlayerInfo) {
        if self.me.as_ref().is_some_and(|me| me.id == player.id) {
            self.me = Some(player.clone());
        }
        self.players.insert(player.id, player.clone());
    }
}
