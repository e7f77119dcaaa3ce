//! Connects to a battle server, logs in and logs every event it sees as
//! JSON.
//!
//! ```text
//! battle-log <name> [--config config.json]
//! RUST_LOG=debug battle-log Red
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;
use pobattle::event::{ChannelEntry, ChatMessage, EngageBattle, LoginInfo, VersionInfo};
use pobattle::prelude::*;
use pobattle::protocol::{ChallengeInfo, PlayerInfo};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Observer
// ---------------------------------------------------------------------------

/// Logs each callback's arguments as one JSON document.
struct JsonLog;

fn json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

impl BattleObserver for JsonLog {
    fn on_battle_command(&mut self, name: &str, battle: BattleId, spot: u8, command: &BattleCommand) {
        tracing::info!(%battle, spot, command = name, args = %json(command), "battle");
    }

    fn on_battle_protocol_error(
        &mut self,
        battle: BattleId,
        blob: &[u8],
        error: &pobattle::ProtocolError,
    ) {
        tracing::warn!(%battle, len = blob.len(), %error, "undecodable battle command");
    }
}

impl NetworkObserver for JsonLog {
    fn on_protocol_error(&mut self, id: u8, payload: &[u8]) {
        tracing::warn!(id, len = payload.len(), "unknown event");
    }

    fn on_not_implemented(&mut self, event: EventKind, payload: &[u8]) {
        tracing::debug!(%event, len = payload.len(), "event not handled");
    }

    fn on_malformed_frame(&mut self, error: &DispatchError) {
        tracing::warn!(%error, "malformed frame");
    }

    fn on_version_control(&mut self, info: &VersionInfo) {
        tracing::info!(event = "VersionControl", args = %json(info));
    }

    fn on_login(&mut self, login: &LoginInfo) {
        tracing::info!(event = "Login", args = %json(login));
    }

    fn on_announcement(&mut self, text: &str) {
        tracing::info!(event = "Announcement", args = %json(text));
    }

    fn on_channels_list(&mut self, channels: &[ChannelEntry]) {
        tracing::info!(event = "ChannelsList", args = %json(channels));
    }

    fn on_players_list(&mut self, players: &[PlayerInfo]) {
        tracing::info!(event = "PlayersList", args = %json(players));
    }

    fn on_challenge_stuff(&mut self, challenge: &ChallengeInfo) {
        tracing::info!(event = "ChallengeStuff", args = %json(challenge));
    }

    fn on_engage_battle(&mut self, engage: &EngageBattle) {
        tracing::info!(event = "EngageBattle", args = %json(&engage.summary));
    }

    fn on_battle_finished(
        &mut self,
        battle: BattleId,
        result: BattleResult,
        winner: PlayerId,
        loser: PlayerId,
    ) {
        tracing::info!(event = "BattleFinished", %battle, %result, %winner, %loser);
    }

    fn on_channel_message(&mut self, channel: ChannelId, user: &str, message: &str) {
        tracing::info!(event = "ChannelMessage", %channel, user, message);
    }

    fn on_send_pm(&mut self, player: PlayerId, message: &str) {
        tracing::info!(event = "SendPM", %player, message);
    }

    fn on_send_message(&mut self, message: &ChatMessage) {
        tracing::info!(event = "SendMessage", args = %json(message));
    }
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "battle-log", version, about = "Log every battle server event as JSON")]
struct Args {
    /// Name to log in with.
    name: String,

    /// JSON client config. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&Path>) -> Result<ClientConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(ClientConfig::from_json_str(&std::fs::read_to_string(path)?)?),
        None => Ok(ClientConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let name = args.name;
    let config = load_config(args.config.as_deref())?;

    tracing::info!(addr = %config.addr, %name, "connecting");
    let mut client = Client::builder().config(config).connect().await?;
    client.login(&name).await?;
    client.run(&mut JsonLog).await?;

    tracing::info!(
        channels = client.state().channels.len(),
        players = client.state().players.len(),
        "disconnected"
    );
    Ok(())
}
