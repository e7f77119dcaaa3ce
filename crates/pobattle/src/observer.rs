//! Observer traits: where decoded events end up.
//!
//! Implement [`NetworkObserver`] (and its supertrait [`BattleObserver`])
//! and override the callbacks you care about. Every method has a no-op
//! default, so an observer that ignores everything is just
//! `impl BattleObserver for MyBot {}` plus `impl NetworkObserver for MyBot {}`.
//!
//! Callbacks run synchronously on the task that drives the dispatcher, in
//! the order frames arrive.

use pobattle_protocol::{
    BattleChoices, BattleConfiguration, BattleDynamicInfo, BattleId, BattleResult, BattleStats,
    ChallengeInfo, ChannelId, EventKind, PlayerId, PlayerInfo, ProtocolError, ShallowBattlePoke,
    ShallowShownTeam,
};

use crate::battle::{
    AbilityMessage, BattleCommand, ItemMessage, MoveMessage, StatusFeeling, TempPokeChange,
    Weather, WeatherStatus,
};
use crate::error::DispatchError;
use crate::event::{
    BattleSummary, ChannelEntry, ChatMessage, EngageBattle, LoginInfo, TierEntry, VersionInfo,
};

/// Callbacks for the battle sub-protocol.
///
/// For each decoded command the dispatcher calls the command's own
/// callback first, then [`on_battle_command`](Self::on_battle_command)
/// with the command name and full payload.
#[allow(unused_variables)]
pub trait BattleObserver {
    /// Catch-all, called after the command-specific callback.
    fn on_battle_command(&mut self, name: &str, battle: BattleId, spot: u8, command: &BattleCommand) {}

    /// The blob's command byte is unknown or its payload is malformed.
    fn on_battle_protocol_error(&mut self, battle: BattleId, blob: &[u8], error: &ProtocolError) {}

    fn on_battle_send_out(
        &mut self,
        battle: BattleId,
        spot: u8,
        silent: bool,
        prev_index: u8,
        poke: &ShallowBattlePoke,
    ) {
    }
    fn on_battle_send_back(&mut self, battle: BattleId, spot: u8) {}
    fn on_battle_use_attack(&mut self, battle: BattleId, spot: u8, attack: u16) {}
    fn on_battle_offer_choice(&mut self, battle: BattleId, spot: u8, choices: &BattleChoices) {}
    fn on_battle_begin_turn(&mut self, battle: BattleId, spot: u8, turn: i32) {}
    fn on_battle_change_pp(&mut self, battle: BattleId, spot: u8, move_slot: u8, pp: u8) {}
    fn on_battle_change_hp(&mut self, battle: BattleId, spot: u8, hp: u16) {}
    fn on_battle_ko(&mut self, battle: BattleId, spot: u8) {}
    fn on_battle_effective(&mut self, battle: BattleId, spot: u8, effectiveness: u8) {}
    fn on_battle_miss(&mut self, battle: BattleId, spot: u8) {}
    fn on_battle_critical_hit(&mut self, battle: BattleId, spot: u8) {}
    fn on_battle_hit(&mut self, battle: BattleId, spot: u8) {}
    fn on_battle_stat_change(&mut self, battle: BattleId, spot: u8, stat: i8, boost: i8) {}
    fn on_battle_status_change(&mut self, battle: BattleId, spot: u8, status: i8, multi_turn: bool) {}
    fn on_battle_status_message(&mut self, battle: BattleId, spot: u8, feeling: StatusFeeling) {}
    fn on_battle_failed(&mut self, battle: BattleId, spot: u8, silent: bool) {}
    fn on_battle_chat(&mut self, battle: BattleId, spot: u8, message: &str) {}
    fn on_battle_move_message(&mut self, battle: BattleId, spot: u8, message: &MoveMessage) {}
    fn on_battle_item_message(&mut self, battle: BattleId, spot: u8, message: &ItemMessage) {}
    fn on_battle_no_opponent(&mut self, battle: BattleId, spot: u8) {}
    fn on_battle_flinch(&mut self, battle: BattleId, spot: u8) {}
    fn on_battle_recoil(&mut self, battle: BattleId, spot: u8, damage: u8) {}
    fn on_battle_weather_message(
        &mut self,
        battle: BattleId,
        spot: u8,
        status: WeatherStatus,
        weather: Weather,
    ) {
    }
    fn on_battle_straight_damage(&mut self, battle: BattleId, spot: u8, damage: u16) {}
    fn on_battle_ability_message(&mut self, battle: BattleId, spot: u8, message: &AbilityMessage) {}
    fn on_battle_abs_status_change(&mut self, battle: BattleId, spot: u8, poke: i8, status: i8) {}
    fn on_battle_substitute(&mut self, battle: BattleId, spot: u8, active: bool) {}
    fn on_battle_end(&mut self, battle: BattleId, spot: u8, result: BattleResult) {}
    fn on_battle_blank_message(&mut self, battle: BattleId, spot: u8) {}
    fn on_battle_cancel_move(&mut self, battle: BattleId, spot: u8) {}
    fn on_battle_clause(&mut self, battle: BattleId, spot: u8) {}
    fn on_battle_dynamic_info(&mut self, battle: BattleId, spot: u8, info: &BattleDynamicInfo) {}
    fn on_battle_dynamic_stats(&mut self, battle: BattleId, spot: u8, stats: &BattleStats) {}
    fn on_battle_spectating(
        &mut self,
        battle: BattleId,
        spot: u8,
        joining: bool,
        player: PlayerId,
        name: Option<&str>,
    ) {
    }
    fn on_battle_spectator_chat(&mut self, battle: BattleId, spot: u8, player: PlayerId, message: &str) {}
    fn on_battle_already_status_message(&mut self, battle: BattleId, spot: u8, status: u8) {}
    fn on_battle_temp_poke_change(&mut self, battle: BattleId, spot: u8, change: &TempPokeChange) {}
    fn on_battle_clock_start(&mut self, battle: BattleId, spot: u8, seconds: u16) {}
    fn on_battle_clock_stop(&mut self, battle: BattleId, spot: u8, seconds: u16) {}
    fn on_battle_rated(&mut self, battle: BattleId, spot: u8, rated: bool) {}
    fn on_battle_tier_section(&mut self, battle: BattleId, spot: u8, tier: &str) {}
    fn on_battle_end_message(&mut self, battle: BattleId, spot: u8, message: &str) {}
    fn on_battle_point_estimate(&mut self, battle: BattleId, spot: u8, first: u8, second: u8) {}
    fn on_battle_make_your_choice(&mut self, battle: BattleId, spot: u8) {}
    fn on_battle_avoid(&mut self, battle: BattleId, spot: u8) {}
    fn on_battle_rearrange_team(&mut self, battle: BattleId, spot: u8, team: &ShallowShownTeam) {}
    fn on_battle_spot_shifts(&mut self, battle: BattleId, spot: u8, spot1: u8, spot2: u8, silent: bool) {}
}

/// Callbacks for top-level events.
#[allow(unused_variables)]
pub trait NetworkObserver: BattleObserver {
    /// The frame's event byte is outside the event table.
    fn on_protocol_error(&mut self, id: u8, payload: &[u8]) {}

    /// The event is known but this client doesn't decode it.
    fn on_not_implemented(&mut self, event: EventKind, payload: &[u8]) {}

    /// The frame's payload did not match its event's layout.
    fn on_malformed_frame(&mut self, error: &DispatchError) {}

    fn on_version_control(&mut self, info: &VersionInfo) {}
    fn on_register(&mut self) {}
    fn on_ask_for_pass(&mut self, salt: &str) {}
    fn on_login(&mut self, login: &LoginInfo) {}
    fn on_logout(&mut self, player: PlayerId) {}
    fn on_announcement(&mut self, text: &str) {}
    fn on_keep_alive(&mut self) {}
    fn on_tier_selection(&mut self, tiers: &[TierEntry]) {}
    fn on_channels_list(&mut self, channels: &[ChannelEntry]) {}
    fn on_players_list(&mut self, players: &[PlayerInfo]) {}
    fn on_player_kick(&mut self, player: PlayerId, src: PlayerId) {}
    fn on_player_ban(&mut self, player: PlayerId, src: PlayerId) {}
    fn on_battle_list(&mut self, channel: ChannelId, battles: &[BattleSummary]) {}
    fn on_spectate_battle(&mut self, battle: BattleId, configuration: &BattleConfiguration) {}

    /// Raw blob of a battle we are watching, after its command was
    /// dispatched.
    fn on_spectating_battle_message(&mut self, battle: BattleId, blob: &[u8]) {}
    fn on_spectating_battle_finished(&mut self, battle: BattleId) {}
    fn on_send_team(&mut self, player: &PlayerInfo) {}
    fn on_challenge_stuff(&mut self, challenge: &ChallengeInfo) {}
    fn on_engage_battle(&mut self, engage: &EngageBattle) {}

    /// Raw blob of a battle we are fighting in, after its command was
    /// dispatched.
    fn on_battle_message(&mut self, battle: BattleId, blob: &[u8]) {}
    fn on_battle_finished(
        &mut self,
        battle: BattleId,
        result: BattleResult,
        winner: PlayerId,
        loser: PlayerId,
    ) {
    }
    fn on_channel_players(&mut self, channel: ChannelId, players: &[PlayerId]) {}
    fn on_join_channel(&mut self, channel: ChannelId, player: PlayerId) {}
    fn on_leave_channel(&mut self, channel: ChannelId, player: PlayerId) {}
    fn on_channel_battle(&mut self, channel: ChannelId, summary: &BattleSummary) {}
    fn on_channel_message(&mut self, channel: ChannelId, user: &str, message: &str) {}
    fn on_remove_channel(&mut self, channel: ChannelId) {}
    fn on_add_channel(&mut self, name: &str, channel: ChannelId) {}
    fn on_html_channel(&mut self, channel: ChannelId, html: &str) {}
    fn on_send_pm(&mut self, player: PlayerId, message: &str) {}
    fn on_away(&mut self, player: PlayerId, away: bool) {}
    fn on_send_message(&mut self, message: &ChatMessage) {}
}

/// An observer that ignores everything. Handy with [`crate::Client::run`]
/// when only the client state matters.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl BattleObserver for NullObserver {}
impl NetworkObserver for NullObserver {}
