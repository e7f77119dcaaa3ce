//! Frame dispatch: from a frame body to decoded events and observer calls.
//!
//! The flow for one frame is:
//!   1. Read the event byte → unknown id is a protocol error
//!   2. Look up the event's decoder → no decoder is "not implemented"
//!   3. Decode the payload → failure is a malformed frame
//!   4. Call the observer; battle blobs go through the battle
//!      sub-dispatcher before their raw callback fires
//!
//! Nothing here fails the connection. Each outcome is reported to the
//! observer and returned, and the caller moves on to the next frame.

use pobattle_protocol::{BattleId, Cursor, EventKind, Profile, ProtocolError, WireCodec};

use crate::battle::{BattleCommand, BattleMessage};
use crate::error::DispatchError;
use crate::event::NetworkEvent;
use crate::observer::{BattleObserver, NetworkObserver};

/// Decodes frames under one [`Profile`] and feeds an observer.
///
/// The dispatcher holds no per-frame state, so one instance can serve any
/// number of frames, in any order, from any thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher {
    profile: Profile,
}

impl Dispatcher {
    pub fn new(profile: Profile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Decodes one frame body (`event id + payload`) without notifying
    /// anyone.
    pub fn decode_frame(&self, body: &[u8]) -> Result<NetworkEvent, DispatchError> {
        let (&id, payload) = body.split_first().ok_or(DispatchError::EmptyFrame)?;
        let kind = EventKind::from_id(id).ok_or_else(|| DispatchError::UnknownEvent {
            id,
            payload: payload.to_vec(),
        })?;
        let decoder =
            NetworkEvent::decoder_for(kind).ok_or_else(|| DispatchError::NotImplemented {
                event: kind,
                payload: payload.to_vec(),
            })?;

        let mut cursor = Cursor::new(payload, self.profile);
        let event = decoder(&mut cursor)
            .map_err(|source| DispatchError::Malformed { event: kind, source })?;
        if !cursor.is_empty() {
            tracing::trace!(event = %kind, trailing = cursor.remaining(), "ignoring trailing bytes");
        }
        Ok(event)
    }

    /// Decodes one frame body and reports the outcome to `observer`.
    pub fn on_frame<O>(&self, body: &[u8], observer: &mut O) -> Result<NetworkEvent, DispatchError>
    where
        O: NetworkObserver + ?Sized,
    {
        match self.decode_frame(body) {
            Ok(event) => {
                tracing::debug!(event = %event.kind(), len = body.len(), "dispatching frame");
                self.notify(&event, observer);
                Ok(event)
            }
            Err(err) => {
                self.report(&err, observer);
                Err(err)
            }
        }
    }

    /// Reports a frame that produced no event to the matching error
    /// callback.
    pub fn report<O>(&self, err: &DispatchError, observer: &mut O)
    where
        O: NetworkObserver + ?Sized,
    {
        tracing::debug!(error = %err, "frame not dispatched");
        match err {
            DispatchError::UnknownEvent { id, payload } => {
                observer.on_protocol_error(*id, payload);
            }
            DispatchError::NotImplemented { event, payload } => {
                observer.on_not_implemented(*event, payload);
            }
            DispatchError::EmptyFrame | DispatchError::Malformed { .. } => {
                observer.on_malformed_frame(err);
            }
        }
    }

    /// Decodes one battle sub-protocol blob and reports it to `observer`.
    ///
    /// A failure is reported through
    /// [`BattleObserver::on_battle_protocol_error`] and returned; no
    /// command callback fires for that blob.
    pub fn handle_battle_command<O>(
        &self,
        battle: BattleId,
        blob: &[u8],
        observer: &mut O,
    ) -> Result<BattleMessage, ProtocolError>
    where
        O: BattleObserver + ?Sized,
    {
        match BattleMessage::from_bytes(blob, self.profile) {
            Ok(message) => {
                tracing::debug!(
                    %battle,
                    command = message.command.name(),
                    spot = message.spot,
                    "battle command"
                );
                notify_battle(battle, &message, observer);
                Ok(message)
            }
            Err(e) => {
                tracing::debug!(%battle, error = %e, "bad battle command");
                observer.on_battle_protocol_error(battle, blob, &e);
                Err(e)
            }
        }
    }

    /// Reports an already decoded event to `o`, running battle blobs
    /// through [`handle_battle_command`](Self::handle_battle_command)
    /// first.
    pub fn notify<O>(&self, event: &NetworkEvent, o: &mut O)
    where
        O: NetworkObserver + ?Sized,
    {
        match event {
            NetworkEvent::VersionControl(info) => o.on_version_control(info),
            NetworkEvent::Register => o.on_register(),
            NetworkEvent::AskForPass { salt } => o.on_ask_for_pass(salt),
            NetworkEvent::Login(login) => o.on_login(login),
            NetworkEvent::Logout { player } => o.on_logout(*player),
            NetworkEvent::Announcement { text } => o.on_announcement(text),
            NetworkEvent::KeepAlive => o.on_keep_alive(),
            NetworkEvent::TierSelection { tiers } => o.on_tier_selection(tiers),
            NetworkEvent::ChannelsList { channels } => o.on_channels_list(channels),
            NetworkEvent::PlayersList { players } => o.on_players_list(players),
            NetworkEvent::PlayerKick { player, src } => o.on_player_kick(*player, *src),
            NetworkEvent::PlayerBan { player, src } => o.on_player_ban(*player, *src),
            NetworkEvent::BattleList { channel, battles } => o.on_battle_list(*channel, battles),
            NetworkEvent::SpectateBattle {
                battle,
                configuration,
            } => o.on_spectate_battle(*battle, configuration),
            NetworkEvent::SpectatingBattleMessage { battle, blob } => {
                // A bad blob is already reported to the observer.
                let _ = self.handle_battle_command(*battle, blob, o);
                o.on_spectating_battle_message(*battle, blob);
            }
            NetworkEvent::SpectatingBattleFinished { battle } => {
                o.on_spectating_battle_finished(*battle)
            }
            NetworkEvent::SendTeam { player } => o.on_send_team(player),
            NetworkEvent::ChallengeStuff(challenge) => o.on_challenge_stuff(challenge),
            NetworkEvent::EngageBattle(engage) => o.on_engage_battle(engage),
            NetworkEvent::BattleMessage { battle, blob } => {
                let _ = self.handle_battle_command(*battle, blob, o);
                o.on_battle_message(*battle, blob);
            }
            NetworkEvent::BattleFinished {
                battle,
                result,
                winner,
                loser,
            } => o.on_battle_finished(*battle, *result, *winner, *loser),
            NetworkEvent::ChannelPlayers { channel, players } => {
                o.on_channel_players(*channel, players)
            }
            NetworkEvent::JoinChannel { channel, player } => o.on_join_channel(*channel, *player),
            NetworkEvent::LeaveChannel { channel, player } => {
                o.on_leave_channel(*channel, *player)
            }
            NetworkEvent::ChannelBattle { channel, summary } => {
                o.on_channel_battle(*channel, summary)
            }
            NetworkEvent::ChannelMessage {
                channel,
                user,
                message,
            } => o.on_channel_message(*channel, user, message),
            NetworkEvent::RemoveChannel { channel } => o.on_remove_channel(*channel),
            NetworkEvent::AddChannel { name, channel } => o.on_add_channel(name, *channel),
            NetworkEvent::HtmlChannel { channel, html } => o.on_html_channel(*channel, html),
            NetworkEvent::SendPM { player, message } => o.on_send_pm(*player, message),
            NetworkEvent::Away { player, away } => o.on_away(*player, *away),
            NetworkEvent::SendMessage(chat) => o.on_send_message(chat),
        }
    }
}

/// Command-specific callback, then the catch-all.
fn notify_battle<O>(b: BattleId, message: &BattleMessage, o: &mut O)
where
    O: BattleObserver + ?Sized,
{
    let s = message.spot;
    match &message.command {
        BattleCommand::SendOut {
            silent,
            prev_index,
            poke,
        } => o.on_battle_send_out(b, s, *silent, *prev_index, poke),
        BattleCommand::SendBack => o.on_battle_send_back(b, s),
        BattleCommand::UseAttack { attack } => o.on_battle_use_attack(b, s, *attack),
        BattleCommand::OfferChoice(choices) => o.on_battle_offer_choice(b, s, choices),
        BattleCommand::BeginTurn { turn } => o.on_battle_begin_turn(b, s, *turn),
        BattleCommand::ChangePp { move_slot, pp } => o.on_battle_change_pp(b, s, *move_slot, *pp),
        BattleCommand::ChangeHp { hp } => o.on_battle_change_hp(b, s, *hp),
        BattleCommand::Ko => o.on_battle_ko(b, s),
        BattleCommand::Effective { effectiveness } => o.on_battle_effective(b, s, *effectiveness),
        BattleCommand::Miss => o.on_battle_miss(b, s),
        BattleCommand::CriticalHit => o.on_battle_critical_hit(b, s),
        BattleCommand::Hit => o.on_battle_hit(b, s),
        BattleCommand::StatChange { stat, boost } => o.on_battle_stat_change(b, s, *stat, *boost),
        BattleCommand::StatusChange { status, multi_turn } => {
            o.on_battle_status_change(b, s, *status, *multi_turn)
        }
        BattleCommand::StatusMessage(feeling) => o.on_battle_status_message(b, s, *feeling),
        BattleCommand::Failed { silent } => o.on_battle_failed(b, s, *silent),
        BattleCommand::BattleChat { message } => o.on_battle_chat(b, s, message),
        BattleCommand::MoveMessage(msg) => o.on_battle_move_message(b, s, msg),
        BattleCommand::ItemMessage(msg) => o.on_battle_item_message(b, s, msg),
        BattleCommand::NoOpponent => o.on_battle_no_opponent(b, s),
        BattleCommand::Flinch => o.on_battle_flinch(b, s),
        BattleCommand::Recoil { damage } => o.on_battle_recoil(b, s, *damage),
        BattleCommand::WeatherMessage { status, weather } => {
            o.on_battle_weather_message(b, s, *status, *weather)
        }
        BattleCommand::StraightDamage { damage } => o.on_battle_straight_damage(b, s, *damage),
        BattleCommand::AbilityMessage(msg) => o.on_battle_ability_message(b, s, msg),
        BattleCommand::AbsStatusChange { poke, status } => {
            o.on_battle_abs_status_change(b, s, *poke, *status)
        }
        BattleCommand::Substitute { active } => o.on_battle_substitute(b, s, *active),
        BattleCommand::BattleEnd(result) => o.on_battle_end(b, s, *result),
        BattleCommand::BlankMessage => o.on_battle_blank_message(b, s),
        BattleCommand::CancelMove => o.on_battle_cancel_move(b, s),
        BattleCommand::Clause => o.on_battle_clause(b, s),
        BattleCommand::DynamicInfo(info) => o.on_battle_dynamic_info(b, s, info),
        BattleCommand::DynamicStats(stats) => o.on_battle_dynamic_stats(b, s, stats),
        BattleCommand::Spectating {
            joining,
            player,
            name,
        } => o.on_battle_spectating(b, s, *joining, *player, name.as_deref()),
        BattleCommand::SpectatorChat { player, message } => {
            o.on_battle_spectator_chat(b, s, *player, message)
        }
        BattleCommand::AlreadyStatusMessage { status } => {
            o.on_battle_already_status_message(b, s, *status)
        }
        BattleCommand::TempPokeChange(change) => o.on_battle_temp_poke_change(b, s, change),
        BattleCommand::ClockStart { seconds } => o.on_battle_clock_start(b, s, *seconds),
        BattleCommand::ClockStop { seconds } => o.on_battle_clock_stop(b, s, *seconds),
        BattleCommand::Rated { rated } => o.on_battle_rated(b, s, *rated),
        BattleCommand::TierSection { tier } => o.on_battle_tier_section(b, s, tier),
        BattleCommand::EndMessage { message } => o.on_battle_end_message(b, s, message),
        BattleCommand::PointEstimate { first, second } => {
            o.on_battle_point_estimate(b, s, *first, *second)
        }
        BattleCommand::MakeYourChoice => o.on_battle_make_your_choice(b, s),
        BattleCommand::Avoid => o.on_battle_avoid(b, s),
        BattleCommand::RearrangeTeam(team) => o.on_battle_rearrange_team(b, s, team),
        BattleCommand::SpotShifts {
            spot1,
            spot2,
            silent,
        } => o.on_battle_spot_shifts(b, s, *spot1, *spot2, *silent),
    }
    o.on_battle_command(message.command.name(), b, s, &message.command);
}
