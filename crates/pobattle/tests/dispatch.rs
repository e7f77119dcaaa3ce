//! Integration tests for frame and battle command dispatch.
//!
//! Frames are built by hand so the exact wire bytes are visible, then fed
//! to a `Dispatcher` with an observer that records every callback.

use pobattle::Dispatcher;
use pobattle::battle::TempPokeChange;
use pobattle::event::ChannelEntry;
use pobattle::prelude::*;
use pobattle::protocol::{EventKind, ProtocolError};

// =========================================================================
// Recording observer
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
enum Call {
    ProtocolError(u8, Vec<u8>),
    NotImplemented(EventKind),
    Malformed,
    KeepAlive,
    Announcement(String),
    ChannelsList(Vec<ChannelEntry>),
    ChannelMessage(ChannelId, String, String),
    BattleMessage(BattleId, Vec<u8>),
    SpectatingBattleMessage(BattleId, Vec<u8>),
    UseAttack(BattleId, u8, u16),
    TempPokeChange(BattleId, u8, TempPokeChange),
    BattleCommand(String, BattleId, u8),
    BattleProtocolError(BattleId),
}

#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
}

impl BattleObserver for Recorder {
    fn on_battle_command(&mut self, name: &str, battle: BattleId, spot: u8, _: &BattleCommand) {
        self.calls
            .push(Call::BattleCommand(name.to_string(), battle, spot));
    }

    fn on_battle_protocol_error(&mut self, battle: BattleId, _: &[u8], _: &ProtocolError) {
        self.calls.push(Call::BattleProtocolError(battle));
    }

    fn on_battle_use_attack(&mut self, battle: BattleId, spot: u8, attack: u16) {
        self.calls.push(Call::UseAttack(battle, spot, attack));
    }

    fn on_battle_temp_poke_change(&mut self, battle: BattleId, spot: u8, change: &TempPokeChange) {
        self.calls
            .push(Call::TempPokeChange(battle, spot, *change));
    }
}

impl NetworkObserver for Recorder {
    fn on_protocol_error(&mut self, id: u8, payload: &[u8]) {
        self.calls.push(Call::ProtocolError(id, payload.to_vec()));
    }

    fn on_not_implemented(&mut self, event: EventKind, _: &[u8]) {
        self.calls.push(Call::NotImplemented(event));
    }

    fn on_malformed_frame(&mut self, _: &DispatchError) {
        self.calls.push(Call::Malformed);
    }

    fn on_keep_alive(&mut self) {
        self.calls.push(Call::KeepAlive);
    }

    fn on_announcement(&mut self, text: &str) {
        self.calls.push(Call::Announcement(text.to_string()));
    }

    fn on_channels_list(&mut self, channels: &[ChannelEntry]) {
        self.calls.push(Call::ChannelsList(channels.to_vec()));
    }

    fn on_channel_message(&mut self, channel: ChannelId, user: &str, message: &str) {
        self.calls.push(Call::ChannelMessage(
            channel,
            user.to_string(),
            message.to_string(),
        ));
    }

    fn on_battle_message(&mut self, battle: BattleId, blob: &[u8]) {
        self.calls.push(Call::BattleMessage(battle, blob.to_vec()));
    }

    fn on_spectating_battle_message(&mut self, battle: BattleId, blob: &[u8]) {
        self.calls
            .push(Call::SpectatingBattleMessage(battle, blob.to_vec()));
    }
}

// =========================================================================
// Frame builders
// =========================================================================

fn string(text: &str) -> Vec<u8> {
    let mut out = (text.len() as u32).to_be_bytes().to_vec();
    out.extend_from_slice(text.as_bytes());
    out
}

/// `event id + battle id + length-prefixed blob`.
fn battle_frame(event: u8, battle: i32, blob: &[u8]) -> Vec<u8> {
    let mut frame = vec![event];
    frame.extend_from_slice(&battle.to_be_bytes());
    frame.extend_from_slice(&(blob.len() as u32).to_be_bytes());
    frame.extend_from_slice(blob);
    frame
}

fn dispatch(frame: &[u8]) -> (Result<NetworkEvent, DispatchError>, Vec<Call>) {
    let mut recorder = Recorder::default();
    let result = Dispatcher::default().on_frame(frame, &mut recorder);
    (result, recorder.calls)
}

// =========================================================================
// Top-level dispatch
// =========================================================================

#[test]
fn test_unknown_event_id_signals_one_protocol_error() {
    let (result, calls) = dispatch(&[0xFE, 1, 2, 3]);
    assert!(matches!(
        result,
        Err(DispatchError::UnknownEvent { id: 0xFE, .. })
    ));
    assert_eq!(calls, vec![Call::ProtocolError(0xFE, vec![1, 2, 3])]);
}

#[test]
fn test_table_entry_without_decoder_is_not_implemented() {
    let (result, calls) = dispatch(&[EventKind::FindBattle.id(), 0, 0]);
    assert!(matches!(
        result,
        Err(DispatchError::NotImplemented {
            event: EventKind::FindBattle,
            ..
        })
    ));
    assert_eq!(calls, vec![Call::NotImplemented(EventKind::FindBattle)]);
}

#[test]
fn test_frames_dispatch_in_submission_order() {
    let dispatcher = Dispatcher::default();
    let mut recorder = Recorder::default();

    let mut announcement = vec![38];
    announcement.extend(string("Welcome"));

    for frame in [&[12][..], &[0xFE][..], announcement.as_slice(), &[12][..]] {
        let _ = dispatcher.on_frame(frame, &mut recorder);
    }
    assert_eq!(
        recorder.calls,
        vec![
            Call::KeepAlive,
            Call::ProtocolError(0xFE, Vec::new()),
            Call::Announcement("Welcome".into()),
            Call::KeepAlive,
        ]
    );
}

#[test]
fn test_trailing_bytes_are_ignored() {
    let mut frame = vec![38];
    frame.extend(string("hi"));
    frame.extend([0xAA, 0xBB]);
    let (result, calls) = dispatch(&frame);
    assert_eq!(
        result.unwrap(),
        NetworkEvent::Announcement { text: "hi".into() }
    );
    assert_eq!(calls, vec![Call::Announcement("hi".into())]);
}

#[test]
fn test_absent_string_decodes_empty() {
    let (result, _) = dispatch(&[38, 0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(
        result.unwrap(),
        NetworkEvent::Announcement {
            text: String::new()
        }
    );
}

#[test]
fn test_channels_list() {
    let mut frame = vec![44, 0, 0, 0, 2];
    frame.extend(0i32.to_be_bytes());
    frame.extend(string("Lobby"));
    frame.extend(3i32.to_be_bytes());
    frame.extend(string("Tohjo Falls"));

    let (_, calls) = dispatch(&frame);
    assert_eq!(
        calls,
        vec![Call::ChannelsList(vec![
            ChannelEntry {
                id: ChannelId(0),
                name: "Lobby".into(),
            },
            ChannelEntry {
                id: ChannelId(3),
                name: "Tohjo Falls".into(),
            },
        ])]
    );
}

#[test]
fn test_channel_message_splits_speaker() {
    let mut frame = vec![51];
    frame.extend(4i32.to_be_bytes());
    frame.extend(string("Red: hello: there"));

    let (_, calls) = dispatch(&frame);
    assert_eq!(
        calls,
        vec![Call::ChannelMessage(
            ChannelId(4),
            "Red".into(),
            "hello: there".into()
        )]
    );
}

#[test]
fn test_malformed_frame_does_not_stop_later_frames() {
    let dispatcher = Dispatcher::default();
    let mut recorder = Recorder::default();
    // Announcement claiming 10 bytes of text with only 2 present.
    let _ = dispatcher.on_frame(&[38, 0, 0, 0, 10, b'h', b'i'], &mut recorder);
    let _ = dispatcher.on_frame(&[12], &mut recorder);
    assert_eq!(recorder.calls, vec![Call::Malformed, Call::KeepAlive]);
}

// =========================================================================
// Battle sub-dispatch
// =========================================================================

#[test]
fn test_battle_message_use_attack() {
    let (result, calls) = dispatch(&battle_frame(10, 7, &[2, 1, 0x00, 0x05]));
    assert!(matches!(
        result,
        Ok(NetworkEvent::BattleMessage {
            battle: BattleId(7),
            ..
        })
    ));
    assert_eq!(
        calls,
        vec![
            Call::UseAttack(BattleId(7), 1, 5),
            Call::BattleCommand("UseAttack".into(), BattleId(7), 1),
            Call::BattleMessage(BattleId(7), vec![2, 1, 0, 5]),
        ]
    );
}

#[test]
fn test_spectated_battle_uses_the_same_sub_dispatcher() {
    let (_, calls) = dispatch(&battle_frame(28, 12, &[2, 0, 0x01, 0x00]));
    assert_eq!(
        calls,
        vec![
            Call::UseAttack(BattleId(12), 0, 256),
            Call::BattleCommand("UseAttack".into(), BattleId(12), 0),
            Call::SpectatingBattleMessage(BattleId(12), vec![2, 0, 1, 0]),
        ]
    );
}

#[test]
fn test_unknown_battle_command_keeps_raw_callback() {
    let (result, calls) = dispatch(&battle_frame(10, 3, &[200, 0]));
    assert!(result.is_ok());
    assert_eq!(
        calls,
        vec![
            Call::BattleProtocolError(BattleId(3)),
            Call::BattleMessage(BattleId(3), vec![200, 0]),
        ]
    );
}

#[test]
fn test_temp_poke_change_branches_on_sub_type() {
    // TempPokeChange(36), sprite sub-type 3, pokenum 0xFFFF, forme 0.
    let (_, calls) = dispatch(&battle_frame(10, 1, &[36, 0, 3, 0xFF, 0xFF, 0]));
    assert_eq!(
        calls[0],
        Call::TempPokeChange(BattleId(1), 0, TempPokeChange::Vanish)
    );

    // PP change: slot 2, pp 9.
    let (_, calls) = dispatch(&battle_frame(10, 1, &[36, 1, 7, 2, 9]));
    assert_eq!(
        calls[0],
        Call::TempPokeChange(BattleId(1), 1, TempPokeChange::PpChange { slot: 2, pp: 9 })
    );
}

#[test]
fn test_handle_battle_command_directly() {
    let mut recorder = Recorder::default();
    let message = Dispatcher::default()
        .handle_battle_command(BattleId(7), &[2, 1, 0, 5], &mut recorder)
        .unwrap();
    assert_eq!(message.spot, 1);
    assert_eq!(message.command, BattleCommand::UseAttack { attack: 5 });
    assert_eq!(recorder.calls.len(), 2);
}
