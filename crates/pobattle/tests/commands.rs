//! Integration tests for outbound command byte layouts.

use pobattle::prelude::*;
use pobattle::protocol::{ChoiceAction, Color};

fn body(command: &Command) -> Vec<u8> {
    command.encode(Profile::current()).unwrap().to_body()
}

fn string(text: &str) -> Vec<u8> {
    let mut out = (text.len() as u32).to_be_bytes().to_vec();
    out.extend_from_slice(text.as_bytes());
    out
}

#[test]
fn test_default_login_layout() {
    let mut expected = vec![1];
    expected.extend([0, 0, 0, 0]); // protocol version
    expected.push(0b0000_1011); // client type + version number + default channel
    expected.extend(string("pobattle"));
    expected.extend([0x02, 0x00]);
    expected.extend(string("Red"));
    expected.push(0b0001_0000); // ids with messages
    expected.extend(string("default"));

    assert_eq!(body(&Command::login(LoginRequest::new("Red"))), expected);
}

#[test]
fn test_login_optional_fields_follow_name() {
    let mut req = LoginRequest::new("Red");
    req.client_type = None;
    req.client_version = None;
    req.ids_with_messages = false;
    req.default_channel = Some("Lobby".into());
    req.color = Some(Color::rgb(0xFF, 0, 0));

    let mut expected = vec![1, 0, 0, 0, 0];
    expected.push(0b0010_1000); // default channel + color
    expected.extend(string("Red"));
    expected.push(0);
    expected.extend(string("Lobby"));
    expected.extend([1, 0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0, 0, 0]);

    assert_eq!(body(&Command::login(req)), expected);
}

#[test]
fn test_battle_choice_layout() {
    let attack = Command::BattleChoice {
        battle: BattleId(4),
        choice: BattleChoice {
            slot: 0,
            action: ChoiceAction::Attack {
                attack_slot: 2,
                target: 1,
            },
        },
    };
    assert_eq!(body(&attack), vec![10, 0, 0, 0, 4, 0, 1, 2, 1]);

    let switch = Command::BattleChoice {
        battle: BattleId(4),
        choice: BattleChoice {
            slot: 1,
            action: ChoiceAction::Switch { poke_slot: 3 },
        },
    };
    assert_eq!(body(&switch), vec![10, 0, 0, 0, 4, 1, 2, 3]);

    let rearrange = Command::BattleChoice {
        battle: BattleId(4),
        choice: BattleChoice {
            slot: 0,
            action: ChoiceAction::Rearrange([5, 4, 3, 2, 1, 0]),
        },
    };
    assert_eq!(
        body(&rearrange),
        vec![10, 0, 0, 0, 4, 0, 3, 5, 4, 3, 2, 1, 0]
    );

    let cancel = Command::BattleChoice {
        battle: BattleId(4),
        choice: BattleChoice {
            slot: 0,
            action: ChoiceAction::Cancel,
        },
    };
    assert_eq!(body(&cancel), vec![10, 0, 0, 0, 4, 0, 0]);
}

#[test]
fn test_chat_commands() {
    let mut expected = vec![20, 0, 0, 0, 5];
    expected.extend(string("gg"));
    assert_eq!(
        body(&Command::SendPM {
            player: PlayerId(5),
            message: "gg".into(),
        }),
        expected
    );

    let mut expected = vec![51, 0, 0, 0, 0];
    expected.extend(string("hi all"));
    assert_eq!(
        body(&Command::ChannelMessage {
            channel: ChannelId(0),
            message: "hi all".into(),
        }),
        expected
    );

    let mut expected = vec![11, 0, 0, 0, 9];
    expected.extend(string("good luck"));
    assert_eq!(
        body(&Command::BattleChat {
            battle: BattleId(9),
            message: "good luck".into(),
        }),
        expected
    );
}

#[test]
fn test_small_commands() {
    assert_eq!(body(&Command::Register), vec![14]);
    assert_eq!(body(&Command::Away { away: true }), vec![21, 1]);
    assert_eq!(
        body(&Command::Kick {
            player: PlayerId(2)
        }),
        vec![15, 0, 0, 0, 2]
    );
    assert_eq!(
        body(&Command::StopSpectating {
            battle: BattleId(8)
        }),
        vec![30, 0, 0, 0, 8]
    );
    assert_eq!(
        body(&Command::BattleFinished {
            battle: BattleId(3),
            result: BattleResult::Close,
        }),
        vec![9, 0, 0, 0, 3, 0, 0, 0, 3]
    );
}

#[test]
fn test_legacy_profile_encodes_utf16() {
    let envelope = Command::JoinChannel { name: "Hi".into() }
        .encode(Profile::legacy())
        .unwrap();
    assert_eq!(envelope.to_body(), vec![46, 0, 0, 0, 4, 0, b'H', 0, b'i']);
    assert_eq!(
        envelope.to_frame(Profile::legacy()).unwrap(),
        vec![0, 9, 46, 0, 0, 0, 4, 0, b'H', 0, b'i']
    );
}

#[test]
fn test_frame_prefix_is_body_length() {
    let frame = Command::Register
        .encode(Profile::current())
        .unwrap()
        .to_frame(Profile::current())
        .unwrap();
    assert_eq!(frame, vec![0, 0, 0, 1, 14]);
}
