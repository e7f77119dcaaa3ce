use pobattle_protocol::{
    BattleChoice, BattleConfiguration, BattleDynamicInfo, BattleMove, BattleQuotes, ChallengeDesc,
    ChallengeInfo, ChoiceAction, Color, Cursor, Flags, FullInfo, Generation, PlayerId, PlayerInfo,
    PokeBattle, PokePersonal, PokeUniqueId, Profile, ShallowBattlePoke, Team, TierRating,
    TrainerInfo, TrainerTeam, WireCodec, Writer,
};
use proptest::prelude::*;

fn profile_strategy() -> impl Strategy<Value = Profile> {
    prop_oneof![Just(Profile::current()), Just(Profile::legacy())]
}

fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 éü]{0,12}"
}

fn uid_strategy() -> impl Strategy<Value = PokeUniqueId> {
    (any::<u16>(), any::<u8>()).prop_map(|(pokenum, subnum)| PokeUniqueId { pokenum, subnum })
}

fn color_strategy() -> impl Strategy<Value = Color> {
    (any::<i8>(), any::<[u16; 5]>()).prop_map(|(spec, [alpha, red, green, blue, pad])| Color {
        spec,
        alpha,
        red,
        green,
        blue,
        pad,
    })
}

fn player_strategy() -> impl Strategy<Value = PlayerInfo> {
    (
        any::<i32>(),
        any::<bool>(),
        any::<bool>(),
        text(),
        color_strategy(),
        any::<u16>(),
        text(),
        any::<i8>(),
        prop::collection::vec((text(), any::<i16>()), 0..4),
    )
        .prop_map(
            |(id, away, has_ladder, name, color, avatar, info, auth, ratings)| PlayerInfo {
                id: PlayerId(id),
                away,
                has_ladder,
                name,
                color,
                avatar,
                info,
                auth,
                ratings: ratings
                    .into_iter()
                    .map(|(tier, rating)| TierRating { tier, rating })
                    .collect(),
            },
        )
}

/// Fields a generation doesn't carry stay zero, since they can't survive
/// the trip.
fn poke_strategy() -> impl Strategy<Value = PokePersonal> {
    (
        1u8..=5,
        uid_strategy(),
        any::<u8>(),
        any::<bool>(),
        text(),
        any::<(u16, u16, u16, u8, u8, u8, u8)>(),
        any::<[u32; 4]>(),
        any::<[u8; 6]>(),
        any::<[u8; 6]>(),
    )
        .prop_map(
            |(generation, uid, level, shiny, nickname, extras, moves, evs, ivs)| {
                let generation = Generation(generation);
                let (ball, item, ability, nature, gender, happiness, pp_ups) = extras;
                let items = generation.has_items();
                let abilities = generation.has_abilities();
                PokePersonal {
                    generation,
                    uid,
                    level,
                    shiny,
                    nickname,
                    ball,
                    item: if items { item } else { 0 },
                    ability: if abilities { ability } else { 0 },
                    nature: if abilities { nature } else { 0 },
                    gender: if items { gender } else { 0 },
                    happiness: if items { happiness } else { 0 },
                    pp_ups,
                    moves,
                    evs,
                    ivs,
                }
            },
        )
}

fn poke_battle_strategy() -> impl Strategy<Value = PokeBattle> {
    (
        uid_strategy(),
        any::<bool>(),
        text(),
        any::<(u16, u16, u8, u8, u16, u16, u8)>(),
        any::<[u16; 5]>(),
        any::<[(u16, u8, u8); 4]>(),
        any::<[u8; 6]>(),
        any::<[u8; 6]>(),
    )
        .prop_map(|(uid, shiny, nick, core, stats, moves, evs, dvs)| {
            let (total_life, life, gender, level, item, ability, happiness) = core;
            PokeBattle {
                uid,
                shiny,
                nick,
                total_life,
                life,
                gender,
                level,
                item,
                ability,
                happiness,
                stats,
                moves: moves.map(|(num, pp, total_pp)| BattleMove { num, pp, total_pp }),
                evs,
                dvs,
            }
        })
}

fn team_strategy() -> impl Strategy<Value = Team> {
    (
        prop::option::of(text()),
        1u8..=5,
        prop::collection::vec(poke_strategy(), 0..=6),
    )
        .prop_map(|(default_tier, generation, pokes)| Team {
            default_tier,
            generation: Generation(generation),
            pokes,
        })
}

fn trainer_strategy() -> impl Strategy<Value = TrainerInfo> {
    let quotes = prop::option::of((text(), text(), text()).prop_map(|(lose, win, tie)| {
        BattleQuotes { lose, win, tie }
    }));
    (any::<u16>(), text(), quotes).prop_map(|(avatar, info, quotes)| TrainerInfo {
        avatar,
        info,
        quotes,
    })
}

fn full_info_strategy() -> impl Strategy<Value = FullInfo> {
    (
        (text(), text(), text(), text(), any::<u16>(), text()),
        team_strategy(),
        any::<bool>(),
        any::<bool>(),
        color_strategy(),
    )
        .prop_map(|(profile, team, ladder, show_team, name_color)| {
            let (nick, info, lose, win, avatar, default_tier) = profile;
            FullInfo {
                team: TrainerTeam {
                    nick,
                    info,
                    lose,
                    win,
                    avatar,
                    default_tier,
                    team,
                },
                ladder,
                show_team,
                name_color,
            }
        })
}

fn shallow_poke_strategy() -> impl Strategy<Value = ShallowBattlePoke> {
    (
        uid_strategy(),
        text(),
        any::<(u8, u32, u8, bool, u8)>(),
    )
        .prop_map(|(uid, nick, (life_percent, full_status, gender, shiny, level))| {
            ShallowBattlePoke {
                uid,
                nick,
                life_percent,
                full_status,
                gender,
                shiny,
                level,
            }
        })
}

fn choice_strategy() -> impl Strategy<Value = BattleChoice> {
    let action = prop_oneof![
        Just(ChoiceAction::Cancel),
        (any::<i8>(), any::<i8>()).prop_map(|(attack_slot, target)| ChoiceAction::Attack {
            attack_slot,
            target
        }),
        any::<i8>().prop_map(|poke_slot| ChoiceAction::Switch { poke_slot }),
        any::<[i8; 6]>().prop_map(ChoiceAction::Rearrange),
    ];
    (any::<u8>(), action).prop_map(|(slot, action)| BattleChoice { slot, action })
}

fn round_trip<T: WireCodec + PartialEq + std::fmt::Debug>(value: &T, profile: Profile) {
    let bytes = value.to_bytes(profile).unwrap();
    let mut cursor = Cursor::new(&bytes, profile);
    let back = T::decode(&mut cursor).unwrap();
    assert_eq!(&back, value);
    assert!(cursor.is_empty());
    assert!(cursor.diagnostics().is_empty());
}

proptest! {
    #[test]
    fn prop_player_info_round_trip(player in player_strategy(), profile in profile_strategy()) {
        round_trip(&player, profile);
    }

    #[test]
    fn prop_poke_personal_round_trip(poke in poke_strategy(), profile in profile_strategy()) {
        round_trip(&poke, profile);
    }

    #[test]
    fn prop_team_round_trip(team in team_strategy()) {
        round_trip(&team, Profile::current());
    }

    #[test]
    fn prop_trainer_info_round_trip(trainer in trainer_strategy(), profile in profile_strategy()) {
        round_trip(&trainer, profile);
    }

    #[test]
    fn prop_full_info_round_trip(info in full_info_strategy()) {
        round_trip(&info, Profile::current());
    }

    #[test]
    fn prop_shallow_battle_poke_round_trip(
        poke in shallow_poke_strategy(),
        profile in profile_strategy(),
    ) {
        round_trip(&poke, profile);
    }

    #[test]
    fn prop_dynamic_info_round_trip(boosts in any::<[i8; 7]>(), flags in any::<u8>()) {
        round_trip(&BattleDynamicInfo { boosts, flags }, Profile::current());
    }

    #[test]
    fn prop_color_round_trip(color in color_strategy()) {
        round_trip(&color, Profile::current());
    }

    #[test]
    fn prop_poke_battle_round_trip(poke in poke_battle_strategy()) {
        round_trip(&poke, Profile::current());
    }

    #[test]
    fn prop_configuration_round_trip(
        rated in any::<bool>(),
        generation in any::<u8>(),
        mode in any::<u8>(),
        clauses in any::<u32>(),
        players in prop::collection::vec(any::<i32>(), 0..8),
    ) {
        let conf = BattleConfiguration {
            rated,
            generation: Generation(generation),
            mode,
            clauses,
            players: players.into_iter().map(PlayerId).collect(),
        };
        round_trip(&conf, Profile::current());
    }

    #[test]
    fn prop_challenge_round_trip(
        desc in any::<i8>(),
        player in any::<i32>(),
        clauses in any::<u32>(),
        mode in any::<u8>(),
        team in any::<u8>(),
        generation in any::<u8>(),
        src_tier in text(),
        dest_tier in text(),
    ) {
        let challenge = ChallengeInfo {
            desc: ChallengeDesc::from_code(desc),
            player: PlayerId(player),
            clauses,
            mode,
            team,
            generation: Generation(generation),
            src_tier,
            dest_tier,
        };
        round_trip(&challenge, Profile::legacy());
    }

    #[test]
    fn prop_battle_choice_round_trip(choice in choice_strategy()) {
        round_trip(&choice, Profile::current());
    }

    /// Any well-formed flag sequence decodes and re-encodes to itself.
    #[test]
    fn prop_flag_sequence_round_trip(
        lead in 0x81u8..=0xFF,
        middle in prop::collection::vec(0x80u8..=0xFF, 0..5),
        last in 0u8..0x80,
        single in any::<bool>(),
    ) {
        let mut bytes = Vec::new();
        if !single {
            bytes.push(lead);
            bytes.extend(middle);
        }
        bytes.push(last);
        // A single byte sequence may start with zero; longer ones never do.
        let mut cursor = Cursor::new(&bytes, Profile::current());
        let flags = cursor.read_flags().unwrap();
        prop_assert!(cursor.is_empty());

        let mut writer = Writer::new(Profile::current());
        flags.encode(&mut writer).unwrap();
        prop_assert_eq!(writer.into_bytes(), bytes);
    }

    /// Decoding garbage fails cleanly instead of panicking.
    #[test]
    fn prop_garbage_never_panics(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let profile = Profile::current();
        let _ = PlayerInfo::from_bytes(&data, profile);
        let _ = Team::from_bytes(&data, profile);
        let _ = PokeBattle::from_bytes(&data, profile);
        let _ = BattleConfiguration::from_bytes(&data, profile);
        let _ = Flags::decode(&mut Cursor::new(&data, profile));
    }
}
