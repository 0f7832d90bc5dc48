//! Scenario tests for the action pipeline.

mod common;

use common::*;
use hexball_core::effect::Adjustment;
use hexball_core::engine::state_root;
use hexball_core::state::names;
use hexball_core::trigger::keys;
use hexball_core::{
    Action, AdvantageLevel, AppliedValue, BallState, CardDefinition, CardKind, Condition, Effect,
    EffectError, EngineFault, EventKind, EventTemplate, ExecuteError, FactKey, GameEngine, Param,
    Phase, Position, Provenance, RuleViolation, SourceId, Team, TransitionPhase, Trigger,
    TriggerState, Value, replay,
};

fn wing_step() -> Action {
    Action::MovePlayer {
        player: HOME_WING,
        to: Position::from_offset(5, 2),
    }
}

/// One point for the trigger's owner; makes firings visible on the scoreboard.
fn point() -> Effect {
    Effect::AddScore {
        team: Param::bound(names::OWNER),
        points: Param::Value(1),
    }
}

#[test]
fn start_game_deals_and_tips_off() {
    let catalog = catalog();
    let config = config();
    let engine = GameEngine::new(env(&catalog, &config));
    let (state, _) = started(&engine, 7);

    assert_eq!(state.phase, Phase::Actions);
    assert_eq!(state.active_team, Team::Home);
    assert_eq!(state.ball, BallState::Possessed { holder: HOME_GUARD });
    // opening hand plus the first upkeep draw
    assert_eq!(state.team(Team::Home).deck.hand.len(), 4);
    assert_eq!(state.team(Team::Away).deck.hand.len(), 3);
    assert_eq!(state.events.len(), 1);
    assert_eq!(state.clock.0, 1);
}

#[test]
fn moving_exhausts_and_blocks_a_second_move() {
    let catalog = catalog();
    let config = config();
    let engine = GameEngine::new(env(&catalog, &config));
    let (state, triggers) = started(&engine, 7);

    let (state, triggers) = play(&engine, state, triggers, &[wing_step()]);
    let wing = state.player(HOME_WING).unwrap();
    assert_eq!(wing.position, Some(Position::from_offset(5, 2)));
    assert!(wing.exhausted);

    let again = Action::MovePlayer {
        player: HOME_WING,
        to: Position::from_offset(5, 1),
    };
    let err = engine.apply_action(&state, &triggers, &again).unwrap_err();
    assert_eq!(err.phase(), TransitionPhase::Policy);
    let Some(RuleViolation::Policy { explanations, .. }) = err.violation() else {
        panic!("expected a policy violation, got {err}");
    };
    assert_eq!(explanations[0].key, FactKey::Exhausted);
    assert_eq!(explanations[0].message, "Player is exhausted and cannot act");
}

#[test]
fn out_of_range_and_out_of_turn_moves_are_rejected() {
    let catalog = catalog();
    let config = config();
    let engine = GameEngine::new(env(&catalog, &config));
    let (state, triggers) = started(&engine, 7);

    let far = Action::MovePlayer {
        player: HOME_BIG,
        to: Position::from_offset(11, 5),
    };
    let err = engine.apply_action(&state, &triggers, &far).unwrap_err();
    let Some(RuleViolation::Policy { residual, .. }) = err.violation() else {
        panic!("expected a policy violation, got {err}");
    };
    assert!(residual.conflicts.iter().any(|c| c.key == FactKey::Reachable));

    let away = Action::MovePlayer {
        player: AWAY_WING,
        to: Position::from_offset(7, 2),
    };
    let err = engine.apply_action(&state, &triggers, &away).unwrap_err();
    let Some(RuleViolation::Policy { residual, .. }) = err.violation() else {
        panic!("expected a policy violation, got {err}");
    };
    assert!(residual.conflicts.iter().any(|c| c.key == FactKey::ActiveTeam));
}

#[test]
fn schema_errors_come_first() {
    let catalog = catalog();
    let config = config();
    let engine = GameEngine::new(env(&catalog, &config));
    let (state, triggers) = started(&engine, 7);

    let err = engine
        .apply_action(
            &state,
            &triggers,
            &Action::Shoot {
                player: hexball_core::PlayerId(99),
            },
        )
        .unwrap_err();
    assert!(matches!(err, ExecuteError::Schema(_)));
    assert_eq!(err.phase(), TransitionPhase::Schema);
}

#[test]
fn before_trigger_prevents_the_move() {
    let catalog = catalog();
    let config = config();
    let engine = GameEngine::new(env(&catalog, &config));
    let (state, triggers) = started(&engine, 7);

    let referee = Trigger::new(
        EventKind::MovePlayer,
        Effect::Prevent,
        Provenance::new(SourceId::Named("referee".into()), Team::Away),
    )
    .before();
    let (triggers, _) = triggers.register(referee);

    let transition = engine
        .apply_action(&state, &triggers, &wing_step())
        .unwrap();
    assert!(transition.prevented);
    assert!(transition.event.was_prevented());

    let wing = transition.state.player(HOME_WING).unwrap();
    assert_eq!(wing.position, Some(Position::from_offset(5, 3)));
    assert!(!wing.exhausted);
    assert_eq!(transition.state.events.len(), 2);
    assert_eq!(transition.state.clock, state.clock.next());
}

#[test]
fn runaway_triggers_hit_the_recursion_limit() {
    let catalog = catalog();
    let config = config();
    let engine = GameEngine::new(env(&catalog, &config));
    let (state, triggers) = started(&engine, 7);

    let echo = Trigger::new(
        EventKind::DrawCards,
        Effect::fire(
            EventTemplate::new(EventKind::DrawCards)
                .team(Param::bound(names::EVENT_TEAM))
                .with(keys::COUNT, Value::Int(0)),
        ),
        Provenance::new(SourceId::Named("echo".into()), Team::Home),
    )
    .reentrant();
    let (triggers, _) = triggers.register(echo);

    let draw = Action::DrawCards {
        team: Team::Home,
        count: 1,
    };
    let err = engine.apply_action(&state, &triggers, &draw).unwrap_err();
    let ExecuteError::Fault(fault) = &err else {
        panic!("expected a fault, got {err}");
    };
    assert_eq!(fault.phase, TransitionPhase::Apply);
    assert!(matches!(fault.error, EngineFault::RecursionLimit { .. }));
    // the caller's state is untouched
    assert_eq!(state.team(Team::Home).deck.hand.len(), 4);
}

#[test]
fn non_reentrant_triggers_do_not_loop() {
    let catalog = catalog();
    let config = config();
    let engine = GameEngine::new(env(&catalog, &config));
    let (state, triggers) = started(&engine, 7);

    let bonus_draw = Trigger::new(
        EventKind::DrawCards,
        Effect::fire(
            EventTemplate::new(EventKind::DrawCards)
                .team(Param::bound(names::EVENT_TEAM))
                .with(keys::COUNT, Value::Int(1)),
        ),
        Provenance::new(SourceId::Named("bonus".into()), Team::Home),
    );
    let (triggers, _) = triggers.register(bonus_draw);

    let transition = engine
        .apply_action(
            &state,
            &triggers,
            &Action::DrawCards {
                team: Team::Home,
                count: 1,
            },
        )
        .unwrap();
    // the action's draw plus one bonus draw; the nested draw does not re-trigger
    assert_eq!(transition.state.team(Team::Home).deck.hand.len(), 6);
}

#[test]
fn unrelated_triggers_still_see_nested_events() {
    let catalog = catalog();
    let config = config();
    let engine = GameEngine::new(env(&catalog, &config));
    let (state, triggers) = started(&engine, 7);

    let bonus_draw = Trigger::new(
        EventKind::DrawCards,
        Effect::fire(
            EventTemplate::new(EventKind::DrawCards)
                .team(Param::bound(names::EVENT_TEAM))
                .with(keys::COUNT, Value::Int(1)),
        ),
        Provenance::new(SourceId::Named("bonus".into()), Team::Home),
    );
    let tally = Trigger::new(
        EventKind::DrawCards,
        point(),
        Provenance::new(SourceId::Named("tally".into()), Team::Home),
    );
    let (triggers, _) = triggers.register(bonus_draw);
    let (triggers, _) = triggers.register(tally);

    let (state, _) = play(
        &engine,
        state,
        triggers,
        &[Action::DrawCards {
            team: Team::Home,
            count: 1,
        }],
    );
    // bonus skips its own nested draw; tally counts both draws
    assert_eq!(state.team(Team::Home).deck.hand.len(), 6);
    assert_eq!(state.score.of(Team::Home), 2);
}

#[test]
fn nth_occurrence_fires_on_the_second_discard_only() {
    let catalog = catalog();
    let config = config();
    let engine = GameEngine::new(env(&catalog, &config));
    let (mut state, triggers) = started(&engine, 7);

    let second = Trigger::new(
        EventKind::DiscardCard,
        point(),
        Provenance::new(SourceId::Named("second".into()), Team::Home),
    )
    .with_condition(Condition::NthOccurrenceThisTurn(2));
    let (mut triggers, _) = triggers.register(second);

    let hand: Vec<_> = state.team(Team::Home).deck.hand.iter().map(|c| c.id).collect();
    let mut scores = Vec::new();
    for card in &hand[..3] {
        let transition = engine
            .apply_action(
                &state,
                &triggers,
                &Action::DiscardCard {
                    team: Team::Home,
                    card: *card,
                },
            )
            .unwrap();
        state = transition.state;
        triggers = transition.triggers;
        scores.push(state.score.of(Team::Home));
    }
    assert_eq!(scores, [0, 1, 1]);
}

#[test]
fn once_adjustment_boosts_only_the_next_draw() {
    let catalog = catalog();
    let config = config();
    let engine = GameEngine::new(env(&catalog, &config));
    let (state, triggers) = started(&engine, 7);

    let extra = Trigger::new(
        EventKind::DrawCards,
        Effect::AdjustEvent {
            key: keys::COUNT.into(),
            adjustment: Adjustment::Add(1),
        },
        Provenance::new(SourceId::Named("extra".into()), Team::Home),
    )
    .before()
    .once();
    let (triggers, extra) = triggers.register(extra);
    let draw = Action::DrawCards {
        team: Team::Home,
        count: 1,
    };

    let (state, triggers) = play(&engine, state, triggers, &[draw.clone()]);
    assert_eq!(state.team(Team::Home).deck.hand.len(), 6);
    assert!(!triggers.registry.contains(extra));

    let (state, _) = play(&engine, state, triggers, &[draw]);
    assert_eq!(state.team(Team::Home).deck.hand.len(), 7);
}

#[test]
fn prevented_events_keep_nested_once_triggers_spent() {
    let catalog = catalog();
    let config = config();
    let engine = GameEngine::new(env(&catalog, &config));
    let (state, triggers) = started(&engine, 7);

    // draws for Home, then calls the move back
    let referee = Trigger::new(
        EventKind::MovePlayer,
        Effect::sequence([
            Effect::fire(
                EventTemplate::new(EventKind::DrawCards)
                    .team(Team::Home)
                    .with(keys::COUNT, Value::Int(1)),
            ),
            Effect::Prevent,
        ]),
        Provenance::new(SourceId::Named("referee".into()), Team::Away),
    )
    .before();
    let bonus = Trigger::new(
        EventKind::DrawCards,
        point(),
        Provenance::new(SourceId::Named("bonus".into()), Team::Home),
    )
    .once();
    let (triggers, _) = triggers.register(referee);
    let (triggers, bonus) = triggers.register(bonus);

    let transition = engine
        .apply_action(&state, &triggers, &wing_step())
        .unwrap();
    assert!(transition.prevented);
    assert_eq!(transition.state.team(Team::Home).deck.hand.len(), 4);
    assert_eq!(transition.state.score.of(Team::Home), 0);
    assert!(!transition.triggers.registry.contains(bonus));

    let (state, _) = play(
        &engine,
        transition.state,
        transition.triggers,
        &[Action::DrawCards {
            team: Team::Home,
            count: 1,
        }],
    );
    assert_eq!(state.score.of(Team::Home), 0);
}

#[test]
fn substitutes_take_the_tile_and_the_ball() {
    let catalog = catalog();
    let config = config();
    let engine = GameEngine::new(env(&catalog, &config));
    let (state, triggers) = started(&engine, 7);
    let tile = state.player(HOME_GUARD).unwrap().position;

    let (state, _) = play(
        &engine,
        state,
        triggers,
        &[Action::Substitute {
            out: HOME_GUARD,
            incoming: HOME_BENCH,
        }],
    );
    assert!(!state.player(HOME_GUARD).unwrap().on_court());
    assert_eq!(state.player(HOME_BENCH).unwrap().position, tile);
    assert_eq!(state.ball, BallState::Possessed { holder: HOME_BENCH });
}

#[test]
fn loose_balls_are_picked_up_from_next_door() {
    let catalog = catalog();
    let config = config();
    let engine = GameEngine::new(env(&catalog, &config));
    let (mut state, triggers) = started(&engine, 7);
    let wing = state.player(HOME_WING).unwrap().position.unwrap();
    state.ball = BallState::Loose {
        position: wing.neighbors()[0],
    };

    let (state, _) = play(
        &engine,
        state,
        triggers,
        &[Action::PickUpBall { player: HOME_WING }],
    );
    assert_eq!(state.ball, BallState::Possessed { holder: HOME_WING });
}

#[test]
fn cards_in_play_register_and_drop_their_triggers() {
    let config = config();
    let (mut state, triggers) = started(&GameEngine::new(env(&catalog(), &config)), 7);
    let scouting = give_card(&mut state, Team::Home, SCOUTING);
    let lockdown = give_card(&mut state, Team::Home, LOCKDOWN);
    let whistle = give_card(&mut state, Team::Home, "whistle");

    let catalog = catalog().with(
        CardDefinition::new("whistle", CardKind::Play, 1).with_effect(Effect::sequence([
            Effect::RemoveFromPlay {
                card: scouting.into(),
            },
            Effect::RemoveFromPlay {
                card: lockdown.into(),
            },
        ])),
    );
    let engine = GameEngine::new(env(&catalog, &config));

    let asset = engine
        .apply_action(
            &state,
            &triggers,
            &Action::PlayCard {
                team: Team::Home,
                card: scouting,
                target: None,
            },
        )
        .unwrap();
    assert!(asset.applied.iter().any(|a| a.value
        == AppliedValue::AssetPlayed {
            card: scouting,
            triggers: 2,
        }));
    assert_eq!(asset.state.play_area.len(), 1);
    assert_eq!(asset.triggers.registry.len(), 2);

    let ability = engine
        .apply_action(
            &asset.state,
            &asset.triggers,
            &Action::PlayCard {
                team: Team::Home,
                card: lockdown,
                target: Some(HOME_BIG),
            },
        )
        .unwrap();
    assert!(ability.applied.iter().any(|a| a.value
        == AppliedValue::Attached {
            card: lockdown,
            player: HOME_BIG,
            triggers: 1,
        }));
    assert_eq!(ability.state.player(HOME_BIG).unwrap().attachments.len(), 1);
    assert_eq!(ability.triggers.registry.len(), 3);

    // scouting replaces a discarded card
    let hand = ability.state.team(Team::Home).deck.hand.len();
    let discard = ability.state.team(Team::Home).deck.hand[0].id;
    let discarded = engine
        .apply_action(
            &ability.state,
            &ability.triggers,
            &Action::DiscardCard {
                team: Team::Home,
                card: discard,
            },
        )
        .unwrap();
    assert_eq!(discarded.state.team(Team::Home).deck.hand.len(), hand);

    let cleared = engine
        .apply_action(
            &discarded.state,
            &discarded.triggers,
            &Action::PlayCard {
                team: Team::Home,
                card: whistle,
                target: None,
            },
        )
        .unwrap();
    assert!(cleared.applied.iter().any(|a| a.value
        == AppliedValue::LeftPlay {
            card: scouting,
            triggers: 2,
        }));
    assert!(cleared.applied.iter().any(|a| a.value
        == AppliedValue::LeftPlay {
            card: lockdown,
            triggers: 1,
        }));
    assert!(cleared.triggers.registry.is_empty());
    assert!(cleared.state.play_area.is_empty());
    assert!(cleared.state.player(HOME_BIG).unwrap().attachments.is_empty());
    let discard = &cleared.state.team(Team::Home).deck.discard;
    for card in [scouting, lockdown, whistle] {
        assert!(discard.iter().any(|c| c.id == card));
    }
}

#[test]
fn lockdown_puts_opposing_shots_at_disadvantage() {
    let catalog = catalog();
    let config = config();
    let engine = GameEngine::new(env(&catalog, &config));
    let (mut state, triggers) = started(&engine, 11);
    let lockdown = give_card(&mut state, Team::Home, LOCKDOWN);

    let (mut state, triggers) = play(
        &engine,
        state,
        triggers,
        &[
            Action::PlayCard {
                team: Team::Home,
                card: lockdown,
                target: Some(HOME_BIG),
            },
            Action::EndTurn,
        ],
    );
    state.ball = BallState::Possessed { holder: AWAY_GUARD };

    let shot = engine
        .apply_action(&state, &triggers, &Action::Shoot { player: AWAY_GUARD })
        .unwrap();
    let added = shot
        .applied
        .iter()
        .position(|a| a.value == AppliedValue::AdvantageAdded(AdvantageLevel::Disadvantage))
        .expect("lockdown adds disadvantage");
    let resolved = shot
        .applied
        .iter()
        .position(|a| matches!(a.value, AppliedValue::SkillTestResolved(_)))
        .expect("the shot is resolved");
    assert!(added < resolved);
}

#[test]
fn choices_park_the_game_until_resolved() {
    let catalog = catalog();
    let config = config();
    let engine = GameEngine::new(env(&catalog, &config));
    let (state, triggers) = started(&engine, 7);
    let (mut state, triggers) = play(&engine, state, triggers, &[wing_step()]);
    let huddle = give_card(&mut state, Team::Home, HUDDLE);
    let base = state.clone();

    let transition = engine
        .apply_action(
            &state,
            &triggers,
            &Action::PlayCard {
                team: Team::Home,
                card: huddle,
                target: None,
            },
        )
        .unwrap();
    let pending = transition.state.pending_choice.clone().unwrap();
    assert_eq!(pending.team, Team::Home);
    assert_eq!(pending.options.len(), 3);
    assert_eq!(transition.state.stack.len(), 1);

    let err = engine
        .apply_action(&transition.state, &transition.triggers, &Action::EndTurn)
        .unwrap_err();
    assert!(matches!(
        err.violation(),
        Some(RuleViolation::ChoicePending { .. })
    ));

    // options follow roster order: guard, wing, big
    let resolved = engine
        .apply_action(
            &transition.state,
            &transition.triggers,
            &Action::ResolveChoice {
                choice: pending.id,
                option: 2,
            },
        )
        .unwrap();
    let state = resolved.state;
    assert!(state.pending_choice.is_none());
    assert!(!state.player(HOME_WING).unwrap().exhausted);
    assert!(state.stack.is_empty());
    assert_eq!(
        state.team(Team::Home).deck.discard.last().map(|c| c.id),
        Some(huddle)
    );

    let replayed = replay(
        engine.env(),
        &base,
        &state.events[base.events.len()..],
    )
    .unwrap();
    assert_eq!(replayed, state);
}

#[test]
fn failed_continuation_clears_the_choice() {
    let catalog = catalog();
    let config = config();
    let engine = GameEngine::new(env(&catalog, &config));
    let (state, triggers) = started(&engine, 7);
    let (mut state, triggers) = play(&engine, state, triggers, &[wing_step()]);
    let outlet = give_card(&mut state, Team::Home, OUTLET);
    let base = state.clone();

    let (state, triggers) = play(
        &engine,
        state,
        triggers,
        &[Action::PlayCard {
            team: Team::Home,
            card: outlet,
            target: None,
        }],
    );
    let pending = state.pending_choice.clone().unwrap();
    assert_eq!(state.stack.len(), 1);

    // the sixth man is on the bench, so the hand-off fails
    let resolved = engine
        .apply_action(
            &state,
            &triggers,
            &Action::ResolveChoice {
                choice: pending.id,
                option: 1,
            },
        )
        .unwrap();
    assert!(resolved.event.continuation_failed());
    assert!(resolved.applied.iter().any(|a| matches!(
        &a.value,
        AppliedValue::ContinuationFailed { failure: Some(f), .. }
            if f.error == EffectError::PlayerOffCourt(HOME_BENCH)
    )));

    let state = resolved.state;
    assert!(state.pending_choice.is_none());
    // the refresh ahead of the failing step is undone as well
    assert!(state.player(HOME_WING).unwrap().exhausted);
    assert_eq!(state.ball, BallState::Possessed { holder: HOME_GUARD });
    assert!(state.stack.is_empty());
    assert_eq!(
        state.team(Team::Home).deck.discard.last().map(|c| c.id),
        Some(outlet)
    );

    let (state, _) = play(&engine, state, resolved.triggers, &[Action::EndTurn]);
    assert_eq!(state.active_team, Team::Away);

    let replayed = replay(
        engine.env(),
        &base,
        &state.events[base.events.len()..],
    )
    .unwrap();
    assert_eq!(replayed, state);
}

#[test]
fn resolving_without_a_pending_choice_faults() {
    let catalog = catalog();
    let config = config();
    let engine = GameEngine::new(env(&catalog, &config));
    let (state, triggers) = started(&engine, 7);

    let err = engine
        .apply_action(
            &state,
            &triggers,
            &Action::ResolveChoice {
                choice: hexball_core::ChoiceId(1),
                option: 1,
            },
        )
        .unwrap_err();
    let ExecuteError::Fault(fault) = err else {
        panic!("expected a fault");
    };
    assert_eq!(fault.error, EngineFault::NoPendingChoice);
}

#[test]
fn shots_resolve_into_a_score_or_a_loose_ball() {
    let catalog = catalog();
    let config = config();
    let engine = GameEngine::new(env(&catalog, &config));
    let (state, triggers) = started(&engine, 11);

    let (state, _) = play(
        &engine,
        state,
        triggers,
        &[Action::Shoot { player: HOME_GUARD }],
    );

    assert!(state.player(HOME_GUARD).unwrap().exhausted);
    assert!(state.pending_skill_test.is_none());
    if state.score.of(Team::Home) > 0 {
        assert_eq!(state.ball, BallState::Possessed { holder: AWAY_GUARD });
    } else {
        assert!(state.ball.loose_at().is_some());
    }
    let deck = &state.team(Team::Home).deck;
    assert_eq!(deck.card_count(), 12);
}

#[test]
fn end_turn_hands_over_and_refreshes() {
    let catalog = catalog();
    let config = config();
    let engine = GameEngine::new(env(&catalog, &config));
    let (state, triggers) = started(&engine, 7);

    let (state, _) = play(&engine, state, triggers, &[wing_step(), Action::EndTurn]);
    assert_eq!(state.active_team, Team::Away);
    assert_eq!(state.turn, 2);
    assert_eq!(state.phase, Phase::Actions);
    assert!(!state.player(HOME_WING).unwrap().exhausted);
    assert_eq!(state.team(Team::Away).deck.hand.len(), 4);
}

#[test]
fn replay_matches_live_play_without_triggers() {
    let catalog = catalog();
    let config = config();
    let engine = GameEngine::new(env(&catalog, &config));
    let initial = initial(21);

    let actions = [
        Action::StartGame {
            possession: Team::Home,
        },
        wing_step(),
        Action::Pass {
            player: HOME_GUARD,
            receiver: HOME_BIG,
        },
        Action::EndTurn,
        Action::MovePlayer {
            player: AWAY_WING,
            to: Position::from_offset(7, 2),
        },
        Action::EndTurn,
    ];
    let (live, _) = play(&engine, initial.clone(), TriggerState::new(), &actions);
    assert_eq!(live.events.len(), actions.len());

    let first = replay(engine.env(), &initial, &live.events).unwrap();
    let second = replay(engine.env(), &initial, &live.events).unwrap();
    assert_eq!(first, live);
    assert_eq!(state_root(&first), state_root(&second));
}

#[test]
fn replay_rejects_gaps_in_the_clock() {
    let catalog = catalog();
    let config = config();
    let engine = GameEngine::new(env(&catalog, &config));
    let (state, _) = started(&engine, 3);

    let err = replay(engine.env(), &state, &state.events).unwrap_err();
    assert!(matches!(
        err,
        hexball_core::ReplayError::ClockMismatch { index: 0, .. }
    ));
}
