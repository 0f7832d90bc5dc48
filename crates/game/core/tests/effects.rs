//! Effects applied directly, outside the action pipeline.

mod common;

use common::*;
use hexball_core::effect::{ChoiceOptions, apply_effect};
use hexball_core::state::names;
use hexball_core::{
    ApplyOptions, BallState, Bindings, ChoiceId, ChoiceOption, Continuation, Effect, EffectError,
    GameEngine, Param, Team,
};

#[test]
fn failing_child_stops_a_sequence_and_keeps_earlier_children() {
    let catalog = catalog();
    let config = config();
    let engine = GameEngine::new(env(&catalog, &config));
    let (state, triggers) = started(&engine, 7);

    let effect = Effect::sequence([
        Effect::draw(Team::Home, 1),
        Effect::give_ball(HOME_BENCH),
        Effect::draw(Team::Home, 1),
    ]);
    let outcome = apply_effect(
        engine.env(),
        &state,
        &triggers,
        &effect,
        &Bindings::new(),
        ApplyOptions::live(),
    )
    .unwrap();

    let failure = outcome.first_failure().unwrap();
    assert_eq!(failure.effect, "give-ball");
    assert_eq!(failure.error, EffectError::PlayerOffCourt(HOME_BENCH));
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.state.team(Team::Home).deck.hand.len(), 5);
    assert_eq!(outcome.state.ball, BallState::Possessed { holder: HOME_GUARD });
    // the log is carried through untouched
    assert_eq!(outcome.state.events, state.events);
    assert_eq!(outcome.state.clock, state.clock);
}

#[test]
fn choice_round_trip_matches_a_direct_apply() {
    let catalog = catalog();
    let config = config();
    let engine = GameEngine::new(env(&catalog, &config));
    let (state, triggers) = started(&engine, 7);

    let offer = Effect::OfferChoice {
        kind: "rest".into(),
        team: Team::Home.into(),
        options: ChoiceOptions::Fixed(vec![
            ChoiceOption::new(1, "wing", HOME_WING),
            ChoiceOption::new(2, "big", HOME_BIG),
        ]),
        continuation: Some(Continuation::Single(Box::new(Effect::exhaust(
            Param::bound(names::CHOICE_SELECTED),
        )))),
    };
    let offered = apply_effect(
        engine.env(),
        &state,
        &triggers,
        &offer,
        &Bindings::new(),
        ApplyOptions::live(),
    )
    .unwrap();
    let pending = offered.state.pending_choice.clone().unwrap();
    assert_eq!(pending.id, ChoiceId(state.clock.0));

    let resolve = Effect::sequence([
        Effect::SubmitChoice {
            choice: Some(pending.id),
            option: Param::Value(2),
        },
        Effect::ExecuteChoiceContinuation,
    ]);
    let resolved = apply_effect(
        engine.env(),
        &offered.state,
        &offered.triggers,
        &resolve,
        &Bindings::new(),
        ApplyOptions::live(),
    )
    .unwrap();
    assert!(resolved.is_success());

    let direct = apply_effect(
        engine.env(),
        &state,
        &triggers,
        &Effect::scoped(
            Bindings::new().with(names::CHOICE_SELECTED, HOME_BIG),
            Effect::exhaust(Param::bound(names::CHOICE_SELECTED)),
        ),
        &Bindings::new(),
        ApplyOptions::live(),
    )
    .unwrap();
    assert!(resolved.state.player(HOME_BIG).unwrap().exhausted);
    assert_eq!(resolved.state, direct.state);
    assert_eq!(resolved.triggers, direct.triggers);
}
