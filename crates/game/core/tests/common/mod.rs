//! Shared fixture: a standard court, a small catalog and started games.
#![allow(dead_code)]

use hexball_core::effect::ChoiceOptions;
use hexball_core::state::names;
use hexball_core::trigger::Relation;
use hexball_core::{
    Action, AdvantageLevel, AdvantageSource, CardDefinition, CardInstance, CardKind, CardRef,
    ChoiceOption, Condition, Continuation, Effect, EventKind, GameConfig, GameEngine, GameEnv,
    GameState, InMemoryCatalog, InitialLayout, InstanceId, Param, PlayerId, Team, Timing,
    TriggerSpec, TriggerState,
};

pub const HUDDLE: &str = "huddle";
pub const OUTLET: &str = "outlet";
pub const LOCKDOWN: &str = "lockdown";
pub const SCOUTING: &str = "scouting";

/// Fate cards `fate-1` to `fate-6`, player cards for the standard layout and
/// a few cards that exercise choices and triggers:
///
/// - `huddle`: refresh a chosen on-court teammate
/// - `outlet`: refresh the wing, then hand the ball to the benched sixth man
/// - `lockdown`: an ability that puts opposing skill tests at disadvantage
/// - `scouting`: an asset that draws a card whenever its owner discards
pub fn catalog() -> InMemoryCatalog {
    let mut catalog: InMemoryCatalog = (1..=6)
        .map(|n| CardDefinition::new(format!("fate-{n}").as_str(), CardKind::Play, n))
        .collect();

    for team in ["home", "away"] {
        for slot in ["starter-1", "starter-2", "starter-3", "sixth-man"] {
            let slug = format!("{team}-{slot}");
            catalog.insert(CardDefinition::new(slug.as_str(), CardKind::Player, 0));
        }
    }

    catalog.insert(
        CardDefinition::new(HUDDLE, CardKind::Play, 3).with_effect(Effect::OfferChoice {
            kind: "pick-teammate".into(),
            team: Param::bound(names::OWNER),
            options: ChoiceOptions::OnCourt {
                team: Param::bound(names::OWNER),
            },
            continuation: Some(Continuation::Single(Box::new(Effect::RefreshPlayer {
                player: Param::bound(names::CHOICE_SELECTED),
            }))),
        }),
    );

    catalog.insert(
        CardDefinition::new(OUTLET, CardKind::Play, 2).with_effect(Effect::OfferChoice {
            kind: "outlet".into(),
            team: Param::bound(names::OWNER),
            options: ChoiceOptions::Fixed(vec![ChoiceOption::new(1, "sixth man", HOME_BENCH)]),
            continuation: Some(Continuation::Sequence(vec![
                Effect::RefreshPlayer {
                    player: HOME_WING.into(),
                },
                Effect::give_ball(Param::bound(names::CHOICE_SELECTED)),
            ])),
        }),
    );

    catalog.insert(
        CardDefinition::new(LOCKDOWN, CardKind::Ability, 3)
            .targeted()
            .with_trigger(TriggerSpec {
                events: vec![EventKind::SkillTestStarted],
                timing: Timing::After,
                condition: Some(Condition::All(vec![
                    Condition::EventTeam(Relation::Opponent),
                    Condition::SelfOnCourt,
                ])),
                priority: 0,
                once: false,
                effect: Effect::AddAdvantage(AdvantageSource::new(
                    LOCKDOWN,
                    AdvantageLevel::Disadvantage,
                )),
            }),
    );

    catalog.insert(
        CardDefinition::new(SCOUTING, CardKind::Asset, 2)
            .with_trigger(TriggerSpec {
                events: vec![EventKind::DiscardCard],
                timing: Timing::After,
                condition: Some(Condition::EventTeam(Relation::Own)),
                priority: 0,
                once: false,
                effect: Effect::draw(Param::bound(names::OWNER), 1),
            })
            .with_trigger(TriggerSpec {
                events: vec![EventKind::Score],
                timing: Timing::After,
                condition: None,
                priority: 0,
                once: false,
                effect: Effect::draw(Param::bound(names::OWNER), 1),
            }),
    );
    catalog
}

pub fn config() -> GameConfig {
    GameConfig::default().with_hand_size(3)
}

fn deck() -> Vec<CardRef> {
    (0..12)
        .map(|i| CardRef::new(format!("fate-{}", i % 6 + 1)))
        .collect()
}

pub fn initial(seed: u64) -> GameState {
    let layout = InitialLayout::standard(deck(), deck());
    GameState::initial(&layout, &config(), seed).unwrap()
}

/// Runs `actions` in order, panicking on the first rejection.
pub fn play(
    engine: &GameEngine<'_>,
    state: GameState,
    triggers: TriggerState,
    actions: &[Action],
) -> (GameState, TriggerState) {
    actions.iter().fold((state, triggers), |(state, triggers), action| {
        let transition = engine
            .apply_action(&state, &triggers, action)
            .unwrap_or_else(|e| panic!("{action:?} rejected: {e}"));
        (transition.state, transition.triggers)
    })
}

/// Routes engine logs to the test writer; `RUST_LOG=hexball=debug` shows them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A game after `StartGame` with Home in possession.
pub fn started(engine: &GameEngine<'_>, seed: u64) -> (GameState, TriggerState) {
    init_tracing();
    play(
        engine,
        initial(seed),
        TriggerState::new(),
        &[Action::StartGame {
            possession: Team::Home,
        }],
    )
}

/// Puts a fresh instance of `card` into `team`'s hand.
pub fn give_card(state: &mut GameState, team: Team, card: &str) -> InstanceId {
    let id = state.allocate_instance_id();
    state.team_mut(team).deck.hand.push(CardInstance::new(id, card));
    id
}

pub fn env<'a>(catalog: &'a InMemoryCatalog, config: &'a GameConfig) -> GameEnv<'a> {
    GameEnv::new(catalog, config)
}

/// Standard layout ids: Home starters 1-3, sixth man 4; Away starters 5-7, sixth man 8.
pub const HOME_GUARD: PlayerId = PlayerId(1);
pub const HOME_WING: PlayerId = PlayerId(2);
pub const HOME_BIG: PlayerId = PlayerId(3);
pub const HOME_BENCH: PlayerId = PlayerId(4);
pub const AWAY_GUARD: PlayerId = PlayerId(5);
pub const AWAY_WING: PlayerId = PlayerId(6);
