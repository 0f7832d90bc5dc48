//! Built-in default rules, one per event kind.
//!
//! The catchall runs after every before-trigger and performs the event's
//! terminal state change. It is also the only thing replay runs.

use crate::effect::{EffectError, Effect, EventTemplate, FromValue, Param, TestSpec};
use crate::env::{CardKind, GameEnv};
use crate::state::{
    Bindings, FlightKind, GameState, InstanceId, Phase, PlayerId, Position, Stat, Team, Value,
    names,
};

use super::{Condition, EventKind, RequestEvent, keys};

fn team_of(event: &RequestEvent) -> Result<Team, EffectError> {
    event.team.ok_or_else(|| EffectError::UnboundParameter {
        name: names::EVENT_TEAM.into(),
    })
}

fn player_of(event: &RequestEvent) -> Result<PlayerId, EffectError> {
    event.player.ok_or_else(|| EffectError::UnboundParameter {
        name: names::EVENT_PLAYER.into(),
    })
}

fn field<T: FromValue + Clone>(event: &RequestEvent, key: &str) -> Result<T, EffectError> {
    Param::<T>::bound(key).resolve(&event.payload)
}

fn optional<T: FromValue + Clone>(event: &RequestEvent, key: &str) -> Result<Option<T>, EffectError> {
    if event.payload.contains(key) {
        field(event, key).map(Some)
    } else {
        Ok(None)
    }
}

fn position_of(state: &GameState, player: PlayerId) -> Result<Position, EffectError> {
    state
        .player(player)
        .ok_or(EffectError::UnknownPlayer(player))?
        .position
        .ok_or(EffectError::PlayerOffCourt(player))
}

fn fire(kind: EventKind, team: Team) -> Effect {
    Effect::fire(EventTemplate::new(kind).team(team))
}

fn fire_draw(team: Team, count: u32) -> Effect {
    Effect::fire(
        EventTemplate::new(EventKind::DrawCards)
            .team(team)
            .with(keys::COUNT, Value::Int(i64::from(count))),
    )
}

fn fire_exhaust(team: Team, player: PlayerId) -> Effect {
    Effect::fire(EventTemplate::new(EventKind::ExhaustPlayer).team(team).player(player))
}

/// Gives the ball to the first on-court player of `team`, or drops it at
/// centre court if nobody is on court.
fn inbound(state: &GameState, team: Team) -> Effect {
    match state.on_court(team).next() {
        Some(player) => Effect::give_ball(player.id),
        None => Effect::LooseBall {
            at: Position::from_offset(state.board.width() / 2, state.board.height() / 2).into(),
        },
    }
}

/// The default rule for `event`.
///
/// # Errors
///
/// Missing or mistyped event fields, and card lookups that fail.
pub(crate) fn default_effect(
    env: GameEnv<'_>,
    state: &GameState,
    event: &RequestEvent,
) -> Result<Effect, EffectError> {
    let config = env.config();
    let effect = match event.kind {
        EventKind::GameStart => {
            let team = team_of(event)?;
            Effect::sequence([
                Effect::SetPhase(Phase::TipOff),
                Effect::ShuffleDeck {
                    team: Team::Home.into(),
                },
                Effect::ShuffleDeck {
                    team: Team::Away.into(),
                },
                fire_draw(Team::Home, config.hand_size),
                fire_draw(Team::Away, config.hand_size),
                inbound(state, team),
                Effect::SetActiveTeam { team: team.into() },
                fire(EventKind::TurnStart, team),
            ])
        }

        EventKind::TurnStart => {
            let team = team_of(event)?;
            Effect::sequence([
                Effect::SetPhase(Phase::Upkeep),
                fire_draw(team, config.upkeep_draw),
                Effect::SetPhase(Phase::Actions),
            ])
        }

        EventKind::TurnEnd => {
            let team = team_of(event)?;
            Effect::sequence([
                Effect::SetPhase(Phase::EndOfTurn),
                Effect::ExpireModifiers(crate::state::Expiry::EndOfTurn),
                Effect::RefreshTeam { team: team.into() },
                Effect::AdvanceTurn,
                Effect::when(
                    Condition::Not(Box::new(Condition::PhaseIs(Phase::GameOver))),
                    fire(EventKind::TurnStart, team.opponent()),
                ),
            ])
        }

        EventKind::DrawCards => Effect::DrawCards {
            team: team_of(event)?.into(),
            count: optional::<i64>(event, keys::COUNT)?.unwrap_or(1).into(),
        },

        EventKind::DiscardCard => Effect::DiscardCard {
            team: team_of(event)?.into(),
            card: field::<InstanceId>(event, keys::CARD)?.into(),
        },

        EventKind::MovePlayer => {
            let player = player_of(event)?;
            let to: Position = field(event, keys::TO)?;
            let mut steps = vec![Effect::move_player(player, to)];
            if optional::<bool>(event, keys::EXHAUSTS)?.unwrap_or(false) {
                steps.push(fire_exhaust(team_of(event)?, player));
            }
            Effect::sequence(steps)
        }

        EventKind::PickUpBall => Effect::give_ball(player_of(event)?),

        EventKind::Pass => {
            let passer = player_of(event)?;
            let team = team_of(event)?;
            let receiver: PlayerId = field(event, keys::RECEIVER)?;
            let from = position_of(state, passer)?;
            let to = position_of(state, receiver)?;
            ball_test(
                team,
                passer,
                from,
                to,
                FlightKind::Pass,
                Stat::Passing,
                TestSpec::Pass {
                    receiver: receiver.into(),
                },
            )
        }

        EventKind::Shoot => {
            let shooter = player_of(event)?;
            let team = team_of(event)?;
            let from = position_of(state, shooter)?;
            let hoop = state.board.scoring_hoop(team);
            ball_test(team, shooter, from, hoop, FlightKind::Shot, Stat::Shooting, TestSpec::Shot)
        }

        // reactions only: triggers add bonuses and advantage to the open test
        EventKind::SkillTestStarted => Effect::Noop,

        EventKind::SkillTestResolved => resolve_ball(env, state, event)?,

        EventKind::Score => {
            let team = team_of(event)?;
            let points: i64 = field(event, keys::POINTS)?;
            Effect::sequence([
                Effect::AddScore {
                    team: team.into(),
                    points: points.into(),
                },
                inbound(state, team.opponent()),
            ])
        }

        EventKind::PlayCard => play_card(env, state, event)?,

        EventKind::Substitute => {
            let out = player_of(event)?;
            let incoming: PlayerId = field(event, keys::INCOMING)?;
            let at = position_of(state, out)?;
            let mut steps = vec![
                Effect::RemoveFromCourt { player: out.into() },
                Effect::PlacePlayer {
                    player: incoming.into(),
                    at: at.into(),
                },
            ];
            if state.ball.holder() == Some(out) {
                steps.push(Effect::give_ball(incoming));
            }
            Effect::sequence(steps)
        }

        EventKind::ExhaustPlayer => Effect::exhaust(player_of(event)?),
    };
    Ok(effect)
}

/// Launch, exhaust the actor, open the test, let triggers react, resolve.
fn ball_test(
    team: Team,
    actor: PlayerId,
    from: Position,
    to: Position,
    flight: FlightKind,
    stat: Stat,
    test: TestSpec,
) -> Effect {
    Effect::sequence([
        Effect::LaunchBall {
            from: from.into(),
            to: to.into(),
            kind: flight,
        },
        fire_exhaust(team, actor),
        Effect::InitiateSkillTest {
            actor: actor.into(),
            stat,
            test,
        },
        Effect::fire(
            EventTemplate::new(EventKind::SkillTestStarted)
                .team(team)
                .player(actor),
        ),
        Effect::ResolveSkillTest,
    ])
}

/// Where the ball ends up after a shot or pass test.
fn resolve_ball(
    env: GameEnv<'_>,
    state: &GameState,
    event: &RequestEvent,
) -> Result<Effect, EffectError> {
    let team = team_of(event)?;
    let actor = player_of(event)?;
    let success = optional::<bool>(event, keys::SUCCESS)?.unwrap_or(false);
    let kind = optional::<Value>(event, keys::TEST_KIND)?;
    let kind = match &kind {
        Some(Value::Text(kind)) => kind.as_str(),
        _ => "generic",
    };

    let effect = match kind {
        "shot" if success => {
            let distance = optional::<i64>(event, keys::DISTANCE)?.unwrap_or(0);
            let points = if distance >= i64::from(env.config().three_point_distance) {
                3
            } else {
                2
            };
            Effect::fire(
                EventTemplate::new(EventKind::Score)
                    .team(team)
                    .player(actor)
                    .with(keys::POINTS, Value::Int(points)),
            )
        }
        "shot" => {
            let hoop = state.board.scoring_hoop(team);
            let at = match state.board.rebound_tile(hoop) {
                Some(tile) => tile,
                None => position_of(state, actor)?,
            };
            Effect::LooseBall { at: at.into() }
        }
        "pass" => {
            let receiver: PlayerId = field(event, keys::RECEIVER)?;
            if success {
                Effect::give_ball(receiver)
            } else {
                let from = position_of(state, actor)?;
                let to = position_of(state, receiver)?;
                let passer = state.player(actor).ok_or(EffectError::UnknownPlayer(actor))?;
                match crate::rules::zoc::pass_interceptors(state, passer, from, to).first() {
                    Some(interceptor) => Effect::give_ball(*interceptor),
                    None => {
                        let lane = from.line_to(to);
                        let short = lane.len().checked_sub(2).and_then(|i| lane.get(i));
                        Effect::LooseBall {
                            at: short.copied().unwrap_or(to).into(),
                        }
                    }
                }
            }
        }
        _ => Effect::Noop,
    };
    Ok(effect)
}

/// Routes a card from hand by its catalog kind.
fn play_card(
    env: GameEnv<'_>,
    state: &GameState,
    event: &RequestEvent,
) -> Result<Effect, EffectError> {
    let team = team_of(event)?;
    let card: InstanceId = field(event, keys::CARD)?;
    let target = optional::<PlayerId>(event, keys::TARGET)?;
    let instance = state
        .team(team)
        .deck
        .in_hand(card)
        .ok_or(EffectError::CardNotFound {
            team,
            card,
            pile: "hand",
        })?;
    let definition = env.card(&instance.card)?;
    definition.validate()?;
    if definition.requires_target && target.is_none() {
        return Err(EffectError::TargetRequired(definition.slug.clone()));
    }

    let effect = match definition.kind {
        CardKind::Play => {
            let mut bindings = Bindings::new()
                .with(names::OWNER, team)
                .with(names::CARD, card);
            if let Some(target) = target {
                bindings.insert(names::TARGET, target);
                bindings.insert(names::SELF, target);
            }
            Effect::scoped(
                bindings,
                Effect::sequence([
                    Effect::PushStack {
                        team: team.into(),
                        card: card.into(),
                        target: target.map(Param::Value),
                    },
                    definition.effect.clone().unwrap_or(Effect::Noop),
                    Effect::ResolveStackTop,
                ]),
            )
        }
        CardKind::Ability => {
            let player = target.ok_or_else(|| EffectError::TargetRequired(definition.slug.clone()))?;
            Effect::AttachCard {
                team: team.into(),
                card: card.into(),
                player: player.into(),
            }
        }
        CardKind::Asset => Effect::PlayAsset {
            team: team.into(),
            card: card.into(),
        },
        CardKind::Player => return Err(EffectError::NotPlayable(definition.slug.clone())),
    };
    Ok(effect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::config::GameConfig;
    use crate::env::InMemoryCatalog;

    #[test]
    fn draw_defaults_to_one_card() {
        let catalog = InMemoryCatalog::new();
        let config = GameConfig::default();
        let env = GameEnv::new(&catalog, &config);
        let state = GameState::empty(Board::court(7, 5), 1);
        let event = RequestEvent::new(EventKind::DrawCards).for_team(Team::Away);

        assert_eq!(
            default_effect(env, &state, &event),
            Ok(Effect::DrawCards {
                team: Team::Away.into(),
                count: 1i64.into(),
            })
        );
    }

    #[test]
    fn missing_event_fields_are_reported() {
        let catalog = InMemoryCatalog::new();
        let config = GameConfig::default();
        let env = GameEnv::new(&catalog, &config);
        let state = GameState::empty(Board::court(7, 5), 1);
        let event = RequestEvent::new(EventKind::MovePlayer).by_player(PlayerId(1));

        assert_eq!(
            default_effect(env, &state, &event),
            Err(EffectError::UnboundParameter {
                name: keys::TO.into()
            })
        );
    }
}
