//! Opening, adjusting and resolving skill tests.

use tracing::debug;

use crate::effect::{AppliedValue, Effect, EffectError, Executor, Flow, TestSpec};
use crate::error::EngineFault;
use crate::rules::skill::{self, SkillTestResult};
use crate::rules::stats::{difficulty, effective_stat};
use crate::state::{
    AdvantageSource, Bindings, Bonus, PendingSkillTest, PlayerId, SkillTestKind, Stat, Value,
};
use crate::trigger::{EventKind, RequestEvent, keys};

impl Executor<'_> {
    pub(super) fn initiate_skill_test(
        &mut self,
        actor: PlayerId,
        stat: Stat,
        test: &TestSpec,
        bindings: &Bindings,
    ) -> Result<AppliedValue, EffectError> {
        if let Some(open) = &self.state.pending_skill_test {
            return Err(EffectError::SkillTestOpen(open.id));
        }
        let player = self.player_ref(actor)?;
        let from = player.position.ok_or(EffectError::PlayerOffCourt(actor))?;
        let team = player.team;

        let (kind, target) = match test {
            TestSpec::Shot => (SkillTestKind::Shot, Some(self.state.board.scoring_hoop(team))),
            TestSpec::Pass { receiver } => {
                let receiver = receiver.resolve(bindings)?;
                let invalid = EffectError::InvalidReceiver {
                    passer: actor,
                    receiver,
                };
                let target = self
                    .state
                    .player(receiver)
                    .filter(|r| r.team == team && r.id != actor)
                    .and_then(|r| r.position)
                    .ok_or(invalid)?;
                (SkillTestKind::Pass { receiver }, Some(target))
            }
            TestSpec::Generic => (SkillTestKind::Generic, None),
        };

        let advantage =
            skill::contextual_advantage(&self.state, self.env.config(), player, kind, target);
        let id = self.state.allocate_test_id();
        debug!(
            target: "hexball::skill",
            test = id,
            %actor,
            %stat,
            %kind,
            %from,
            sources = advantage.len(),
            "skill test opened"
        );
        self.state.pending_skill_test = Some(PendingSkillTest {
            id,
            actor,
            team,
            stat,
            kind,
            target,
            bonuses: Vec::new(),
            advantage,
        });
        Ok(AppliedValue::SkillTestOpened(id))
    }

    pub(super) fn add_skill_bonus(&mut self, bonus: Bonus) -> Result<AppliedValue, EffectError> {
        let test = self
            .state
            .pending_skill_test
            .as_mut()
            .ok_or(EffectError::NoSkillTest)?;
        test.bonuses.push(bonus);
        Ok(AppliedValue::SkillBonusAdded)
    }

    pub(super) fn add_advantage(
        &mut self,
        source: AdvantageSource,
    ) -> Result<AppliedValue, EffectError> {
        let test = self
            .state
            .pending_skill_test
            .as_mut()
            .ok_or(EffectError::NoSkillTest)?;
        let level = source.level;
        test.advantage.push(source);
        Ok(AppliedValue::AdvantageAdded(level))
    }

    /// Reveals fate cards, closes the test and fires `SkillTestResolved`.
    pub(crate) fn resolve_skill_test(&mut self) -> Result<Flow, EngineFault> {
        let checkpoint = self.checkpoint();
        match self.settle_skill_test() {
            Ok(event) => {
                let flow = self.fire(event)?;
                if flow == Flow::Halt {
                    self.restore(checkpoint);
                }
                Ok(flow)
            }
            Err(error) => {
                self.restore(checkpoint);
                Ok(self.fail(&Effect::ResolveSkillTest, error))
            }
        }
    }

    fn settle_skill_test(&mut self) -> Result<RequestEvent, EffectError> {
        let test = self
            .state
            .pending_skill_test
            .clone()
            .ok_or(EffectError::NoSkillTest)?;
        let actor = self.player_ref(test.actor)?;
        let effective = effective_stat(actor, test.stat, &test.bonuses);
        let origin = actor.position;
        let level = skill::combine(&test.advantage);
        let wanted = skill::fate_count(level);

        if self.state.team(test.team).deck.draw.len() < wanted {
            self.recycle_discard(test.team);
        }
        let catalog = self.env.catalog();
        let deck = &mut self.state.team_mut(test.team).deck;
        let take = wanted.min(deck.draw.len());
        let mut flipped = deck.draw.split_off(deck.draw.len() - take);
        flipped.reverse();
        let revealed: Vec<i32> = flipped.iter().map(|c| catalog.fate(&c.card)).collect();
        deck.discard.extend(flipped);

        let result = SkillTestResult::new(level, revealed, difficulty(effective));
        debug!(
            target: "hexball::skill",
            test = test.id,
            actor = %test.actor,
            %level,
            revealed = ?result.revealed,
            selected = result.selected,
            difficulty = result.difficulty,
            success = result.success,
            "skill test resolved"
        );
        self.state.pending_skill_test = None;
        self.record("resolve-skill-test", AppliedValue::SkillTestResolved(result.clone()));

        let mut event = RequestEvent::new(EventKind::SkillTestResolved)
            .for_team(test.team)
            .by_player(test.actor)
            .with(keys::TEST_KIND, Value::Text(test.kind.to_string()))
            .with(keys::SUCCESS, result.success)
            .with(keys::MARGIN, i64::from(result.margin))
            .with(keys::STRONG, result.strong)
            .with(keys::SELECTED, i64::from(result.selected))
            .with(keys::DIFFICULTY, i64::from(result.difficulty))
            .with(keys::ADVANTAGE, i64::from(level.value()));
        if let SkillTestKind::Pass { receiver } = test.kind {
            event = event.with(keys::RECEIVER, receiver);
        }
        if let (Some(origin), Some(target)) = (origin, test.target) {
            event = event
                .with(keys::FROM, origin)
                .with(keys::TO, target)
                .with(keys::DISTANCE, i64::from(origin.distance(target)));
        }
        Ok(event)
    }
}
