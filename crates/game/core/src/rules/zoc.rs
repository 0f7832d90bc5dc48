//! Zones of control and movement cost.
//!
//! An on-court, unexhausted player controls every tile within
//! [`GameConfig::ZOC_RADIUS`] of their own, their own tile included.
//! Entering a tile controlled by an opponent costs extra movement depending
//! on how the two players' sizes compare.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use crate::board::Position;
use crate::config::GameConfig;
use crate::state::{GameState, Player, PlayerId, Size, Stat};

use super::stats::effective_stat;

pub fn exerts_zoc(player: &Player) -> bool {
    player.on_court() && !player.exhausted
}

/// True if `player` controls `tile`.
pub fn controls(player: &Player, tile: Position) -> bool {
    exerts_zoc(player)
        && player
            .position
            .is_some_and(|p| p.distance(tile) <= GameConfig::ZOC_RADIUS)
}

/// Extra cost for entering a tile controlled by `defender`.
pub fn size_penalty(mover: Size, defender: Size) -> u32 {
    match defender.cmp(&mover) {
        std::cmp::Ordering::Greater => 2,
        std::cmp::Ordering::Equal => 1,
        std::cmp::Ordering::Less => 0,
    }
}

/// Opponents of `player` that control `tile`.
pub fn controllers<'s>(
    state: &'s GameState,
    player: &'s Player,
    tile: Position,
) -> impl Iterator<Item = &'s Player> + 's {
    state
        .on_court(player.team.opponent())
        .filter(move |d| controls(d, tile))
}

/// Movement points needed to step onto `tile`.
pub fn step_cost(state: &GameState, mover: &Player, tile: Position) -> u32 {
    1 + controllers(state, mover, tile)
        .map(|d| size_penalty(mover.size(), d.size()))
        .max()
        .unwrap_or(0)
}

/// Movement points a player has for one move.
pub fn movement_budget(player: &Player) -> u32 {
    u32::try_from(effective_stat(player, Stat::Speed, &[])).unwrap_or(0)
}

/// Cheapest cost to every tile reachable within `budget`.
///
/// Occupied tiles cannot be passed through; `destination`, if given, may be
/// entered even when occupied so that callers can report why it is blocked.
fn search(
    state: &GameState,
    mover: &Player,
    budget: u32,
    destination: Option<Position>,
) -> BTreeMap<Position, u32> {
    let mut best = BTreeMap::new();
    let Some(start) = mover.position else {
        return best;
    };

    let mut frontier = BinaryHeap::new();
    best.insert(start, 0);
    frontier.push(Reverse((0u32, start)));

    while let Some(Reverse((cost, tile))) = frontier.pop() {
        if best.get(&tile).is_some_and(|c| *c < cost) {
            continue;
        }
        if Some(tile) == destination && tile != start {
            continue;
        }
        for next in state.board.neighbors(tile) {
            if !state.board.is_standable(next) {
                continue;
            }
            if state.board.is_occupied(next) && Some(next) != destination {
                continue;
            }
            let next_cost = cost + step_cost(state, mover, next);
            if next_cost > budget {
                continue;
            }
            if best.get(&next).is_none_or(|c| next_cost < *c) {
                best.insert(next, next_cost);
                frontier.push(Reverse((next_cost, next)));
            }
        }
    }
    best
}

/// Cost of the cheapest path to `to`, if one fits within `budget`.
pub fn path_cost(state: &GameState, mover: &Player, to: Position, budget: u32) -> Option<u32> {
    search(state, mover, budget, Some(to)).get(&to).copied()
}

/// Empty tiles the player can end a move on, with their cost.
pub fn reachable(state: &GameState, mover: &Player, budget: u32) -> BTreeMap<Position, u32> {
    let start = mover.position;
    search(state, mover, budget, None)
        .into_iter()
        .filter(|(tile, _)| Some(*tile) != start)
        .collect()
}

/// True if `mover` can legally end a move on `to` this action.
pub fn can_reach(state: &GameState, mover: &Player, to: Position) -> bool {
    state.board.is_standable(to)
        && !state.board.is_occupied(to)
        && path_cost(state, mover, to, movement_budget(mover)).is_some()
}

/// Opponents contesting a shot from the shooter's tile.
pub fn shot_contesters(state: &GameState, shooter: &Player) -> Vec<PlayerId> {
    let Some(tile) = shooter.position else {
        return Vec::new();
    };
    controllers(state, shooter, tile).map(|d| d.id).collect()
}

/// Opponents whose zone of control overlaps the pass lane, nearest to the
/// passer first.
pub fn pass_interceptors(
    state: &GameState,
    passer: &Player,
    from: Position,
    to: Position,
) -> Vec<PlayerId> {
    let lane = from.line_to(to);
    let mut found: Vec<(usize, PlayerId)> = state
        .on_court(passer.team.opponent())
        .filter_map(|d| {
            lane.iter()
                .position(|tile| controls(d, *tile))
                .map(|index| (index, d.id))
        })
        .collect();
    found.sort();
    found.into_iter().map(|(_, id)| id).collect()
}
