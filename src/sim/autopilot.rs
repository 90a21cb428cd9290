//! Idle/demo driver
//!
//! Produces the `TickInput` a simple player would give: walk the shortest
//! route to a goal, turn toward enemies lined up in a corridor, and pulse the
//! fire button when one is in the line of fire.

use glam::IVec2;

use super::grid::{Direction, Grid};
use super::path::shortest_path;
use super::state::GameState;
use super::tick::TickInput;

/// Input for the next tick of `state`
pub fn plan(state: &GameState) -> TickInput {
    let player = state.player.pos();
    let mut input = TickInput::default();

    // Fire at anything lined up ahead; otherwise turn toward a visible enemy
    if enemy_in_line(state, player, state.player.facing).is_some() {
        if state.player.ammo > 0 {
            input.fire = !state.latch.standard_held;
        } else {
            input.fire_piercing = !state.latch.piercing_held;
        }
        return input;
    }
    if let Some(dir) = Direction::ALL
        .into_iter()
        .find(|&d| enemy_in_line(state, player, d).is_some_and(|dist| dist >= 2))
    {
        input.move_dir = Some(dir);
        return input;
    }

    input.move_dir = goal(state)
        .and_then(|target| shortest_path(&state.grid, player, target))
        .and_then(|path| path.get(1).map(|&next| next - player))
        .and_then(Direction::from_offset);
    input
}

/// Where to walk: ammo when empty, then the exit, else the nearest pickup or enemy
fn goal(state: &GameState) -> Option<IVec2> {
    let player = state.player.pos();
    let nearest_pickup = nearest(&state.grid, player, state.pickups.iter().map(|p| p.pos));

    if state.player.ammo == 0 {
        if let Some(pickup) = nearest_pickup {
            return Some(pickup);
        }
    }
    state
        .exit
        .or(nearest_pickup)
        .or_else(|| nearest(&state.grid, player, state.enemies.iter().map(|e| e.pos())))
}

/// Candidate with the shortest walking distance from `from`
fn nearest(grid: &Grid, from: IVec2, candidates: impl Iterator<Item = IVec2>) -> Option<IVec2> {
    candidates
        .filter_map(|c| shortest_path(grid, from, c).map(|path| (path.len(), c)))
        .min_by_key(|&(len, _)| len)
        .map(|(_, c)| c)
}

/// Distance to the first enemy straight along `dir` before a wall, if any
fn enemy_in_line(state: &GameState, from: IVec2, dir: Direction) -> Option<i32> {
    let mut cell = from;
    let mut distance = 0;
    loop {
        cell += dir.offset();
        distance += 1;
        if !state.grid.is_open(cell) {
            return None;
        }
        if state.enemies.iter().any(|e| e.pos() == cell) {
            return Some(distance);
        }
    }
}
