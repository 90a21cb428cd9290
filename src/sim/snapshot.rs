//! Read-only view of a session for renderers
//!
//! Captured after every tick. Owns its data, so a renderer can hold it while
//! the simulation moves on.

use glam::IVec2;
use serde::Serialize;

use super::grid::Direction;
use super::state::{GameEvent, GamePhase, GameState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: IVec2,
    pub facing: Direction,
    pub ammo: u32,
    pub max_ammo: u32,
    pub firing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileView {
    pub pos: IVec2,
    pub dir: Direction,
    pub piercing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub now_ms: u64,
    pub level: u32,
    pub score: u64,
    pub phase: GamePhase,
    pub width: i32,
    pub height: i32,
    /// One string per row: `#` wall, `.` open
    pub rows: Vec<String>,
    pub player: PlayerView,
    pub enemies: Vec<IVec2>,
    pub projectiles: Vec<ProjectileView>,
    pub pickups: Vec<IVec2>,
    pub exit: Option<IVec2>,
    pub events: Vec<GameEvent>,
}

impl Snapshot {
    /// Copy out everything a renderer needs from `state`
    pub fn capture(state: &GameState, events: Vec<GameEvent>) -> Self {
        let player = &state.player;
        Self {
            tick: state.time_ticks,
            now_ms: state.now_ms,
            level: state.level,
            score: state.score,
            phase: state.phase,
            width: state.grid.width(),
            height: state.grid.height(),
            rows: state.grid.to_rows(),
            player: PlayerView {
                pos: player.pos(),
                facing: player.facing,
                ammo: player.ammo,
                max_ammo: player.max_ammo,
                firing: player.is_firing(state.now_ms, state.settings.fire_flash_ms),
            },
            enemies: state.enemies.iter().map(|e| e.pos()).collect(),
            projectiles: state
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    pos: p.pos(),
                    dir: p.dir,
                    piercing: p.piercing,
                })
                .collect(),
            pickups: state.pickups.iter().map(|p| p.pos).collect(),
            exit: state.exit,
            events,
        }
    }

    /// Whether the cell at `pos` is open in this snapshot
    pub fn is_open(&self, pos: IVec2) -> bool {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height {
            return false;
        }
        self.rows[pos.y as usize].as_bytes()[pos.x as usize] == b'.'
    }
}
