//! Session state and level setup
//!
//! A `GameState` owns one maze and every entity living in it. Entities never
//! outlive the session that spawned them.

use std::collections::HashSet;

use glam::IVec2;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Enemy, Pickup, Player, Projectile};
use super::grid::Grid;
use super::maze::{generate, level_dimensions};
use super::path::{LongestPath, is_reachable, longest_path, reachable_from};
use crate::manhattan;
use crate::settings::{Settings, Variant};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Player reached the exit; the controller builds the next level
    LevelClear,
    /// Player was caught
    Lost,
}

/// Things that happened during a tick, drained into snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    ShotFired { pos: IVec2, piercing: bool },
    PickupCollected { pos: IVec2, ammo: u32 },
    WallDestroyed { pos: IVec2 },
    EnemyKilled { enemy_id: u32, pos: IVec2 },
    EnemyRespawned { enemy_id: u32, pos: IVec2 },
    PlayerCaught { enemy_id: u32, pos: IVec2 },
    LevelCleared { level: u32 },
}

/// Fire-button latches: a shot needs a release before the next press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FireLatch {
    pub standard_held: bool,
    pub piercing_held: bool,
}

/// Attempts at random placement before scanning every candidate
const RANDOM_PICK_ATTEMPTS: usize = 64;

/// One level's worth of simulation
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub rng: Pcg32,
    /// 1-based level number
    pub level: u32,
    pub score: u64,
    pub phase: GamePhase,
    pub grid: Grid,
    pub player: Player,
    /// Classic variant only
    pub exit: Option<IVec2>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    pub latch: FireLatch,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Timestamp of the most recent tick
    pub now_ms: u64,
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Build a level.
    ///
    /// `previous` is the player from the level just cleared; its ammo carries
    /// forward. `None` starts a fresh run with the configured starting ammo.
    pub fn new_level(
        settings: &Settings,
        level: u32,
        seed: u64,
        previous: Option<&Player>,
        score: u64,
    ) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let (width, height) = level_dimensions(
            settings.base_width,
            settings.base_height,
            settings.max_side,
            level,
        );
        let (grid, route) = generate_playable(width, height, &mut rng);

        let ammo = previous.map_or(settings.starting_ammo, |p| p.ammo);
        let player = Player::new(route.start, ammo, settings.max_ammo);
        let exit = settings.variant.has_exit().then_some(route.finish);

        let mut state = Self {
            settings: settings.clone(),
            rng,
            level,
            score,
            phase: GamePhase::Running,
            grid,
            player,
            exit,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            latch: FireLatch::default(),
            time_ticks: 0,
            now_ms: 0,
            events: Vec::new(),
            next_id: 1,
        };

        match settings.variant {
            Variant::Classic => {
                state.place_classic_enemies(&route);
                state.place_classic_pickups();
            }
            Variant::Survival => {
                for _ in 0..settings.survival_enemy_count {
                    state.spawn_enemy();
                }
                state.replenish_pickups();
            }
        }

        log::info!(
            "Level {} ({}): {}x{} maze, start {} exit {:?}, {} enemies, {} pickups, ammo {}",
            level,
            settings.variant.as_str(),
            width,
            height,
            state.player.pos(),
            state.exit,
            state.enemies.len(),
            state.pickups.len(),
            state.player.ammo
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Drain recorded events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Enemies scattered along the start-finish route, endpoints excluded
    fn place_classic_enemies(&mut self, route: &LongestPath) {
        let interior = route.interior();
        if interior.is_empty() {
            return;
        }
        let wanted = (1 + self.level as usize / 2).min((interior.len() / 5).max(1));
        let chosen: Vec<IVec2> = interior
            .choose_multiple(&mut self.rng, wanted.min(interior.len()))
            .copied()
            .collect();
        for pos in chosen {
            let id = self.next_entity_id();
            self.enemies.push(Enemy::new(id, pos));
        }
    }

    /// A handful of pickups away from start, exit and enemies
    fn place_classic_pickups(&mut self) {
        let attempts = self.rng.random_range(
            self.settings.classic_pickups_min..=self.settings.classic_pickups_max,
        );
        for _ in 0..attempts {
            let blocked = self.occupied_cells();
            if let Some(pos) = self.pick_free_cell(|p| !blocked.contains(&p)) {
                self.pickups.push(Pickup { pos });
            }
        }
    }

    /// Spawn one enemy at a free cell far enough from the player
    pub(crate) fn spawn_enemy(&mut self) -> Option<(u32, IVec2)> {
        let blocked = self.occupied_cells();
        let player = self.player.pos();
        let min_distance = self.settings.enemy_spawn_min_distance;
        let pos = self
            .pick_free_cell(|p| !blocked.contains(&p) && manhattan(p, player) >= min_distance)
            // Small mazes may have nothing that far away
            .or_else(|| self.pick_free_cell(|p| !blocked.contains(&p)))?;
        let id = self.next_entity_id();
        self.enemies.push(Enemy::new(id, pos));
        Some((id, pos))
    }

    /// Top pickups up to the survival floor
    pub(crate) fn replenish_pickups(&mut self) {
        while self.pickups.len() < self.settings.survival_pickup_floor {
            let blocked = self.occupied_cells();
            let Some(pos) = self.pick_free_cell(|p| !blocked.contains(&p)) else {
                log::warn!("No free cell left for a pickup");
                break;
            };
            self.pickups.push(Pickup { pos });
        }
    }

    /// Cells no new enemy or pickup may take: player, exit, enemies, pickups
    fn occupied_cells(&self) -> HashSet<IVec2> {
        let mut cells: HashSet<IVec2> = self.enemies.iter().map(Enemy::pos).collect();
        cells.extend(self.pickups.iter().map(|p| p.pos));
        cells.insert(self.player.pos());
        cells.extend(self.exit);
        cells
    }

    /// Random open interior cell passing `accept` and reachable from the player.
    ///
    /// Rejection sampling first; falls back to a full scan so crowded mazes
    /// still find a cell when one exists.
    fn pick_free_cell(&mut self, accept: impl Fn(IVec2) -> bool) -> Option<IVec2> {
        let (width, height) = (self.grid.width(), self.grid.height());
        if width < 3 || height < 3 {
            return None;
        }
        let player = self.player.pos();

        for _ in 0..RANDOM_PICK_ATTEMPTS {
            let pos = IVec2::new(
                self.rng.random_range(1..width - 1),
                self.rng.random_range(1..height - 1),
            );
            if self.grid.is_open(pos) && accept(pos) && is_reachable(&self.grid, player, &[pos]) {
                return Some(pos);
            }
        }

        log::debug!("Random placement kept failing, scanning all cells");
        let reachable = reachable_from(&self.grid, player);
        let candidates: Vec<IVec2> = self
            .grid
            .open_cells()
            .filter(|&p| accept(p) && reachable.contains(&p))
            .collect();
        candidates.choose(&mut self.rng).copied()
    }
}

/// Generate mazes until one has a usable start/finish pair
fn generate_playable(width: i32, height: i32, rng: &mut Pcg32) -> (Grid, LongestPath) {
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        let grid = generate(width, height, rng);
        let route = longest_path(&grid);
        if route.is_usable() {
            if attempts > 1 {
                log::debug!("Maze accepted after {attempts} attempts");
            }
            return (grid, route);
        }
        log::debug!(
            "Rejected {}x{} maze: start {} finish {} path length {}",
            width,
            height,
            route.start,
            route.finish,
            route.path.len()
        );
    }
}
