//! Entities and their update rules
//!
//! Every timed action goes through a cooldown gate: an action runs only when
//! at least `cooldown` ms have passed since the actor last performed it, and
//! a successful action re-arms the gate.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::{Direction, Grid};
use crate::manhattan;

/// Position plus the timestamp of the last gated action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedActor {
    pub pos: IVec2,
    /// `None` until the first action, so a fresh actor is always ready
    pub last_action_ms: Option<u64>,
}

impl TimedActor {
    pub fn new(pos: IVec2) -> Self {
        Self {
            pos,
            last_action_ms: None,
        }
    }

    /// Whether the cooldown has elapsed at `now_ms`
    #[inline]
    pub fn ready(&self, now_ms: u64, cooldown_ms: u64) -> bool {
        match self.last_action_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= cooldown_ms,
        }
    }

    /// Re-arm the gate
    #[inline]
    pub fn mark(&mut self, now_ms: u64) {
        self.last_action_ms = Some(now_ms);
    }
}

/// The player avatar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub actor: TimedActor,
    /// Last requested direction; also the firing direction
    pub facing: Direction,
    pub ammo: u32,
    pub max_ammo: u32,
    /// When the last shot went off (cosmetic firing flag)
    pub last_fire_ms: Option<u64>,
}

impl Player {
    pub fn new(pos: IVec2, ammo: u32, max_ammo: u32) -> Self {
        Self {
            actor: TimedActor::new(pos),
            facing: Direction::North,
            ammo: ammo.min(max_ammo),
            max_ammo,
            last_fire_ms: None,
        }
    }

    #[inline]
    pub fn pos(&self) -> IVec2 {
        self.actor.pos
    }

    /// Face `dir` and step into it if the cooldown allows and the cell is open.
    ///
    /// Facing always updates, even when the step is gated or blocked.
    /// Returns true if the player moved.
    pub fn step(&mut self, dir: Direction, grid: &Grid, now_ms: u64, cooldown_ms: u64) -> bool {
        self.facing = dir;
        if !self.actor.ready(now_ms, cooldown_ms) {
            return false;
        }
        let next = self.actor.pos + dir.offset();
        if !grid.is_open(next) {
            return false;
        }
        self.actor.pos = next;
        self.actor.mark(now_ms);
        true
    }

    /// Add one ammo, saturating at `max_ammo`
    pub fn pickup_ammo(&mut self) {
        if self.ammo < self.max_ammo {
            self.ammo += 1;
        }
    }

    /// Spend one standard round. False (and no change) when empty.
    pub fn try_spend_ammo(&mut self) -> bool {
        if self.ammo == 0 {
            return false;
        }
        self.ammo -= 1;
        true
    }

    pub fn is_firing(&self, now_ms: u64, flash_ms: u64) -> bool {
        self.last_fire_ms
            .is_some_and(|t| now_ms.saturating_sub(t) < flash_ms)
    }
}

/// A hostile unit chasing the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub actor: TimedActor,
}

impl Enemy {
    pub fn new(id: u32, pos: IVec2) -> Self {
        Self {
            id,
            actor: TimedActor::new(pos),
        }
    }

    #[inline]
    pub fn pos(&self) -> IVec2 {
        self.actor.pos
    }

    /// Greedy one-step pursuit.
    ///
    /// Picks the open neighbour closest (Manhattan) to `target`; ties go to
    /// the first in N, E, S, W order. No lookahead, so it can stall behind
    /// concave walls. Returns true if the enemy moved.
    pub fn move_towards(&mut self, target: IVec2, grid: &Grid, now_ms: u64, cooldown_ms: u64) -> bool {
        if !self.actor.ready(now_ms, cooldown_ms) {
            return false;
        }
        // min_by_key keeps the first of equal minima
        let Some(next) = grid
            .open_neighbors(self.actor.pos)
            .min_by_key(|&n| manhattan(n, target))
        else {
            return false;
        };
        self.actor.pos = next;
        self.actor.mark(now_ms);
        true
    }
}

/// What happened when a projectile tried to advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Cooldown not elapsed or already inactive
    Idle,
    Moved,
    /// Piercing shot broke through the wall at the new position
    BrokeWall(IVec2),
    /// Stopped by a wall (non-piercing), position unchanged
    Blocked,
    /// Next cell was outside the grid
    LeftGrid,
}

/// A shot travelling in a straight line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub actor: TimedActor,
    pub dir: Direction,
    pub active: bool,
    /// Piercing ("super") shots destroy walls instead of stopping
    pub piercing: bool,
}

impl Projectile {
    pub fn new(id: u32, pos: IVec2, dir: Direction, piercing: bool) -> Self {
        Self {
            id,
            actor: TimedActor::new(pos),
            dir,
            active: true,
            piercing,
        }
    }

    #[inline]
    pub fn pos(&self) -> IVec2 {
        self.actor.pos
    }

    /// Move one cell along the fixed direction, mutating the grid for piercing shots
    pub fn advance(&mut self, grid: &mut Grid, now_ms: u64, cooldown_ms: u64) -> Advance {
        if !self.active || !self.actor.ready(now_ms, cooldown_ms) {
            return Advance::Idle;
        }
        let next = self.actor.pos + self.dir.offset();
        if !grid.in_bounds(next) {
            self.active = false;
            return Advance::LeftGrid;
        }

        let mut outcome = Advance::Moved;
        if grid.is_wall(next) {
            if !self.piercing {
                self.active = false;
                return Advance::Blocked;
            }
            grid.destroy_wall(next);
            outcome = Advance::BrokeWall(next);
        }

        self.actor.pos = next;
        self.actor.mark(now_ms);
        outcome
    }
}

/// An ammo pickup lying on the floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pickup {
    pub pos: IVec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_room() -> Grid {
        Grid::from_rows(&[
            "########", //
            "#......#", //
            "#......#", //
            "#......#", //
            "#......#", //
            "#......#", //
            "#......#", //
            "########",
        ])
    }

    #[test]
    fn test_timed_actor_gate() {
        let mut actor = TimedActor::new(IVec2::ZERO);
        assert!(actor.ready(0, 150));
        actor.mark(1000);
        assert!(!actor.ready(1149, 150));
        assert!(actor.ready(1150, 150));
    }

    #[test]
    fn test_player_blocked_move_updates_facing() {
        let grid = Grid::from_rows(&["###", "#.#", "###"]);
        let mut player = Player::new(IVec2::new(1, 1), 1, 3);
        assert_eq!(player.facing, Direction::North);

        let moved = player.step(Direction::East, &grid, 1000, 150);
        assert!(!moved);
        assert_eq!(player.pos(), IVec2::new(1, 1));
        assert_eq!(player.facing, Direction::East);
        // A blocked move does not consume the cooldown
        assert_eq!(player.actor.last_action_ms, None);
    }

    #[test]
    fn test_player_move_cooldown() {
        let grid = open_room();
        let mut player = Player::new(IVec2::new(1, 1), 1, 3);

        assert!(player.step(Direction::East, &grid, 1000, 150));
        assert!(!player.step(Direction::East, &grid, 1100, 150));
        assert_eq!(player.pos(), IVec2::new(2, 1));

        // Gated request still turns the player
        assert!(!player.step(Direction::South, &grid, 1149, 150));
        assert_eq!(player.facing, Direction::South);

        assert!(player.step(Direction::South, &grid, 1150, 150));
        assert_eq!(player.pos(), IVec2::new(2, 2));
    }

    #[test]
    fn test_pickup_ammo_saturates() {
        let mut player = Player::new(IVec2::new(1, 1), 1, 3);
        for _ in 0..10 {
            player.pickup_ammo();
        }
        assert_eq!(player.ammo, 3);

        let capped = Player::new(IVec2::new(1, 1), 9, 3);
        assert_eq!(capped.ammo, 3);
    }

    #[test]
    fn test_spend_ammo_refuses_when_empty() {
        let mut player = Player::new(IVec2::new(1, 1), 1, 3);
        assert!(player.try_spend_ammo());
        assert!(!player.try_spend_ammo());
        assert_eq!(player.ammo, 0);
    }

    #[test]
    fn test_enemy_greedy_step_and_cooldown() {
        let grid = open_room();
        let mut enemy = Enemy::new(1, IVec2::new(5, 5));
        let target = IVec2::new(2, 5);

        assert!(enemy.move_towards(target, &grid, 1000, 300));
        assert_eq!(enemy.pos(), IVec2::new(4, 5));

        assert!(!enemy.move_towards(target, &grid, 1299, 300));
        assert_eq!(enemy.pos(), IVec2::new(4, 5));

        assert!(enemy.move_towards(target, &grid, 1300, 300));
        assert_eq!(enemy.pos(), IVec2::new(3, 5));
    }

    #[test]
    fn test_enemy_tie_breaks_in_scan_order() {
        let grid = open_room();
        // Target diagonal: north and west both reduce distance equally
        let mut enemy = Enemy::new(1, IVec2::new(4, 4));
        assert!(enemy.move_towards(IVec2::new(2, 2), &grid, 0, 300));
        assert_eq!(enemy.pos(), IVec2::new(4, 3));

        // Target diagonal south-east: east is scanned before south
        let mut enemy = Enemy::new(2, IVec2::new(2, 2));
        assert!(enemy.move_towards(IVec2::new(4, 4), &grid, 0, 300));
        assert_eq!(enemy.pos(), IVec2::new(3, 2));

        // Target diagonal south-west: south is scanned before west
        let mut enemy = Enemy::new(3, IVec2::new(2, 2));
        assert!(enemy.move_towards(IVec2::new(1, 3), &grid, 0, 300));
        assert_eq!(enemy.pos(), IVec2::new(2, 3));
    }

    #[test]
    fn test_enemy_steps_even_when_target_reached() {
        // Greedy pursuit always takes the best neighbour; standing still is not an option
        let grid = Grid::from_rows(&["#####", "#...#", "#####"]);
        let mut enemy = Enemy::new(1, IVec2::new(2, 1));
        assert!(enemy.move_towards(IVec2::new(2, 1), &grid, 0, 300));
        assert_eq!(enemy.pos(), IVec2::new(3, 1));

        let boxed = Grid::from_rows(&["###", "#.#", "###"]);
        let mut stuck = Enemy::new(2, IVec2::new(1, 1));
        assert!(!stuck.move_towards(IVec2::new(5, 5), &boxed, 0, 300));
        assert_eq!(stuck.actor.last_action_ms, None);
    }

    #[test]
    fn test_projectile_blocked_by_wall() {
        let mut grid = Grid::from_rows(&["#####", "#...#", "#####"]);
        let mut shot = Projectile::new(1, IVec2::new(2, 1), Direction::North, false);
        assert_eq!(shot.advance(&mut grid, 0, 75), Advance::Blocked);
        assert!(!shot.active);
        assert_eq!(shot.pos(), IVec2::new(2, 1));
        assert!(grid.is_wall(IVec2::new(2, 0)));
    }

    #[test]
    fn test_piercing_projectile_breaks_wall_and_continues() {
        let mut grid = Grid::from_rows(&["#####", "#.#.#", "#####"]);
        let mut shot = Projectile::new(1, IVec2::new(1, 1), Direction::East, true);

        assert_eq!(shot.advance(&mut grid, 0, 75), Advance::BrokeWall(IVec2::new(2, 1)));
        assert!(grid.is_open(IVec2::new(2, 1)));
        assert_eq!(shot.pos(), IVec2::new(2, 1));

        // Gated until the cooldown passes
        assert_eq!(shot.advance(&mut grid, 74, 75), Advance::Idle);
        assert_eq!(shot.advance(&mut grid, 75, 75), Advance::Moved);
        assert_eq!(shot.pos(), IVec2::new(3, 1));
        assert_eq!(shot.advance(&mut grid, 150, 75), Advance::BrokeWall(IVec2::new(4, 1)));
        assert_eq!(shot.advance(&mut grid, 225, 75), Advance::LeftGrid);
        assert!(!shot.active);
        assert_eq!(shot.pos(), IVec2::new(4, 1));
    }

    #[test]
    fn test_firing_flag_expires() {
        let mut player = Player::new(IVec2::new(1, 1), 1, 3);
        assert!(!player.is_firing(0, 120));
        player.last_fire_ms = Some(1000);
        assert!(player.is_firing(1119, 120));
        assert!(!player.is_firing(1120, 120));
    }
}
