//! Maze Gunner - a tile-grid maze shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze, pathing, entities, tick loop)
//! - `controller`: Level sequencing and run-level progression
//! - `highscores`: In-memory leaderboard for finished runs
//! - `settings`: Data-driven tuning and configuration loading

pub mod controller;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use controller::{ControllerPhase, GameController};
pub use highscores::HighScores;
pub use settings::{Settings, SettingsError, Variant};

/// Game configuration constants
pub mod consts {
    /// Fixed frame interval used by drivers (~60 Hz)
    pub const FRAME_MS: u64 = 16;

    /// Cooldown between player steps
    pub const PLAYER_MOVE_COOLDOWN_MS: u64 = 150;
    /// Cooldown between enemy steps
    pub const ENEMY_MOVE_COOLDOWN_MS: u64 = 300;
    /// Cooldown between projectile advances
    pub const PROJECTILE_COOLDOWN_MS: u64 = 75;
    /// How long the player's firing flag stays raised after a shot
    pub const FIRE_FLASH_MS: u64 = 120;

    /// Standard ammo
    pub const STARTING_AMMO: u32 = 1;
    pub const MAX_AMMO: u32 = 3;

    /// Maze dimensions (level 1 uses the base size, grows by one every two levels)
    pub const BASE_MAZE_SIDE: i32 = 15;
    pub const MAX_MAZE_SIDE: i32 = 31;
    /// Smallest side that still yields a usable start/finish pair
    pub const MIN_MAZE_SIDE: i32 = 5;

    /// Survival variant population targets
    pub const SURVIVAL_ENEMY_COUNT: usize = 4;
    pub const SURVIVAL_PICKUP_FLOOR: usize = 2;
    /// Score awarded per enemy destroyed
    pub const SCORE_PER_KILL: u64 = 10;

    /// Enemies never spawn closer than this (Manhattan) to the player
    pub const ENEMY_SPAWN_MIN_DISTANCE: i32 = 4;
}

/// Manhattan distance between two grid positions
#[inline]
pub fn manhattan(a: glam::IVec2, b: glam::IVec2) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}
