//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Caller-supplied timestamps only
//! - Seeded RNG only
//! - Stable iteration order (scan order N, E, S, W; entities by spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod entity;
pub mod grid;
pub mod maze;
pub mod path;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use entity::{Advance, Enemy, Pickup, Player, Projectile, TimedActor};
pub use grid::{Cell, Direction, Grid};
pub use maze::{generate, level_dimensions};
pub use path::{LongestPath, is_reachable, longest_path, reachable_from, shortest_path};
pub use snapshot::{PlayerView, ProjectileView, Snapshot};
pub use state::{FireLatch, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
