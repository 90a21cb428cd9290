//! Maze generation
//!
//! Randomized depth-first carving ("recursive backtracker") over the
//! odd-coordinate lattice. Even coordinates are the connectors between
//! lattice rooms. The result is a perfect maze: one connected region, no
//! cycles, with (1,1) always open.

use glam::IVec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::grid::{Cell, Direction, Grid};
use crate::consts::MIN_MAZE_SIDE;

/// Smallest grid the carver accepts; smaller requests are clamped up
pub const MIN_GENERATED_SIDE: i32 = 3;

/// Generate a maze of the given size.
///
/// Dimensions below 3 are clamped to 3. Even dimensions are accepted but
/// leave the last row/column as solid wall; use [`level_dimensions`] to get
/// odd sizes.
pub fn generate(width: i32, height: i32, rng: &mut impl Rng) -> Grid {
    let width = width.max(MIN_GENERATED_SIDE);
    let height = height.max(MIN_GENERATED_SIDE);
    let mut grid = Grid::filled(width, height);

    let seed = IVec2::new(1, 1);
    grid.set(seed, Cell::Open);
    let mut stack = vec![seed];

    while let Some(&current) = stack.last() {
        let candidates: Vec<IVec2> = Direction::ALL
            .into_iter()
            .map(|d| current + d.offset() * 2)
            .filter(|&n| is_carvable(&grid, n))
            .collect();

        match candidates.choose(rng) {
            Some(&next) => {
                let connector = (current + next) / 2;
                grid.set(connector, Cell::Open);
                grid.set(next, Cell::Open);
                stack.push(next);
            }
            None => {
                stack.pop();
            }
        }
    }

    grid
}

/// A lattice room that lies strictly inside the border and is still uncarved
fn is_carvable(grid: &Grid, pos: IVec2) -> bool {
    pos.x >= 1
        && pos.y >= 1
        && pos.x < grid.width() - 1
        && pos.y < grid.height() - 1
        && grid.is_wall(pos)
}

/// Round a side length up to the next odd value
#[inline]
pub fn round_to_odd(side: i32) -> i32 {
    side | 1
}

/// Maze size for a 1-based level: grows one cell every two levels, capped.
///
/// Never smaller than `MIN_MAZE_SIDE`, so every level has a usable
/// start/finish pair.
pub fn level_dimensions(base_width: i32, base_height: i32, max_side: i32, level: u32) -> (i32, i32) {
    let growth = (level / 2) as i32;
    let side = |base: i32| round_to_odd((base + growth).min(max_side).max(MIN_MAZE_SIDE));
    (side(base_width), side(base_height))
}

/// Number of open cells a perfect maze of this size contains:
/// every lattice room plus one connector per room after the first.
pub fn expected_open_cells(width: i32, height: i32) -> usize {
    let rooms_x = ((width.max(MIN_GENERATED_SIDE) - 1) / 2) as usize;
    let rooms_y = ((height.max(MIN_GENERATED_SIDE) - 1) / 2) as usize;
    let rooms = rooms_x * rooms_y;
    rooms + rooms.saturating_sub(1)
}
