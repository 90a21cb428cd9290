//! Breadth-first path analysis over the maze grid
//!
//! - `reachable_from`: flood fill of 4-connected open cells
//! - `longest_path`: longest first-discovery BFS path over every interior
//!   source, used to pick start and finish
//! - `shortest_path`: BFS route between two cells (autopilot)

use std::collections::{HashSet, VecDeque};

use glam::IVec2;

use super::grid::Grid;

/// All open cells reachable from `start`, including `start` itself.
///
/// Empty if `start` is not an open cell.
pub fn reachable_from(grid: &Grid, start: IVec2) -> HashSet<IVec2> {
    let mut visited = HashSet::new();
    if !grid.is_open(start) {
        return visited;
    }

    let mut queue = VecDeque::from([start]);
    visited.insert(start);
    while let Some(cell) = queue.pop_front() {
        for next in grid.open_neighbors(cell) {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    visited
}

/// True when every target is reachable from `start`
pub fn is_reachable(grid: &Grid, start: IVec2, targets: &[IVec2]) -> bool {
    let reached = reachable_from(grid, start);
    targets.iter().all(|t| reached.contains(t))
}

/// Endpoints and route chosen by [`longest_path`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongestPath {
    pub start: IVec2,
    pub finish: IVec2,
    /// Cells from `start` to `finish`, both inclusive
    pub path: Vec<IVec2>,
}

impl LongestPath {
    fn single(cell: IVec2) -> Self {
        Self {
            start: cell,
            finish: cell,
            path: vec![cell],
        }
    }

    /// Distinct endpoints with at least one cell between them
    pub fn is_usable(&self) -> bool {
        self.start != self.finish && self.path.len() > 2
    }

    /// Path cells excluding both endpoints
    pub fn interior(&self) -> &[IVec2] {
        if self.path.len() > 2 {
            &self.path[1..self.path.len() - 1]
        } else {
            &[]
        }
    }
}

/// Longest shortest-path found by running a BFS from every interior open cell.
///
/// Sources are scanned row-major over the interior (border cells are reached
/// but never used as sources). Each BFS records the first-discovery path to
/// every cell; the first path to exceed the running maximum wins, so ties
/// keep the earliest one. This approximates the maze diameter rather than
/// computing it exactly.
///
/// With no usable pair the first open interior cell is returned as both
/// endpoints; with no open interior cell at all, (0,0) is returned.
pub fn longest_path(grid: &Grid) -> LongestPath {
    let width = grid.width();
    let height = grid.height();
    let cell_count = (width.max(0) * height.max(0)) as usize;
    let index = |p: IVec2| (p.y * width + p.x) as usize;

    let mut best: Option<LongestPath> = None;
    let mut best_len = 0usize;
    let mut parent: Vec<Option<IVec2>> = vec![None; cell_count];
    let mut depth: Vec<usize> = vec![0; cell_count];
    let mut seen: Vec<bool> = vec![false; cell_count];
    let mut queue = VecDeque::new();

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let source = IVec2::new(x, y);
            if !grid.is_open(source) {
                continue;
            }

            seen.fill(false);
            queue.clear();
            seen[index(source)] = true;
            parent[index(source)] = None;
            depth[index(source)] = 1;
            queue.push_back(source);

            while let Some(cell) = queue.pop_front() {
                let len = depth[index(cell)];
                if len > best_len {
                    best_len = len;
                    best = Some(LongestPath {
                        start: source,
                        finish: cell,
                        path: trace(&parent, cell, index),
                    });
                }
                for next in grid.open_neighbors(cell) {
                    let i = index(next);
                    if !seen[i] {
                        seen[i] = true;
                        parent[i] = Some(cell);
                        depth[i] = len + 1;
                        queue.push_back(next);
                    }
                }
            }
        }
    }

    best.unwrap_or_else(|| LongestPath::single(IVec2::ZERO))
}

/// Walk parent links back from `end` and return the path in forward order
fn trace(parent: &[Option<IVec2>], end: IVec2, index: impl Fn(IVec2) -> usize) -> Vec<IVec2> {
    let mut path = vec![end];
    let mut cursor = end;
    while let Some(prev) = parent[index(cursor)] {
        path.push(prev);
        cursor = prev;
    }
    path.reverse();
    path
}

/// Shortest open route from `from` to `to`, both inclusive.
///
/// Neighbours are expanded in N, E, S, W order so the route is stable.
pub fn shortest_path(grid: &Grid, from: IVec2, to: IVec2) -> Option<Vec<IVec2>> {
    if !grid.is_open(from) || !grid.is_open(to) {
        return None;
    }
    if from == to {
        return Some(vec![from]);
    }

    let width = grid.width();
    let index = |p: IVec2| (p.y * width + p.x) as usize;
    let cell_count = (width * grid.height()) as usize;
    let mut parent: Vec<Option<IVec2>> = vec![None; cell_count];
    let mut seen = vec![false; cell_count];
    let mut queue = VecDeque::from([from]);
    seen[index(from)] = true;

    while let Some(cell) = queue.pop_front() {
        for next in grid.open_neighbors(cell) {
            let i = index(next);
            if seen[i] {
                continue;
            }
            seen[i] = true;
            parent[i] = Some(cell);
            if next == to {
                return Some(trace(&parent, to, index));
            }
            queue.push_back(next);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::maze::generate;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_reachable_from_wall_is_empty() {
        let grid = Grid::from_rows(&["###", "#.#", "###"]);
        assert!(reachable_from(&grid, IVec2::new(0, 0)).is_empty());
        assert_eq!(reachable_from(&grid, IVec2::new(1, 1)).len(), 1);
    }

    #[test]
    fn test_reachable_from_is_idempotent() {
        let grid = generate(15, 15, &mut Pcg32::seed_from_u64(11));
        let first = reachable_from(&grid, IVec2::new(1, 1));
        let second = reachable_from(&grid, IVec2::new(1, 1));
        assert_eq!(first, second);
    }

    #[test]
    fn test_is_reachable_detects_split_regions() {
        let grid = Grid::from_rows(&[
            "#######", //
            "#..#..#", //
            "#######",
        ]);
        let start = IVec2::new(1, 1);
        assert!(is_reachable(&grid, start, &[IVec2::new(2, 1)]));
        assert!(!is_reachable(&grid, start, &[IVec2::new(2, 1), IVec2::new(4, 1)]));
        assert!(is_reachable(&grid, start, &[]));
    }

    #[test]
    fn test_longest_path_in_corridor() {
        let grid = Grid::from_rows(&[
            "#######", //
            "#.....#", //
            "#######",
        ]);
        let result = longest_path(&grid);
        assert_eq!(result.start, IVec2::new(1, 1));
        assert_eq!(result.finish, IVec2::new(5, 1));
        assert_eq!(result.path.len(), 5);
        assert!(result.is_usable());
        assert_eq!(result.interior().len(), 3);
    }

    #[test]
    fn test_longest_path_tie_keeps_first_found() {
        // Plus-shaped room: several maximal pairs, the first source wins
        let grid = Grid::from_rows(&[
            "#####", //
            "##.##", //
            "#...#", //
            "##.##", //
            "#####",
        ]);
        let result = longest_path(&grid);
        assert_eq!(result.start, IVec2::new(2, 1));
        // From (2,1) the east arm is discovered first among the length-3 cells
        assert_eq!(result.finish, IVec2::new(3, 2));
        assert_eq!(result.path, vec![IVec2::new(2, 1), IVec2::new(2, 2), IVec2::new(3, 2)]);
    }

    #[test]
    fn test_longest_path_single_cell_fallback() {
        let grid = Grid::from_rows(&["###", "#.#", "###"]);
        let result = longest_path(&grid);
        assert_eq!(result.start, IVec2::new(1, 1));
        assert_eq!(result.finish, IVec2::new(1, 1));
        assert_eq!(result.path, vec![IVec2::new(1, 1)]);
        assert!(!result.is_usable());
    }

    #[test]
    fn test_longest_path_no_open_cells() {
        let grid = Grid::filled(5, 5);
        let result = longest_path(&grid);
        assert_eq!(result.start, IVec2::ZERO);
        assert_eq!(result.finish, IVec2::ZERO);
        assert_eq!(result.path, vec![IVec2::ZERO]);
    }

    #[test]
    fn test_shortest_path_routes_around_walls() {
        let grid = Grid::from_rows(&[
            "#####", //
            "#...#", //
            "#.#.#", //
            "#.#.#", //
            "#####",
        ]);
        let path = shortest_path(&grid, IVec2::new(1, 3), IVec2::new(3, 3)).expect("route");
        assert_eq!(path.len(), 7);
        assert_eq!(path.first(), Some(&IVec2::new(1, 3)));
        assert_eq!(path.last(), Some(&IVec2::new(3, 3)));
        assert!(shortest_path(&grid, IVec2::new(1, 3), IVec2::new(2, 2)).is_none());
    }

    proptest! {
        #[test]
        fn prop_longest_path_is_contiguous_and_usable(seed in any::<u64>()) {
            let grid = generate(11, 11, &mut Pcg32::seed_from_u64(seed));
            let result = longest_path(&grid);
            prop_assert!(result.is_usable());
            prop_assert_ne!(result.start, result.finish);
            prop_assert_eq!(result.path.first().copied(), Some(result.start));
            prop_assert_eq!(result.path.last().copied(), Some(result.finish));
            for pair in result.path.windows(2) {
                prop_assert_eq!(crate::manhattan(pair[0], pair[1]), 1);
                prop_assert!(grid.is_open(pair[1]));
            }
        }
    }
}
