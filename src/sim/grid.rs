//! Maze occupancy grid
//!
//! Row-major field of wall/open cells. Every access is bounds-checked;
//! out-of-bounds positions read as `None` and are never open.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// A single maze cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Open,
}

/// Cardinal movement direction (no diagonals)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Direction {
    #[default]
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Fixed scan order used wherever ties are broken by direction
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit step for this direction (rows grow southward)
    pub fn offset(self) -> IVec2 {
        match self {
            Direction::North => IVec2::new(0, -1),
            Direction::East => IVec2::new(1, 0),
            Direction::South => IVec2::new(0, 1),
            Direction::West => IVec2::new(-1, 0),
        }
    }

    /// Direction of a unit step, if `delta` is one
    pub fn from_offset(delta: IVec2) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.offset() == delta)
    }
}

/// The maze as a rectangular wall/open field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// A grid with every cell set to `Wall`
    pub fn filled(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![Cell::Wall; (width * height) as usize],
        }
    }

    /// Build a grid from text rows: `#` is a wall, anything else is open.
    ///
    /// Rows shorter than the first are padded with walls.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as i32;
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0) as i32;
        let mut grid = Self::filled(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().take(width as usize).enumerate() {
                if ch != '#' {
                    grid.set(IVec2::new(x as i32, y as i32), Cell::Open);
                }
            }
        }
        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    #[inline]
    fn index(&self, pos: IVec2) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| (pos.y * self.width + pos.x) as usize)
    }

    /// Cell at `pos`, or `None` when out of bounds
    pub fn get(&self, pos: IVec2) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    #[inline]
    pub fn is_open(&self, pos: IVec2) -> bool {
        self.get(pos) == Some(Cell::Open)
    }

    #[inline]
    pub fn is_wall(&self, pos: IVec2) -> bool {
        self.get(pos) == Some(Cell::Wall)
    }

    /// Overwrite a cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: IVec2, cell: Cell) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = cell;
        }
    }

    /// Turn a wall into floor. Returns true if the cell was a wall.
    pub fn destroy_wall(&mut self, pos: IVec2) -> bool {
        if self.is_wall(pos) {
            self.set(pos, Cell::Open);
            true
        } else {
            false
        }
    }

    /// Open 4-neighbours of `pos`, in N, E, S, W order
    pub fn open_neighbors(&self, pos: IVec2) -> impl Iterator<Item = IVec2> + '_ {
        Direction::ALL
            .into_iter()
            .map(move |d| pos + d.offset())
            .filter(move |&n| self.is_open(n))
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = IVec2> + use<> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| IVec2::new(x, y)))
    }

    /// Open positions in row-major order
    pub fn open_cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.positions().filter(move |&p| self.is_open(p))
    }

    pub fn open_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Open).count()
    }

    /// Text rows (`#` wall, `.` open), for snapshots and debugging
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width.max(1) as usize)
            .map(|row| {
                row.iter()
                    .map(|c| match c {
                        Cell::Wall => '#',
                        Cell::Open => '.',
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_is_not_open() {
        let grid = Grid::from_rows(&["...", "...", "..."]);
        assert!(grid.is_open(IVec2::new(0, 0)));
        assert!(!grid.is_open(IVec2::new(-1, 0)));
        assert!(!grid.is_open(IVec2::new(3, 1)));
        assert_eq!(grid.get(IVec2::new(1, 3)), None);
    }

    #[test]
    fn test_from_rows_round_trips_text() {
        let rows = ["#####", "#...#", "#.#.#", "#####"];
        let grid = Grid::from_rows(&rows);
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.to_rows(), vec!["#####", "#...#", "#.#.#", "#####"]);
        assert_eq!(grid.open_count(), 5);
    }

    #[test]
    fn test_destroy_wall() {
        let mut grid = Grid::from_rows(&["#.#"]);
        assert!(grid.destroy_wall(IVec2::new(0, 0)));
        assert!(grid.is_open(IVec2::new(0, 0)));
        // Already open and out of bounds are no-ops
        assert!(!grid.destroy_wall(IVec2::new(1, 0)));
        assert!(!grid.destroy_wall(IVec2::new(5, 0)));
    }

    #[test]
    fn test_open_neighbors_scan_order() {
        let grid = Grid::from_rows(&["...", "...", "..."]);
        let neighbors: Vec<_> = grid.open_neighbors(IVec2::new(1, 1)).collect();
        assert_eq!(
            neighbors,
            vec![
                IVec2::new(1, 0),
                IVec2::new(2, 1),
                IVec2::new(1, 2),
                IVec2::new(0, 1)
            ]
        );
    }

    #[test]
    fn test_direction_offsets() {
        assert_eq!(Direction::North.offset(), IVec2::new(0, -1));
        assert_eq!(Direction::from_offset(IVec2::new(-1, 0)), Some(Direction::West));
        assert_eq!(Direction::from_offset(IVec2::new(1, 1)), None);
    }
}
