//! Occupancy grid for cave maps.
//!
//! Cells are addressed by `(x, y)` with `y = 0` being the ground row.
//! Storage is a flat row-major `Vec` (`y * width + x`).

use std::fmt;

use crate::error::{CaveError, CaveResult};

/// State of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CellState {
    #[default]
    Floor = 0,
    Wall = 1,
}

impl CellState {
    #[must_use]
    pub fn is_wall(self) -> bool {
        self == CellState::Wall
    }

    /// The other state (Floor <-> Wall).
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            CellState::Floor => CellState::Wall,
            CellState::Wall => CellState::Floor,
        }
    }

    #[must_use]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    fn to_char(self) -> char {
        match self {
            CellState::Floor => '.',
            CellState::Wall => '#',
        }
    }
}

/// 2D grid of Floor/Wall cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

impl OccupancyGrid {
    /// Create a grid filled with `state`.
    pub fn new(width: usize, height: usize, state: CellState) -> CaveResult<Self> {
        if width == 0 || height == 0 {
            return Err(CaveError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![state; width * height],
        })
    }

    /// Parse a grid from text rows, `#` = Wall and anything else = Floor.
    ///
    /// `rows[0]` is the ground row (`y = 0`). Short rows are padded with Floor.
    pub fn from_rows(rows: &[&str]) -> CaveResult<Self> {
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut grid = Self::new(width, height, CellState::Floor)?;
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    grid.set(x, y, CellState::Wall);
                }
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Cell at `(x, y)`. Panics when out of bounds; use `try_get` for
    /// signed or unchecked coordinates.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> CellState {
        self.cells[self.index(x, y)]
    }

    /// Bounds-checked lookup for signed coordinates.
    #[inline]
    pub fn try_get(&self, x: i64, y: i64) -> Option<CellState> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.get(x as usize, y as usize))
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, state: CellState) {
        let idx = self.index(x, y);
        self.cells[idx] = state;
    }

    #[inline]
    pub fn is_wall(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_wall()
    }

    /// Number of cells in the given state.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }

    /// Raw cell values (`0` = Floor, `1` = Wall), row-major.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.cells.iter().map(|c| c.as_u8()).collect()
    }

    /// Copy of this grid surrounded by a solid Wall frame `thickness` cells wide.
    pub fn with_border(&self, thickness: usize) -> Self {
        if thickness == 0 {
            return self.clone();
        }
        let width = self.width + thickness * 2;
        let height = self.height + thickness * 2;
        let mut cells = vec![CellState::Wall; width * height];
        for y in 0..self.height {
            for x in 0..self.width {
                cells[(y + thickness) * width + x + thickness] = self.get(x, y);
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }
}

/// Top row first, so the printout reads like a map.
impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height).rev() {
            let row: String = (0..self.width).map(|x| self.get(x, y).to_char()).collect();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert_eq!(
            OccupancyGrid::new(0, 5, CellState::Floor),
            Err(CaveError::InvalidDimensions {
                width: 0,
                height: 5
            })
        );
        assert!(OccupancyGrid::new(5, 0, CellState::Floor).is_err());
    }

    #[test]
    fn test_from_rows_ground_row_first() {
        let grid = OccupancyGrid::from_rows(&["###", "..#", "..."]).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert!(grid.is_wall(0, 0));
        assert!(grid.is_wall(2, 1));
        assert!(!grid.is_wall(0, 1));
        assert!(!grid.is_wall(2, 2));
        assert_eq!(grid.count(CellState::Wall), 4);
    }

    #[test]
    fn test_display_prints_top_row_first() {
        let grid = OccupancyGrid::from_rows(&["##", ".."]).unwrap();
        assert_eq!(grid.to_string(), "..\n##\n");
    }

    #[test]
    fn test_try_get_bounds() {
        let grid = OccupancyGrid::new(2, 2, CellState::Wall).unwrap();
        assert_eq!(grid.try_get(-1, 0), None);
        assert_eq!(grid.try_get(0, 2), None);
        assert_eq!(grid.try_get(1, 1), Some(CellState::Wall));
    }

    #[test]
    fn test_with_border() {
        let grid = OccupancyGrid::new(2, 3, CellState::Floor).unwrap();
        let bordered = grid.with_border(2);
        assert_eq!(bordered.width(), 6);
        assert_eq!(bordered.height(), 7);
        assert_eq!(bordered.count(CellState::Floor), 6);
        assert!(bordered.is_wall(0, 0));
        assert!(bordered.is_wall(5, 6));
        assert!(!bordered.is_wall(2, 2));
        assert!(!bordered.is_wall(3, 4));
        assert_eq!(grid.with_border(0), grid);
    }

    #[test]
    fn test_opposite() {
        assert_eq!(CellState::Floor.opposite(), CellState::Wall);
        assert_eq!(CellState::Wall.opposite(), CellState::Floor);
    }
}
