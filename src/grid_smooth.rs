//! Cellular-automaton smoothing.
//!
//! Each pass counts Wall neighbours in the 8-neighbourhood of every cell:
//! more than 4 makes the cell Wall, fewer than 4 makes it Floor, exactly 4
//! leaves it alone. Neighbours outside the grid horizontally or above the top
//! row are skipped; neighbours at or below `floor_level` count as Wall no
//! matter what they hold.

use crate::cave_grid::{CellState, OccupancyGrid};

/// Wall-neighbour count at which a cell keeps its current state.
const MAJORITY_THRESHOLD: u32 = 4;

/// How one smoothing pass reads its neighbours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SmoothingMode {
    /// Every cell reads the grid as it was at the start of the pass.
    #[default]
    Snapshot,
    /// Cells are updated one by one (x outer, y inner) and later cells see
    /// earlier updates within the same pass.
    InPlace,
}

/// Run `iterations` smoothing passes over `grid`.
pub fn smooth(grid: &mut OccupancyGrid, iterations: u32, floor_level: i64, mode: SmoothingMode) {
    for _ in 0..iterations {
        match mode {
            SmoothingMode::Snapshot => {
                let previous = grid.clone();
                smooth_pass(&previous, grid, floor_level);
            }
            SmoothingMode::InPlace => smooth_pass_in_place(grid, floor_level),
        }
    }
}

fn smooth_pass(source: &OccupancyGrid, target: &mut OccupancyGrid, floor_level: i64) {
    for x in 0..source.width() {
        for y in 0..source.height() {
            if let Some(state) = next_state(neighbour_wall_count(source, x, y, floor_level)) {
                target.set(x, y, state);
            }
        }
    }
}

fn smooth_pass_in_place(grid: &mut OccupancyGrid, floor_level: i64) {
    for x in 0..grid.width() {
        for y in 0..grid.height() {
            if let Some(state) = next_state(neighbour_wall_count(grid, x, y, floor_level)) {
                grid.set(x, y, state);
            }
        }
    }
}

/// `None` means "unchanged".
#[inline]
fn next_state(wall_neighbours: u32) -> Option<CellState> {
    if wall_neighbours > MAJORITY_THRESHOLD {
        Some(CellState::Wall)
    } else if wall_neighbours < MAJORITY_THRESHOLD {
        Some(CellState::Floor)
    } else {
        None
    }
}

/// Count Wall neighbours of `(x, y)`.
pub fn neighbour_wall_count(grid: &OccupancyGrid, x: usize, y: usize, floor_level: i64) -> u32 {
    let width = grid.width() as i64;
    let height = grid.height() as i64;
    let (cx, cy) = (x as i64, y as i64);
    let mut count = 0;

    for nx in (cx - 1)..=(cx + 1) {
        for ny in (cy - 1)..=(cy + 1) {
            if nx == cx && ny == cy {
                continue;
            }
            if nx < 0 || nx >= width {
                continue;
            }
            if ny >= height {
                continue;
            }
            if ny <= floor_level {
                count += 1;
            } else if grid.is_wall(nx as usize, ny as usize) {
                count += 1;
            }
        }
    }

    count
}
