//! Small-island removal.
//!
//! Groups 4-connected cells of a target state into islands and flips every
//! island smaller than a threshold to the opposite state. The flood fill uses
//! an explicit work stack, so island size is bounded by memory rather than
//! call depth.

use crate::cave_grid::{CellState, OccupancyGrid};

/// Island size threshold used when none is configured.
pub const DEFAULT_MIN_ISLAND_SIZE: usize = 10;

/// 4-connected neighbor offsets.
const NEIGHBORS: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A maximal 4-connected region of same-state cells.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Island {
    pub cells: Vec<(usize, usize)>,
}

impl Island {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Summary of a pruning pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PruneResult {
    pub islands_found: usize,
    pub islands_cleared: usize,
    pub cells_cleared: usize,
}

/// Find every island of `target` cells. Each matching cell belongs to
/// exactly one island; islands are discovered in x-outer, y-inner scan order.
pub fn find_islands(grid: &OccupancyGrid, target: CellState) -> Vec<Island> {
    let width = grid.width();
    let height = grid.height();
    let mut visited = vec![false; width * height];
    let mut islands = Vec::new();
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for x in 0..width {
        for y in 0..height {
            let idx = y * width + x;
            if grid.get(x, y) != target || visited[idx] {
                continue;
            }

            let mut island = Island::default();
            visited[idx] = true;
            stack.push((x, y));

            while let Some((cx, cy)) = stack.pop() {
                island.cells.push((cx, cy));

                for &(dx, dy) in &NEIGHBORS {
                    let (nx, ny) = (cx as i64 + dx, cy as i64 + dy);
                    if grid.try_get(nx, ny) != Some(target) {
                        continue;
                    }
                    let (nx, ny) = (nx as usize, ny as usize);
                    let nidx = ny * width + nx;
                    if !visited[nidx] {
                        visited[nidx] = true;
                        stack.push((nx, ny));
                    }
                }
            }

            islands.push(island);
        }
    }

    islands
}

/// Flip every island of `target` cells with fewer than `min_size` cells to
/// the opposite state.
pub fn prune_small_islands(
    grid: &mut OccupancyGrid,
    target: CellState,
    min_size: usize,
) -> PruneResult {
    let islands = find_islands(grid, target);
    let cleared = target.opposite();
    let mut result = PruneResult {
        islands_found: islands.len(),
        ..Default::default()
    };

    for island in islands.iter().filter(|island| island.len() < min_size) {
        for &(x, y) in &island.cells {
            grid.set(x, y, cleared);
        }
        result.islands_cleared += 1;
        result.cells_cleared += island.len();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One 5-cell wall pocket and one 20-cell wall block on open ground.
    fn two_pocket_grid() -> OccupancyGrid {
        OccupancyGrid::from_rows(&[
            "..............",
            ".##...........",
            ".###......###.",
            "..........###.",
            "..........###.",
            "..........###.",
            "..........###.",
            "..........###.",
            "..........##..",
            "..............",
        ])
        .unwrap()
    }

    #[test]
    fn test_find_islands_sizes() {
        let grid = two_pocket_grid();
        let mut sizes: Vec<usize> = find_islands(&grid, CellState::Wall)
            .iter()
            .map(Island::len)
            .collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![5, 20]);
    }

    #[test]
    fn test_prune_clears_only_small_island() {
        let mut grid = two_pocket_grid();
        let result = prune_small_islands(&mut grid, CellState::Wall, 10);

        assert_eq!(result.islands_found, 2);
        assert_eq!(result.islands_cleared, 1);
        assert_eq!(result.cells_cleared, 5);
        assert_eq!(grid.count(CellState::Wall), 20);
        assert!(!grid.is_wall(1, 1));
        assert!(grid.is_wall(11, 5));
    }

    #[test]
    fn test_every_cell_in_exactly_one_island() {
        let grid = OccupancyGrid::from_rows(&["#.#.#", ".#.#.", "#.#.#", "#####"]).unwrap();
        for target in [CellState::Wall, CellState::Floor] {
            let islands = find_islands(&grid, target);
            let mut seen = std::collections::HashSet::new();
            for island in &islands {
                for cell in &island.cells {
                    assert!(seen.insert(*cell), "cell {:?} assigned twice", cell);
                    assert_eq!(grid.get(cell.0, cell.1), target);
                }
            }
            assert_eq!(seen.len(), grid.count(target));
        }
    }

    #[test]
    fn test_diagonal_cells_are_separate_islands() {
        let grid = OccupancyGrid::from_rows(&["#.", ".#"]).unwrap();
        assert_eq!(find_islands(&grid, CellState::Wall).len(), 2);
    }

    #[test]
    fn test_prune_floor_pockets() {
        let mut grid = OccupancyGrid::from_rows(&["#####", "#.###", "#####"]).unwrap();
        let result = prune_small_islands(&mut grid, CellState::Floor, DEFAULT_MIN_ISLAND_SIZE);
        assert_eq!(result.cells_cleared, 1);
        assert_eq!(grid.count(CellState::Floor), 0);
    }

    #[test]
    fn test_large_island_does_not_overflow() {
        let mut grid = OccupancyGrid::new(600, 600, CellState::Wall).unwrap();
        let result = prune_small_islands(&mut grid, CellState::Wall, 10);
        assert_eq!(result.islands_found, 1);
        assert_eq!(result.islands_cleared, 0);
    }
}
