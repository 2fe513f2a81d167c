//! Initial occupancy fill.
//!
//! Row `y = 0` is always Wall. Every other cell takes a draw in `[0, 100)` and
//! becomes Wall when the draw is below `fill_percent`.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::cave_grid::{CellState, OccupancyGrid};
use crate::error::{CaveError, CaveResult};
use crate::noise_field::NoiseField;

/// How the per-cell draw is produced.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum FillMode {
    /// Independent uniform draws from a seeded ChaCha stream.
    #[default]
    Random,
    /// Thresholded fractal noise, giving larger coherent blobs.
    Noise { octaves: usize, frequency: f32 },
}

/// Random fill with independent draws. Same seed, same grid.
pub fn fill(
    width: usize,
    height: usize,
    fill_percent: u32,
    seed: u64,
) -> CaveResult<OccupancyGrid> {
    fill_with_mode(width, height, fill_percent, seed, FillMode::Random)
}

pub fn fill_with_mode(
    width: usize,
    height: usize,
    fill_percent: u32,
    seed: u64,
    mode: FillMode,
) -> CaveResult<OccupancyGrid> {
    if fill_percent > 100 {
        return Err(CaveError::InvalidFillPercent(fill_percent));
    }
    let mut grid = OccupancyGrid::new(width, height, CellState::Floor)?;

    match mode {
        FillMode::Random => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            fill_cells(&mut grid, fill_percent, |_, _| rng.gen_range(0..100));
        }
        FillMode::Noise { octaves, frequency } => {
            if !(frequency.is_finite() && frequency > 0.0) {
                return Err(CaveError::InvalidNoiseFrequency(frequency));
            }
            // Fold the high bits in so seeds differing only above bit 32 still differ.
            let noise_seed = (seed ^ (seed >> 32)) as u32;
            let field = NoiseField::new(noise_seed, octaves, frequency);
            fill_cells(&mut grid, fill_percent, |x, y| field.draw(x, y));
        }
    }

    Ok(grid)
}

/// Column-major walk (x outer, y inner); the ground row consumes no draw.
fn fill_cells(
    grid: &mut OccupancyGrid,
    fill_percent: u32,
    mut draw: impl FnMut(usize, usize) -> u32,
) {
    for x in 0..grid.width() {
        for y in 0..grid.height() {
            if y == 0 {
                grid.set(x, y, CellState::Wall);
                continue;
            }
            let state = if draw(x, y) < fill_percent {
                CellState::Wall
            } else {
                CellState::Floor
            };
            grid.set(x, y, state);
        }
    }
}
