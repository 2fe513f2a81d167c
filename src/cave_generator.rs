//! End-to-end cave generation.
//!
//! `CaveGenerator` runs fill -> smooth -> prune -> border -> mesh and hands
//! back the grid together with the floor and wall meshes. `MeshGenerator` is
//! the meshing half on its own, for callers that edit a grid and re-mesh it.
//!
//! Every call builds its node lattice, vertex map and outline state from
//! scratch and drops them before returning, so a generator can be reused
//! freely.

use crate::cave_grid::{CellState, OccupancyGrid};
use crate::debug_log::{count_duplicate_positions, debug_log, format_wall_ratio};
use crate::error::{CaveError, CaveResult};
use crate::grid_fill::{fill_with_mode, FillMode};
use crate::grid_smooth::{smooth, SmoothingMode};
use crate::island_prune::prune_small_islands;
use crate::marching_squares::{triangulate, validate_mesh, SquareGrid};
use crate::outline::{Outline, OutlineTracer};
use crate::seed::SeedSource;
use crate::walls::{build_walls, DEFAULT_WALL_HEIGHT};

pub use crate::mesh_postprocess::MeshData;

// ===== Defaults =====

pub const DEFAULT_WIDTH: usize = 64;
pub const DEFAULT_HEIGHT: usize = 48;
pub const DEFAULT_FILL_PERCENT: u32 = 47;
pub const DEFAULT_SMOOTHING_ITERATIONS: u32 = 5;
pub const DEFAULT_SQUARE_SIZE: f32 = 1.0;

/// Floor and wall meshes for one grid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CaveMesh {
    pub floor: MeshData,
    pub walls: MeshData,
    /// Outlines over `floor` vertex indices that the walls were extruded from.
    pub outlines: Vec<Outline>,
}

/// A generated cave: the seed actually used, the final grid and its mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct CaveMap {
    pub seed: u64,
    pub grid: OccupancyGrid,
    pub mesh: CaveMesh,
}

/// Everything that shapes a cave.
#[derive(Clone, Debug, PartialEq)]
pub struct CaveParams {
    pub width: usize,
    pub height: usize,
    /// Chance (0..=100) that a non-ground cell starts as Wall.
    pub fill_percent: u32,
    pub seed: SeedSource,
    pub smoothing_iterations: u32,
    /// Neighbours on rows `<= floor_level` always count as Wall while smoothing.
    pub floor_level: i64,
    /// Solid frame added around the finished grid, 0 for none.
    pub border_thickness: usize,
    /// Islands of `prune_target` smaller than this are cleared. `None` skips pruning.
    pub min_island_size: Option<usize>,
    pub prune_target: CellState,
    pub square_size: f32,
    pub wall_height: f32,
    pub fill_mode: FillMode,
    pub smoothing_mode: SmoothingMode,
}

impl Default for CaveParams {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fill_percent: DEFAULT_FILL_PERCENT,
            seed: SeedSource::Random,
            smoothing_iterations: DEFAULT_SMOOTHING_ITERATIONS,
            floor_level: 0,
            border_thickness: 0,
            min_island_size: None,
            prune_target: CellState::Wall,
            square_size: DEFAULT_SQUARE_SIZE,
            wall_height: DEFAULT_WALL_HEIGHT,
            fill_mode: FillMode::Random,
            smoothing_mode: SmoothingMode::Snapshot,
        }
    }
}

impl CaveParams {
    /// Reject parameters that cannot produce a mesh.
    pub fn validate(&self) -> CaveResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CaveError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.fill_percent > 100 {
            return Err(CaveError::InvalidFillPercent(self.fill_percent));
        }
        if !(self.square_size.is_finite() && self.square_size > 0.0) {
            return Err(CaveError::InvalidCellSize(self.square_size));
        }
        if !(self.wall_height.is_finite() && self.wall_height > 0.0) {
            return Err(CaveError::InvalidWallHeight(self.wall_height));
        }
        if let FillMode::Noise { frequency, .. } = self.fill_mode {
            if !(frequency.is_finite() && frequency > 0.0) {
                return Err(CaveError::InvalidNoiseFrequency(frequency));
            }
        }
        let (width, height) = self.final_dimensions();
        if width < 2 || height < 2 {
            return Err(CaveError::GridTooSmall { width, height });
        }
        Ok(())
    }

    /// Grid size after the border is added.
    pub fn final_dimensions(&self) -> (usize, usize) {
        let pad = self.border_thickness * 2;
        (self.width + pad, self.height + pad)
    }
}

/// Turns an occupancy grid into floor and wall meshes.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshGenerator {
    pub square_size: f32,
    pub wall_height: f32,
    /// Keep corners of fully solid squares out of outline tracing.
    pub mark_solid_interior: bool,
}

impl Default for MeshGenerator {
    fn default() -> Self {
        Self {
            square_size: DEFAULT_SQUARE_SIZE,
            wall_height: DEFAULT_WALL_HEIGHT,
            mark_solid_interior: true,
        }
    }
}

impl MeshGenerator {
    pub fn new(square_size: f32, wall_height: f32) -> Self {
        Self {
            square_size,
            wall_height,
            ..Default::default()
        }
    }

    pub fn from_params(params: &CaveParams) -> Self {
        Self::new(params.square_size, params.wall_height)
    }

    /// Mesh `grid`. Fails on an empty or sub-2x2 grid, or bad sizes.
    pub fn generate(&self, grid: &OccupancyGrid) -> CaveResult<CaveMesh> {
        if grid.is_empty() {
            return Err(CaveError::EmptyGrid);
        }
        if !(self.wall_height.is_finite() && self.wall_height > 0.0) {
            return Err(CaveError::InvalidWallHeight(self.wall_height));
        }

        let square_grid = SquareGrid::build(grid, self.square_size)?;
        let triangulation = triangulate(&square_grid);

        let mut tracer = OutlineTracer::new(&triangulation.triangle_map);
        if self.mark_solid_interior {
            tracer = tracer.with_checked(&triangulation.solid_vertices);
        }
        let outlines = tracer.trace();

        let walls = build_walls(&outlines, &triangulation.vertices, self.wall_height)?;

        debug_log(&format!(
            "[mesh] {}x{} squares: floor {} verts, {} tris; {} outlines; walls {} verts, {} tris",
            square_grid.squares_x(),
            square_grid.squares_y(),
            triangulation.vertices.len(),
            triangulation.triangle_count(),
            outlines.len(),
            walls.vertex_count(),
            walls.triangle_count()
        ));

        if cfg!(debug_assertions) && !triangulation.vertices.is_empty() {
            let duplicates = count_duplicate_positions(&triangulation.vertices, 1e-4);
            if duplicates > 0 {
                debug_log(&format!("[mesh] WARNING: {} duplicate floor positions", duplicates));
            }
            let check = validate_mesh(&triangulation.indices);
            debug_log(&format!(
                "[mesh] floor open edges: {}, over-shared edges: {}",
                check.boundary_edges.len(),
                check.non_manifold_edges.len()
            ));
        }

        Ok(CaveMesh {
            floor: MeshData::new(triangulation.vertices, triangulation.indices),
            walls,
            outlines,
        })
    }
}

/// Full pipeline from parameters to a meshed cave.
#[derive(Clone, Debug, Default)]
pub struct CaveGenerator {
    params: CaveParams,
}

impl CaveGenerator {
    pub fn new(params: CaveParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CaveParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut CaveParams {
        &mut self.params
    }

    /// Generate a cave. A `Random` seed is drawn here and reported back in
    /// [`CaveMap::seed`].
    pub fn generate(&self) -> CaveResult<CaveMap> {
        self.params.validate()?;
        let seed = self.params.seed.resolve();
        debug_log(&format!("[generate] seed {} -> {}", self.params.seed, seed));
        self.generate_with_seed(seed)
    }

    /// Generate with an already resolved seed, ignoring `params.seed`.
    pub fn generate_with_seed(&self, seed: u64) -> CaveResult<CaveMap> {
        self.params.validate()?;
        let grid = self.build_grid(seed)?;
        let mesh = MeshGenerator::from_params(&self.params).generate(&grid)?;
        Ok(CaveMap { seed, grid, mesh })
    }

    /// Fill, smooth, prune and frame a grid without meshing it.
    pub fn build_grid(&self, seed: u64) -> CaveResult<OccupancyGrid> {
        let p = &self.params;
        let mut grid = fill_with_mode(p.width, p.height, p.fill_percent, seed, p.fill_mode)?;
        debug_log(&format_wall_ratio("fill", grid.count(CellState::Wall), grid.len()));

        smooth(&mut grid, p.smoothing_iterations, p.floor_level, p.smoothing_mode);
        debug_log(&format_wall_ratio("smooth", grid.count(CellState::Wall), grid.len()));

        if let Some(min_size) = p.min_island_size {
            let result = prune_small_islands(&mut grid, p.prune_target, min_size);
            debug_log(&format!(
                "[prune] {:?} islands: {} found, {} cleared ({} cells)",
                p.prune_target, result.islands_found, result.islands_cleared, result.cells_cleared
            ));
        }

        if p.border_thickness > 0 {
            grid = grid.with_border(p.border_thickness);
        }

        Ok(grid)
    }
}
