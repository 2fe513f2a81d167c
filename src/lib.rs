pub mod cave_generator;
pub mod cave_grid;
pub mod debug_log;
pub mod error;
pub mod grid_fill;
pub mod grid_smooth;
pub mod island_prune;
pub mod marching_squares;
pub mod mesh_postprocess;
pub mod noise_field;
pub mod outline;
pub mod seed;
pub mod walls;

#[cfg(feature = "godot")]
mod cave_node;

pub use cave_generator::{CaveGenerator, CaveMap, CaveMesh, CaveParams, MeshData, MeshGenerator};
pub use cave_grid::{CellState, OccupancyGrid};
pub use error::{CaveError, CaveResult};

#[cfg(feature = "godot")]
use godot::prelude::*;

#[cfg(feature = "godot")]
struct PixyCaveExtension;

#[cfg(feature = "godot")]
#[gdextension]
unsafe impl ExtensionLibrary for PixyCaveExtension {}
