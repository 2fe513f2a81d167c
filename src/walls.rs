//! Wall extrusion along traced outlines.
//!
//! Every outline segment becomes its own quad: the two floor-level endpoints
//! plus the same points pushed down by `wall_height`. Quads do not share
//! vertices with each other or with the floor, so each wall face keeps a flat
//! normal after recalculation.

use crate::error::{CaveError, CaveResult};
use crate::marching_squares::UP;
use crate::mesh_postprocess::MeshData;
use crate::outline::Outline;

/// Wall extrusion depth used when none is given.
pub const DEFAULT_WALL_HEIGHT: f32 = 5.0;

const VERTICES_PER_QUAD: usize = 4;
const INDICES_PER_QUAD: usize = 6;

/// Extrude `outlines` over the floor `vertices` into a wall mesh.
pub fn build_walls(
    outlines: &[Outline],
    vertices: &[[f32; 3]],
    wall_height: f32,
) -> CaveResult<MeshData> {
    if !(wall_height.is_finite() && wall_height > 0.0) {
        return Err(CaveError::InvalidWallHeight(wall_height));
    }

    let segment_count: usize = outlines.iter().map(|o| o.len().saturating_sub(1)).sum();
    let mut walls = MeshData {
        vertices: Vec::with_capacity(segment_count * VERTICES_PER_QUAD),
        normals: Vec::new(),
        indices: Vec::with_capacity(segment_count * INDICES_PER_QUAD),
    };

    let drop = [UP[0] * wall_height, UP[1] * wall_height, UP[2] * wall_height];
    let lookup = |index: u32| -> CaveResult<[f32; 3]> {
        vertices
            .get(index as usize)
            .copied()
            .ok_or(CaveError::VertexOutOfRange {
                index,
                vertex_count: vertices.len(),
            })
    };

    for outline in outlines {
        for (a, b) in outline.segments() {
            let left = lookup(a)?;
            let right = lookup(b)?;
            let start = walls.vertices.len() as u32;

            walls.vertices.push(left); // top left
            walls.vertices.push(right); // top right
            walls.vertices.push(sub(left, drop)); // bottom left
            walls.vertices.push(sub(right, drop)); // bottom right

            walls
                .indices
                .extend_from_slice(&[start, start + 2, start + 3, start + 3, start + 1, start]);
        }
    }

    Ok(walls)
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}
