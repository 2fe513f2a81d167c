//! Boundary outline extraction.
//!
//! An edge is on the outline when exactly one triangle uses it. Outlines are
//! found by scanning vertices in index order; each unchecked vertex with an
//! unchecked outline neighbour seeds a new outline that follows the chain of
//! unchecked outline neighbours until none is left, then closes back on the
//! seed. The chase is an explicit loop, so long coastlines cost no stack.

use crate::error::CaveResult;
use crate::marching_squares::VertexTriangleMap;

/// Ordered vertex indices along a boundary, first index repeated at the end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outline {
    pub vertices: Vec<u32>,
}

impl Outline {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.vertices.len() >= 3 && self.vertices.first() == self.vertices.last()
    }

    /// Consecutive vertex pairs.
    pub fn segments(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.vertices.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Follows boundary edges of a triangulated mesh.
pub struct OutlineTracer<'a> {
    map: &'a VertexTriangleMap,
    checked: Vec<bool>,
}

impl<'a> OutlineTracer<'a> {
    pub fn new(map: &'a VertexTriangleMap) -> Self {
        Self {
            map,
            checked: vec![false; map.vertex_count()],
        }
    }

    /// Pre-mark vertices that can never lie on an outline.
    pub fn with_checked(mut self, vertices: &[u32]) -> Self {
        for &v in vertices {
            if let Some(slot) = self.checked.get_mut(v as usize) {
                *slot = true;
            }
        }
        self
    }

    /// True when exactly one triangle contains both `a` and `b`.
    pub fn is_outline_edge(&self, a: u32, b: u32) -> bool {
        let mut shared = 0;
        for triangle in self.map.triangles_containing(a) {
            if triangle.contains(b) {
                shared += 1;
                if shared > 1 {
                    break;
                }
            }
        }
        shared == 1
    }

    fn is_checked(&self, vertex: u32) -> bool {
        self.checked[vertex as usize]
    }

    /// First unchecked neighbour of `vertex` across an outline edge.
    fn connected_outline_vertex(&self, vertex: u32) -> Option<u32> {
        for triangle in self.map.triangles_containing(vertex) {
            for &other in &triangle.vertices {
                if other != vertex
                    && !self.is_checked(other)
                    && self.is_outline_edge(vertex, other)
                {
                    return Some(other);
                }
            }
        }
        None
    }

    /// Trace every outline in the mesh.
    pub fn trace(mut self) -> Vec<Outline> {
        let mut outlines = Vec::new();

        for seed in 0..self.checked.len() as u32 {
            if self.is_checked(seed) {
                continue;
            }
            let Some(first) = self.connected_outline_vertex(seed) else {
                continue;
            };

            self.checked[seed as usize] = true;
            let mut outline = Outline {
                vertices: vec![seed],
            };

            let mut next = Some(first);
            while let Some(vertex) = next {
                outline.vertices.push(vertex);
                self.checked[vertex as usize] = true;
                next = self.connected_outline_vertex(vertex);
            }

            outline.vertices.push(seed);
            outlines.push(outline);
        }

        outlines
    }
}

/// Trace outlines straight from vertex/index buffers.
pub fn trace_outlines(vertex_count: usize, indices: &[u32]) -> CaveResult<Vec<Outline>> {
    let map = VertexTriangleMap::from_indices(vertex_count, indices)?;
    Ok(OutlineTracer::new(&map).trace())
}
