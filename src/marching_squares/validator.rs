use std::collections::HashMap;

/// Result of checking a triangle index buffer's edge usage.
#[derive(Clone, Debug, Default)]
pub struct ValidationResult {
    /// Undirected edges used by exactly one triangle, `(min, max)` sorted.
    pub boundary_edges: Vec<(u32, u32)>,
    /// Edges used by more than two triangles.
    pub non_manifold_edges: Vec<(u32, u32)>,
    /// Triangles (by position in the buffer) that repeat a vertex.
    pub degenerate_triangles: Vec<usize>,
}

impl ValidationResult {
    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edges.is_empty() && self.degenerate_triangles.is_empty()
    }

    /// Closed surface: every edge is shared by exactly two triangles.
    pub fn is_watertight(&self) -> bool {
        self.boundary_edges.is_empty() && self.is_manifold()
    }
}

/// Canonical undirected edge key, so (A,B) == (B,A).
#[inline]
pub fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Count every triangle edge and classify it by how many triangles use it.
pub fn validate_mesh(indices: &[u32]) -> ValidationResult {
    let mut edge_counts: HashMap<(u32, u32), u32> = HashMap::new();
    let mut result = ValidationResult::default();

    for (tri_idx, tri) in indices.chunks_exact(3).enumerate() {
        let (v0, v1, v2) = (tri[0], tri[1], tri[2]);
        if v0 == v1 || v1 == v2 || v0 == v2 {
            result.degenerate_triangles.push(tri_idx);
            continue;
        }
        for (a, b) in [(v0, v1), (v1, v2), (v2, v0)] {
            *edge_counts.entry(edge_key(a, b)).or_insert(0) += 1;
        }
    }

    for (edge, count) in edge_counts {
        match count {
            1 => result.boundary_edges.push(edge),
            2 => {}
            _ => result.non_manifold_edges.push(edge),
        }
    }
    result.boundary_edges.sort_unstable();
    result.non_manifold_edges.sort_unstable();

    result
}
