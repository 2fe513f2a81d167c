use super::square_grid::SquareGrid;
use super::types::NodeId;

/// Lazily assigns mesh vertex indices to lattice nodes.
///
/// The first time a node is referenced it gets the next sequential index and
/// its position is appended to the vertex buffer; later references reuse that
/// index. A node's index never changes once assigned.
#[derive(Clone, Debug, Default)]
pub struct VertexAssigner {
    assigned: Vec<Option<u32>>,
    vertices: Vec<[f32; 3]>,
}

impl VertexAssigner {
    pub fn new(node_count: usize) -> Self {
        Self {
            assigned: vec![None; node_count],
            vertices: Vec::new(),
        }
    }

    /// Mesh vertex index for `node`, allocating it on first use.
    pub fn assign(&mut self, grid: &SquareGrid, node: NodeId) -> u32 {
        if let Some(index) = self.assigned[node.index()] {
            return index;
        }
        let index = self.vertices.len() as u32;
        self.vertices.push(grid.node(node).position);
        self.assigned[node.index()] = Some(index);
        index
    }

    /// Already-assigned index, if any.
    pub fn get(&self, node: NodeId) -> Option<u32> {
        self.assigned.get(node.index()).copied().flatten()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertices(&self) -> &[[f32; 3]] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<[f32; 3]> {
        self.vertices
    }
}
