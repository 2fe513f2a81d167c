use crate::error::{CaveError, CaveResult};

use super::cases::{case_points, fan_triangles};
use super::square_grid::SquareGrid;
use super::types::{NodeId, Square};
use super::vertex::VertexAssigner;

/// Ordered triple of mesh vertex indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Triangle {
    pub vertices: [u32; 3],
}

impl Triangle {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self { vertices: [a, b, c] }
    }

    pub fn contains(&self, vertex: u32) -> bool {
        self.vertices.contains(&vertex)
    }
}

/// Vertex index -> triangles that reference it.
#[derive(Clone, Debug, Default)]
pub struct VertexTriangleMap {
    triangles: Vec<Triangle>,
    by_vertex: Vec<Vec<usize>>,
}

impl VertexTriangleMap {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            triangles: Vec::new(),
            by_vertex: vec![Vec::new(); vertex_count],
        }
    }

    /// Build from a flat index buffer, rejecting out-of-range indices.
    pub fn from_indices(vertex_count: usize, indices: &[u32]) -> CaveResult<Self> {
        if indices.len() % 3 != 0 {
            return Err(CaveError::MalformedIndexBuffer(indices.len()));
        }
        let mut map = Self::new(vertex_count);
        for tri in indices.chunks_exact(3) {
            for &index in tri {
                if index as usize >= vertex_count {
                    return Err(CaveError::VertexOutOfRange {
                        index,
                        vertex_count,
                    });
                }
            }
            map.add(Triangle::new(tri[0], tri[1], tri[2]));
        }
        Ok(map)
    }

    pub fn add(&mut self, triangle: Triangle) {
        let id = self.triangles.len();
        for &v in &triangle.vertices {
            let v = v as usize;
            if v >= self.by_vertex.len() {
                self.by_vertex.resize(v + 1, Vec::new());
            }
            self.by_vertex[v].push(id);
        }
        self.triangles.push(triangle);
    }

    pub fn triangles_containing(&self, vertex: u32) -> impl Iterator<Item = &Triangle> + '_ {
        self.by_vertex
            .get(vertex as usize)
            .into_iter()
            .flatten()
            .map(move |&id| &self.triangles[id])
    }

    /// Number of triangles that contain both `a` and `b`.
    pub fn shared_triangle_count(&self, a: u32, b: u32) -> usize {
        self.triangles_containing(a).filter(|t| t.contains(b)).count()
    }

    pub fn vertex_count(&self) -> usize {
        self.by_vertex.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }
}

/// Floor mesh produced from a square grid.
#[derive(Clone, Debug, Default)]
pub struct Triangulation {
    pub vertices: Vec<[f32; 3]>,
    /// Flat triangle list, three indices per triangle, in emission order.
    pub indices: Vec<u32>,
    pub triangle_map: VertexTriangleMap,
    /// Corners of fully solid squares, sorted and unique.
    pub solid_vertices: Vec<u32>,
}

impl Triangulation {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Walks every square and emits its case fan over shared vertices.
pub struct Triangulator<'a> {
    grid: &'a SquareGrid,
    assigner: VertexAssigner,
    indices: Vec<u32>,
    triangle_map: VertexTriangleMap,
    solid_vertices: Vec<u32>,
}

impl<'a> Triangulator<'a> {
    pub fn new(grid: &'a SquareGrid) -> Self {
        Self {
            grid,
            assigner: VertexAssigner::new(grid.node_count()),
            indices: Vec::new(),
            triangle_map: VertexTriangleMap::default(),
            solid_vertices: Vec::new(),
        }
    }

    /// Triangulate all squares in grid order and return the mesh.
    pub fn run(mut self) -> Triangulation {
        let grid = self.grid;
        for square in grid.squares() {
            self.triangulate_square(square);
        }
        self.finish()
    }

    /// Emit one square's fan. Returns the number of points in its case.
    pub fn triangulate_square(&mut self, square: &Square) -> usize {
        let points = case_points(square.configuration);
        let nodes: Vec<NodeId> = points.iter().map(|&p| square.node(p)).collect();
        let vertices: Vec<u32> = nodes
            .iter()
            .map(|&node| self.assigner.assign(self.grid, node))
            .collect();

        for [a, b, c] in fan_triangles(&vertices) {
            self.create_triangle(a, b, c);
        }

        // A fully solid square's corners are interior to the mesh.
        if square.configuration.is_solid() {
            self.solid_vertices.extend_from_slice(&vertices);
        }

        points.len()
    }

    fn create_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
        self.triangle_map.add(Triangle::new(a, b, c));
    }

    pub fn finish(self) -> Triangulation {
        let mut solid_vertices = self.solid_vertices;
        solid_vertices.sort_unstable();
        solid_vertices.dedup();

        let vertices = self.assigner.into_vertices();
        let mut triangle_map = self.triangle_map;
        if triangle_map.vertex_count() < vertices.len() {
            // vertices with no triangle still get an (empty) adjacency slot
            triangle_map.by_vertex.resize(vertices.len(), Vec::new());
        }

        Triangulation {
            vertices,
            indices: self.indices,
            triangle_map,
            solid_vertices,
        }
    }
}

/// Triangulate a whole square grid.
pub fn triangulate(grid: &SquareGrid) -> Triangulation {
    Triangulator::new(grid).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cave_grid::{CellState, OccupancyGrid};
    use crate::debug_log::count_duplicate_positions;

    fn triangulate_rows(rows: &[&str]) -> (SquareGrid, Triangulation) {
        let grid = OccupancyGrid::from_rows(rows).unwrap();
        let sg = SquareGrid::build(&grid, 1.0).unwrap();
        let tri = triangulate(&sg);
        (sg, tri)
    }

    #[test]
    fn test_empty_grid_emits_nothing() {
        let (_, tri) = triangulate_rows(&["...", "...", "..."]);
        assert!(tri.vertices.is_empty());
        assert!(tri.indices.is_empty());
    }

    #[test]
    fn test_solid_square() {
        let (_, tri) = triangulate_rows(&["##", "##"]);
        assert_eq!(tri.vertices.len(), 4);
        assert_eq!(tri.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(tri.solid_vertices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_triangle_count_matches_fan_size() {
        for bits in 0..16u8 {
            // corners: bottom-left (0,0), bottom-right (1,0), top-right (1,1), top-left (0,1)
            let c = |bit: u8| if bits & bit != 0 { '#' } else { '.' };
            let bottom: String = [c(1), c(2)].iter().collect();
            let top: String = [c(8), c(4)].iter().collect();
            let (sg, tri) = triangulate_rows(&[bottom.as_str(), top.as_str()]);
            assert_eq!(sg.square(0, 0).configuration.bits(), bits);
            let points = case_points(sg.square(0, 0).configuration).len();
            assert_eq!(tri.vertices.len(), points, "configuration {}", bits);
            assert_eq!(tri.triangle_count(), points.saturating_sub(2), "configuration {}", bits);
        }
    }

    #[test]
    fn test_triangles_have_distinct_valid_indices() {
        let (_, tri) = triangulate_rows(&["#####", "#..##", "#.#.#", "##..#", "#####"]);
        for t in tri.indices.chunks(3) {
            assert!(t[0] != t[1] && t[1] != t[2] && t[0] != t[2], "degenerate {:?}", t);
            for &i in t {
                assert!((i as usize) < tri.vertices.len());
            }
        }
    }

    #[test]
    fn test_single_wall_cell_shares_midpoints() {
        // 3 wide x 4 tall, the single wall at (1, 2); the ground row is open
        // here so only the squares around (1, 2) produce geometry.
        let (sg, tri) = triangulate_rows(&["...", "...", ".#.", "..."]);

        let lower_left = sg.square(0, 1);
        let lower_right = sg.square(1, 1);
        let upper_left = sg.square(0, 2);
        let upper_right = sg.square(1, 2);
        assert_eq!(lower_left.configuration.bits(), 4);
        assert_eq!(lower_right.configuration.bits(), 8);
        assert_eq!(upper_left.configuration.bits(), 2);
        assert_eq!(upper_right.configuration.bits(), 1);

        // four single-corner fans around the same control node
        assert_eq!(tri.triangle_count(), 4);
        // the corner plus its four surrounding midpoints
        assert_eq!(tri.vertices.len(), 5);

        // lower-left's right midpoint is lower-right's left midpoint: one vertex
        let shared = lower_left.center_right;
        assert_eq!(shared, lower_right.center_left);
        let triangles = tri.triangle_map.triangles();
        let shared_vertex = (0..tri.vertices.len() as u32)
            .find(|&v| tri.vertices[v as usize] == sg.node(shared).position)
            .unwrap();
        let users = triangles.iter().filter(|t| t.contains(shared_vertex)).count();
        assert_eq!(users, 2);
    }

    #[test]
    fn test_single_wall_cell_above_ground_row() {
        // same wall at (1, 2), this time over a solid ground row
        let (sg, tri) = triangulate_rows(&["###", "...", ".#.", "..."]);

        assert_eq!(sg.square(0, 0).configuration.bits(), 3);
        assert_eq!(sg.square(1, 0).configuration.bits(), 3);
        assert_eq!(sg.square(0, 1).configuration.bits(), 4);
        assert_eq!(sg.square(1, 1).configuration.bits(), 8);
        assert_eq!(sg.square(0, 2).configuration.bits(), 2);
        assert_eq!(sg.square(1, 2).configuration.bits(), 1);

        // two triangles per ground square, one per corner square
        assert_eq!(tri.triangle_count(), 8);
        // ground strip: 3 corners + 3 midpoints; diamond: corner + 4 midpoints
        assert_eq!(tri.vertices.len(), 11);
        assert_eq!(count_duplicate_positions(&tri.vertices, 0.001), 0);

        let shared = sg.square(0, 1).center_right;
        assert_eq!(shared, sg.square(1, 1).center_left);
        let shared_vertex = (0..tri.vertices.len() as u32)
            .find(|&v| tri.vertices[v as usize] == sg.node(shared).position)
            .unwrap();
        let users = tri
            .triangle_map
            .triangles()
            .iter()
            .filter(|t| t.contains(shared_vertex))
            .count();
        assert_eq!(users, 2);
    }

    #[test]
    fn test_single_corner_in_isolated_square() {
        // only the top-left corner of the first square is solid
        let (sg, tri) = triangulate_rows(&["...", "#..", "...", "..."]);
        assert_eq!(sg.square(0, 0).configuration.bits(), 8);
        assert_eq!(sg.square(0, 1).configuration.bits(), 1);
        assert_eq!(tri.triangle_count(), 2);
        // corner + 2 midpoints in the lower square, 1 new midpoint in the upper one
        assert_eq!(tri.vertices.len(), 4);
    }

    #[test]
    fn test_vertex_order_follows_square_walk() {
        let (sg, tri) = triangulate_rows(&["##", "##"]);
        let square = sg.square(0, 0);
        assert_eq!(tri.vertices[0], sg.node(square.top_left).position);
        assert_eq!(tri.vertices[3], sg.node(square.bottom_left).position);
    }

    #[test]
    fn test_no_duplicate_positions() {
        let (_, tri) = triangulate_rows(&[
            "########", "#..#...#", "#.##.#.#", "#....#.#", "##.#...#", "########",
        ]);
        assert_eq!(count_duplicate_positions(&tri.vertices, 0.001), 0);
    }

    #[test]
    fn test_vertex_triangle_map_from_indices() {
        let map = VertexTriangleMap::from_indices(4, &[0, 1, 2, 0, 2, 3]).unwrap();
        assert_eq!(map.triangle_count(), 2);
        assert_eq!(map.triangles_containing(0).count(), 2);
        assert_eq!(map.triangles_containing(1).count(), 1);
        assert_eq!(map.shared_triangle_count(0, 2), 2);
        assert_eq!(map.shared_triangle_count(1, 2), 1);
        assert_eq!(map.triangles_containing(9).count(), 0);

        assert_eq!(
            VertexTriangleMap::from_indices(2, &[0, 1, 2]).unwrap_err(),
            CaveError::VertexOutOfRange {
                index: 2,
                vertex_count: 2
            }
        );
        assert_eq!(
            VertexTriangleMap::from_indices(3, &[0, 1]).unwrap_err(),
            CaveError::MalformedIndexBuffer(2)
        );
    }

    #[test]
    fn test_solid_vertices_only_from_full_squares() {
        let grid = OccupancyGrid::new(3, 2, CellState::Wall).unwrap();
        let sg = SquareGrid::build(&grid, 1.0).unwrap();
        let tri = triangulate(&sg);
        assert_eq!(tri.solid_vertices.len(), 6);
        let (_, tri) = triangulate_rows(&["##.", "##."]);
        // only the left square is full
        assert_eq!(tri.solid_vertices.len(), 4);
    }
}
