use crate::debug_log::debug_log;
use crate::marching_squares::UP;

/// Vertex and triangle buffers for one mesh surface.
///
/// `normals` stays empty until [`MeshPostProcessor::recompute_normals`] runs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            normals: Vec::new(),
            indices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty() && self.normals.len() == self.vertices.len()
    }

    fn indices_in_range(&self) -> bool {
        let max_idx = self.vertices.len() as u32;
        self.indices.len() % 3 == 0 && self.indices.iter().all(|&idx| idx < max_idx)
    }
}

/// Consumer-side mesh finishing: normals and GPU-friendly triangle order.
pub struct MeshPostProcessor {
    /// Faces meeting at a vertex at more than this angle (degrees) are not blended.
    pub normal_angle_threshold: f32,
    pub optimize_vertex_cache: bool,
}

impl Default for MeshPostProcessor {
    fn default() -> Self {
        Self {
            normal_angle_threshold: 60.0,
            optimize_vertex_cache: false,
        }
    }
}

impl MeshPostProcessor {
    pub fn new(normal_angle_threshold: f32, optimize_vertex_cache: bool) -> Self {
        Self {
            normal_angle_threshold,
            optimize_vertex_cache,
        }
    }

    /// Recompute per-vertex normals from the triangles around each vertex.
    ///
    /// Face normals are accumulated area-weighted. A face that is sharp
    /// against every other face at the vertex is left out, so a floor vertex on
    /// an outline does not pick up the vertical wall's direction.
    pub fn recompute_normals(&self, mesh: &mut MeshData) {
        if mesh.indices.is_empty() || mesh.vertices.is_empty() {
            mesh.normals = vec![UP; mesh.vertices.len()];
            return;
        }

        if !mesh.indices_in_range() {
            debug_log("[recompute_normals] Index buffer out of range, skipping");
            return;
        }

        let threshold_cos = self.normal_angle_threshold.to_radians().cos();

        // Area-weighted (raw cross product) for accumulation, unit for angle tests
        let triangle_count = mesh.triangle_count();
        let mut face_normals_weighted: Vec<[f32; 3]> = Vec::with_capacity(triangle_count);
        let mut face_normals_unit: Vec<[f32; 3]> = Vec::with_capacity(triangle_count);
        let mut face_areas: Vec<f32> = Vec::with_capacity(triangle_count);

        for tri in mesh.indices.chunks_exact(3) {
            let v0 = mesh.vertices[tri[0] as usize];
            let v1 = mesh.vertices[tri[1] as usize];
            let v2 = mesh.vertices[tri[2] as usize];

            let normal = face_normal(v0, v1, v2);
            face_normals_weighted.push(normal);
            face_normals_unit.push(normalize(normal));
            face_areas.push(length(normal) * 0.5);
        }

        let mut vertex_faces: Vec<Vec<usize>> = vec![Vec::new(); mesh.vertices.len()];
        for (face_idx, tri) in mesh.indices.chunks_exact(3).enumerate() {
            for &vertex_idx in tri {
                vertex_faces[vertex_idx as usize].push(face_idx);
            }
        }

        let mut new_normals = vec![UP; mesh.vertices.len()];

        for (vertex_idx, faces) in vertex_faces.iter().enumerate() {
            if faces.is_empty() {
                continue;
            }

            let mut accumulated = [0.0f32; 3];
            let mut largest_face_idx = faces[0];
            let mut largest_face_area = face_areas[faces[0]];

            for &face_idx in faces {
                if face_areas[face_idx] > largest_face_area {
                    largest_face_area = face_areas[face_idx];
                    largest_face_idx = face_idx;
                }

                let unit = face_normals_unit[face_idx];
                let smooth_with_any = faces.iter().any(|&other| {
                    other != face_idx && dot(unit, face_normals_unit[other]) >= threshold_cos
                });

                if faces.len() == 1 || smooth_with_any {
                    let n = face_normals_weighted[face_idx];
                    accumulated[0] += n[0];
                    accumulated[1] += n[1];
                    accumulated[2] += n[2];
                }
            }

            // All faces mutually sharp: fall back to the largest one
            if accumulated == [0.0, 0.0, 0.0] {
                accumulated = face_normals_unit[largest_face_idx];
            }

            new_normals[vertex_idx] = normalize(accumulated);
        }

        mesh.normals = new_normals;
    }

    /// Reorder triangles for the post-transform vertex cache.
    ///
    /// Vertex buffers are untouched; only the triangle order changes.
    pub fn optimize_triangle_order(&self, mesh: &mut MeshData) {
        if mesh.indices.is_empty() || !mesh.indices_in_range() {
            return;
        }
        mesh.indices = meshopt::optimize_vertex_cache(&mesh.indices, mesh.vertices.len());
    }

    /// Run normals, then cache reordering when enabled.
    pub fn process(&self, mesh: &mut MeshData) {
        self.recompute_normals(mesh);
        if self.optimize_vertex_cache {
            self.optimize_triangle_order(mesh);
            debug_log(&format!(
                "[process] Reordered {} tris for vertex cache",
                mesh.triangle_count()
            ));
        }
    }
}

/// Unnormalised normal of triangle `(v0, v1, v2)`; its length is twice the area.
pub fn face_normal(v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) -> [f32; 3] {
    let edge1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
    let edge2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
    cross(edge1, edge2)
}

// Vector math helpers
fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn length(v: [f32; 3]) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

/// Epsilon for near-zero length checks (appropriate for f32 precision)
const NORMAL_EPSILON: f32 = 1e-6;

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = length(v);
    if len > NORMAL_EPSILON {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        UP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: [f32; 3], b: [f32; 3]) -> bool {
        (0..3).all(|i| (a[i] - b[i]).abs() < 1e-4)
    }

    // Two triangles on the XZ plane wound so their normal faces +Y
    fn floor_quad() -> MeshData {
        MeshData::new(
            vec![
                [0.0, 0.0, 1.0],
                [1.0, 0.0, 1.0],
                [1.0, 0.0, 0.0],
                [0.0, 0.0, 0.0],
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn test_floor_normals_point_up() {
        let mut mesh = floor_quad();
        MeshPostProcessor::default().recompute_normals(&mut mesh);
        assert!(mesh.has_normals());
        for n in &mesh.normals {
            assert!(approx(*n, UP), "expected up normal, got {:?}", n);
        }
    }

    #[test]
    fn test_sharp_faces_are_not_blended() {
        // floor quad plus a wall hanging off its z=0 edge
        let mut mesh = floor_quad();
        mesh.vertices.push([1.0, -1.0, 0.0]);
        mesh.vertices.push([0.0, -1.0, 0.0]);
        mesh.indices.extend_from_slice(&[3, 2, 4, 4, 5, 3]);

        MeshPostProcessor::new(45.0, false).recompute_normals(&mut mesh);

        // vertex 0 only touches the floor
        assert!(approx(mesh.normals[0], UP));
        // wall-only vertex keeps the wall's direction
        let n = mesh.normals[5];
        assert!(n[1].abs() < 1e-4, "wall normal should be horizontal, got {:?}", n);
        assert!((length(n) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_normals_are_unit_length() {
        let mut mesh = MeshData::new(
            vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 4.0]],
            vec![0, 1, 2, 0, 2, 3, 0, 3, 1],
        );
        MeshPostProcessor::new(180.0, false).recompute_normals(&mut mesh);
        for n in &mesh.normals {
            assert!((length(*n) - 1.0).abs() < 1e-4, "{:?}", n);
        }
    }

    #[test]
    fn test_out_of_range_indices_are_ignored() {
        let mut mesh = MeshData::new(vec![[0.0; 3]; 2], vec![0, 1, 7]);
        MeshPostProcessor::default().process(&mut mesh);
        assert!(mesh.normals.is_empty());
    }

    #[test]
    fn test_unreferenced_vertex_defaults_up() {
        let mut mesh = floor_quad();
        mesh.vertices.push([5.0, 5.0, 5.0]);
        MeshPostProcessor::default().recompute_normals(&mut mesh);
        assert_eq!(mesh.normals.len(), 5);
        assert_eq!(mesh.normals[4], UP);
    }

    #[test]
    fn test_cache_optimisation_keeps_triangles() {
        let mut mesh = MeshData::new(
            (0..9).map(|i| [(i % 3) as f32, 0.0, (i / 3) as f32]).collect(),
            vec![0, 1, 4, 0, 4, 3, 1, 2, 5, 1, 5, 4, 3, 4, 7, 3, 7, 6, 4, 5, 8, 4, 8, 7],
        );
        let mut before: Vec<[u32; 3]> = mesh.indices.chunks(3).map(|t| canonical(t)).collect();
        MeshPostProcessor::new(60.0, true).process(&mut mesh);
        let mut after: Vec<[u32; 3]> = mesh.indices.chunks(3).map(|t| canonical(t)).collect();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after, "reordering must keep the same triangle set");
        assert_eq!(mesh.vertices.len(), 9);
    }

    // rotation that starts at the smallest index, preserving winding
    fn canonical(t: &[u32]) -> [u32; 3] {
        let min = (0..3).min_by_key(|&i| t[i]).unwrap_or(0);
        [t[min], t[(min + 1) % 3], t[(min + 2) % 3]]
    }

    #[test]
    fn test_face_normal_length_is_twice_area() {
        let n = face_normal([0.0, 0.0, 0.0], [0.0, 0.0, 2.0], [2.0, 0.0, 0.0]);
        assert!((length(n) - 4.0).abs() < 1e-5);
        assert!(n[1] > 0.0);
    }
}
