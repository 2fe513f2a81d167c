use godot::classes::mesh::PrimitiveType;
use godot::classes::rendering_server::ArrayType;
use godot::classes::{ArrayMesh, IMeshInstance3D, MeshInstance3D};
use godot::prelude::*;

use crate::cave_generator::{CaveGenerator, CaveMap, CaveParams, MeshData, MeshGenerator};
use crate::cave_grid::CellState;
use crate::debug_log::init_debug_log;
use crate::island_prune::{prune_small_islands, DEFAULT_MIN_ISLAND_SIZE};
use crate::mesh_postprocess::MeshPostProcessor;
use crate::seed::SeedSource;

type VariantArray = Array<Variant>;

const WALLS_NODE_NAME: &str = "CaveWalls";

/// Cave map node: floor mesh on itself, walls on a child with trimesh collision.
#[derive(GodotClass)]
#[class(base=MeshInstance3D, init, tool)]
pub struct PixyCave {
    base: Base<MeshInstance3D>,

    #[export]
    #[init(val = 64)]
    width: i32,

    #[export]
    #[init(val = 48)]
    height: i32,

    /// Chance (percent) that a cell starts as wall
    #[export(range = (0.0, 100.0))]
    #[init(val = 47)]
    random_fill_percent: i32,

    #[export]
    seed: GString,

    #[export]
    #[init(val = true)]
    use_random_seed: bool,

    #[export]
    #[init(val = 5)]
    smoothing_iterations: i32,

    /// Rows at or below this count as wall while smoothing
    #[export(range = (0.0, 20.0))]
    #[init(val = 0)]
    floor_level: i32,

    #[export]
    #[init(val = 0)]
    border_thickness: i32,

    /// Wall islands smaller than this are removed by `remove_small_islands`
    #[export]
    #[init(val = 10)]
    min_island_size: i32,

    #[export]
    #[init(val = 1.0)]
    square_size: f32,

    #[export]
    #[init(val = 5.0)]
    wall_height: f32,

    #[export]
    #[init(val = false)]
    optimize_vertex_cache: bool,

    /// Write pipeline stage summaries to `debug_cave.log`
    #[export]
    #[init(val = false)]
    debug_logging: bool,

    map: Option<CaveMap>,
    walls_node: Option<Gd<MeshInstance3D>>,
}

#[godot_api]
impl IMeshInstance3D for PixyCave {
    fn ready(&mut self) {
        if self.debug_logging {
            init_debug_log();
        }
        self.generate_map();
    }
}

#[godot_api]
impl PixyCave {
    /// Generate a new cave from the exported parameters
    #[func]
    fn generate_map(&mut self) {
        let generator = CaveGenerator::new(self.params());
        match generator.generate() {
            Ok(map) => {
                godot_print!(
                    "PixyCave: generated {}x{} map (seed {}): {} floor tris, {} outlines",
                    map.grid.width(),
                    map.grid.height(),
                    map.seed,
                    map.mesh.floor.triangle_count(),
                    map.mesh.outlines.len()
                );
                self.upload(&map);
                self.map = Some(map);
            }
            Err(err) => godot_warn!("PixyCave: generation failed: {}", err),
        }
    }

    /// Clear wall islands below `min_island_size` and rebuild the meshes
    #[func]
    fn remove_small_islands(&mut self) {
        let Some(mut map) = self.map.take() else {
            godot_warn!("PixyCave: no map to prune, call generate_map first");
            return;
        };

        let min_size = usize::try_from(self.min_island_size).unwrap_or(DEFAULT_MIN_ISLAND_SIZE);
        let result = prune_small_islands(&mut map.grid, CellState::Wall, min_size);
        godot_print!(
            "PixyCave: removed {} of {} islands ({} cells)",
            result.islands_cleared,
            result.islands_found,
            result.cells_cleared
        );

        match MeshGenerator::new(self.square_size, self.wall_height).generate(&map.grid) {
            Ok(mesh) => {
                map.mesh = mesh;
                self.upload(&map);
            }
            Err(err) => godot_warn!("PixyCave: re-meshing failed: {}", err),
        }
        self.map = Some(map);
    }

    /// Drop the map and both meshes
    #[func]
    fn clear(&mut self) {
        self.map = None;
        self.base_mut().set_mesh(&Gd::<ArrayMesh>::default());
        self.free_walls_node();
        godot_print!("PixyCave cleared");
    }

    /// Seed of the current map, empty when there is none
    #[func]
    fn get_last_seed(&self) -> GString {
        match &self.map {
            Some(map) => GString::from(map.seed.to_string().as_str()),
            None => GString::new(),
        }
    }

    /// Grid as a flat byte array (row-major, 1 = wall)
    #[func]
    fn get_grid_bytes(&self) -> PackedByteArray {
        match &self.map {
            Some(map) => PackedByteArray::from(map.grid.to_bytes().as_slice()),
            None => PackedByteArray::new(),
        }
    }

    fn params(&self) -> CaveParams {
        CaveParams {
            width: self.width.max(0) as usize,
            height: self.height.max(0) as usize,
            fill_percent: self.random_fill_percent.clamp(0, 100) as u32,
            seed: SeedSource::from_settings(&self.seed.to_string(), self.use_random_seed),
            smoothing_iterations: self.smoothing_iterations.max(0) as u32,
            floor_level: i64::from(self.floor_level),
            border_thickness: self.border_thickness.max(0) as usize,
            square_size: self.square_size,
            wall_height: self.wall_height,
            ..Default::default()
        }
    }

    fn upload(&mut self, map: &CaveMap) {
        let processor = MeshPostProcessor {
            optimize_vertex_cache: self.optimize_vertex_cache,
            ..Default::default()
        };

        let mut floor = map.mesh.floor.clone();
        processor.process(&mut floor);
        let floor_mesh = to_array_mesh(&floor);
        self.base_mut().set_mesh(&floor_mesh);

        let mut walls = map.mesh.walls.clone();
        processor.process(&mut walls);

        // A fresh child each time, so old collision bodies go with the old node
        self.free_walls_node();
        let mut walls_node = MeshInstance3D::new_alloc();
        walls_node.set_name(WALLS_NODE_NAME);
        walls_node.set_mesh(&to_array_mesh(&walls));
        self.base_mut().add_child(&walls_node);
        if !walls.is_empty() {
            walls_node.create_trimesh_collision();
        }
        self.walls_node = Some(walls_node);
    }

    fn free_walls_node(&mut self) {
        if let Some(mut node) = self.walls_node.take() {
            if node.is_instance_valid() {
                node.queue_free();
            }
        }
    }
}

fn to_array_mesh(mesh: &MeshData) -> Gd<ArrayMesh> {
    let mut array_mesh = ArrayMesh::new_gd();
    if mesh.is_empty() {
        return array_mesh;
    }

    let vertices: Vec<Vector3> = mesh
        .vertices
        .iter()
        .map(|v| Vector3::new(v[0], v[1], v[2]))
        .collect();
    let normals: Vec<Vector3> = mesh
        .normals
        .iter()
        .map(|n| Vector3::new(n[0], n[1], n[2]))
        .collect();
    let indices: Vec<i32> = mesh.indices.iter().map(|&i| i as i32).collect();

    let packed_vertices = PackedVector3Array::from(&vertices[..]);
    let packed_normals = PackedVector3Array::from(&normals[..]);
    let packed_indices = PackedInt32Array::from(&indices[..]);

    // Every slot up to MAX must be present
    let num_arrays = ArrayType::MAX.ord() as usize;
    let mut arrays: VariantArray = VariantArray::new();
    for i in 0..num_arrays {
        if i == ArrayType::VERTEX.ord() as usize {
            arrays.push(&packed_vertices.to_variant());
        } else if i == ArrayType::NORMAL.ord() as usize && mesh.has_normals() {
            arrays.push(&packed_normals.to_variant());
        } else if i == ArrayType::INDEX.ord() as usize {
            arrays.push(&packed_indices.to_variant());
        } else {
            arrays.push(&Variant::nil());
        }
    }

    array_mesh.add_surface_from_arrays(PrimitiveType::TRIANGLES, &arrays);
    array_mesh
}
