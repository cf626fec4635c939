//! Mesh geometry container
//!
//! Pure vertex/index data with no rendering backend attached. The vertex
//! layout is `#[repr(C)]` and Pod so a renderer can upload the buffers
//! unchanged; the collision suite consumes the same data on the CPU for
//! ray-mesh tests.

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::Vec3;
use crate::geometry::aabb::Aabb;
use crate::scene::graph::NodeKey;
use crate::scene::object::SceneObject;

/// 3D vertex with position, normal, texture coordinate, and tangent
///
/// The `#[repr(C)]` layout is stable across platforms, which is what GPU
/// buffer uploads and vertex-input descriptions rely on. Twelve floats,
/// no implicit padding.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in 3D space
    pub position: [f32; 3],

    /// Normal vector
    pub normal: [f32; 3],

    /// Texture coordinates
    pub tex_coord: [f32; 2],

    /// Tangent vector for normal mapping
    pub tangent: [f32; 3],

    /// Padding for alignment
    pub _padding: f32,
}

impl Vertex {
    /// Create a new vertex with a zero tangent
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coord,
            tangent: [0.0, 0.0, 0.0],
            _padding: 0.0,
        }
    }

    /// Create a new vertex with tangent
    pub fn new_with_tangent(
        position: [f32; 3],
        normal: [f32; 3],
        tex_coord: [f32; 2],
        tangent: [f32; 3],
    ) -> Self {
        Self {
            position,
            normal,
            tex_coord,
            tangent,
            _padding: 0.0,
        }
    }

    /// Position as a math vector
    pub fn position_vec(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    /// Normal as a math vector
    pub fn normal_vec(&self) -> Vec3 {
        Vec3::from(self.normal)
    }
}

/// Triangle-mesh scene object
///
/// Owned by a [`MeshManager`](crate::scene::manager::MeshManager) and
/// referenced from a scene node by UID. The local AABB is recomputed
/// whenever geometry is set, so `local_aabb()` is a constant-time read.
#[derive(Debug, Clone)]
pub struct Mesh {
    uid: String,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    local_aabb: Aabb,
    material: Option<String>,
    attached_node: Option<NodeKey>,
    pick_layers: u32,
}

impl Mesh {
    /// Create an empty mesh
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            vertices: Vec::new(),
            indices: Vec::new(),
            local_aabb: Aabb::default(),
            material: None,
            attached_node: None,
            pick_layers: crate::collision::layers::PickLayers::ALL,
        }
    }

    /// Replace the mesh geometry and recompute the local bounding box
    ///
    /// `indices` must come in triangles (length divisible by 3) and refer
    /// to valid vertices.
    pub fn set_geometry(&mut self, vertices: Vec<Vertex>, indices: Vec<u32>) {
        debug_assert!(indices.len() % 3 == 0, "index count must be a multiple of 3");
        debug_assert!(
            indices.iter().all(|&i| (i as usize) < vertices.len()),
            "index out of vertex range"
        );
        self.vertices = vertices;
        self.indices = indices;
        self.local_aabb = compute_aabb(&self.vertices);
    }

    /// Vertex buffer
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Index buffer (triangle list)
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// The i-th triangle's vertices
    pub fn triangle(&self, i: usize) -> (Vertex, Vertex, Vertex) {
        let base = i * 3;
        (
            self.vertices[self.indices[base] as usize],
            self.vertices[self.indices[base + 1] as usize],
            self.vertices[self.indices[base + 2] as usize],
        )
    }

    /// UID of the assigned path-tracer material, if any
    pub fn material(&self) -> Option<&str> {
        self.material.as_deref()
    }

    /// Assign a material by UID (resolved against a
    /// [`MaterialLibrary`](crate::material::MaterialLibrary))
    pub fn set_material(&mut self, material_uid: impl Into<String>) {
        self.material = Some(material_uid.into());
    }

    /// Set the layer mask used by filtered pick queries
    pub fn set_pick_layers(&mut self, layers: u32) {
        self.pick_layers = layers;
    }
}

impl SceneObject for Mesh {
    fn uid(&self) -> &str {
        &self.uid
    }

    fn local_aabb(&self) -> Aabb {
        self.local_aabb
    }

    fn attached_node(&self) -> Option<NodeKey> {
        self.attached_node
    }

    fn set_attached_node(&mut self, node: Option<NodeKey>) {
        self.attached_node = node;
    }

    fn pick_layers(&self) -> u32 {
        self.pick_layers
    }
}

fn compute_aabb(vertices: &[Vertex]) -> Aabb {
    let mut aabb = Aabb::default();
    for v in vertices {
        aabb.grow_to_point(v.position_vec());
    }
    aabb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mesh() {
        let mesh = Mesh::new("empty");
        assert_eq!(mesh.triangle_count(), 0);
        assert!(!mesh.local_aabb().is_valid());
    }

    #[test]
    fn test_set_geometry_updates_aabb() {
        let mut mesh = Mesh::new("tri");
        mesh.set_geometry(
            vec![
                Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
                Vertex::new([2.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
                Vertex::new([0.0, 3.0, -1.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
            ],
            vec![0, 1, 2],
        );

        assert_eq!(mesh.triangle_count(), 1);
        let aabb = mesh.local_aabb();
        assert_eq!(aabb.min, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(aabb.max, Vec3::new(2.0, 3.0, 0.0));
    }

    #[test]
    fn test_triangle_accessor() {
        let mut mesh = Mesh::new("tri");
        mesh.set_geometry(
            vec![
                Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
                Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
                Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
            ],
            vec![0, 2, 1],
        );

        let (a, b, c) = mesh.triangle(0);
        assert_eq!(a.position, [0.0, 0.0, 0.0]);
        assert_eq!(b.position, [0.0, 1.0, 0.0]);
        assert_eq!(c.position, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_vertex_is_pod_sized() {
        // 12 floats, no hidden padding: safe to memcpy into GPU buffers
        assert_eq!(std::mem::size_of::<Vertex>(), 48);
        let v = Vertex::new([1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [0.5, 0.5]);
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 48);
    }
}
