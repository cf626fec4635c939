//! # Scene Engine
//!
//! The geometric and spatial core of a 3D engine: a scene-graph
//! transform hierarchy, a rigid-body transform representation, and a
//! ray-intersection suite for collision testing and picking.
//!
//! ## Subsystems
//!
//! - **Transforms**: [`foundation::RigidTransform`] (position + unit
//!   quaternion, with matrix/Euler interconversion) and
//!   [`foundation::AffineTransform`] (adds scale; what scene nodes carry).
//! - **Scene graph**: [`scene::SceneGraph`], an arena-backed node tree
//!   with cached world-matrix evaluation and the [`scene::SceneObject`]
//!   attachment capability for meshes and lights.
//! - **Collision**: [`collision`] ray tests against AABBs, oriented
//!   boxes, spheres, triangles, and meshes, producing ordered hit
//!   records.
//! - **Picking**: [`picking`] maps screen points to world-space hits
//!   through the same collision routines.
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_engine::prelude::*;
//!
//! let mut graph = SceneGraph::new();
//! let node = graph.create_child(graph.root()).unwrap();
//! graph.node_mut(node).unwrap().local_transform_mut().position =
//!     Vec3::new(0.0, 0.0, -5.0);
//!
//! let mut meshes = MeshManager::new();
//! let mesh = meshes.create_mesh(&mut graph, node, "target").unwrap();
//! scene_engine::geometry::primitives::build_sphere(mesh, 1.0, 16, 8);
//!
//! let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
//! let world_aabb = meshes.mesh("target").unwrap()
//!     .compute_world_aabb_fast(&graph).unwrap();
//! assert!(scene_engine::collision::intersect_ray_aabb(&ray, &world_aabb));
//! ```

pub mod collision;
pub mod config;
pub mod errors;
pub mod foundation;
pub mod geometry;
pub mod material;
pub mod picking;
pub mod scene;

pub use errors::{SceneError, TransformError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        collision::{
            intersect_ray_aabb, intersect_ray_box, intersect_ray_mesh, intersect_ray_sphere,
            PickLayers, Ray, RayHitInfo, RayHitResult,
        },
        config::{Config, EngineConfig, SceneConfig},
        errors::{SceneError, TransformError},
        foundation::{
            math::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4},
            AffineTransform, RigidTransform,
        },
        geometry::{Aabb, LogicalBox, LogicalShape, LogicalSphere, Mesh, Vertex},
        material::{MaterialLibrary, PbrtMaterial},
        scene::{MeshManager, NodeKey, PointLight, SceneGraph, SceneObject},
    };
}
