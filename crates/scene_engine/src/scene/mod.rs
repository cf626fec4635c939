//! Scene management system
//!
//! A scene is a tree of nodes, each carrying a local transform relative to
//! its parent. Scene objects (meshes, lights) attach to nodes to pick up
//! hierarchical transformation; world-space evaluation walks the tree and
//! concatenates local matrices, with optional per-node caching.
//!
//! ## Architecture
//!
//! ```text
//! SceneGraph (arena of SceneNodes, handle-based)
//!      ↑ attached via NodeKey back-references
//! SceneObjects (owned by managers: MeshManager, caller-owned lights, ...)
//!      ↓ consumed by
//! Collision / picking queries (world-space AABBs, ray tests)
//! ```
//!
//! The graph owns its nodes; it never owns attached objects. Cached world
//! matrices are invalidated explicitly by callers - there is no automatic
//! dirty propagation (see `SceneGraph` docs).

pub mod graph;
pub mod light;
pub mod manager;
pub mod object;

pub use graph::{NodeKey, SceneGraph, SceneNode};
pub use light::{PointLight, PointLightDesc};
pub use manager::MeshManager;
pub use object::SceneObject;
