//! Geometry module - bounding volumes, analytic shapes, and mesh data
//!
//! Everything here is pure data with no GPU resources attached: the
//! collision and picking subsystems consume these types directly, and a
//! renderer uploads the mesh buffers as it sees fit.

pub mod aabb;
pub mod mesh;
pub mod primitives;
pub mod shapes;

pub use aabb::Aabb;
pub use mesh::{Mesh, Vertex};
pub use shapes::{BoxFacet, LogicalBox, LogicalShape, LogicalSphere};
