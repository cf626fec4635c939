//! Collision module - ray intersection against shapes and meshes
//!
//! Stateless, synchronous intersection procedures shared by picking and
//! gameplay-style queries. Every routine follows the same conventions:
//! a ray is `origin + t * direction`, a hit requires `t >= 0`, results
//! are appended to a caller-provided hit record, and "no hit" is a
//! normal boolean outcome rather than an error.

pub mod layers;
pub mod ray;
pub mod testor;

pub use layers::PickLayers;
pub use ray::{Ray, RayHitInfo, RayHitResult};
pub use testor::{
    intersect_ray_aabb, intersect_ray_aabb_detailed, intersect_ray_box, intersect_ray_mesh,
    intersect_ray_sphere, intersect_ray_triangle, intersect_ray_triangle_vertices,
};
