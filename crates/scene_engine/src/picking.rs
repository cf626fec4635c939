//! CPU picking - from a screen point to world-space hits
//!
//! Converts a normalized-device-coordinate point (the output of a
//! screen-to-NDC mapping, X and Y in [-1, 1]) into a world-space ray and
//! runs it against mesh geometry through the collision testor. This is
//! the exact path; a hardware-accelerated picking implementation must
//! return the same world-space hit set for the same NDC point, which is
//! what these routines are used to validate against.

use crate::collision::layers::PickLayers;
use crate::collision::ray::{Ray, RayHitInfo, RayHitResult};
use crate::collision::testor::intersect_ray_mesh;
use crate::errors::SceneError;
use crate::foundation::math::{Mat4, Point3, Vec3, Vec4};
use crate::geometry::mesh::Mesh;
use crate::scene::graph::SceneGraph;
use crate::scene::object::SceneObject;

/// Build a world-space ray through an NDC point
///
/// Unprojects the point at two clip-space depths through the inverse
/// view-projection and runs the ray through both; this works for any
/// projection whose depth increases monotonically along the view ray
/// (both [0,1] and [-1,1] depth ranges). Returns `None` when the
/// view-projection is not invertible.
pub fn ray_from_ndc(ndc_x: f32, ndc_y: f32, view: &Mat4, projection: &Mat4) -> Option<Ray> {
    let inverse_vp = (projection * view).try_inverse()?;

    let unproject = |depth: f32| -> Option<Vec3> {
        let clip = Vec4::new(ndc_x, ndc_y, depth, 1.0);
        let h = inverse_vp * clip;
        if h.w.abs() < f32::EPSILON {
            return None;
        }
        Some(Vec3::new(h.x / h.w, h.y / h.w, h.z / h.w))
    };

    let near = unproject(0.0)?;
    let far = unproject(1.0)?;
    Some(Ray::new(near, far - near))
}

/// Pick against a single mesh, collecting all world-space hits
///
/// The world ray is mapped into the mesh's local frame via the inverse
/// of its node's world matrix, tested against the triangles there, and
/// the hits are mapped back to world space (positions by the world
/// matrix, normals by its inverse-transpose). The ray parameter t is the
/// world-space distance along the pick ray.
///
/// Fails when the mesh is unattached or its world transform cannot be
/// inverted.
pub fn pick_mesh(
    graph: &SceneGraph,
    mesh: &Mesh,
    ndc_x: f32,
    ndc_y: f32,
    view: &Mat4,
    projection: &Mat4,
    out: &mut RayHitResult,
) -> Result<bool, SceneError> {
    let world_ray =
        ray_from_ndc(ndc_x, ndc_y, view, projection).ok_or(SceneError::SingularTransform)?;
    pick_mesh_with_ray(graph, mesh, &world_ray, out)
}

/// Pick against a single mesh with an already-built world-space ray
pub fn pick_mesh_with_ray(
    graph: &SceneGraph,
    mesh: &Mesh,
    world_ray: &Ray,
    out: &mut RayHitResult,
) -> Result<bool, SceneError> {
    let node = mesh.attached_node().ok_or_else(|| SceneError::NotAttached {
        uid: mesh.uid().to_string(),
    })?;

    let world = graph.world_matrix(node)?;
    let inverse_world = world.try_inverse().ok_or(SceneError::SingularTransform)?;
    let normal_matrix = inverse_world.transpose();

    // Same parametrization as the world ray: the local direction is not
    // renormalized, so local t == world t
    let local_ray = Ray::from_origin_direction(
        inverse_world
            .transform_point(&Point3::from(world_ray.origin))
            .coords,
        inverse_world.transform_vector(&world_ray.direction),
    );

    let mut local_hits = RayHitResult::new();
    if !intersect_ray_mesh(&local_ray, mesh, &mut local_hits) {
        return Ok(false);
    }

    for hit in local_hits.hits {
        out.hits.push(RayHitInfo {
            t: hit.t,
            position: world.transform_point(&Point3::from(hit.position)).coords,
            normal: normal_matrix.transform_vector(&hit.normal).normalize(),
        });
    }
    Ok(true)
}

/// Pick across several meshes with layer filtering
///
/// Meshes whose layer word does not intersect `layer_mask` are skipped
/// entirely. Hits from all surviving meshes land in `out`, unsorted;
/// call [`RayHitResult::sort_by_depth`] for depth order.
pub fn pick_meshes<'a>(
    graph: &SceneGraph,
    meshes: impl IntoIterator<Item = &'a Mesh>,
    ndc_x: f32,
    ndc_y: f32,
    view: &Mat4,
    projection: &Mat4,
    layer_mask: u32,
    out: &mut RayHitResult,
) -> Result<bool, SceneError> {
    let world_ray =
        ray_from_ndc(ndc_x, ndc_y, view, projection).ok_or(SceneError::SingularTransform)?;

    let mut any_hit = false;
    for mesh in meshes {
        if !PickLayers::matches(layer_mask, mesh.pick_layers()) {
            continue;
        }
        any_hit |= pick_mesh_with_ray(graph, mesh, &world_ray, out)?;
    }
    Ok(any_hit)
}

/// World-space positions of every triangle hit under an NDC point
///
/// The contract a hardware picking path must honor: same NDC point in,
/// same set of world-space collision points out.
pub fn pick_mesh_points(
    graph: &SceneGraph,
    mesh: &Mesh,
    ndc_x: f32,
    ndc_y: f32,
    view: &Mat4,
    projection: &Mat4,
) -> Result<Vec<Vec3>, SceneError> {
    let mut result = RayHitResult::new();
    pick_mesh(graph, mesh, ndc_x, ndc_y, view, projection, &mut result)?;
    Ok(result.hits.into_iter().map(|h| h.position).collect())
}

/// Number of triangle hits under an NDC point
pub fn pick_mesh_count(
    graph: &SceneGraph,
    mesh: &Mesh,
    ndc_x: f32,
    ndc_y: f32,
    view: &Mat4,
    projection: &Mat4,
) -> Result<usize, SceneError> {
    Ok(pick_mesh_points(graph, mesh, ndc_x, ndc_y, view, projection)?.len())
}
