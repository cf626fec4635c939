//! Ray-intersection test suite
//!
//! Stateless procedures over rays and shapes. The slabs ray-box test
//! follows pbrt-v3's formulation (including its conservative rounding
//! bound); the ray-triangle test is Möller-Trumbore ("Fast, Minimum
//! Storage Ray/Triangle Intersection").
//!
//! Inputs are taken in whatever space the caller supplies them - world
//! or local - and results come back in the same space. Degenerate input
//! (zero-length ray direction, inside-out boxes) is a caller
//! precondition, guarded by debug assertions only.

use crate::collision::ray::{Ray, RayHitInfo, RayHitResult};
use crate::foundation::math::{gamma, Vec3};
use crate::geometry::aabb::Aabb;
use crate::geometry::mesh::{Mesh, Vertex};
use crate::geometry::shapes::{LogicalBox, LogicalSphere};

/// Direction components below this magnitude are treated as parallel to
/// the slab planes of that axis
const DIR_EPSILON: f32 = 1e-8;

/// Rejection threshold for rays parallel to a triangle plane
const TRIANGLE_EPSILON: f32 = 1e-6;

/// Ray-AABB intersection ("slabs" method), existence only
///
/// Each axis contributes the parametric interval between its two planes;
/// the ray hits iff the intersection of the three intervals is non-empty
/// and reaches `t >= 0`. An axis whose direction component is ~0 cannot
/// be divided through: the ray is parallel to that slab and hits only if
/// its origin already lies between the two planes.
pub fn intersect_ray_aabb(ray: &Ray, aabb: &Aabb) -> bool {
    slab_interval(ray, aabb).is_some()
}

/// Ray-AABB intersection with hit details
///
/// Appends one hit: the entry point when the origin is outside the box,
/// or the exit point when the ray starts inside. The normal is the
/// outward normal of the face crossed.
pub fn intersect_ray_aabb_detailed(ray: &Ray, aabb: &Aabb, out: &mut RayHitResult) -> bool {
    let Some(interval) = slab_interval(ray, aabb) else {
        return false;
    };

    let (t, axis) = if interval.t_min >= 0.0 {
        (interval.t_min, interval.entry_axis)
    } else {
        (interval.t_max, interval.exit_axis)
    };

    let mut normal = Vec3::zeros();
    normal[axis] = if interval.t_min >= 0.0 {
        // Entry face: outward normal opposes the ray
        -ray.direction[axis].signum()
    } else {
        // Exit face: outward normal continues the ray
        ray.direction[axis].signum()
    };

    out.hits.push(RayHitInfo {
        t,
        position: ray.point_at(t),
        normal,
    });
    true
}

struct SlabInterval {
    t_min: f32,
    t_max: f32,
    entry_axis: usize,
    exit_axis: usize,
}

fn slab_interval(ray: &Ray, aabb: &Aabb) -> Option<SlabInterval> {
    let mut interval = SlabInterval {
        t_min: f32::NEG_INFINITY,
        t_max: f32::INFINITY,
        entry_axis: 0,
        exit_axis: 0,
    };

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];

        if dir.abs() < DIR_EPSILON {
            if origin < aabb.min[axis] || origin > aabb.max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir;
        let mut t0 = (aabb.min[axis] - origin) * inv;
        let mut t1 = (aabb.max[axis] - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        // pbrt's conservative bound: widen the exit so grazing rays
        // are kept rather than lost to rounding
        t1 *= 1.0 + 2.0 * gamma(3);

        if t0 > interval.t_min {
            interval.t_min = t0;
            interval.entry_axis = axis;
        }
        if t1 < interval.t_max {
            interval.t_max = t1;
            interval.exit_axis = axis;
        }
        if interval.t_min > interval.t_max {
            return None;
        }
    }

    if interval.t_max >= interval.t_min.max(0.0) {
        Some(interval)
    } else {
        None
    }
}

/// Ray vs oriented box
///
/// The ray is mapped into the box's local frame (the inverse of its
/// rigid transform), run through the AABB slabs test against
/// `[-half_extents, +half_extents]`, and the resulting hit point and
/// normal are mapped back out. The parameter t is unchanged by the
/// rigid mapping.
pub fn intersect_ray_box(ray: &Ray, logical_box: &LogicalBox, out: &mut RayHitResult) -> bool {
    let orientation = logical_box.transform.orientation();
    let inverse = orientation.inverse();
    let center = logical_box.transform.position();

    let local_ray = Ray::from_origin_direction(
        inverse * (ray.origin - center),
        inverse * ray.direction,
    );
    let local_aabb = Aabb::from_center_extents(Vec3::zeros(), logical_box.half_extents);

    let mut local_result = RayHitResult::new();
    if !intersect_ray_aabb_detailed(&local_ray, &local_aabb, &mut local_result) {
        return false;
    }

    for hit in local_result.hits {
        out.hits.push(RayHitInfo {
            t: hit.t,
            position: logical_box.transform.transform_point(hit.position),
            normal: orientation * hit.normal,
        });
    }
    true
}

/// Ray vs sphere
///
/// Solves `|origin + t*direction - center|² = radius²` for t and keeps
/// the smaller non-negative root. A tangent ray (discriminant ~ 0) still
/// counts as one hit; a negative discriminant or a sphere entirely
/// behind the origin is a miss.
pub fn intersect_ray_sphere(ray: &Ray, sphere: &LogicalSphere, out: &mut RayHitResult) -> bool {
    let oc = ray.origin - sphere.center;

    let a = ray.direction.dot(&ray.direction);
    let b = 2.0 * oc.dot(&ray.direction);
    let c = oc.dot(&oc) - sphere.radius * sphere.radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return false;
    }

    let sqrt_discriminant = discriminant.sqrt();
    let t_near = (-b - sqrt_discriminant) / (2.0 * a);
    let t_far = (-b + sqrt_discriminant) / (2.0 * a);

    let t = if t_near >= 0.0 {
        t_near
    } else if t_far >= 0.0 {
        t_far
    } else {
        return false;
    };

    let position = ray.point_at(t);
    out.hits.push(RayHitInfo {
        t,
        position,
        normal: (position - sphere.center).normalize(),
    });
    true
}

/// Möller-Trumbore core; returns (t, u, v) on hit
fn moller_trumbore(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<(f32, f32, f32)> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(&edge2);
    let det = edge1.dot(&h);

    // Parallel to the triangle plane
    if det.abs() < TRIANGLE_EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - v0;
    let u = inv_det * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = inv_det * ray.direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv_det * edge2.dot(&q);
    if t < 0.0 {
        return None;
    }
    Some((t, u, v))
}

/// Ray vs triangle given raw vertex positions
///
/// On a hit, fills `out` with the parameter, position, and the
/// geometric (face) normal.
pub fn intersect_ray_triangle(
    ray: &Ray,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    out: &mut RayHitInfo,
) -> bool {
    let Some((t, _u, _v)) = moller_trumbore(ray, v0, v1, v2) else {
        return false;
    };

    out.t = t;
    out.position = ray.point_at(t);
    out.normal = (v1 - v0).cross(&(v2 - v0)).normalize();
    true
}

/// Ray vs triangle given full vertex attributes
///
/// Same test as [`intersect_ray_triangle`], but the hit normal is the
/// barycentric interpolation of the vertex normals - the smooth normal
/// a renderer would shade with.
pub fn intersect_ray_triangle_vertices(
    ray: &Ray,
    v0: &Vertex,
    v1: &Vertex,
    v2: &Vertex,
    out: &mut RayHitInfo,
) -> bool {
    let p0 = v0.position_vec();
    let p1 = v1.position_vec();
    let p2 = v2.position_vec();

    let Some((t, u, v)) = moller_trumbore(ray, p0, p1, p2) else {
        return false;
    };

    let w = 1.0 - u - v;
    let normal = v0.normal_vec() * w + v1.normal_vec() * u + v2.normal_vec() * v;

    out.t = t;
    out.position = ray.point_at(t);
    out.normal = normal.normalize();
    true
}

/// Ray vs mesh, CPU path
///
/// Runs the ray-triangle test over every face and appends **all** hits,
/// front and back, near and far; callers sort with
/// [`RayHitResult::sort_by_depth`] when order matters. Deliberately
/// exhaustive - O(triangle count) with no acceleration structure - since
/// hardware-accelerated picking is the fast path and this is the exact
/// fallback it is validated against.
pub fn intersect_ray_mesh(ray: &Ray, mesh: &Mesh, out: &mut RayHitResult) -> bool {
    let mut any_hit = false;

    for i in 0..mesh.triangle_count() {
        let (v0, v1, v2) = mesh.triangle(i);
        let mut info = RayHitInfo::default();
        if intersect_ray_triangle_vertices(ray, &v0, &v1, &v2, &mut info) {
            out.hits.push(info);
            any_hit = true;
        }
    }

    any_hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::foundation::math::constants;
    use crate::foundation::rigid_transform::RigidTransform;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_ray_aabb_hit_at_expected_t() {
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let mut result = RayHitResult::new();

        assert!(intersect_ray_aabb(&ray, &unit_box()));
        assert!(intersect_ray_aabb_detailed(&ray, &unit_box(), &mut result));

        let hit = &result.hits[0];
        assert_relative_eq!(hit.t, 4.0, epsilon = 1e-5);
        assert_relative_eq!(hit.position.x, -1.0, epsilon = 1e-5);
        assert_relative_eq!(hit.normal.x, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_ray_aabb_miss() {
        let ray = Ray::new(Vec3::new(-5.0, 5.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(!intersect_ray_aabb(&ray, &unit_box()));
    }

    #[test]
    fn test_ray_aabb_zero_direction_component() {
        // Direction is exactly axis-aligned: the Y and Z slabs must be
        // handled without dividing by zero
        let inside = Ray::new(Vec3::new(-5.0, 0.5, -0.5), Vec3::new(1.0, 0.0, 0.0));
        assert!(intersect_ray_aabb(&inside, &unit_box()));

        let outside = Ray::new(Vec3::new(-5.0, 1.5, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(!intersect_ray_aabb(&outside, &unit_box()));
    }

    #[test]
    fn test_ray_aabb_from_inside_reports_exit() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0));
        let mut result = RayHitResult::new();
        assert!(intersect_ray_aabb_detailed(&ray, &unit_box(), &mut result));

        let hit = &result.hits[0];
        assert_relative_eq!(hit.t, 1.0, epsilon = 1e-4);
        assert_relative_eq!(hit.normal.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_ray_aabb_behind_origin_misses() {
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(!intersect_ray_aabb(&ray, &unit_box()));
    }

    #[test]
    fn test_ray_box_axis_aligned_matches_aabb() {
        let logical_box = LogicalBox::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));

        let mut result = RayHitResult::new();
        assert!(intersect_ray_box(&ray, &logical_box, &mut result));
        assert_relative_eq!(result.hits[0].t, 4.0, epsilon = 1e-4);
    }

    #[test]
    fn test_ray_box_respects_orientation() {
        // Box rotated 45° about Z: its corner now points at +X, so a ray
        // along -X hits at sqrt(2) from the center instead of 1
        let mut transform = RigidTransform::identity();
        transform.set_rotation_axis_angle(Vec3::z_axis().into_inner(), constants::PI / 4.0);
        let logical_box = LogicalBox::with_transform(transform, Vec3::new(1.0, 1.0, 1.0));

        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let mut result = RayHitResult::new();
        assert!(intersect_ray_box(&ray, &logical_box, &mut result));

        let expected_t = 5.0 - 2.0_f32.sqrt();
        assert_relative_eq!(result.hits[0].t, expected_t, epsilon = 1e-3);

        // The world-space normal of the face hit is the rotated +X face
        let n = result.hits[0].normal;
        let inv_sqrt2 = 1.0 / 2.0_f32.sqrt();
        assert_relative_eq!(n.x.abs(), inv_sqrt2, epsilon = 1e-4);
        assert_relative_eq!(n.y.abs(), inv_sqrt2, epsilon = 1e-4);
    }

    #[test]
    fn test_ray_box_translated() {
        let logical_box = LogicalBox::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        let ray = Ray::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0));

        let mut result = RayHitResult::new();
        assert!(intersect_ray_box(&ray, &logical_box, &mut result));
        assert_relative_eq!(result.hits[0].t, 8.0, epsilon = 1e-4);
        assert_relative_eq!(result.hits[0].position.x, 8.0, epsilon = 1e-4);
    }

    #[test]
    fn test_ray_sphere_near_hit() {
        // Ray through the center from outside: near hit at
        // distance(origin, center) - radius
        let sphere = LogicalSphere::new(Vec3::zeros(), 5.0);
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));

        let mut result = RayHitResult::new();
        assert!(intersect_ray_sphere(&ray, &sphere, &mut result));

        let hit = &result.hits[0];
        assert_relative_eq!(hit.t, 5.0, epsilon = 1e-4);
        assert_relative_eq!(hit.position.x, 5.0, epsilon = 1e-4);
        assert_relative_eq!(hit.normal.x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_ray_sphere_miss() {
        let sphere = LogicalSphere::new(Vec3::zeros(), 5.0);
        let ray = Ray::new(Vec3::new(10.0, 6.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let mut result = RayHitResult::new();
        assert!(!intersect_ray_sphere(&ray, &sphere, &mut result));
        assert!(!result.has_any_hit());
    }

    #[test]
    fn test_ray_sphere_tangent_single_hit() {
        let sphere = LogicalSphere::new(Vec3::zeros(), 5.0);
        let ray = Ray::new(Vec3::new(10.0, 5.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));

        let mut result = RayHitResult::new();
        assert!(intersect_ray_sphere(&ray, &sphere, &mut result));
        assert_eq!(result.hits.len(), 1);
        assert_relative_eq!(result.hits[0].t, 10.0, epsilon = 1e-2);
    }

    #[test]
    fn test_ray_sphere_from_inside() {
        let sphere = LogicalSphere::new(Vec3::zeros(), 5.0);
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0));

        let mut result = RayHitResult::new();
        assert!(intersect_ray_sphere(&ray, &sphere, &mut result));
        assert_relative_eq!(result.hits[0].t, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_ray_triangle_hit_and_normal() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let v0 = Vec3::new(0.0, 0.0, 0.0);
        let v1 = Vec3::new(1.0, 0.0, 0.0);
        let v2 = Vec3::new(0.0, 1.0, 0.0);

        let mut info = RayHitInfo::default();
        assert!(intersect_ray_triangle(&ray, v0, v1, v2, &mut info));
        assert_relative_eq!(info.t, 5.0, epsilon = 1e-4);
        assert_relative_eq!(info.normal.z, 1.0, epsilon = 1e-5);
        assert!(info.is_valid());
    }

    #[test]
    fn test_ray_triangle_outside_barycentric_range() {
        let v0 = Vec3::new(0.0, 0.0, 0.0);
        let v1 = Vec3::new(1.0, 0.0, 0.0);
        let v2 = Vec3::new(0.0, 1.0, 0.0);

        // Misses past the hypotenuse: u + v > 1 there
        let ray = Ray::new(Vec3::new(0.9, 0.9, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let mut info = RayHitInfo::default();
        assert!(!intersect_ray_triangle(&ray, v0, v1, v2, &mut info));
    }

    #[test]
    fn test_ray_triangle_parallel_rejected() {
        let v0 = Vec3::new(0.0, 0.0, 0.0);
        let v1 = Vec3::new(1.0, 0.0, 0.0);
        let v2 = Vec3::new(0.0, 1.0, 0.0);

        // Ray lying in the triangle plane
        let ray = Ray::new(Vec3::new(-1.0, 0.5, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let mut info = RayHitInfo::default();
        assert!(!intersect_ray_triangle(&ray, v0, v1, v2, &mut info));
    }

    #[test]
    fn test_ray_triangle_interpolates_vertex_normals() {
        // Vertex normals tilted differently; hitting v0's corner must
        // return (close to) v0's normal, and the centroid the average
        let n0 = [0.0, 0.0, 1.0];
        let n1 = [1.0, 0.0, 0.0];
        let n2 = [0.0, 1.0, 0.0];
        let v0 = Vertex::new([0.0, 0.0, 0.0], n0, [0.0, 0.0]);
        let v1 = Vertex::new([1.0, 0.0, 0.0], n1, [1.0, 0.0]);
        let v2 = Vertex::new([0.0, 1.0, 0.0], n2, [0.0, 1.0]);

        let ray = Ray::new(Vec3::new(0.001, 0.001, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let mut info = RayHitInfo::default();
        assert!(intersect_ray_triangle_vertices(&ray, &v0, &v1, &v2, &mut info));
        assert!(info.normal.z > 0.99);

        let ray = Ray::new(Vec3::new(1.0 / 3.0, 1.0 / 3.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let mut info = RayHitInfo::default();
        assert!(intersect_ray_triangle_vertices(&ray, &v0, &v1, &v2, &mut info));
        let expected = Vec3::new(1.0, 1.0, 1.0).normalize();
        assert_relative_eq!(info.normal, expected, epsilon = 1e-2);
    }

    #[test]
    fn test_ray_mesh_collects_all_hits_sorted() {
        // Two parallel triangles at z = -2 and z = -6; the ray must
        // report both, in ascending depth after the sort
        let mut mesh = Mesh::new("two_tris");
        let make_tri = |z: f32, base: &mut Vec<Vertex>| {
            base.push(Vertex::new([-1.0, -1.0, z], [0.0, 0.0, 1.0], [0.0, 0.0]));
            base.push(Vertex::new([1.0, -1.0, z], [0.0, 0.0, 1.0], [1.0, 0.0]));
            base.push(Vertex::new([0.0, 1.0, z], [0.0, 0.0, 1.0], [0.5, 1.0]));
        };
        let mut vertices = Vec::new();
        make_tri(-6.0, &mut vertices);
        make_tri(-2.0, &mut vertices);
        mesh.set_geometry(vertices, vec![0, 1, 2, 3, 4, 5]);

        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        let mut result = RayHitResult::new();
        assert!(intersect_ray_mesh(&ray, &mesh, &mut result));
        assert_eq!(result.hits.len(), 2);

        result.sort_by_depth();
        assert!(result.hits[0].t < result.hits[1].t);
        assert_relative_eq!(result.hits[0].t, 2.0, epsilon = 1e-4);
        assert_relative_eq!(result.hits[1].t, 6.0, epsilon = 1e-4);
    }

    #[test]
    fn test_ray_mesh_miss() {
        let mut mesh = Mesh::new("tri");
        mesh.set_geometry(
            vec![
                Vertex::new([0.0, 0.0, -5.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
                Vertex::new([1.0, 0.0, -5.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
                Vertex::new([0.0, 1.0, -5.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
            ],
            vec![0, 1, 2],
        );

        let ray = Ray::new(Vec3::new(5.0, 5.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let mut result = RayHitResult::new();
        assert!(!intersect_ray_mesh(&ray, &mesh, &mut result));
        assert!(!result.has_any_hit());
    }
}
