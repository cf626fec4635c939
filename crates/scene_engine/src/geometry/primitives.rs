//! Procedural mesh builders
//!
//! Fill an existing [`Mesh`] with generated geometry, the way a model
//! loader would after parsing a file. Normals point outward, tangents
//! follow the direction of increasing `u`.

use crate::foundation::math::{constants, Vec3};
use crate::geometry::mesh::{Mesh, Vertex};

/// Build an axis-aligned box centered at the local origin
///
/// 24 vertices (4 per face, so each face gets its own normals and UVs)
/// and 12 triangles with counter-clockwise winding viewed from outside.
pub fn build_box(mesh: &mut Mesh, width: f32, height: f32, depth: f32) {
    debug_assert!(width > 0.0 && height > 0.0 && depth > 0.0);
    let half = Vec3::new(width * 0.5, height * 0.5, depth * 0.5);

    // (normal, tangent) per face; the bitangent is derived so that
    // tangent × bitangent = normal
    let faces: [(Vec3, Vec3); 6] = [
        (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0)),
        (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
        (Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),
        (Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),
        (Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0)),
        (Vec3::new(0.0, 0.0, -1.0), Vec3::new(-1.0, 0.0, 0.0)),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, tangent) in faces {
        let bitangent = normal.cross(&tangent);
        let face_center = Vec3::new(normal.x * half.x, normal.y * half.y, normal.z * half.z);
        let u_extent = Vec3::new(
            tangent.x * half.x,
            tangent.y * half.y,
            tangent.z * half.z,
        );
        let v_extent = Vec3::new(
            bitangent.x * half.x,
            bitangent.y * half.y,
            bitangent.z * half.z,
        );

        let base = vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let pos = face_center + u_extent * su + v_extent * sv;
            vertices.push(Vertex::new_with_tangent(
                pos.into(),
                normal.into(),
                [(su + 1.0) * 0.5, (1.0 - sv) * 0.5],
                tangent.into(),
            ));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    mesh.set_geometry(vertices, indices);
}

/// Build a UV sphere centered at the local origin
///
/// `columns` segments around the Y axis, `rings` stacks from pole to
/// pole. The seam column and the poles duplicate vertices so texture
/// coordinates stay continuous.
pub fn build_sphere(mesh: &mut Mesh, radius: f32, columns: u32, rings: u32) {
    debug_assert!(radius > 0.0);
    debug_assert!(columns >= 3 && rings >= 2, "sphere tessellation too coarse");

    let mut vertices = Vec::with_capacity(((columns + 1) * (rings + 1)) as usize);
    let mut indices = Vec::new();

    for ring in 0..=rings {
        // phi: polar angle from the +Y pole
        let phi = constants::PI * ring as f32 / rings as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();

        for col in 0..=columns {
            let theta = constants::TAU * col as f32 / columns as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();

            let normal = Vec3::new(sin_phi * cos_theta, cos_phi, sin_phi * sin_theta);
            let tangent = Vec3::new(-sin_theta, 0.0, cos_theta);
            let position = normal * radius;

            vertices.push(Vertex::new_with_tangent(
                position.into(),
                normal.into(),
                [
                    col as f32 / columns as f32,
                    ring as f32 / rings as f32,
                ],
                tangent.into(),
            ));
        }
    }

    let stride = columns + 1;
    for ring in 0..rings {
        for col in 0..columns {
            let a = ring * stride + col;
            let b = a + stride;
            // Two triangles per quad; the degenerate ones at the poles
            // are harmless and keep the loop uniform
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    mesh.set_geometry(vertices, indices);
}
