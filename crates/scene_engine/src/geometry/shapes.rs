//! Analytic collision shapes
//!
//! Geometry represented by analytic description rather than polygons.
//! These are pure inputs to the intersection routines - they own no
//! vertex buffers or GPU resources.

use crate::foundation::math::{constants, Vec3};
use crate::foundation::rigid_transform::RigidTransform;
use crate::geometry::aabb::Aabb;

/// Capability shared by analytic (non-polygonal) shapes
pub trait LogicalShape {
    /// Bounding box of the shape in its local frame
    fn local_aabb(&self) -> Aabb;

    /// Total surface area
    fn surface_area(&self) -> f32;

    /// Enclosed volume
    fn volume(&self) -> f32;
}

/// A sphere described by center and radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogicalSphere {
    /// Center position (in whatever space the caller works in)
    pub center: Vec3,
    /// Sphere radius
    pub radius: f32,
}

impl LogicalSphere {
    /// Create a new sphere
    pub fn new(center: Vec3, radius: f32) -> Self {
        debug_assert!(radius > 0.0, "sphere radius must be positive");
        Self { center, radius }
    }
}

impl LogicalShape for LogicalSphere {
    fn local_aabb(&self) -> Aabb {
        let r = Vec3::new(self.radius, self.radius, self.radius);
        Aabb::from_center_extents(Vec3::zeros(), r)
    }

    fn surface_area(&self) -> f32 {
        2.0 * constants::TAU * self.radius * self.radius
    }

    fn volume(&self) -> f32 {
        (2.0 / 3.0) * constants::TAU * self.radius * self.radius * self.radius
    }
}

/// One face of a box (or of an AABB in local space)
///
/// Intersection points land arbitrarily close to edges and corners, where
/// deriving the face from the hit position alone can round to an adjacent
/// facet. Passing the facet explicitly removes that ambiguity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxFacet {
    /// +X face
    PosX,
    /// -X face
    NegX,
    /// +Y face
    PosY,
    /// -Y face
    NegY,
    /// +Z face
    PosZ,
    /// -Z face
    NegZ,
}

impl BoxFacet {
    /// Outward unit normal of this facet in the box's local frame
    pub fn local_normal(self) -> Vec3 {
        match self {
            BoxFacet::PosX => Vec3::new(1.0, 0.0, 0.0),
            BoxFacet::NegX => Vec3::new(-1.0, 0.0, 0.0),
            BoxFacet::PosY => Vec3::new(0.0, 1.0, 0.0),
            BoxFacet::NegY => Vec3::new(0.0, -1.0, 0.0),
            BoxFacet::PosZ => Vec3::new(0.0, 0.0, 1.0),
            BoxFacet::NegZ => Vec3::new(0.0, 0.0, -1.0),
        }
    }
}

/// An oriented box: rigid transform (center + orientation) + half-extents
///
/// The local frame of the box is the axis-aligned box
/// `[-half_extents, +half_extents]`; the rigid transform places it in the
/// caller's space.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalBox {
    /// Placement of the box (center position + orientation)
    pub transform: RigidTransform,
    /// Half-extents along the box's local axes
    pub half_extents: Vec3,
}

impl LogicalBox {
    /// Create an axis-aligned box from center and half-extents
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        debug_assert!(
            half_extents.x > 0.0 && half_extents.y > 0.0 && half_extents.z > 0.0,
            "box half-extents must be positive"
        );
        let mut transform = RigidTransform::identity();
        transform.set_position(center);
        Self {
            transform,
            half_extents,
        }
    }

    /// Create an oriented box from a rigid transform and half-extents
    pub fn with_transform(transform: RigidTransform, half_extents: Vec3) -> Self {
        Self {
            transform,
            half_extents,
        }
    }

    /// Outward unit normal of a facet, in the box's placement space
    pub fn facet_normal(&self, facet: BoxFacet) -> Vec3 {
        self.transform.orientation() * facet.local_normal()
    }
}

impl LogicalShape for LogicalBox {
    fn local_aabb(&self) -> Aabb {
        Aabb::from_center_extents(Vec3::zeros(), self.half_extents)
    }

    fn surface_area(&self) -> f32 {
        let d = self.half_extents * 2.0;
        2.0 * (d.x * d.y + d.y * d.z + d.x * d.z)
    }

    fn volume(&self) -> f32 {
        let d = self.half_extents * 2.0;
        d.x * d.y * d.z
    }
}
