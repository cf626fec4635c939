//! Affine transform: position, rotation, and nonuniform scale
//!
//! This is the transform type scene nodes carry. It subsumes
//! [`RigidTransform`](crate::foundation::RigidTransform) (a rigid
//! transform is an affine transform with unit scale) and produces the 4x4
//! matrices the scene graph concatenates.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Mat3, Mat4, Quat, Vec3};
use crate::foundation::rigid_transform::RigidTransform;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    /// Position in the parent's space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl AffineTransform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Convert to a transformation matrix (translation · rotation · scale)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Rotation and translation only, scale ignored
    pub fn to_rigid_matrix(&self) -> Mat4 {
        let mut mat = self.rotation.to_homogeneous();
        mat[(0, 3)] = self.position.x;
        mat[(1, 3)] = self.position.y;
        mat[(2, 3)] = self.position.z;
        mat
    }

    /// Rotation only, embedded in a 4x4 matrix
    pub fn to_rotation_matrix(&self) -> Mat4 {
        self.rotation.to_homogeneous()
    }

    /// Apply this transform to a point (scale, rotate, then translate)
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * self.scale.component_mul(&point) + self.position
    }

    /// Apply only the rotation and scale to a direction vector
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation * self.scale.component_mul(&vector)
    }

    /// Create a transform from a transformation matrix
    ///
    /// Decomposes into scale (column lengths), rotation, and translation.
    /// Shear, if present, is lost in the decomposition.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let position = Vec3::new(matrix.m14, matrix.m24, matrix.m34);

        let scale_x = Vec3::new(matrix.m11, matrix.m21, matrix.m31).magnitude();
        let scale_y = Vec3::new(matrix.m12, matrix.m22, matrix.m32).magnitude();
        let scale_z = Vec3::new(matrix.m13, matrix.m23, matrix.m33).magnitude();
        let scale = Vec3::new(scale_x, scale_y, scale_z);

        let rotation_matrix = Mat3::new(
            matrix.m11 / scale_x, matrix.m12 / scale_y, matrix.m13 / scale_z,
            matrix.m21 / scale_x, matrix.m22 / scale_y, matrix.m23 / scale_z,
            matrix.m31 / scale_x, matrix.m32 / scale_y, matrix.m33 / scale_z,
        );
        let rotation = Quat::from_matrix(&rotation_matrix);

        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Combine this transform with another (self applied after `other`)
    pub fn combine(&self, other: &AffineTransform) -> AffineTransform {
        AffineTransform {
            position: self.position + self.rotation * self.scale.component_mul(&other.position),
            rotation: self.rotation * other.rotation,
            scale: self.scale.component_mul(&other.scale),
        }
    }

    /// Get the inverse transform
    ///
    /// Exact for uniform scale. A nonuniform scale combined with rotation
    /// has no exact inverse in translation-rotation-scale form; callers
    /// needing that case should invert [`to_matrix`](Self::to_matrix)
    /// instead.
    pub fn inverse(&self) -> AffineTransform {
        let inv_scale = Vec3::new(1.0 / self.scale.x, 1.0 / self.scale.y, 1.0 / self.scale.z);
        let inv_rotation = self.rotation.inverse();
        let inv_position = inv_rotation * (-self.position).component_mul(&inv_scale);

        AffineTransform {
            position: inv_position,
            rotation: inv_rotation,
            scale: inv_scale,
        }
    }
}

impl From<RigidTransform> for AffineTransform {
    fn from(rigid: RigidTransform) -> Self {
        Self {
            position: rigid.position(),
            rotation: rigid.orientation(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::foundation::math::constants;

    #[test]
    fn test_identity_matrix() {
        let t = AffineTransform::identity();
        assert_eq!(t.to_matrix(), Mat4::identity());
    }

    #[test]
    fn test_matrix_composition_order() {
        // Scale is applied before rotation, translation last
        let mut t = AffineTransform::identity();
        t.scale = Vec3::new(2.0, 2.0, 2.0);
        t.rotation = Quat::from_axis_angle(&Vec3::y_axis(), constants::HALF_PI);
        t.position = Vec3::new(0.0, 0.0, 5.0);

        let p = t.to_matrix().transform_point(&nalgebra::Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_transform_point_matches_matrix() {
        let mut t = AffineTransform::identity();
        t.scale = Vec3::new(1.5, 0.5, 2.0);
        t.rotation = Quat::from_axis_angle(&Vec3::z_axis(), 0.6);
        t.position = Vec3::new(-1.0, 4.0, 2.0);

        let v = Vec3::new(0.3, -0.8, 1.2);
        let by_matrix = t.to_matrix().transform_point(&nalgebra::Point3::from(v));
        let direct = t.transform_point(v);
        assert_relative_eq!(direct.x, by_matrix.x, epsilon = 1e-5);
        assert_relative_eq!(direct.y, by_matrix.y, epsilon = 1e-5);
        assert_relative_eq!(direct.z, by_matrix.z, epsilon = 1e-5);
    }

    #[test]
    fn test_inverse_round_trip() {
        let mut t = AffineTransform::identity();
        t.scale = Vec3::new(2.0, 2.0, 2.0);
        t.rotation = Quat::from_axis_angle(&Vec3::x_axis(), 1.1);
        t.position = Vec3::new(5.0, -2.0, 7.0);

        let p = Vec3::new(1.0, 2.0, 3.0);
        let round_trip = t.inverse().transform_point(t.transform_point(p));
        assert_relative_eq!(round_trip.x, p.x, epsilon = 1e-4);
        assert_relative_eq!(round_trip.y, p.y, epsilon = 1e-4);
        assert_relative_eq!(round_trip.z, p.z, epsilon = 1e-4);
    }

    #[test]
    fn test_from_matrix_decomposition() {
        let mut t = AffineTransform::identity();
        t.scale = Vec3::new(2.0, 2.0, 2.0);
        t.rotation = Quat::from_axis_angle(&Vec3::y_axis(), 0.4);
        t.position = Vec3::new(1.0, 2.0, 3.0);

        let decomposed = AffineTransform::from_matrix(&t.to_matrix());
        assert_relative_eq!(decomposed.position, t.position, epsilon = 1e-4);
        assert_relative_eq!(decomposed.scale, t.scale, epsilon = 1e-4);
        let dot = decomposed.rotation.into_inner().dot(&t.rotation.into_inner());
        assert_relative_eq!(dot.abs(), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_from_rigid_transform() {
        let mut rigid = RigidTransform::identity();
        rigid.set_position_xyz(1.0, 2.0, 3.0);
        rigid.set_rotation_axis_angle(Vec3::y_axis().into_inner(), 0.5);

        let affine = AffineTransform::from(rigid.clone());
        assert_eq!(affine.position, rigid.position());
        assert_eq!(affine.rotation, rigid.orientation());
        assert_eq!(affine.scale, Vec3::new(1.0, 1.0, 1.0));
    }
}
