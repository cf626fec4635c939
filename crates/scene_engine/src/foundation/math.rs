//! Math utilities and types
//!
//! Provides fundamental math types for 3D graphics, plus the numeric
//! helpers shared by the transform and collision subsystems.
//!
//! All matrices follow nalgebra's column-vector convention: points are
//! transformed as `v' = M * v`, translation lives in the last column and
//! the last row of an affine matrix is `[0, 0, 0, 1]`.

pub use nalgebra::{
    Matrix3, Matrix4,
    Quaternion,
    Unit,
    Vector2, Vector3, Vector4,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;

    /// Tolerance for the unit-quaternion invariant
    pub const UNIT_QUAT_TOLERANCE: f32 = 1e-4;

    /// Per-element tolerance for rotation-matrix orthonormality checks
    pub const ORTHONORMAL_TOLERANCE: f32 = 1e-3;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Check two floats for equality within an absolute tolerance
    pub fn tolerant_eq(a: f32, b: f32, tolerance: f32) -> bool {
        (a - b).abs() <= tolerance
    }
}

/// Half of the f32 machine epsilon, as used by pbrt's rounding analysis
const MACHINE_EPSILON: f32 = f32::EPSILON * 0.5;

/// Conservative floating-point error bound for a chain of `n` operations
///
/// This is pbrt's gamma(n) = n*eps / (1 - n*eps). The slabs ray-box test
/// scales its exit distance by `1 + 2*gamma(3)` so that rays grazing a
/// slab boundary are not missed due to rounding.
pub fn gamma(n: i32) -> f32 {
    let n = n as f32;
    (n * MACHINE_EPSILON) / (1.0 - n * MACHINE_EPSILON)
}

/// Extract the top-left 3x3 submatrix of a 4x4 matrix
pub fn top_left_3x3(mat: &Mat4) -> Mat3 {
    mat.fixed_view::<3, 3>(0, 0).into_owned()
}

/// Check whether a 3x3 matrix is orthonormal
///
/// A matrix is orthonormal iff `M * Mᵀ = Mᵀ * M = I`, which holds exactly
/// when every row/column is unit length and orthogonal to the others.
/// Both products are compared to the identity element-wise with the given
/// tolerance.
pub fn is_orthonormal(mat: &Mat3, tolerance: f32) -> bool {
    let t = mat.transpose();
    let mt = mat * t;
    let tm = t * mat;

    for i in 0..3 {
        for j in 0..3 {
            let expected = if i == j { 1.0 } else { 0.0 };
            if !utils::tolerant_eq(mt[(i, j)], expected, tolerance) {
                return false;
            }
            if !utils::tolerant_eq(tm[(i, j)], expected, tolerance) {
                return false;
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::ORTHONORMAL_TOLERANCE;

    #[test]
    fn test_identity_is_orthonormal() {
        assert!(is_orthonormal(&Mat3::identity(), ORTHONORMAL_TOLERANCE));
    }

    #[test]
    fn test_rotation_is_orthonormal() {
        let rot = nalgebra::Rotation3::from_axis_angle(&Vec3::y_axis(), 1.2);
        assert!(is_orthonormal(&rot.into_inner(), ORTHONORMAL_TOLERANCE));
    }

    #[test]
    fn test_scaled_matrix_is_not_orthonormal() {
        // A scaled row breaks the unit-length requirement
        let mut mat = Mat3::identity();
        mat[(0, 0)] = 2.0;
        assert!(!is_orthonormal(&mat, ORTHONORMAL_TOLERANCE));
    }

    #[test]
    fn test_top_left_3x3() {
        let mut mat = Mat4::identity();
        mat[(0, 1)] = 5.0;
        mat[(0, 3)] = 9.0; // translation column, not part of the 3x3 block
        let block = top_left_3x3(&mat);
        assert_eq!(block[(0, 1)], 5.0);
        assert_eq!(block[(2, 2)], 1.0);
    }

    #[test]
    fn test_gamma_is_small_and_positive() {
        let g = gamma(3);
        assert!(g > 0.0);
        assert!(g < 1e-6);
    }
}
