//! Rigid-body transform: position plus unit-quaternion orientation
//!
//! Provides the interconversions between the three rotation
//! representations the engine deals in (quaternion, rotation matrix,
//! Euler angles) and delta-rotation composition. Quaternion-to-matrix
//! follows Real-Time Rendering 3rd Edition, p.76-77; the Euler
//! decomposition uses the Y·X·Z rotation order throughout.

use log::error;

use crate::errors::TransformError;
use crate::foundation::math::{
    constants, is_orthonormal, top_left_3x3, Mat3, Mat4, Quat, Quaternion, Unit, Vec3,
};

/// How close to |sin(pitch)| == 1 the decomposition switches to the
/// gimbal-lock fallback. One ulp below 1.0 is enough to absorb rounding
/// in the matrix entries without misclassifying real rotations.
const GIMBAL_LOCK_THRESHOLD: f32 = 1.0 - 1e-6;

/// Position + unit-quaternion orientation (no scale)
///
/// The orientation is kept unit length at all times: every mutation that
/// accepts external rotation data validates it (tolerance 1e-4) and
/// rejects bad input without touching the current state.
///
/// Delta rotations are composed by **left**-multiplication,
/// `orientation' = delta * orientation`, which applies the delta in
/// world/reference space. Reversing the product order would rotate in
/// object space instead - the order is an invariant, not a convention
/// choice per call site.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidTransform {
    position: Vec3,
    orientation: Quat,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            orientation: Quat::identity(),
        }
    }
}

impl RigidTransform {
    /// Create an identity transform (zero position, identity orientation)
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform from position and orientation
    pub fn from_position_orientation(position: Vec3, orientation: Quat) -> Self {
        Self { position, orientation }
    }

    /// Get the position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Get the orientation quaternion
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Set the position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Set the position from components
    pub fn set_position_xyz(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vec3::new(x, y, z);
    }

    /// Move by a position delta
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Move by a position delta given as components
    pub fn translate_xyz(&mut self, dx: f32, dy: f32, dz: f32) {
        self.position += Vec3::new(dx, dy, dz);
    }

    /// Apply a delta rotation about an axis, in world space
    ///
    /// The axis does not need to be unit length, but must not be zero.
    pub fn rotate_axis_angle(&mut self, axis: Vec3, angle: f32) {
        debug_assert!(axis.norm_squared() > 0.0, "rotation axis must be non-zero");
        let delta = Quat::from_axis_angle(&Unit::new_normalize(axis), angle);
        self.orientation = delta * self.orientation;
    }

    /// Apply a delta rotation given as a quaternion, in world space
    ///
    /// Fails (leaving the orientation untouched) when `q` is not unit
    /// length within tolerance.
    pub fn rotate_quat(&mut self, q: Quaternion<f32>) -> Result<(), TransformError> {
        let delta = Self::validate_unit_quat(q)?;
        self.orientation = delta * self.orientation;
        Ok(())
    }

    /// Apply delta Euler angles (radians)
    ///
    /// Converts the current orientation to Euler angles, adds the deltas,
    /// and rebuilds the quaternion from the sums with the Y·X·Z order.
    /// Re-deriving Euler angles each call is lossy near gimbal lock and is
    /// not equivalent to composing incremental quaternions; this is the
    /// documented behavior of the Euler rotation path, chosen so the
    /// angles accumulate the way callers working in Euler terms expect.
    pub fn rotate_euler(&mut self, pitch: f32, yaw: f32, roll: f32) {
        let euler = self.euler_angles();
        self.orientation = quat_from_euler_yxz(euler.x + pitch, euler.y + yaw, euler.z + roll);
    }

    /// Apply a delta rotation given as a matrix, in world space
    ///
    /// Fails when the matrix's top-left 3x3 sub-matrix is not orthonormal.
    /// On success the matrices are concatenated (delta on the left) and
    /// converted back to a quaternion.
    pub fn rotate_matrix(&mut self, delta: &Mat4) -> Result<(), TransformError> {
        let delta3 = Self::validate_rotation_matrix(delta)?;
        let current = self.orientation.to_rotation_matrix().into_inner();
        self.orientation = quat_from_mat3(&(delta3 * current));
        Ok(())
    }

    /// Replace the orientation with an axis-angle rotation
    pub fn set_rotation_axis_angle(&mut self, axis: Vec3, angle: f32) {
        debug_assert!(axis.norm_squared() > 0.0, "rotation axis must be non-zero");
        self.orientation = Quat::from_axis_angle(&Unit::new_normalize(axis), angle);
    }

    /// Replace the orientation with a quaternion
    ///
    /// Fails (leaving the orientation untouched) when `q` is not unit
    /// length within tolerance.
    pub fn set_rotation_quat(&mut self, q: Quaternion<f32>) -> Result<(), TransformError> {
        self.orientation = Self::validate_unit_quat(q)?;
        Ok(())
    }

    /// Replace the orientation with Euler angles (radians), Y·X·Z order
    pub fn set_rotation_euler(&mut self, pitch: f32, yaw: f32, roll: f32) {
        self.orientation = quat_from_euler_yxz(pitch, yaw, roll);
    }

    /// Replace the orientation with a rotation matrix
    ///
    /// Fails when the matrix's top-left 3x3 sub-matrix is not orthonormal.
    pub fn set_rotation_matrix(&mut self, mat: &Mat4) -> Result<(), TransformError> {
        let rot = Self::validate_rotation_matrix(mat)?;
        self.orientation = quat_from_mat3(&rot);
        Ok(())
    }

    /// Get the orientation as a rotation embedded in a 4x4 matrix
    pub fn rotation_matrix(&self) -> Mat4 {
        self.orientation.to_homogeneous()
    }

    /// Get the orientation as Euler angles `(pitch, yaw, roll)` in radians
    ///
    /// Decomposes the rotation matrix with the Y·X·Z order:
    /// pitch = asin(-m12), yaw = atan2(m02, m22), roll = atan2(m10, m11).
    ///
    /// At gimbal lock (pitch = ±90°) yaw and roll collapse into one degree
    /// of freedom; the decomposition pins roll to zero and solves yaw from
    /// the remaining entries. The returned angles are always finite and
    /// rebuilding a rotation from them reproduces the same matrix.
    pub fn euler_angles(&self) -> Vec3 {
        let mat = self.orientation.to_rotation_matrix().into_inner();
        matrix_to_euler(&mat)
    }

    /// Compose rotation and translation into a single 4x4 matrix
    ///
    /// Last row is `[0, 0, 0, 1]`, last column carries the position.
    pub fn transform_matrix(&self) -> Mat4 {
        let mut mat = self.rotation_matrix();
        mat[(0, 3)] = self.position.x;
        mat[(1, 3)] = self.position.y;
        mat[(2, 3)] = self.position.z;
        mat
    }

    /// Transform a point: rotate by conjugation `q v q⁻¹`, then translate
    ///
    /// The rotation step is skipped for the zero vector, which conjugation
    /// maps to itself.
    pub fn transform_point(&self, v: Vec3) -> Vec3 {
        if v == Vec3::zeros() {
            return self.position;
        }
        self.orientation * v + self.position
    }

    fn validate_unit_quat(q: Quaternion<f32>) -> Result<Quat, TransformError> {
        let norm = q.norm();
        if (norm - 1.0).abs() > constants::UNIT_QUAT_TOLERANCE {
            error!("rotation rejected: input is not a unit quaternion (norm = {norm})");
            return Err(TransformError::NonUnitQuaternion { norm });
        }
        // Renormalize to keep drift from accumulating across compositions
        Ok(Quat::new_normalize(q))
    }

    fn validate_rotation_matrix(mat: &Mat4) -> Result<Mat3, TransformError> {
        let rot = top_left_3x3(mat);
        if !is_orthonormal(&rot, constants::ORTHONORMAL_TOLERANCE) {
            error!("rotation rejected: matrix top-left 3x3 sub-matrix is not orthonormal");
            return Err(TransformError::NonOrthonormalMatrix);
        }
        Ok(rot)
    }
}

/// Build a quaternion from Euler angles with the Y·X·Z composition order:
/// `q = q_yaw * q_pitch * q_roll`
fn quat_from_euler_yxz(pitch: f32, yaw: f32, roll: f32) -> Quat {
    let qy = Quat::from_axis_angle(&Vec3::y_axis(), yaw);
    let qx = Quat::from_axis_angle(&Vec3::x_axis(), pitch);
    let qz = Quat::from_axis_angle(&Vec3::z_axis(), roll);
    qy * qx * qz
}

fn quat_from_mat3(mat: &Mat3) -> Quat {
    Quat::from_rotation_matrix(&nalgebra::Rotation3::from_matrix_unchecked(*mat))
}

/// Decompose a rotation matrix into `(pitch, yaw, roll)`, Y·X·Z order
///
/// For `R = Ry(yaw) · Rx(pitch) · Rz(roll)` (column vectors) the matrix is
///
/// ```text
///     [c1c3+s1s2s3   c3s1s2-c1s3   c2s1]
/// R = [c2s3          c2c3          -s2 ]
///     [c1s2s3-s1c3   s1s3+c1c3s2   c1c2]
/// ```
///
/// with `c1,s1 ~ yaw`, `c2,s2 ~ pitch`, `c3,s3 ~ roll`. In the
/// non-degenerate case all three angles fall out of the marked entries.
/// When `|s2| = 1` the middle row and column vanish and only `yaw ∓ roll`
/// is recoverable; roll is pinned to zero by convention and yaw solved
/// from the surviving top-row entries.
fn matrix_to_euler(mat: &Mat3) -> Vec3 {
    let sin_pitch = -mat[(1, 2)];

    if sin_pitch.abs() < GIMBAL_LOCK_THRESHOLD {
        let pitch = sin_pitch.asin();
        let yaw = mat[(0, 2)].atan2(mat[(2, 2)]);
        let roll = mat[(1, 0)].atan2(mat[(1, 1)]);
        return Vec3::new(pitch, yaw, roll);
    }

    // Gimbal lock: with roll := 0 the top row reduces to
    // [cos(yaw), ±sin(yaw), 0], so yaw comes from a single atan2.
    if sin_pitch > 0.0 {
        let yaw = mat[(0, 1)].atan2(mat[(0, 0)]);
        Vec3::new(constants::HALF_PI, yaw, 0.0)
    } else {
        let yaw = (-mat[(0, 1)]).atan2(mat[(0, 0)]);
        Vec3::new(-constants::HALF_PI, yaw, 0.0)
    }
}
