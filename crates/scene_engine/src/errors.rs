//! Engine error types
//!
//! All failures in this crate are local and non-fatal: a failed transform
//! update leaves the previous state in effect, and a failed scene lookup
//! simply reports what went wrong. Nothing here panics.

use thiserror::Error;

/// Errors produced by rigid-transform validation
///
/// Validation failures never partially mutate the transform: the prior
/// orientation stays in effect when an error is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// The supplied quaternion is not unit length within tolerance
    #[error("input quaternion is not unit length (norm = {norm})")]
    NonUnitQuaternion {
        /// Norm of the rejected quaternion
        norm: f32,
    },

    /// The supplied matrix's top-left 3x3 sub-matrix is not orthonormal
    #[error("matrix top-left 3x3 sub-matrix is not orthonormal")]
    NonOrthonormalMatrix,
}

/// Errors produced by scene-graph and scene-object operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    /// A node handle did not resolve (stale, or from another graph)
    #[error("scene node not found (stale or foreign handle)")]
    NodeNotFound,

    /// Attempted to give the root node a parent
    #[error("the scene graph root cannot be re-parented")]
    CannotReparentRoot,

    /// A world-space query requires the object to be attached to a node
    #[error("scene object '{uid}' is not attached to a scene node")]
    NotAttached {
        /// UID of the unattached object
        uid: String,
    },

    /// A manager refused to create a second object with the same UID
    #[error("a scene object with uid '{uid}' already exists")]
    DuplicateUid {
        /// The conflicting UID
        uid: String,
    },

    /// Re-parenting would make a node its own ancestor
    #[error("re-parenting would create a cycle in the scene graph")]
    WouldCreateCycle,

    /// A world matrix could not be inverted (zero scale somewhere up the chain)
    #[error("world transform is singular and cannot be inverted")]
    SingularTransform,
}
