//! Scene-object capability
//!
//! Anything attachable to a scene node - meshes, lights, and whatever
//! else a game adds - implements [`SceneObject`]. Attachment gives the
//! object hierarchical transformation: its world-space bounds derive from
//! the node's evaluated world matrix.
//!
//! Objects are owned by their managers, never by the scene graph; the
//! node↔object relation is a pair of back-references kept consistent by
//! the graph's attach/detach operations.

use crate::collision::layers::PickLayers;
use crate::errors::SceneError;
use crate::foundation::math::Point3;
use crate::geometry::Aabb;
use crate::scene::graph::{NodeKey, SceneGraph};

/// Capability interface for objects that live in the scene graph
///
/// Implementors supply an identity, a local-space bounding box, and the
/// attachment back-reference storage; the world-AABB computation is
/// provided on top of those.
pub trait SceneObject {
    /// Unique identifier of this object within its manager
    fn uid(&self) -> &str;

    /// Bounding box of the object in its own local space
    fn local_aabb(&self) -> Aabb;

    /// The node this object is attached to, if any
    fn attached_node(&self) -> Option<NodeKey>;

    /// Store the attachment back-reference
    ///
    /// Maintained by [`SceneGraph::attach_object`] /
    /// [`SceneGraph::detach_object`], which keep both sides of the
    /// relation consistent. Calling this anywhere else breaks the
    /// invariant.
    fn set_attached_node(&mut self, node: Option<NodeKey>);

    /// Layer mask consulted by filtered pick queries
    fn pick_layers(&self) -> u32 {
        PickLayers::ALL
    }

    /// Whether the object is currently attached to a node
    fn is_attached(&self) -> bool {
        self.attached_node().is_some()
    }

    /// Attach this object to a node (detaching from any previous node)
    fn attach_to_scene_node(&mut self, graph: &mut SceneGraph, node: NodeKey) -> Result<(), SceneError>
    where
        Self: Sized,
    {
        graph.attach_object(node, self)
    }

    /// Detach this object from its node, if attached
    fn detach_from_scene_node(&mut self, graph: &mut SceneGraph)
    where
        Self: Sized,
    {
        graph.detach_object(self);
    }

    /// Fast, conservative world-space bounding box
    ///
    /// Transforms the 8 corners of the local AABB by the attached node's
    /// world matrix and takes the min/max over the transformed points.
    /// This bounds the transformed *box*, not the transformed shape, so it
    /// is conservative rather than tight - fine for culling and picking
    /// broad-phase, not for exact collision.
    ///
    /// Fails with [`SceneError::NotAttached`] when the object is not
    /// attached to a node.
    fn compute_world_aabb_fast(&self, graph: &SceneGraph) -> Result<Aabb, SceneError> {
        let node = self.attached_node().ok_or_else(|| SceneError::NotAttached {
            uid: self.uid().to_string(),
        })?;
        let world = graph.world_matrix(node)?;

        let mut out = Aabb::default();
        for corner in self.local_aabb().corners() {
            let transformed = world.transform_point(&Point3::from(corner));
            out.grow_to_point(transformed.coords);
        }
        Ok(out)
    }
}
