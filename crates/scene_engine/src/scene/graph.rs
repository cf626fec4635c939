//! Scene graph: a tree of transform nodes backed by an arena
//!
//! Nodes live in a slotmap arena owned by the graph and refer to each
//! other only through [`NodeKey`] handles, so subtree destruction can
//! never leave dangling pointers - a stale handle simply fails to
//! resolve.
//!
//! ## World-matrix caching contract
//!
//! `eval_world_matrix(key, cache = true)` stores the evaluated matrix on
//! the node. The cache is **not** invalidated when an ancestor's local
//! transform changes afterwards: callers that mutate a transform are
//! responsible for clearing the caches of the affected subtree (see
//! [`SceneGraph::clear_world_cache_recursive`]). This trade keeps
//! evaluation free of bookkeeping on the hot path; enabling
//! [`SceneConfig::validate_world_cache`](crate::config::SceneConfig) makes
//! debug builds recompute and compare on every cached read to catch
//! violations of the contract.

use slotmap::{new_key_type, SlotMap};

use crate::config::SceneConfig;
use crate::errors::SceneError;
use crate::foundation::affine_transform::AffineTransform;
use crate::foundation::math::Mat4;
use crate::scene::object::SceneObject;

new_key_type! {
    /// Handle to a node inside a [`SceneGraph`] arena
    pub struct NodeKey;
}

/// A single node in a scene graph
///
/// Holds the transform relative to the parent node, tree links, the UIDs
/// of attached scene objects (non-owning), and the optional world-matrix
/// cache.
#[derive(Debug, Clone)]
pub struct SceneNode {
    local: AffineTransform,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
    attached: Vec<String>,
    world_cache: Option<Mat4>,
}

impl SceneNode {
    fn new(parent: Option<NodeKey>) -> Self {
        Self {
            local: AffineTransform::identity(),
            parent,
            children: Vec::new(),
            attached: Vec::new(),
            world_cache: None,
        }
    }

    /// Transform relative to the parent node
    pub fn local_transform(&self) -> &AffineTransform {
        &self.local
    }

    /// Mutable transform relative to the parent node
    ///
    /// Mutation does not clear any world-matrix caches; that is the
    /// caller's job (see the module docs).
    pub fn local_transform_mut(&mut self) -> &mut AffineTransform {
        &mut self.local
    }

    /// The parent node, `None` for the root
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Child nodes in creation/attachment order
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// UIDs of the scene objects attached to this node
    pub fn attached_objects(&self) -> &[String] {
        &self.attached
    }

    /// Whether any scene object is attached
    pub fn has_attached_objects(&self) -> bool {
        !self.attached.is_empty()
    }

    /// Whether this node is the graph root
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Whether a world matrix is currently cached on this node
    pub fn is_world_matrix_cached(&self) -> bool {
        self.world_cache.is_some()
    }
}

/// Tree of scene nodes with cached world-matrix evaluation
///
/// The graph owns its node arena: dropping the graph drops every node.
/// Attached scene objects are *not* owned - they belong to their managers
/// and the graph only stores their UIDs.
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, SceneNode>,
    root: NodeKey,
    config: SceneConfig,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph containing only a root node
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Create a graph with explicit scene configuration
    pub fn with_config(config: SceneConfig) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::new(None));
        Self { nodes, root, config }
    }

    /// Handle of the root node
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// The scene configuration this graph was built with
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Number of nodes in the graph (root included)
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the handle resolves to a live node of this graph
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Borrow a node
    pub fn node(&self, key: NodeKey) -> Result<&SceneNode, SceneError> {
        self.nodes.get(key).ok_or(SceneError::NodeNotFound)
    }

    /// Mutably borrow a node
    pub fn node_mut(&mut self, key: NodeKey) -> Result<&mut SceneNode, SceneError> {
        self.nodes.get_mut(key).ok_or(SceneError::NodeNotFound)
    }

    // ------------------------------------------------------------------
    // Tree operations
    // ------------------------------------------------------------------

    /// Create a new child under `parent` and return its handle
    pub fn create_child(&mut self, parent: NodeKey) -> Result<NodeKey, SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::NodeNotFound);
        }
        let child = self.nodes.insert(SceneNode::new(Some(parent)));
        self.nodes[parent].children.push(child);
        Ok(child)
    }

    /// Attach an existing node under a (new) parent
    ///
    /// The root cannot be re-parented, and a node cannot be attached under
    /// its own subtree. Moving a subtree does not clear any descendant
    /// world-matrix caches (caller contract, see module docs).
    pub fn attach_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), SceneError> {
        if child == self.root {
            return Err(SceneError::CannotReparentRoot);
        }
        if !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            return Err(SceneError::NodeNotFound);
        }
        if parent == child || self.is_descendant_of(parent, child) {
            return Err(SceneError::WouldCreateCycle);
        }

        let old_parent = self.nodes[child].parent;
        if old_parent == Some(parent) {
            return Ok(());
        }
        if let Some(old) = old_parent {
            self.nodes[old].children.retain(|&c| c != child);
        }
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        Ok(())
    }

    /// Attach `node` to a new parent (same operation as [`attach_child`](Self::attach_child))
    pub fn attach_to_parent(&mut self, node: NodeKey, new_parent: NodeKey) -> Result<(), SceneError> {
        self.attach_child(new_parent, node)
    }

    /// Destroy a node and its whole subtree
    ///
    /// Returns the UIDs of all scene objects that were attached anywhere
    /// in the destroyed subtree. The objects themselves are owned by their
    /// managers and are *not* deleted; owners should clear the returned
    /// objects' back-references (a stale [`NodeKey`] is harmless - it
    /// resolves to [`SceneError::NodeNotFound`] on use - but keeping the
    /// invariant tight avoids surprises).
    ///
    /// The root cannot be destroyed - drop the graph instead.
    pub fn destroy_subtree(&mut self, key: NodeKey) -> Result<Vec<String>, SceneError> {
        if key == self.root {
            return Err(SceneError::CannotReparentRoot);
        }
        if !self.nodes.contains_key(key) {
            return Err(SceneError::NodeNotFound);
        }

        if let Some(parent) = self.nodes[key].parent {
            self.nodes[parent].children.retain(|&c| c != key);
        }

        let mut orphaned = Vec::new();
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                orphaned.extend(node.attached);
                stack.extend(node.children);
            }
        }
        Ok(orphaned)
    }

    fn is_descendant_of(&self, node: NodeKey, ancestor: NodeKey) -> bool {
        let mut current = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(key) = current {
            if key == ancestor {
                return true;
            }
            current = self.nodes.get(key).and_then(|n| n.parent);
        }
        false
    }

    // ------------------------------------------------------------------
    // World-transform evaluation
    // ------------------------------------------------------------------

    /// Evaluate the node's world matrix without touching any cache
    ///
    /// Walks from the node to the root concatenating local matrices
    /// (`World = ParentWorld · Local`). Valid ancestor caches shortcut the
    /// walk.
    pub fn world_matrix(&self, key: NodeKey) -> Result<Mat4, SceneError> {
        let node = self.node(key)?;
        if let Some(cached) = node.world_cache {
            self.cross_check_cache(key, &cached);
            return Ok(cached);
        }
        match node.parent {
            Some(parent) => Ok(self.world_matrix(parent)? * node.local.to_matrix()),
            None => Ok(node.local.to_matrix()),
        }
    }

    /// Evaluate the node's world matrix, optionally caching the result
    ///
    /// With `cache_result` set, the evaluated matrix is stored on the node
    /// and returned directly by later evaluations until
    /// [`clear_world_cache`](Self::clear_world_cache) is called.
    pub fn eval_world_matrix(&mut self, key: NodeKey, cache_result: bool) -> Result<Mat4, SceneError> {
        let world = self.world_matrix(key)?;
        if cache_result {
            self.nodes[key].world_cache = Some(world);
        }
        Ok(world)
    }

    /// Evaluate world matrix together with its inverse and inverse-transpose
    ///
    /// The inverse and inverse-transpose (the normal-transform matrix
    /// lighting consumers need) are derived from the one evaluated world
    /// matrix, never from an independent walk, so the three can not drift
    /// apart.
    pub fn eval_world_matrix_with_inverse(
        &mut self,
        key: NodeKey,
        cache_result: bool,
    ) -> Result<(Mat4, Mat4, Mat4), SceneError> {
        let world = self.eval_world_matrix(key, cache_result)?;
        let inverse = world.try_inverse().ok_or(SceneError::SingularTransform)?;
        Ok((world, inverse, inverse.transpose()))
    }

    /// World transform as a decomposed affine transform
    pub fn world_transform(&self, key: NodeKey) -> Result<AffineTransform, SceneError> {
        Ok(AffineTransform::from_matrix(&self.world_matrix(key)?))
    }

    /// World matrix considering only rotation and translation
    pub fn world_rigid_matrix(&self, key: NodeKey) -> Result<Mat4, SceneError> {
        let node = self.node(key)?;
        let local = node.local.to_rigid_matrix();
        match node.parent {
            Some(parent) => Ok(self.world_rigid_matrix(parent)? * local),
            None => Ok(local),
        }
    }

    /// World matrix considering only rotation
    pub fn world_rotation_matrix(&self, key: NodeKey) -> Result<Mat4, SceneError> {
        let node = self.node(key)?;
        let local = node.local.to_rotation_matrix();
        match node.parent {
            Some(parent) => Ok(self.world_rotation_matrix(parent)? * local),
            None => Ok(local),
        }
    }

    /// Clear this node's world-matrix cache
    pub fn clear_world_cache(&mut self, key: NodeKey) -> Result<(), SceneError> {
        self.node_mut(key)?.world_cache = None;
        Ok(())
    }

    /// Clear the world-matrix caches of a node and all its descendants
    ///
    /// Invalidation stays explicit - this is the helper callers are
    /// expected to reach for after mutating a local transform.
    pub fn clear_world_cache_recursive(&mut self, key: NodeKey) -> Result<(), SceneError> {
        if !self.nodes.contains_key(key) {
            return Err(SceneError::NodeNotFound);
        }
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current) {
                node.world_cache = None;
                stack.extend(node.children.iter().copied());
            }
        }
        Ok(())
    }

    /// Whether the node currently holds a cached world matrix
    pub fn is_world_matrix_cached(&self, key: NodeKey) -> Result<bool, SceneError> {
        Ok(self.node(key)?.is_world_matrix_cached())
    }

    #[cfg(debug_assertions)]
    fn cross_check_cache(&self, key: NodeKey, cached: &Mat4) {
        if !self.config.validate_world_cache {
            return;
        }
        // Recompute from local transforms only, bypassing every cache.
        let mut expected = Mat4::identity();
        let mut chain = vec![key];
        let mut current = self.nodes[key].parent;
        while let Some(k) = current {
            chain.push(k);
            current = self.nodes[k].parent;
        }
        for k in chain.into_iter().rev() {
            expected *= self.nodes[k].local.to_matrix();
        }
        if (expected - cached).amax() > 1e-4 {
            log::warn!(
                "stale world-matrix cache detected on node {key:?}; \
                 an ancestor transform changed without clearing the subtree cache"
            );
        }
    }

    #[cfg(not(debug_assertions))]
    fn cross_check_cache(&self, _key: NodeKey, _cached: &Mat4) {}

    // ------------------------------------------------------------------
    // Object attachment
    // ------------------------------------------------------------------

    /// Attach a scene object to a node
    ///
    /// This is the single writer of both sides of the node↔object
    /// relation: the node's attachment list and the object's node
    /// back-reference are updated together, and an object already attached
    /// elsewhere is detached from its previous node first.
    pub fn attach_object(&mut self, key: NodeKey, object: &mut dyn SceneObject) -> Result<(), SceneError> {
        if !self.nodes.contains_key(key) {
            return Err(SceneError::NodeNotFound);
        }

        if let Some(previous) = object.attached_node() {
            if previous == key {
                return Ok(());
            }
            if let Some(prev_node) = self.nodes.get_mut(previous) {
                prev_node.attached.retain(|uid| uid != object.uid());
            }
        }

        self.nodes[key].attached.push(object.uid().to_string());
        object.set_attached_node(Some(key));
        Ok(())
    }

    /// Detach a scene object from whichever node it is attached to
    ///
    /// A no-op for objects that are not attached. Never deletes the
    /// object - ownership stays with its manager.
    pub fn detach_object(&mut self, object: &mut dyn SceneObject) {
        if let Some(key) = object.attached_node() {
            if let Some(node) = self.nodes.get_mut(key) {
                node.attached.retain(|uid| uid != object.uid());
            }
            object.set_attached_node(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::foundation::math::Vec3;

    fn assert_mat_approx_eq(a: &Mat4, b: &Mat4) {
        for i in 0..4 {
            for j in 0..4 {
                assert_relative_eq!(a[(i, j)], b[(i, j)], epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_new_graph_has_root_only() {
        let graph = SceneGraph::new();
        assert_eq!(graph.node_count(), 1);
        assert!(graph.node(graph.root()).unwrap().is_root());
    }

    #[test]
    fn test_create_child_links_both_ways() {
        let mut graph = SceneGraph::new();
        let child = graph.create_child(graph.root()).unwrap();

        assert_eq!(graph.node(child).unwrap().parent(), Some(graph.root()));
        assert_eq!(graph.node(graph.root()).unwrap().children(), &[child]);
        assert!(!graph.node(child).unwrap().is_root());
    }

    #[test]
    fn test_world_matrix_concatenates_to_root() {
        let mut graph = SceneGraph::new();
        let a = graph.create_child(graph.root()).unwrap();
        let b = graph.create_child(a).unwrap();

        graph.node_mut(a).unwrap().local_transform_mut().position = Vec3::new(1.0, 0.0, 0.0);
        graph.node_mut(b).unwrap().local_transform_mut().position = Vec3::new(0.0, 2.0, 0.0);

        let world = graph.world_matrix(b).unwrap();
        assert_relative_eq!(world[(0, 3)], 1.0, epsilon = 1e-6);
        assert_relative_eq!(world[(1, 3)], 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_world_matrix_applies_parent_rotation_to_child_translation() {
        let mut graph = SceneGraph::new();
        let a = graph.create_child(graph.root()).unwrap();
        let b = graph.create_child(a).unwrap();

        // Parent rotated +90° about Y; child offset +1 on local X maps to
        // world -Z.
        graph.node_mut(a).unwrap().local_transform_mut().rotation =
            crate::foundation::math::Quat::from_axis_angle(
                &Vec3::y_axis(),
                crate::foundation::math::constants::HALF_PI,
            );
        graph.node_mut(b).unwrap().local_transform_mut().position = Vec3::new(1.0, 0.0, 0.0);

        let world = graph.world_matrix(b).unwrap();
        assert_relative_eq!(world[(0, 3)], 0.0, epsilon = 1e-5);
        assert_relative_eq!(world[(2, 3)], -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_cache_is_not_auto_invalidated() {
        let mut graph = SceneGraph::new();
        let child = graph.create_child(graph.root()).unwrap();
        graph.node_mut(child).unwrap().local_transform_mut().position = Vec3::new(1.0, 0.0, 0.0);

        let cached = graph.eval_world_matrix(child, true).unwrap();
        assert!(graph.is_world_matrix_cached(child).unwrap());

        // Move the parent: by contract the cached value stays stale until
        // the caller clears it.
        graph.node_mut(graph.root()).unwrap().local_transform_mut().position =
            Vec3::new(10.0, 0.0, 0.0);
        let stale = graph.world_matrix(child).unwrap();
        assert_mat_approx_eq(&stale, &cached);

        graph.clear_world_cache(child).unwrap();
        let fresh = graph.world_matrix(child).unwrap();
        assert_relative_eq!(fresh[(0, 3)], 11.0, epsilon = 1e-5);
    }

    #[test]
    fn test_clear_world_cache_recursive() {
        let mut graph = SceneGraph::new();
        let a = graph.create_child(graph.root()).unwrap();
        let b = graph.create_child(a).unwrap();
        graph.eval_world_matrix(a, true).unwrap();
        graph.eval_world_matrix(b, true).unwrap();

        graph.clear_world_cache_recursive(a).unwrap();
        assert!(!graph.is_world_matrix_cached(a).unwrap());
        assert!(!graph.is_world_matrix_cached(b).unwrap());
    }

    #[test]
    fn test_inverse_family_is_consistent() {
        let mut graph = SceneGraph::new();
        let a = graph.create_child(graph.root()).unwrap();
        {
            let t = graph.node_mut(a).unwrap().local_transform_mut();
            t.position = Vec3::new(3.0, -1.0, 2.0);
            t.rotation = crate::foundation::math::Quat::from_axis_angle(&Vec3::z_axis(), 0.4);
            t.scale = Vec3::new(2.0, 2.0, 2.0);
        }

        let (world, inv, inv_t) = graph.eval_world_matrix_with_inverse(a, false).unwrap();
        assert_mat_approx_eq(&(world * inv), &Mat4::identity());
        assert_mat_approx_eq(&inv_t, &inv.transpose());
    }

    #[test]
    fn test_root_cannot_be_reparented() {
        let mut graph = SceneGraph::new();
        let child = graph.create_child(graph.root()).unwrap();
        assert_eq!(
            graph.attach_to_parent(graph.root(), child),
            Err(SceneError::CannotReparentRoot)
        );
    }

    #[test]
    fn test_reparent_rejects_cycles() {
        let mut graph = SceneGraph::new();
        let a = graph.create_child(graph.root()).unwrap();
        let b = graph.create_child(a).unwrap();

        assert_eq!(graph.attach_child(b, a), Err(SceneError::WouldCreateCycle));
        assert_eq!(graph.attach_child(a, a), Err(SceneError::WouldCreateCycle));
    }

    #[test]
    fn test_reparent_moves_subtree() {
        let mut graph = SceneGraph::new();
        let a = graph.create_child(graph.root()).unwrap();
        let b = graph.create_child(graph.root()).unwrap();
        let child = graph.create_child(a).unwrap();

        graph.node_mut(b).unwrap().local_transform_mut().position = Vec3::new(0.0, 5.0, 0.0);
        graph.attach_to_parent(child, b).unwrap();

        assert_eq!(graph.node(child).unwrap().parent(), Some(b));
        assert!(graph.node(a).unwrap().children().is_empty());

        let world = graph.world_matrix(child).unwrap();
        assert_relative_eq!(world[(1, 3)], 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_destroy_subtree_removes_nodes_and_reports_objects() {
        let mut graph = SceneGraph::new();
        let a = graph.create_child(graph.root()).unwrap();
        let b = graph.create_child(a).unwrap();

        let mut light = crate::scene::light::PointLight::new("lamp");
        graph.attach_object(b, &mut light).unwrap();

        let orphaned = graph.destroy_subtree(a).unwrap();
        assert_eq!(orphaned, vec!["lamp".to_string()]);
        assert!(!graph.contains(a));
        assert!(!graph.contains(b));
        assert_eq!(graph.node_count(), 1);

        // The stale back-reference resolves to NodeNotFound, not UB
        assert_eq!(graph.node(light.attached_node().unwrap()).err(), Some(SceneError::NodeNotFound));
    }
}
