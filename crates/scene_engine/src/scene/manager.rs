//! Mesh manager - owns meshes, nodes only reference them
//!
//! Scene nodes never own the objects attached to them; managers do. The
//! mesh manager creates meshes bound to a node (the attach is the
//! graph's transactional operation, so the node↔object invariant holds
//! from the first moment the mesh exists) and keeps them alive until
//! they are removed or the manager is dropped.

use std::collections::HashMap;

use log::error;

use crate::errors::SceneError;
use crate::geometry::mesh::Mesh;
use crate::scene::graph::{NodeKey, SceneGraph};
use crate::scene::object::SceneObject;

/// Owner and registry of [`Mesh`] scene objects, keyed by UID
#[derive(Default)]
pub struct MeshManager {
    meshes: HashMap<String, Mesh>,
}

impl MeshManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh attached to the given scene node
    ///
    /// Fails when the node handle is invalid or the UID is already taken;
    /// both failures leave the manager unchanged.
    pub fn create_mesh(
        &mut self,
        graph: &mut SceneGraph,
        node: NodeKey,
        uid: impl Into<String>,
    ) -> Result<&mut Mesh, SceneError> {
        let uid = uid.into();
        if !graph.contains(node) {
            error!("failed to create mesh '{uid}': parent scene node is invalid");
            return Err(SceneError::NodeNotFound);
        }
        if self.meshes.contains_key(&uid) {
            error!("failed to create mesh '{uid}': uid already in use");
            return Err(SceneError::DuplicateUid { uid });
        }

        let mut mesh = Mesh::new(uid.clone());
        graph.attach_object(node, &mut mesh)?;
        Ok(self.meshes.entry(uid).or_insert(mesh))
    }

    /// Look up a mesh by UID
    pub fn mesh(&self, uid: &str) -> Option<&Mesh> {
        self.meshes.get(uid)
    }

    /// Mutably look up a mesh by UID
    pub fn mesh_mut(&mut self, uid: &str) -> Option<&mut Mesh> {
        self.meshes.get_mut(uid)
    }

    /// Remove (and drop) a mesh, detaching it from its node first
    ///
    /// Returns the mesh so callers can keep it alive if they want;
    /// detachment itself never deletes anything.
    pub fn remove_mesh(&mut self, graph: &mut SceneGraph, uid: &str) -> Option<Mesh> {
        let mut mesh = self.meshes.remove(uid)?;
        graph.detach_object(&mut mesh);
        Some(mesh)
    }

    /// Number of meshes owned by this manager
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Whether the manager owns no meshes
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Iterate over all meshes
    pub fn iter(&self) -> impl Iterator<Item = &Mesh> {
        self.meshes.values()
    }
}
