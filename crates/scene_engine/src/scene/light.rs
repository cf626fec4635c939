//! Point light scene object
//!
//! Lights attach to scene nodes the same way meshes do; only the light's
//! position comes from the node, the photometric parameters live here.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use crate::geometry::Aabb;
use crate::scene::graph::NodeKey;
use crate::scene::object::SceneObject;

/// Photometric description of a point light
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointLightDesc {
    /// Ambient contribution color
    pub ambient_color: Vec3,
    /// Diffuse contribution color
    pub diffuse_color: Vec3,
    /// Specular contribution color
    pub specular_color: Vec3,
    /// Diffuse intensity multiplier
    pub diffuse_intensity: f32,
    /// Specular intensity multiplier
    pub specular_intensity: f32,
    /// Distance-squared attenuation factor
    pub attenuation_factor: f32,
    /// Maximum lighting range (world units)
    pub range: f32,
}

impl Default for PointLightDesc {
    fn default() -> Self {
        Self {
            ambient_color: Vec3::new(0.1, 0.1, 0.1),
            diffuse_color: Vec3::new(1.0, 1.0, 1.0),
            specular_color: Vec3::new(1.0, 1.0, 1.0),
            diffuse_intensity: 1.0,
            specular_intensity: 1.0,
            attenuation_factor: 0.01,
            range: 1.0,
        }
    }
}

/// A point light attachable to a scene node
#[derive(Debug, Clone)]
pub struct PointLight {
    uid: String,
    desc: PointLightDesc,
    attached_node: Option<NodeKey>,
}

impl PointLight {
    /// Create a light with default parameters
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            desc: PointLightDesc::default(),
            attached_node: None,
        }
    }

    /// Create a light with an explicit range
    pub fn with_range(uid: impl Into<String>, range: f32) -> Self {
        Self {
            uid: uid.into(),
            desc: PointLightDesc {
                range,
                ..Default::default()
            },
            attached_node: None,
        }
    }

    /// Light parameters
    pub fn desc(&self) -> &PointLightDesc {
        &self.desc
    }

    /// Replace the light parameters
    pub fn set_desc(&mut self, desc: PointLightDesc) {
        self.desc = desc;
    }
}

impl SceneObject for PointLight {
    fn uid(&self) -> &str {
        &self.uid
    }

    fn local_aabb(&self) -> Aabb {
        // The light itself is a point; its influence volume bounds it
        let r = self.desc.range;
        Aabb::from_center_extents(Vec3::zeros(), Vec3::new(r, r, r))
    }

    fn attached_node(&self) -> Option<NodeKey> {
        self.attached_node
    }

    fn set_attached_node(&mut self, node: Option<NodeKey>) {
        self.attached_node = node;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_aabb_follows_range() {
        let light = PointLight::with_range("l", 4.0);
        let aabb = light.local_aabb();
        assert_eq!(aabb.min, Vec3::new(-4.0, -4.0, -4.0));
        assert_eq!(aabb.max, Vec3::new(4.0, 4.0, 4.0));
    }
}
