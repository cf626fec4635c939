//! Path-tracer-oriented material model
//!
//! The material description a physically-based integrator samples:
//! albedo, microfacet roughness, metallicity with an explicit F0,
//! emission, and refraction parameters. No texture or GPU state lives
//! here - this is the analytic parameter set.
//!
//! Materials are owned by a [`MaterialLibrary`] that is passed around
//! explicitly; there is deliberately no process-wide default-material
//! singleton.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils, Vec3};

/// Raw parameter block of a path-tracer material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PbrtMaterialDesc {
    /// Base color (linear RGB)
    pub albedo: Vec3,
    /// Microfacet roughness, 0 = mirror, 1 = fully diffuse
    pub roughness: f32,
    /// Opacity: 1 = fully opaque, values below 1 enable transmission
    pub transparency: f32,
    /// Metallic blend, 0 = dielectric, 1 = metal
    pub metallicity: f32,
    /// Fresnel reflectance at normal incidence for the metallic lobe
    pub metal_f0: Vec3,
    /// HDR emission (linear RGB radiance)
    pub emission: Vec3,
    /// Index of refraction for the transmissive lobe (> 1)
    pub ior: f32,
}

impl Default for PbrtMaterialDesc {
    fn default() -> Self {
        Self {
            albedo: Vec3::new(1.0, 1.0, 1.0),
            roughness: 1.0,
            transparency: 1.0,
            metallicity: 0.0,
            metal_f0: Vec3::new(0.04, 0.04, 0.04),
            emission: Vec3::zeros(),
            ior: 1.5,
        }
    }
}

/// Path-tracer material with range-checked setters
///
/// Setters clamp into valid ranges instead of failing: an integrator fed
/// an out-of-range roughness produces fireflies or NaNs, so the values
/// are sanitized at the API boundary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PbrtMaterial {
    desc: PbrtMaterialDesc,
}

impl PbrtMaterial {
    /// Create a material with default (diffuse white) parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Base color
    pub fn set_albedo(&mut self, albedo: Vec3) {
        self.desc.albedo = albedo;
    }

    /// Roughness, clamped to [0, 1]
    pub fn set_roughness(&mut self, roughness: f32) {
        self.desc.roughness = utils::clamp(roughness, 0.0, 1.0);
    }

    /// Opacity, clamped to [0, 1]
    pub fn set_transparency(&mut self, transparency: f32) {
        self.desc.transparency = utils::clamp(transparency, 0.0, 1.0);
    }

    /// Metallic blend, clamped to [0, 1]
    pub fn set_metallicity(&mut self, metallicity: f32) {
        self.desc.metallicity = utils::clamp(metallicity, 0.0, 1.0);
    }

    /// Metal F0, clamped component-wise to [0, 1]
    pub fn set_metal_f0(&mut self, f0: Vec3) {
        self.desc.metal_f0 = Vec3::new(
            utils::clamp(f0.x, 0.0, 1.0),
            utils::clamp(f0.y, 0.0, 1.0),
            utils::clamp(f0.z, 0.0, 1.0),
        );
    }

    /// HDR emission
    pub fn set_emission(&mut self, emission: Vec3) {
        self.desc.emission = emission;
    }

    /// Index of refraction; values at or below 1 are floored just above
    pub fn set_refractive_index(&mut self, ior: f32) {
        self.desc.ior = if ior <= 1.0 { 1.001 } else { ior };
    }

    /// Whether the transmissive lobe is active
    pub fn is_transmission_enabled(&self) -> bool {
        self.desc.transparency != 1.0
    }

    /// Whether the material emits light
    pub fn is_emission_enabled(&self) -> bool {
        self.desc.emission != Vec3::zeros()
    }

    /// Replace the whole parameter block
    pub fn set_desc(&mut self, desc: PbrtMaterialDesc) {
        self.desc = desc;
    }

    /// Borrow the parameter block
    pub fn desc(&self) -> &PbrtMaterialDesc {
        &self.desc
    }

    /// Configure as a smooth glass with the given index of refraction
    pub fn preset_perfect_glass(&mut self, ior: f32) {
        let ior = ior.max(1.0);
        let f0 = ior_to_f0(ior);
        self.desc = PbrtMaterialDesc {
            albedo: Vec3::new(1.0, 1.0, 1.0),
            roughness: 0.0,
            transparency: 0.0,
            metallicity: 0.0,
            metal_f0: Vec3::new(f0, f0, f0),
            emission: Vec3::zeros(),
            ior,
        };
    }

    /// Configure as an opaque rough metal
    pub fn preset_rough_metal(&mut self, f0: Vec3, roughness: f32) {
        self.desc = PbrtMaterialDesc {
            albedo: Vec3::new(1.0, 1.0, 1.0),
            roughness: utils::clamp(roughness, 0.0, 1.0),
            transparency: 1.0,
            metallicity: 1.0,
            metal_f0: f0,
            emission: Vec3::zeros(),
            ior: 1.5,
        };
    }
}

/// Fresnel reflectance at normal incidence from an index of refraction
pub fn ior_to_f0(ior: f32) -> f32 {
    let x = (ior - 1.0) / (ior + 1.0);
    x * x
}

/// Explicit registry of materials, keyed by UID
///
/// Construct one per scene/context and pass it where it is needed; mesh
/// objects reference materials by UID. Unassigned meshes resolve to the
/// library's default material.
pub struct MaterialLibrary {
    materials: std::collections::HashMap<String, PbrtMaterial>,
    default_material: PbrtMaterial,
}

impl Default for MaterialLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialLibrary {
    /// Create a library containing only the default material
    pub fn new() -> Self {
        Self {
            materials: std::collections::HashMap::new(),
            default_material: PbrtMaterial::new(),
        }
    }

    /// Insert or replace a material under a UID
    pub fn insert(&mut self, uid: impl Into<String>, material: PbrtMaterial) {
        self.materials.insert(uid.into(), material);
    }

    /// Look up a material, falling back to the default
    pub fn get_or_default(&self, uid: Option<&str>) -> &PbrtMaterial {
        uid.and_then(|u| self.materials.get(u))
            .unwrap_or(&self.default_material)
    }

    /// Look up a material by UID
    pub fn get(&self, uid: &str) -> Option<&PbrtMaterial> {
        self.materials.get(uid)
    }

    /// The default material used for unassigned meshes
    pub fn default_material(&self) -> &PbrtMaterial {
        &self.default_material
    }
}
