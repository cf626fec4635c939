//! Ray and hit-record types for intersection queries

use crate::foundation::math::Vec3;

/// A ray for ray casting and picking
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray
    pub origin: Vec3,
    /// The direction of the ray (unit length for world-space queries)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray, normalizing the direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        debug_assert!(direction.norm_squared() > 0.0, "ray direction must be non-zero");
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Creates a ray without normalizing the direction
    ///
    /// Used when a ray has been mapped into another space (a box or mesh
    /// local frame) and the parametrization must stay aligned with the
    /// source ray.
    pub fn from_origin_direction(origin: Vec3, direction: Vec3) -> Self {
        debug_assert!(direction.norm_squared() > 0.0, "ray direction must be non-zero");
        Self { origin, direction }
    }

    /// Get a point along the ray at parameter t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Record of a single successful ray intersection
#[derive(Debug, Clone, Copy)]
pub struct RayHitInfo {
    /// Ray parameter at the hit. Initialized to the -∞ sentinel until an
    /// intersection routine fills it in.
    pub t: f32,
    /// Hit point position
    pub position: Vec3,
    /// Surface normal at the hit point
    pub normal: Vec3,
}

impl Default for RayHitInfo {
    fn default() -> Self {
        Self {
            t: f32::NEG_INFINITY,
            position: Vec3::zeros(),
            normal: Vec3::zeros(),
        }
    }
}

impl RayHitInfo {
    /// Check the hit parameter for the +∞ "no intersection" marker
    pub fn is_valid(&self) -> bool {
        self.t != f32::INFINITY
    }
}

/// Ordered collection of hits for a single ray query
#[derive(Debug, Clone, Default)]
pub struct RayHitResult {
    /// Individual hit records, in the order the tests produced them
    pub hits: Vec<RayHitInfo>,
}

impl RayHitResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort hits by depth (ray parameter t), ascending
    pub fn sort_by_depth(&mut self) {
        self.hits
            .sort_by(|a, b| a.t.partial_cmp(&b.t).unwrap_or(std::cmp::Ordering::Equal));
    }

    /// Whether any hit was recorded
    pub fn has_any_hit(&self) -> bool {
        !self.hits.is_empty()
    }

    /// The hit with the smallest t, without requiring a prior sort
    pub fn nearest(&self) -> Option<&RayHitInfo> {
        self.hits
            .iter()
            .min_by(|a, b| a.t.partial_cmp(&b.t).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Drop all recorded hits
    pub fn clear(&mut self) {
        self.hits.clear();
    }
}
