//! Raycast result structures.
//!
//! These structures hold the results of physics queries used for ground
//! probing and step detection.

use bevy::prelude::*;

/// Information about a raycast hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct RayHit {
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// Normal of the surface at the hit point.
    pub normal: Vec3,
    /// World position of the hit point.
    pub point: Vec3,
    /// Entity that was hit (if the backend reports one).
    pub entity: Option<Entity>,
}

impl RayHit {
    /// Create a hit result.
    pub fn new(distance: f32, normal: Vec3, point: Vec3, entity: Option<Entity>) -> Self {
        Self {
            distance,
            normal,
            point,
            entity,
        }
    }
}
