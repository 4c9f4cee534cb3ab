//! Physics backend abstraction.
//!
//! This module defines the trait that physics backends must implement to
//! work with the character controller, allowing easy swapping between
//! physics engines (Rapier3D, custom, test doubles).
//!
//! The split of responsibilities:
//! - The trait provides world-based accessors for the character's rigid
//!   body: velocity read/write, impulses, teleportation, and collider
//!   introspection.
//! - The associated [`CharacterPhysicsBackend::plugin`] registers the
//!   backend's sensor systems - the raycasts for the ground probe and the
//!   step scan - in [`CharacterControllerSet::Sensors`], writing their
//!   results into the [`CharacterController`](crate::controller::CharacterController)
//!   hub component for the generic locomotion systems to consume.
//!
//! [`CharacterControllerSet::Sensors`]: crate::CharacterControllerSet::Sensors

use bevy::prelude::*;

/// Trait for physics backend implementations.
///
/// Implement this trait to integrate a physics engine with the character
/// controller. For an example implementation see the `rapier` module's
/// `Rapier3dBackend` (behind the `rapier3d` feature).
pub trait CharacterPhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend's sensor systems.
    fn plugin() -> impl Plugin;

    /// Get the current linear velocity of an entity.
    fn get_velocity(world: &World, entity: Entity) -> Vec3;

    /// Set the linear velocity of an entity.
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3);

    /// Apply an impulse (instantaneous momentum change) to an entity.
    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec3);

    /// Teleport an entity by the given offset, bypassing integration.
    ///
    /// Used by step climbing to lift the body onto a ledge. The offset is
    /// applied to the body transform directly; the backend is responsible
    /// for keeping its internal state in sync.
    fn translate(world: &mut World, entity: Entity, offset: Vec3);

    /// Get the current world position of an entity.
    fn get_position(world: &World, entity: Entity) -> Vec3;

    /// Measure the collider's half-height (center to bottom) for an
    /// entity. Returns None when there is no collider or its shape cannot
    /// be measured; callers fall back to the configured constant.
    fn get_collider_half_height(_world: &World, _entity: Entity) -> Option<f32> {
        None
    }

    /// Get the fixed timestep delta time.
    fn get_fixed_timestep(world: &World) -> f32 {
        world
            .get_resource::<Time<Fixed>>()
            .map(|t| t.delta_secs())
            .filter(|&d| d > 0.0)
            .unwrap_or(1.0 / 60.0)
    }
}

/// Empty plugin for backends that don't need additional setup.
pub struct NoOpBackendPlugin;

impl Plugin for NoOpBackendPlugin {
    fn build(&self, _app: &mut App) {}
}
