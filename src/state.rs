//! State marker components.
//!
//! These components indicate the current physical state of a character.
//! They are added and removed by the controller systems based on the
//! ground probe result, so external systems can filter queries on them
//! without reading the controller itself.

use bevy::prelude::*;

/// Marker component indicating the character is grounded.
///
/// Added when the ground probe finds support within the contact margin.
/// Mutually exclusive with [`Airborne`].
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use stride_character_controller::prelude::*;
///
/// fn footstep_candidates(query: Query<Entity, With<Grounded>>) {
///     for _entity in &query {
///         // play footsteps, spawn dust, ...
///     }
/// }
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component indicating the character is airborne.
///
/// Present from spawn until the first grounded tick, and again whenever
/// ground contact is lost.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;
