//! # `stride_character_controller`
//!
//! A first-person rigidbody character controller with physics backend
//! abstraction.
//!
//! This crate provides a responsive, tuneable FPS character controller
//! that:
//! - Detects grounding with a single margin-padded downward raycast
//! - Climbs low steps with a two-raycast ledge detector (forward obstacle
//!   probe plus downward ledge probe), teleporting the body onto the ledge
//! - Integrates look input with clamped pitch and yaw-only movement
//! - Applies tick-rate-independent exponential velocity damping, with
//!   separate grounded and airborne coefficients
//! - Debounces jumps with a per-character cooldown timer
//! - Emits movement and sprint notifications on state edges, so animation
//!   and weapon-sway systems react without polling
//! - Abstracts the physics backend for easy swapping (Rapier3D included)
//!
//! ## Architecture
//!
//! Each simulation tick runs four chained phases in `FixedUpdate`:
//! 1. **Input**: accumulated look deltas are consumed, yaw/pitch updated
//! 2. **Sensors**: the backend raycasts the ground probe and step scan,
//!    writing results into the [`CharacterController`] hub component
//! 3. **Locomotion**: step climbing, acceleration + damping, jumping
//! 4. **Notifications**: state markers synced, movement events emitted
//!
//! ## Usage
//!
//! ```rust
//! use stride_character_controller::prelude::*;
//!
//! // Configure a player character
//! let config = ControllerConfig::player().with_jump_cooldown(0.4);
//! let steps = StepConfig::default().with_step_band(0.05, 0.5);
//!
//! // Feed intents from any input source
//! let mut intent = MovementIntent::new();
//! intent.set_forward(1.0);
//! intent.set_sprint(true);
//! assert!(intent.is_moving());
//! ```

use bevy::prelude::*;

pub mod backend;
pub mod collision;
pub mod config;
pub mod controller;
pub mod detection;
pub mod events;
pub mod intent;
pub mod state;
pub mod systems;

#[cfg(feature = "rapier3d")]
pub mod rapier;

use backend::CharacterPhysicsBackend;
use controller::CharacterController;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::CharacterPhysicsBackend;
    pub use crate::collision::RayHit;
    pub use crate::config::{ControllerConfig, StepConfig};
    pub use crate::controller::CharacterController;
    pub use crate::detection::StepCandidate;
    pub use crate::events::{MovementStarted, MovementStopped, SprintChanged};
    pub use crate::intent::MovementIntent;
    pub use crate::state::{Airborne, Grounded};
    pub use crate::{CharacterControllerPlugin, CharacterControllerSet};

    #[cfg(feature = "rapier3d")]
    pub use crate::rapier::{Rapier3dBackend, Rapier3dCharacterBundle};
}

/// Phases of the per-tick controller pipeline, chained in `FixedUpdate`.
///
/// Backend sensor systems belong in [`CharacterControllerSet::Sensors`];
/// everything else is added by [`CharacterControllerPlugin`].
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterControllerSet {
    /// Look input consumption and body yaw rotation.
    Input,
    /// Backend raycasts: ground probe and step scan.
    Sensors,
    /// Step climbing, movement integration, jumping.
    Locomotion,
    /// State marker sync and movement notifications.
    Notifications,
}

/// Main plugin for the character controller system.
///
/// This plugin is generic over a physics backend `B` which provides the
/// actual physics operations (raycasting, velocity manipulation, etc.).
///
/// # Type Parameters
/// - `B`: The physics backend implementation (e.g., `Rapier3dBackend`)
///
/// # Examples
///
/// With the Rapier3D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use stride_character_controller::prelude::*;
///
/// #[cfg(feature = "rapier3d")]
/// fn build_app() -> App {
///     use bevy_rapier3d::prelude::*;
///
///     let mut app = App::new();
///     app.add_plugins(MinimalPlugins)
///         .add_plugins(TransformPlugin)
///         .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///         .add_plugins(CharacterControllerPlugin::<Rapier3dBackend>::default());
///     app
/// }
/// ```
pub struct CharacterControllerPlugin<B: CharacterPhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: CharacterPhysicsBackend> Default for CharacterControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: CharacterPhysicsBackend> Plugin for CharacterControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::ControllerConfig>();
        app.register_type::<config::StepConfig>();
        app.register_type::<intent::MovementIntent>();
        app.register_type::<CharacterController>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();

        // Movement notifications
        app.add_event::<events::MovementStarted>();
        app.add_event::<events::MovementStopped>();
        app.add_event::<events::SprintChanged>();

        // One tick = Input -> Sensors -> Locomotion -> Notifications
        app.configure_sets(
            FixedUpdate,
            (
                CharacterControllerSet::Input,
                CharacterControllerSet::Sensors,
                CharacterControllerSet::Locomotion,
                CharacterControllerSet::Notifications,
            )
                .chain(),
        );

        // Add the physics backend plugin (sensor systems)
        app.add_plugins(B::plugin());

        app.add_systems(
            FixedUpdate,
            systems::integrate_look.in_set(CharacterControllerSet::Input),
        );
        app.add_systems(
            FixedUpdate,
            (
                systems::apply_step_climb::<B>,
                systems::apply_movement::<B>,
                systems::apply_jump::<B>,
            )
                .chain()
                .in_set(CharacterControllerSet::Locomotion),
        );
        app.add_systems(
            FixedUpdate,
            (systems::sync_state_markers, systems::emit_movement_events::<B>)
                .chain()
                .in_set(CharacterControllerSet::Notifications),
        );
    }
}
