//! Movement state notifications.
//!
//! The controller compares horizontal speed against the configured
//! movement threshold each tick and emits these events on the edges, so
//! collaborators (animation, weapon sway, audio) react without polling.
//!
//! Every event is delivered two ways:
//! - written to the process-wide Bevy event channel (`EventReader`), and
//! - triggered on the character entity itself, for entity-scoped
//!   observers registered with `EntityCommands::observe`.

use bevy::prelude::*;

/// The character's horizontal speed rose above the movement threshold.
///
/// Fires exactly once per transition; holding speed above the threshold
/// does not repeat it.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementStarted {
    /// The character that started moving.
    pub entity: Entity,
}

/// The character's horizontal speed fell to the movement threshold or
/// below. Fires exactly once per transition.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementStopped {
    /// The character that stopped moving.
    pub entity: Entity,
}

/// Sprint intent changed while the character was moving.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SprintChanged {
    /// The character whose sprint state changed.
    pub entity: Entity,
    /// The new sprint state.
    pub sprinting: bool,
}
