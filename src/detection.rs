//! Step detection logic.
//!
//! The raycasts themselves are issued by the physics backend; the decision
//! of whether their results describe a climbable ledge lives here, as plain
//! math, so it behaves identically across backends.
//!
//! A step scan uses two rays:
//! 1. A forward ray at foot height along the movement direction. A miss
//!    means there is no obstacle and nothing to climb.
//! 2. A downward ledge ray starting at the top of the climbable band,
//!    offset forward by the check distance. A miss means the obstacle is
//!    taller than the band (a wall).
//!
//! The ledge height relative to the current ground contact must fall inside
//! the configured band, and the ledge surface must face upward. Anything
//! ambiguous fails closed as "no step".

use bevy::prelude::*;

use crate::collision::RayHit;
use crate::config::StepConfig;

/// Height above the capsule bottom at which the forward obstacle ray is
/// cast, so it skims just above the ground surface.
pub const FOOT_CLEARANCE: f32 = 0.05;

/// Extra length added to the downward ledge ray beyond the climbable band,
/// so a ledge exactly at foot level still registers.
pub const LEDGE_OVERSHOOT: f32 = 0.1;

/// Minimum upward component of the ledge surface normal. Steeper surfaces
/// (and degenerate zero normals from rays starting inside geometry) are
/// not standable and reject the step.
pub const MIN_LEDGE_NORMAL_Y: f32 = 0.7;

/// Squared length below which a movement direction counts as zero.
pub const MIN_DIRECTION_SQ: f32 = 1e-6;

/// A ledge the character may climb this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepCandidate {
    /// Ledge height above the current ground contact.
    pub height: f32,
    /// Horizontal movement direction the scan was performed along.
    pub direction: Vec3,
}

/// Whether a step scan is worth running at all.
///
/// Step detection exists to rescue a character that walked into a ledge and
/// stalled. It is skipped when airborne, when there is no movement request,
/// and when the character is already moving faster than `stuck_speed`.
pub fn should_probe(
    grounded: bool,
    direction: Vec3,
    horizontal_speed: f32,
    config: &StepConfig,
) -> bool {
    config.enabled
        && grounded
        && direction.length_squared() >= MIN_DIRECTION_SQ
        && horizontal_speed < config.stuck_speed
}

/// Judge the two probe results against the climbable band.
///
/// `ground_height` is the vertical coordinate of the current ground
/// contact. Returns None - "no step handled" - unless every condition
/// holds; noisy results near the step edge must reject rather than climb.
pub fn evaluate_step(
    direction: Vec3,
    forward_hit: Option<&RayHit>,
    ledge_hit: Option<&RayHit>,
    ground_height: f32,
    config: &StepConfig,
) -> Option<StepCandidate> {
    if direction.length_squared() < MIN_DIRECTION_SQ {
        return None;
    }

    // No obstacle ahead: nothing to climb.
    forward_hit?;

    // No surface inside the band: the obstacle is a wall.
    let ledge = ledge_hit?;

    // Reject sloped or degenerate ledge surfaces.
    if ledge.normal.y < MIN_LEDGE_NORMAL_Y {
        return None;
    }

    let height = ledge.point.y - ground_height;
    if !height.is_finite() {
        return None;
    }
    if height < config.min_step_height || height > config.max_step_height {
        return None;
    }

    Some(StepCandidate { height, direction })
}
