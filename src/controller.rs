//! Core character controller component.

use bevy::prelude::*;

use crate::collision::RayHit;
use crate::config::ControllerConfig;
use crate::detection::StepCandidate;

/// Central hub for per-character controller state.
///
/// Holds RESULT states written by the sensor and locomotion systems - look
/// angles, grounding, the pending step candidate, and jump bookkeeping.
/// One instance exclusively owns its character's physics body: no other
/// system may write that body's velocity or transform.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct CharacterController {
    // === Look State ===
    /// Accumulated yaw in radians. Unclamped; wraps naturally.
    pub yaw: f32,
    /// Pitch in radians, clamped to the configured maximum in both
    /// directions.
    pub pitch: f32,

    // === Probe Results ===
    /// Whether the ground probe found support below the character this tick.
    pub grounded: bool,
    /// Ground probe hit data. None when airborne.
    #[reflect(ignore)]
    pub ground: Option<RayHit>,
    /// Pending step candidate produced by the step scan, consumed by the
    /// climb system in the same tick.
    #[reflect(ignore)]
    pub step: Option<StepCandidate>,

    // === Jump State ===
    /// Whether the character is mid-jump (set on jump, cleared once
    /// grounded again with the cooldown expired).
    pub jumping: bool,
    /// Debounce timer between jumps. None means a jump may trigger.
    #[reflect(ignore)]
    pub(crate) jump_cooldown: Option<Timer>,

    // === Notification Edge Memory ===
    pub(crate) was_moving: bool,
    pub(crate) was_sprinting: bool,

    // === Internal ===
    /// Capsule half-height measured from the collider, refreshed by the
    /// backend each tick. None falls back to the configured constant.
    pub(crate) collider_half_height: Option<f32>,
}

impl Default for CharacterController {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            // Airborne until the first grounded tick.
            grounded: false,
            ground: None,
            step: None,
            jumping: false,
            jump_cooldown: None,
            was_moving: false,
            was_sprinting: false,
            collider_half_height: None,
        }
    }
}

impl CharacterController {
    /// Create a new controller in its initial airborne state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a controller facing the given yaw (radians).
    pub fn facing(yaw: f32) -> Self {
        Self {
            yaw,
            ..default()
        }
    }

    /// Apply a look delta, accumulating yaw and clamping pitch.
    ///
    /// Clamping is idempotent: once pitch sits at the bound, further input
    /// in that direction leaves it exactly at the bound.
    pub fn apply_look(&mut self, delta: Vec2, config: &ControllerConfig) {
        self.yaw -= delta.x * config.look_sensitivity;
        self.pitch = (self.pitch - delta.y * config.look_sensitivity)
            .clamp(-config.max_pitch, config.max_pitch);
    }

    /// Body rotation: yaw only. Movement and the physics body never pitch.
    pub fn yaw_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Full look rotation for a camera: yaw then pitch.
    pub fn look_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)
    }

    /// Effective capsule half-height: measured from the collider when
    /// available, otherwise the configured fallback.
    #[inline]
    pub fn half_height(&self, config: &ControllerConfig) -> f32 {
        self.collider_half_height
            .unwrap_or(config.fallback_half_height)
    }

    /// Vertical coordinate of the capsule bottom for a given body center.
    #[inline]
    pub fn foot_height(&self, center: Vec3, config: &ControllerConfig) -> f32 {
        center.y - self.half_height(config)
    }

    /// Whether a jump may trigger right now.
    pub fn can_jump(&self) -> bool {
        self.grounded && !self.jumping && self.jump_cooldown.is_none()
    }

    /// Seconds left on the jump cooldown, zero when ready.
    pub fn jump_cooldown_remaining(&self) -> f32 {
        self.jump_cooldown
            .as_ref()
            .map(|t| t.remaining_secs())
            .unwrap_or(0.0)
    }

    /// Ground contact point from the last probe, if grounded.
    pub fn ground_contact_point(&self) -> Option<Vec3> {
        self.ground.as_ref().map(|hit| hit.point)
    }

    /// Reset probe results at the start of a sensor pass.
    pub fn reset_probe_state(&mut self) {
        self.grounded = false;
        self.ground = None;
        self.step = None;
    }
}
