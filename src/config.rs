//! Controller configuration components.
//!
//! This module defines the configuration for first-person character
//! controllers: look sensitivity and pitch limits, ground/air speeds,
//! velocity damping, jumping, and step climbing.

use bevy::prelude::*;

/// Configuration parameters for the character controller.
///
/// All values are set once at construction and read-only afterwards.
/// Use [`ControllerConfig::validate`] (called by the backend spawn bundles)
/// to catch nonsensical values before the first simulation tick.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct ControllerConfig {
    // === Look Settings ===
    /// Look sensitivity in radians per input unit.
    pub look_sensitivity: f32,

    /// Maximum pitch angle in radians. Pitch is clamped to this bound in
    /// both directions so the camera can never flip over.
    pub max_pitch: f32,

    // === Movement Settings ===
    /// Horizontal acceleration while grounded (units/second^2).
    pub ground_speed: f32,

    /// Horizontal acceleration while airborne (units/second^2).
    pub air_speed: f32,

    /// Acceleration multiplier applied while sprint intent is held.
    pub sprint_multiplier: f32,

    // === Damping Settings ===
    /// Exponential per-second decay factor for horizontal velocity while
    /// grounded (0.0-1.0). Lower values stop the character faster.
    pub ground_damping: f32,

    /// Exponential per-second decay factor for horizontal velocity while
    /// airborne (0.0-1.0).
    pub air_damping: f32,

    /// Time scale applied to the damping exponent. The per-tick factor is
    /// `damping.powf(dt * damping_time_scale)`, which makes deceleration
    /// independent of the simulation tick rate.
    pub damping_time_scale: f32,

    // === Jump Settings ===
    /// Upward impulse applied on jump.
    pub jump_impulse: f32,

    /// Seconds before another jump may trigger after a jump fires.
    pub jump_cooldown: f32,

    // === Notification Settings ===
    /// Horizontal speed above which the character counts as moving, for
    /// movement started/stopped notifications.
    pub move_threshold: f32,

    // === Probe Settings ===
    /// Assumed capsule half-height when no collider is available to
    /// measure. The ground probe must keep working without one.
    pub fallback_half_height: f32,

    /// Upward offset of the ground probe origin above the body center,
    /// so the ray cannot start inside the surface the character rests on.
    pub probe_start_offset: f32,

    /// Extra probe length below the capsule bottom. Ground within this
    /// margin still counts as supporting the character, which prevents
    /// grounded-state flicker at rest.
    pub ground_contact_margin: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // Look settings
            look_sensitivity: 0.002,
            max_pitch: 1.5,

            // Movement settings
            ground_speed: 40.0,
            air_speed: 10.0,
            sprint_multiplier: 1.6,

            // Damping settings
            ground_damping: 0.88,
            air_damping: 0.98,
            damping_time_scale: 60.0,

            // Jump settings
            jump_impulse: 8.0,
            jump_cooldown: 0.5,

            // Notification settings
            move_threshold: 0.3,

            // Probe settings
            fallback_half_height: 0.9,
            probe_start_offset: 0.1,
            ground_contact_margin: 0.1,
        }
    }
}

impl ControllerConfig {
    /// Compute the horizontal damping factor for one tick.
    ///
    /// Applying `factor(dt/2)` twice equals applying `factor(dt)` once, so
    /// deceleration converges to the same velocity regardless of tick rate.
    #[inline]
    pub fn damping_factor(&self, grounded: bool, dt: f32) -> f32 {
        let damping = if grounded {
            self.ground_damping
        } else {
            self.air_damping
        };
        damping.powf(dt * self.damping_time_scale)
    }

    /// Full length of the ground probe ray, measured from its raised origin.
    #[inline]
    pub fn ground_probe_length(&self, half_height: f32) -> f32 {
        self.probe_start_offset + half_height + self.ground_contact_margin
    }

    /// Create a config tuned for responsive player control.
    pub fn player() -> Self {
        Self {
            ground_speed: 50.0,
            sprint_multiplier: 1.8,
            jump_impulse: 9.0,
            ..default()
        }
    }

    /// Create a config for AI-controlled characters: slower, no sprint.
    pub fn ai() -> Self {
        Self {
            ground_speed: 25.0,
            sprint_multiplier: 1.0,
            ..default()
        }
    }

    /// Builder: set look sensitivity.
    pub fn with_look_sensitivity(mut self, sensitivity: f32) -> Self {
        self.look_sensitivity = sensitivity;
        self
    }

    /// Builder: set the maximum pitch angle (radians).
    pub fn with_max_pitch(mut self, max_pitch: f32) -> Self {
        self.max_pitch = max_pitch;
        self
    }

    /// Builder: set ground and air acceleration.
    pub fn with_speeds(mut self, ground: f32, air: f32) -> Self {
        self.ground_speed = ground;
        self.air_speed = air;
        self
    }

    /// Builder: set the sprint multiplier.
    pub fn with_sprint_multiplier(mut self, multiplier: f32) -> Self {
        self.sprint_multiplier = multiplier;
        self
    }

    /// Builder: set ground and air damping coefficients.
    pub fn with_damping(mut self, ground: f32, air: f32) -> Self {
        self.ground_damping = ground;
        self.air_damping = air;
        self
    }

    /// Builder: set the jump impulse.
    pub fn with_jump_impulse(mut self, impulse: f32) -> Self {
        self.jump_impulse = impulse;
        self
    }

    /// Builder: set the jump cooldown duration (seconds).
    pub fn with_jump_cooldown(mut self, cooldown: f32) -> Self {
        self.jump_cooldown = cooldown;
        self
    }

    /// Builder: set the movement notification threshold.
    pub fn with_move_threshold(mut self, threshold: f32) -> Self {
        self.move_threshold = threshold;
        self
    }

    /// Builder: set the assumed half-height used without a collider.
    pub fn with_fallback_half_height(mut self, half_height: f32) -> Self {
        self.fallback_half_height = half_height;
        self
    }

    /// Panic when the configuration cannot drive a functioning controller.
    ///
    /// Called at spawn time by the backend bundles; a controller constructed
    /// with a broken config is a setup error, not a recoverable state.
    pub fn validate(&self) {
        assert!(
            self.look_sensitivity.is_finite() && self.look_sensitivity > 0.0,
            "look_sensitivity must be positive, got {}",
            self.look_sensitivity
        );
        assert!(
            self.max_pitch > 0.0 && self.max_pitch <= std::f32::consts::FRAC_PI_2,
            "max_pitch must be in (0, PI/2], got {}",
            self.max_pitch
        );
        assert!(
            self.ground_speed >= 0.0 && self.air_speed >= 0.0,
            "speeds must be non-negative"
        );
        assert!(
            (0.0..=1.0).contains(&self.ground_damping) && (0.0..=1.0).contains(&self.air_damping),
            "damping coefficients must be in [0, 1]"
        );
        assert!(
            self.damping_time_scale > 0.0,
            "damping_time_scale must be positive"
        );
        assert!(self.jump_cooldown >= 0.0, "jump_cooldown must be non-negative");
        assert!(
            self.fallback_half_height > 0.0,
            "fallback_half_height must be positive, got {}",
            self.fallback_half_height
        );
        assert!(
            self.probe_start_offset >= 0.0 && self.ground_contact_margin >= 0.0,
            "probe margins must be non-negative"
        );
    }
}

/// Configuration for step climbing behavior.
///
/// Entities without this component never run step detection.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct StepConfig {
    /// Maximum ledge height the character automatically climbs.
    pub max_step_height: f32,

    /// Minimum ledge height worth climbing. Bumps below this are left to
    /// the physics solver.
    pub min_step_height: f32,

    /// Forward raycast distance for obstacle detection.
    pub step_check_distance: f32,

    /// Horizontal speed above which the character is assumed to be moving
    /// fine and step detection is skipped. This is a gameplay-feel
    /// heuristic; tune it together with the movement speeds.
    pub stuck_speed: f32,

    /// Extra height added to the climb teleport so the capsule clears the
    /// ledge lip instead of re-penetrating it.
    pub climb_clearance: f32,

    /// Forward impulse applied after the climb to carry momentum onto the
    /// ledge.
    pub climb_impulse: f32,

    /// Whether step climbing is enabled.
    pub enabled: bool,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            max_step_height: 0.5,
            min_step_height: 0.05,
            step_check_distance: 0.6,
            stuck_speed: 1.0,
            climb_clearance: 0.02,
            climb_impulse: 1.5,
            enabled: true,
        }
    }
}

impl StepConfig {
    /// Create a disabled step config.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..default()
        }
    }

    /// Builder: set the climbable height band.
    pub fn with_step_band(mut self, min: f32, max: f32) -> Self {
        self.min_step_height = min;
        self.max_step_height = max;
        self
    }

    /// Builder: set the forward check distance.
    pub fn with_check_distance(mut self, distance: f32) -> Self {
        self.step_check_distance = distance;
        self
    }

    /// Builder: set the moving-fine speed gate.
    pub fn with_stuck_speed(mut self, speed: f32) -> Self {
        self.stuck_speed = speed;
        self
    }

    /// Panic when the step band is inconsistent. Called at spawn time.
    pub fn validate(&self) {
        assert!(
            self.min_step_height >= 0.0 && self.max_step_height >= self.min_step_height,
            "step band must satisfy 0 <= min <= max, got [{}, {}]",
            self.min_step_height,
            self.max_step_height
        );
        assert!(
            self.step_check_distance > 0.0,
            "step_check_distance must be positive, got {}",
            self.step_check_distance
        );
        assert!(self.stuck_speed >= 0.0, "stuck_speed must be non-negative");
        assert!(
            self.climb_clearance >= 0.0,
            "climb_clearance must be non-negative"
        );
    }
}
