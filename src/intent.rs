//! Movement intent component.
//!
//! Intents represent the desired movement from player input or AI. An
//! external input-mapping layer writes them every tick; the controller
//! systems read them and apply the corresponding physics.

use bevy::prelude::*;

/// Control intents for one character, fed by any input source.
///
/// Axis intents are held state and persist across ticks until the input
/// layer changes them. Look deltas accumulate and are consumed once per
/// simulation tick.
///
/// # Example
///
/// ```rust
/// use stride_character_controller::prelude::*;
///
/// let mut intent = MovementIntent::new();
/// intent.set_forward(1.0);
/// intent.set_sprint(true);
/// assert!(intent.is_moving());
///
/// intent.clear();
/// assert!(!intent.is_moving());
/// ```
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct MovementIntent {
    /// Forward/backward intent (-1.0 = backward, 1.0 = forward).
    pub forward: f32,
    /// Strafe intent (-1.0 = left, 1.0 = right).
    pub strafe: f32,
    /// Whether sprint is held.
    pub sprint: bool,
    /// Whether the jump action is currently active.
    ///
    /// Set this every tick from your input source; the controller detects
    /// the rising edge and handles cooldown, so holding the button does
    /// not retrigger jumps.
    pub jump_pressed: bool,
    /// Previous tick's jump state, for edge detection. Managed by the
    /// controller systems.
    pub(crate) jump_pressed_prev: bool,
    /// Look delta accumulated since the last tick (x = yaw, y = pitch).
    look: Vec2,
}

impl Default for MovementIntent {
    fn default() -> Self {
        Self {
            forward: 0.0,
            strafe: 0.0,
            sprint: false,
            jump_pressed: false,
            jump_pressed_prev: false,
            look: Vec2::ZERO,
        }
    }
}

impl MovementIntent {
    /// Create a new empty intent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the forward intent (-1.0 = backward, 1.0 = forward).
    pub fn set_forward(&mut self, magnitude: f32) {
        self.forward = magnitude.clamp(-1.0, 1.0);
    }

    /// Set the strafe intent (-1.0 = left, 1.0 = right).
    pub fn set_strafe(&mut self, magnitude: f32) {
        self.strafe = magnitude.clamp(-1.0, 1.0);
    }

    /// Set the sprint state.
    pub fn set_sprint(&mut self, sprinting: bool) {
        self.sprint = sprinting;
    }

    /// Set the jump state. Pass the raw held state every tick; edge
    /// detection happens in the controller.
    pub fn set_jump_pressed(&mut self, pressed: bool) {
        self.jump_pressed = pressed;
    }

    /// Accumulate a look delta (x = yaw input, y = pitch input).
    pub fn add_look(&mut self, delta: Vec2) {
        self.look += delta;
    }

    /// Take and reset the accumulated look delta.
    pub fn take_look(&mut self) -> Vec2 {
        std::mem::take(&mut self.look)
    }

    /// Clear all axis intents. Jump and sprint state are left alone.
    pub fn clear(&mut self) {
        self.forward = 0.0;
        self.strafe = 0.0;
    }

    /// Check if there is active movement input.
    pub fn is_moving(&self) -> bool {
        self.forward.abs() > 0.001 || self.strafe.abs() > 0.001
    }

    /// Desired world-space movement direction for the given yaw.
    ///
    /// The intents are rotated through yaw only, so the result stays
    /// horizontal no matter where the camera pitch points. Returns
    /// `Vec3::ZERO` for near-zero input instead of a garbage normal.
    pub fn world_direction(&self, yaw: f32) -> Vec3 {
        let local = Vec3::new(self.strafe, 0.0, -self.forward);
        if local.length_squared() < 1e-6 {
            return Vec3::ZERO;
        }
        (Quat::from_rotation_y(yaw) * local).normalize()
    }
}
