//! Core controller systems.
//!
//! These systems implement the per-tick simulation: look integration,
//! step climbing, movement with exponential damping, jumping, state
//! marker sync, and movement notifications. They are generic over the
//! physics backend so different physics engines can be used.

use std::time::Duration;

use bevy::log::debug;
use bevy::prelude::*;

use crate::backend::CharacterPhysicsBackend;
use crate::config::{ControllerConfig, StepConfig};
use crate::controller::CharacterController;
use crate::events::{MovementStarted, MovementStopped, SprintChanged};
use crate::intent::MovementIntent;
use crate::state::{Airborne, Grounded};

/// Consume accumulated look input and rotate the body to the new yaw.
///
/// Yaw accumulates without bound; pitch is clamped to the configured
/// maximum. Only yaw is written to the body transform - pitch belongs to
/// whatever camera reads [`CharacterController::look_rotation`].
pub fn integrate_look(
    mut q_controllers: Query<(
        &mut Transform,
        &ControllerConfig,
        &mut CharacterController,
        &mut MovementIntent,
    )>,
) {
    for (mut transform, config, mut controller, mut intent) in &mut q_controllers {
        let delta = intent.take_look();
        if delta != Vec2::ZERO {
            controller.apply_look(delta, config);
        }
        transform.rotation = controller.yaw_rotation();
    }
}

/// Lift characters onto ledges detected by the backend's step scan.
///
/// Consumes the pending step candidate, re-checks it against the band
/// (noisy sensor output fails closed), then teleports the body up by the
/// ledge height plus clearance and applies a small forward impulse so
/// momentum carries onto the ledge.
pub fn apply_step_climb<B: CharacterPhysicsBackend>(world: &mut World) {
    let mut climbs = Vec::new();

    let mut q = world.query::<(Entity, &StepConfig, &mut CharacterController)>();
    for (entity, step_config, mut controller) in q.iter_mut(world) {
        let Some(candidate) = controller.step.take() else {
            continue;
        };
        if !candidate.height.is_finite()
            || candidate.height < step_config.min_step_height
            || candidate.height > step_config.max_step_height
        {
            continue;
        }
        climbs.push((entity, candidate, *step_config));
    }

    for (entity, candidate, step_config) in climbs {
        let lift = candidate.height + step_config.climb_clearance;
        B::translate(world, entity, Vec3::Y * lift);
        B::apply_impulse(world, entity, candidate.direction * step_config.climb_impulse);
        debug!("step climb: entity {entity} lifted {lift:.3}");
    }
}

/// Accelerate along the intended direction and damp horizontal velocity.
///
/// Acceleration uses the ground or air speed by grounded state, times the
/// sprint multiplier while sprinting. Damping scales the horizontal
/// velocity components by `damping^(dt * damping_time_scale)`, which is
/// independent of the tick rate. Vertical velocity is left to gravity and
/// jumps.
pub fn apply_movement<B: CharacterPhysicsBackend>(world: &mut World) {
    let dt = B::get_fixed_timestep(world);

    let moves: Vec<(Entity, ControllerConfig, Vec3, bool, bool)> = world
        .query::<(
            Entity,
            &ControllerConfig,
            &MovementIntent,
            &CharacterController,
        )>()
        .iter(world)
        .map(|(entity, config, intent, controller)| {
            (
                entity,
                *config,
                intent.world_direction(controller.yaw),
                intent.sprint,
                controller.grounded,
            )
        })
        .collect();

    for (entity, config, direction, sprinting, grounded) in moves {
        let mut velocity = B::get_velocity(world, entity);

        let mut speed = if grounded {
            config.ground_speed
        } else {
            config.air_speed
        };
        if sprinting {
            speed *= config.sprint_multiplier;
        }
        velocity += direction * speed * dt;

        let factor = config.damping_factor(grounded, dt);
        velocity.x *= factor;
        velocity.z *= factor;

        B::set_velocity(world, entity, velocity);
    }
}

/// Trigger jumps on the rising edge of jump intent.
///
/// A jump requires being grounded with no cooldown pending; it applies an
/// upward impulse and starts the cooldown. The cooldown is a plain timer
/// decremented here every tick - destroying the character simply destroys
/// the timer with it.
pub fn apply_jump<B: CharacterPhysicsBackend>(world: &mut World) {
    let dt = Duration::from_secs_f32(B::get_fixed_timestep(world));
    let mut jumps = Vec::new();

    let mut q = world.query::<(
        Entity,
        &ControllerConfig,
        &mut CharacterController,
        &mut MovementIntent,
    )>();
    for (entity, config, mut controller, mut intent) in q.iter_mut(world) {
        if let Some(timer) = controller.jump_cooldown.as_mut() {
            timer.tick(dt);
            if timer.finished() {
                controller.jump_cooldown = None;
            }
        }
        if controller.grounded && controller.jump_cooldown.is_none() {
            controller.jumping = false;
        }

        let rising = intent.jump_pressed && !intent.jump_pressed_prev;
        intent.jump_pressed_prev = intent.jump_pressed;

        if rising && controller.can_jump() {
            controller.jumping = true;
            controller.jump_cooldown =
                Some(Timer::from_seconds(config.jump_cooldown, TimerMode::Once));
            jumps.push((entity, config.jump_impulse));
        }
    }

    for (entity, impulse) in jumps {
        B::apply_impulse(world, entity, Vec3::Y * impulse);
    }
}

/// Sync [`Grounded`]/[`Airborne`] marker components from the probe result.
pub fn sync_state_markers(
    mut commands: Commands,
    q_controllers: Query<(Entity, &CharacterController, Has<Grounded>, Has<Airborne>)>,
) {
    for (entity, controller, has_grounded, has_airborne) in &q_controllers {
        if controller.grounded && !has_grounded {
            commands.entity(entity).insert(Grounded).remove::<Airborne>();
        } else if !controller.grounded && (has_grounded || !has_airborne) {
            commands.entity(entity).insert(Airborne).remove::<Grounded>();
        }
    }
}

/// Emit movement and sprint notifications on state edges.
///
/// Compares horizontal speed against the movement threshold and fires
/// started/stopped exactly once per crossing. Sprint changes are reported
/// only while moving. Each event goes to the process-wide channel and is
/// also triggered on the character entity for local observers.
pub fn emit_movement_events<B: CharacterPhysicsBackend>(world: &mut World) {
    let characters: Vec<(Entity, f32, bool)> = world
        .query::<(Entity, &ControllerConfig, &MovementIntent, &CharacterController)>()
        .iter(world)
        .map(|(entity, config, intent, _)| (entity, config.move_threshold, intent.sprint))
        .collect();

    for (entity, threshold, sprinting) in characters {
        let velocity = B::get_velocity(world, entity);
        let horizontal_speed = Vec2::new(velocity.x, velocity.z).length();
        let moving = horizontal_speed > threshold;

        let Some(controller) = world.get::<CharacterController>(entity) else {
            continue;
        };
        let was_moving = controller.was_moving;
        let was_sprinting = controller.was_sprinting;

        if moving && !was_moving {
            world.send_event(MovementStarted { entity });
            world.trigger_targets(MovementStarted { entity }, entity);
        } else if !moving && was_moving {
            world.send_event(MovementStopped { entity });
            world.trigger_targets(MovementStopped { entity }, entity);
        }

        let sprint_changed = moving && sprinting != was_sprinting;
        if sprint_changed {
            world.send_event(SprintChanged { entity, sprinting });
            world.trigger_targets(SprintChanged { entity, sprinting }, entity);
        }

        if let Some(mut controller) = world.get_mut::<CharacterController>(entity) {
            controller.was_moving = moving;
            if sprint_changed {
                controller.was_sprinting = sprinting;
            }
        }
    }
}
