//! Rapier3D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier3D.
//! Enable with the `rapier3d` feature.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::backend::CharacterPhysicsBackend;
use crate::collision::RayHit;
use crate::config::{ControllerConfig, StepConfig};
use crate::controller::CharacterController;
use crate::detection;
use crate::intent::MovementIntent;
use crate::CharacterControllerSet;

/// Rapier3D physics backend for the character controller.
///
/// Velocity and impulses go through `bevy_rapier3d` components; the ground
/// probe and step scan raycasts run as dedicated systems that receive the
/// Rapier context as a system parameter.
///
/// # Example
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier3d::prelude::*;
/// use stride_character_controller::prelude::*;
///
/// App::new()
///     .add_plugins(MinimalPlugins)
///     .add_plugins(TransformPlugin)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///     .add_plugins(CharacterControllerPlugin::<Rapier3dBackend>::default())
///     .run();
/// ```
pub struct Rapier3dBackend;

impl CharacterPhysicsBackend for Rapier3dBackend {
    fn plugin() -> impl Plugin {
        Rapier3dBackendPlugin
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<Velocity>(entity)
            .map(|v| v.linvel)
            .unwrap_or(Vec3::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3) {
        if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            vel.linvel = velocity;
        }
    }

    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec3) {
        if let Some(mut ext_impulse) = world.get_mut::<ExternalImpulse>(entity) {
            ext_impulse.impulse += impulse;
        } else if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            // Fallback: apply as velocity change if no ExternalImpulse component
            vel.linvel += impulse;
        }
    }

    fn translate(world: &mut World, entity: Entity, offset: Vec3) {
        // Rapier picks up user changes to Transform and moves the body.
        if let Some(mut transform) = world.get_mut::<Transform>(entity) {
            transform.translation += offset;
        }
    }

    fn get_position(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<Transform>(entity)
            .map(|t| t.translation)
            .or_else(|| {
                world
                    .get::<GlobalTransform>(entity)
                    .map(|t| t.translation())
            })
            .unwrap_or(Vec3::ZERO)
    }

    fn get_collider_half_height(world: &World, entity: Entity) -> Option<f32> {
        world.get::<Collider>(entity).and_then(collider_half_height)
    }
}

/// Plugin that sets up Rapier3D-specific sensor systems.
pub struct Rapier3dBackendPlugin;

impl Plugin for Rapier3dBackendPlugin {
    fn build(&self, app: &mut App) {
        // Ground probe must run first: the step scan compares ledge heights
        // against its contact point.
        app.add_systems(
            FixedUpdate,
            (rapier_ground_probe, rapier_step_scan)
                .chain()
                .in_set(CharacterControllerSet::Sensors),
        );
    }
}

/// Measure the distance from a collider's center to its bottom.
/// For capsules this is half_height + radius. Unknown shapes return None
/// and the controller falls back to its configured constant.
pub fn collider_half_height(collider: &Collider) -> Option<f32> {
    if let Some(capsule) = collider.as_capsule() {
        let segment = capsule.segment();
        let half_height = (segment.a().y - segment.b().y).abs() / 2.0;
        Some(half_height + capsule.radius())
    } else if let Some(ball) = collider.as_ball() {
        Some(ball.radius())
    } else if let Some(cuboid) = collider.as_cuboid() {
        Some(cuboid.half_extents().y)
    } else {
        None
    }
}

fn ray_filter(entity: Entity, collision_groups: Option<&CollisionGroups>) -> QueryFilter<'static> {
    let mut filter = QueryFilter::default()
        .exclude_rigid_body(entity)
        .exclude_sensors();
    if let Some(groups) = collision_groups {
        filter = filter.groups(*groups);
    }
    filter
}

/// Cast one ray straight down from just above the body center and record
/// whether a surface supports the character.
fn rapier_ground_probe(
    rapier_context: ReadRapierContext,
    mut q_controllers: Query<(
        Entity,
        &GlobalTransform,
        &ControllerConfig,
        &mut CharacterController,
        Option<&Collider>,
        Option<&CollisionGroups>,
    )>,
) {
    let context = rapier_context.single();

    for (entity, transform, config, mut controller, collider, collision_groups) in
        &mut q_controllers
    {
        let position = transform.translation();

        controller.reset_probe_state();
        controller.collider_half_height = collider.and_then(collider_half_height);

        let half_height = controller.half_height(config);
        let origin = position + Vec3::Y * config.probe_start_offset;
        let max_distance = config.ground_probe_length(half_height);

        let hit = context.cast_ray_and_get_normal(
            origin,
            -Vec3::Y,
            max_distance,
            true,
            ray_filter(entity, collision_groups),
        );

        if let Some((hit_entity, intersection)) = hit {
            controller.ground = Some(RayHit::new(
                intersection.time_of_impact,
                intersection.normal,
                intersection.point,
                Some(hit_entity),
            ));
            controller.grounded = true;
        }
    }
}

/// Scan for a climbable ledge in the direction of travel.
///
/// Runs only for stuck-and-pushing characters: grounded, movement
/// requested, horizontal speed below the stuck threshold. Casts the
/// forward obstacle ray at foot height and the downward ledge ray at the
/// top of the climbable band, then stores the verdict on the controller
/// for the climb system.
fn rapier_step_scan(
    rapier_context: ReadRapierContext,
    mut q_controllers: Query<(
        Entity,
        &GlobalTransform,
        &ControllerConfig,
        &StepConfig,
        &MovementIntent,
        &Velocity,
        &mut CharacterController,
        Option<&CollisionGroups>,
    )>,
) {
    let context = rapier_context.single();

    for (entity, transform, config, step_config, intent, velocity, mut controller, groups) in
        &mut q_controllers
    {
        controller.step = None;

        let direction = intent.world_direction(controller.yaw);
        let horizontal_speed = Vec2::new(velocity.linvel.x, velocity.linvel.z).length();
        if !detection::should_probe(controller.grounded, direction, horizontal_speed, step_config)
        {
            continue;
        }
        let Some(ground) = controller.ground else {
            continue;
        };

        let position = transform.translation();
        let foot = controller.foot_height(position, config);

        let forward_origin = Vec3::new(position.x, foot + detection::FOOT_CLEARANCE, position.z);
        let forward_hit = context
            .cast_ray_and_get_normal(
                forward_origin,
                direction,
                step_config.step_check_distance,
                true,
                ray_filter(entity, groups),
            )
            .map(|(hit_entity, hit)| {
                RayHit::new(hit.time_of_impact, hit.normal, hit.point, Some(hit_entity))
            });

        let ledge_origin = Vec3::new(position.x, foot + step_config.max_step_height, position.z)
            + direction * step_config.step_check_distance;
        let ledge_hit = context
            .cast_ray_and_get_normal(
                ledge_origin,
                -Vec3::Y,
                step_config.max_step_height + detection::LEDGE_OVERSHOOT,
                true,
                ray_filter(entity, groups),
            )
            .map(|(hit_entity, hit)| {
                RayHit::new(hit.time_of_impact, hit.normal, hit.point, Some(hit_entity))
            });

        controller.step = detection::evaluate_step(
            direction,
            forward_hit.as_ref(),
            ledge_hit.as_ref(),
            ground.point.y,
            step_config,
        );
    }
}

/// Everything a first-person character needs on top of a `Transform` and
/// a `Collider`: a rotation-locked dynamic body, controller state, and
/// the validated configuration.
///
/// Construction panics on a broken config - a controller that cannot
/// function is a setup error, caught before the first tick.
#[derive(Bundle)]
pub struct Rapier3dCharacterBundle {
    pub rigid_body: RigidBody,
    pub velocity: Velocity,
    pub impulse: ExternalImpulse,
    pub locked_axes: LockedAxes,
    pub controller: CharacterController,
    pub config: ControllerConfig,
    pub step_config: StepConfig,
    pub intent: MovementIntent,
}

impl Rapier3dCharacterBundle {
    /// Create a character bundle, validating the configuration.
    pub fn new(config: ControllerConfig, step_config: StepConfig) -> Self {
        config.validate();
        step_config.validate();
        Self {
            rigid_body: RigidBody::Dynamic,
            velocity: Velocity::default(),
            impulse: ExternalImpulse::default(),
            locked_axes: LockedAxes::ROTATION_LOCKED,
            controller: CharacterController::new(),
            config,
            step_config,
            intent: MovementIntent::default(),
        }
    }

    /// Builder: spawn facing the given yaw (radians).
    pub fn facing(mut self, yaw: f32) -> Self {
        self.controller = CharacterController::facing(yaw);
        self
    }
}

impl Default for Rapier3dCharacterBundle {
    fn default() -> Self {
        Self::new(ControllerConfig::default(), StepConfig::default())
    }
}
