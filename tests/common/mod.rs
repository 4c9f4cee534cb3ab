//! Shared test harness: a deterministic scripted physics backend.
//!
//! The testbed backend raycasts against a list of axis-aligned blocks held
//! in a resource, and stores velocity in a plain component. This exercises
//! the full controller pipeline - sensors, locomotion, notifications -
//! with exact, reproducible geometry and no physics engine in the loop.

// Each test binary uses its own subset of these helpers.
#![allow(dead_code)]

use std::time::Duration;

use bevy::prelude::*;
use stride_character_controller::backend::CharacterPhysicsBackend;
use stride_character_controller::detection;
use stride_character_controller::prelude::*;

/// Axis-aligned block in the test scene.
#[derive(Debug, Clone, Copy)]
pub struct Block {
    pub min: Vec3,
    pub max: Vec3,
}

/// Static collision geometry for the testbed backend.
#[derive(Resource, Default)]
pub struct TestScene {
    pub blocks: Vec<Block>,
}

impl TestScene {
    pub fn add_block(&mut self, min: Vec3, max: Vec3) {
        self.blocks.push(Block { min, max });
    }

    /// Cast a ray against every block and return the closest hit.
    ///
    /// A ray starting inside a block reports a solid hit at distance zero
    /// with a zero normal, matching how physics engines report rays that
    /// begin inside geometry.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        for block in &self.blocks {
            let Some(hit) = ray_block(origin, direction, max_distance, block) else {
                continue;
            };
            if best.map(|b| hit.distance < b.distance).unwrap_or(true) {
                best = Some(hit);
            }
        }
        best
    }
}

/// Slab-method ray vs axis-aligned box intersection.
fn ray_block(origin: Vec3, direction: Vec3, max_distance: f32, block: &Block) -> Option<RayHit> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut enter_axis = 0;

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        let (lo, hi) = (block.min[axis], block.max[axis]);

        if d.abs() < 1e-9 {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let (mut t0, mut t1) = ((lo - o) * inv, (hi - o) * inv);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        if t0 > t_enter {
            t_enter = t0;
            enter_axis = axis;
        }
        t_exit = t_exit.min(t1);
    }

    if t_exit < t_enter.max(0.0) {
        return None;
    }
    if t_enter < 0.0 {
        // Origin inside the block: solid hit.
        return Some(RayHit::new(0.0, Vec3::ZERO, origin, None));
    }
    if t_enter > max_distance {
        return None;
    }

    let mut normal = Vec3::ZERO;
    normal[enter_axis] = -direction[enter_axis].signum();
    Some(RayHit::new(
        t_enter,
        normal,
        origin + direction * t_enter,
        None,
    ))
}

/// Linear velocity for testbed characters.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct TestVelocity(pub Vec3);

/// Scripted physics backend for integration tests.
pub struct TestbedBackend;

impl CharacterPhysicsBackend for TestbedBackend {
    fn plugin() -> impl Plugin {
        TestbedBackendPlugin
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<TestVelocity>(entity)
            .map(|v| v.0)
            .unwrap_or(Vec3::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec3) {
        if let Some(mut v) = world.get_mut::<TestVelocity>(entity) {
            v.0 = velocity;
        }
    }

    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec3) {
        if let Some(mut v) = world.get_mut::<TestVelocity>(entity) {
            v.0 += impulse;
        }
    }

    fn translate(world: &mut World, entity: Entity, offset: Vec3) {
        if let Some(mut transform) = world.get_mut::<Transform>(entity) {
            transform.translation += offset;
        }
    }

    fn get_position(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<Transform>(entity)
            .map(|t| t.translation)
            .unwrap_or(Vec3::ZERO)
    }
}

/// Plugin registering the testbed sensor systems.
pub struct TestbedBackendPlugin;

impl Plugin for TestbedBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (testbed_ground_probe, testbed_step_scan)
                .chain()
                .in_set(CharacterControllerSet::Sensors),
        );
    }
}

fn testbed_ground_probe(
    scene: Res<TestScene>,
    mut q_controllers: Query<(&Transform, &ControllerConfig, &mut CharacterController)>,
) {
    for (transform, config, mut controller) in &mut q_controllers {
        let position = transform.translation;

        controller.reset_probe_state();

        // The testbed has no colliders; the fallback half-height applies.
        let half_height = config.fallback_half_height;
        let origin = position + Vec3::Y * config.probe_start_offset;
        let max_distance = config.ground_probe_length(half_height);

        if let Some(hit) = scene.raycast(origin, -Vec3::Y, max_distance) {
            controller.ground = Some(hit);
            controller.grounded = true;
        }
    }
}

fn testbed_step_scan(
    scene: Res<TestScene>,
    mut q_controllers: Query<(
        &Transform,
        &ControllerConfig,
        &StepConfig,
        &MovementIntent,
        &TestVelocity,
        &mut CharacterController,
    )>,
) {
    for (transform, config, step_config, intent, velocity, mut controller) in &mut q_controllers {
        controller.step = None;

        let direction = intent.world_direction(controller.yaw);
        let horizontal_speed = Vec2::new(velocity.0.x, velocity.0.z).length();
        if !detection::should_probe(controller.grounded, direction, horizontal_speed, step_config)
        {
            continue;
        }
        let Some(ground) = controller.ground else {
            continue;
        };

        let position = transform.translation;
        let foot = controller.foot_height(position, config);

        let forward_origin = Vec3::new(position.x, foot + detection::FOOT_CLEARANCE, position.z);
        let forward_hit = scene.raycast(forward_origin, direction, step_config.step_check_distance);

        let ledge_origin = Vec3::new(position.x, foot + step_config.max_step_height, position.z)
            + direction * step_config.step_check_distance;
        let ledge_hit = scene.raycast(
            ledge_origin,
            -Vec3::Y,
            step_config.max_step_height + detection::LEDGE_OVERSHOOT,
        );

        controller.step = detection::evaluate_step(
            direction,
            forward_hit.as_ref(),
            ledge_hit.as_ref(),
            ground.point.y,
            step_config,
        );
    }
}

/// Create a minimal test app with the controller driven by the testbed
/// backend at 60 Hz.
pub fn create_app() -> App {
    create_app_with_tick(1.0 / 60.0)
}

/// Create a test app with a specific fixed timestep.
pub fn create_app_with_tick(dt: f32) -> App {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins);
    app.add_plugins(TransformPlugin);
    app.add_plugins(CharacterControllerPlugin::<TestbedBackend>::default());
    app.init_resource::<TestScene>();

    let mut time = Time::<Fixed>::from_seconds(dt as f64);
    time.advance_by(Duration::from_secs_f32(dt));
    app.insert_resource(time);

    app.finish();
    app.cleanup();
    app
}

/// Run one simulation tick.
pub fn tick(app: &mut App) {
    app.world_mut().run_schedule(FixedUpdate);
}

/// Run the simulation for N ticks.
pub fn run_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        tick(app);
    }
}

/// Spawn a flat floor with its top surface at y = 0.
pub fn spawn_floor(app: &mut App) {
    app.world_mut()
        .resource_mut::<TestScene>()
        .add_block(Vec3::new(-50.0, -1.0, -50.0), Vec3::new(50.0, 0.0, 50.0));
}

/// Spawn a character with default configs at the given position.
pub fn spawn_character(app: &mut App, position: Vec3) -> Entity {
    spawn_character_with(
        app,
        position,
        ControllerConfig::default(),
        StepConfig::default(),
    )
}

/// Spawn a character with custom configs.
pub fn spawn_character_with(
    app: &mut App,
    position: Vec3,
    config: ControllerConfig,
    step_config: StepConfig,
) -> Entity {
    config.validate();
    step_config.validate();
    app.world_mut()
        .spawn((
            Transform::from_translation(position),
            CharacterController::new(),
            config,
            step_config,
            MovementIntent::default(),
            TestVelocity::default(),
        ))
        .id()
}

/// Drain all pending events of one type.
pub fn drain_events<E: Event>(app: &mut App) -> Vec<E> {
    app.world_mut()
        .resource_mut::<Events<E>>()
        .drain()
        .collect()
}
