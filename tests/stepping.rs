//! Step climbing scenario tests.
//!
//! Geometry is laid out with the character at the origin facing -Z
//! (yaw 0), standing on a flat floor with its top surface at y = 0.
//! Obstacles are placed ahead on the -Z side.

use bevy::prelude::*;
use stride_character_controller::prelude::*;

mod common;
use common::*;

/// Character center height when standing on the floor.
const STAND_Y: f32 = 0.9;

fn spawn_stuck_walker(app: &mut App) -> Entity {
    let character = spawn_character(app, Vec3::new(0.0, STAND_Y, 0.0));
    app.world_mut()
        .get_mut::<MovementIntent>(character)
        .unwrap()
        .set_forward(1.0);
    character
}

/// Add a box ahead of the character: z from -0.3 to -2.0, given height.
fn add_obstacle(app: &mut App, height: f32) {
    app.world_mut()
        .resource_mut::<TestScene>()
        .add_block(Vec3::new(-2.0, 0.0, -2.0), Vec3::new(2.0, height, -0.3));
}

fn character_y(app: &App, entity: Entity) -> f32 {
    app.world().get::<Transform>(entity).unwrap().translation.y
}

#[test]
fn climbs_ledge_inside_band() {
    let mut app = create_app();
    spawn_floor(&mut app);
    add_obstacle(&mut app, 0.3);
    let character = spawn_stuck_walker(&mut app);

    tick(&mut app);

    // PROOF: lifted by exactly ledge height + clearance.
    let step_config = StepConfig::default();
    let expected = STAND_Y + 0.3 + step_config.climb_clearance;
    let y = character_y(&app, character);
    assert!(
        (y - expected).abs() < 1e-4,
        "expected center at {expected}, got {y}"
    );

    // PROOF: forward impulse carries momentum onto the ledge.
    let velocity = app.world().get::<TestVelocity>(character).unwrap().0;
    assert!(
        velocity.z < -step_config.climb_impulse * 0.9,
        "climb impulse missing, velocity {velocity}"
    );
}

#[test]
fn climb_does_not_repeat_while_moving_fine() {
    let mut app = create_app();
    spawn_floor(&mut app);
    add_obstacle(&mut app, 0.3);
    let character = spawn_stuck_walker(&mut app);

    tick(&mut app);
    let after_climb = character_y(&app, character);

    // The climb impulse puts horizontal speed above the stuck gate, so
    // subsequent ticks must not climb again.
    run_ticks(&mut app, 5);
    assert_eq!(character_y(&app, character), after_climb);
}

#[test]
fn open_ground_is_not_a_step() {
    let mut app = create_app();
    spawn_floor(&mut app);
    let character = spawn_stuck_walker(&mut app);

    run_ticks(&mut app, 3);

    // Walking into nothing: the forward probe misses, nothing lifts.
    // (Speed passes the stuck gate only on the first couple of ticks.)
    assert_eq!(character_y(&app, character), STAND_Y);
}

#[test]
fn wall_is_not_a_step() {
    let mut app = create_app();
    spawn_floor(&mut app);
    // Much taller than the climbable band.
    add_obstacle(&mut app, 1.5);
    let character = spawn_stuck_walker(&mut app);

    run_ticks(&mut app, 3);

    assert_eq!(character_y(&app, character), STAND_Y);
}

#[test]
fn ledge_just_above_band_is_a_wall() {
    let mut app = create_app();
    spawn_floor(&mut app);
    add_obstacle(&mut app, StepConfig::default().max_step_height + 0.05);
    let character = spawn_stuck_walker(&mut app);

    run_ticks(&mut app, 3);

    assert_eq!(character_y(&app, character), STAND_Y);
}

#[test]
fn bump_below_band_is_ignored() {
    let mut app = create_app();
    spawn_floor(&mut app);
    add_obstacle(&mut app, 0.02);
    let character = spawn_stuck_walker(&mut app);

    run_ticks(&mut app, 3);

    assert_eq!(character_y(&app, character), STAND_Y);
}

#[test]
fn airborne_characters_never_step() {
    let mut app = create_app();
    // No floor: obstacle only.
    add_obstacle(&mut app, 0.3);
    let character = spawn_stuck_walker(&mut app);

    run_ticks(&mut app, 3);

    assert_eq!(character_y(&app, character), STAND_Y);
}

#[test]
fn no_movement_intent_means_no_step() {
    let mut app = create_app();
    spawn_floor(&mut app);
    add_obstacle(&mut app, 0.3);
    let character = spawn_character(&mut app, Vec3::new(0.0, STAND_Y, 0.0));

    run_ticks(&mut app, 3);

    assert_eq!(character_y(&app, character), STAND_Y);
}

#[test]
fn moving_fine_skips_the_scan() {
    let mut app = create_app();
    spawn_floor(&mut app);
    add_obstacle(&mut app, 0.3);
    let character = spawn_stuck_walker(&mut app);

    // Already moving briskly: the character is not stuck.
    app.world_mut().get_mut::<TestVelocity>(character).unwrap().0 =
        Vec3::new(0.0, 0.0, -5.0);
    tick(&mut app);

    assert_eq!(character_y(&app, character), STAND_Y);
}

#[test]
fn disabled_step_config_never_climbs() {
    let mut app = create_app();
    spawn_floor(&mut app);
    add_obstacle(&mut app, 0.3);
    let character = spawn_character_with(
        &mut app,
        Vec3::new(0.0, STAND_Y, 0.0),
        ControllerConfig::default(),
        StepConfig::disabled(),
    );
    app.world_mut()
        .get_mut::<MovementIntent>(character)
        .unwrap()
        .set_forward(1.0);

    run_ticks(&mut app, 3);

    assert_eq!(character_y(&app, character), STAND_Y);
}

#[test]
fn climb_height_is_relative_to_current_ground() {
    // Same scenario shifted up: floor top at y = 2, ledge at y = 2.3.
    let mut app = create_app();
    app.world_mut().resource_mut::<TestScene>().add_block(
        Vec3::new(-50.0, 1.0, -50.0),
        Vec3::new(50.0, 2.0, 50.0),
    );
    app.world_mut().resource_mut::<TestScene>().add_block(
        Vec3::new(-2.0, 2.0, -2.0),
        Vec3::new(2.0, 2.3, -0.3),
    );

    let character = spawn_character(&mut app, Vec3::new(0.0, 2.0 + STAND_Y, 0.0));
    app.world_mut()
        .get_mut::<MovementIntent>(character)
        .unwrap()
        .set_forward(1.0);
    tick(&mut app);

    let expected = 2.0 + STAND_Y + 0.3 + StepConfig::default().climb_clearance;
    let y = character_y(&app, character);
    assert!(
        (y - expected).abs() < 1e-4,
        "expected center at {expected}, got {y}"
    );
}
