use std::f32::consts::FRAC_PI_2;

use bevy_ecs::system::RunSystemOnce;
use bevy_ecs::world::World;
use glam::Vec2;
use hollow::systems::{
    battery_system, player_look_system, player_movement_system, Actions, AudioEvent, GameStage, Hiding, MovementMode, Player, PlayerInput,
    Surface, TransientMessage,
};
use speculoos::prelude::*;

mod common;

fn step(world: &mut World) {
    world
        .run_system_once(player_movement_system)
        .expect("System should run successfully");
}

#[test]
fn test_noise_decays_strictly_to_zero() {
    let mut world = common::create_test_world(&common::ROOM, common::test_tuning());
    world.resource_mut::<Player>().noise = 1.0;

    let mut previous = 1.0;
    for _ in 0..400 {
        step(&mut world);
        let noise = world.resource::<Player>().noise;
        assert_that(&noise).is_greater_than_or_equal_to(0.0);
        if previous > 0.0 {
            assert_that(&noise).is_less_than(previous);
        } else {
            assert_that(&noise).is_equal_to(0.0);
        }
        previous = noise;
    }

    assert_that(&previous).is_equal_to(0.0);
}

#[test]
fn test_running_raises_noise_to_floor() {
    let tuning = common::test_tuning();
    let run_floor = tuning.noise.run_floor;
    let mut world = common::create_test_world(&common::ROOM, tuning);
    common::set_actions(&mut world, Actions::FORWARD | Actions::RUN);

    step(&mut world);

    let player = world.resource::<Player>();
    assert_that(&player.mode).is_equal_to(MovementMode::Run);
    assert_that(&player.noise).is_greater_than_or_equal_to(run_floor);
    assert_that(&player.position.x).is_greater_than(1.5);
}

#[test]
fn test_sneak_overrides_run() {
    let tuning = common::test_tuning();
    let sneak_floor = tuning.noise.sneak_floor;
    let mut world = common::create_test_world(&common::ROOM, tuning);
    common::set_actions(&mut world, Actions::FORWARD | Actions::RUN | Actions::SNEAK);

    step(&mut world);

    let player = world.resource::<Player>();
    assert_that(&player.mode).is_equal_to(MovementMode::Sneak);
    assert_that(&player.noise).is_equal_to(sneak_floor);
}

#[test]
fn test_walking_emits_footsteps_but_sneaking_does_not() {
    let tuning = common::test_tuning();
    let interval = tuning.player.footstep_interval;
    let mut world = common::create_test_world(&common::ROOM, tuning.clone());
    common::set_actions(&mut world, Actions::FORWARD);

    for _ in 0..interval {
        step(&mut world);
    }
    assert_that(&common::drain_audio(&mut world)).contains(AudioEvent::Footstep(Surface::Wood));

    let mut world = common::create_test_world(&common::ROOM, tuning);
    common::set_actions(&mut world, Actions::FORWARD | Actions::SNEAK);
    for _ in 0..interval * 4 {
        step(&mut world);
    }
    assert_that(&common::drain_audio(&mut world)).is_empty();
}

#[test]
fn test_hidden_player_cannot_move() {
    let mut world = common::create_test_world(&common::ROOM, common::test_tuning());
    {
        let mut player = world.resource_mut::<Player>();
        player.hiding = Hiding::UnderBed;
        player.noise = 0.5;
    }
    common::set_actions(&mut world, Actions::FORWARD | Actions::RUN);
    let start = world.resource::<Player>().position;

    step(&mut world);

    let player = world.resource::<Player>();
    assert_that(&player.position).is_equal_to(start);
    assert_that(&player.mode).is_equal_to(MovementMode::Still);
    assert_that(&player.noise).is_less_than(0.5);
}

#[test]
fn test_look_clamps_pitch_and_wraps_yaw() {
    let mut world = common::create_test_world(&common::ROOM, common::test_tuning());
    world.insert_resource(PlayerInput {
        actions: Actions::empty(),
        look: Vec2::new(-0.5, 10.0),
    });

    world
        .run_system_once(player_look_system)
        .expect("System should run successfully");

    let player = world.resource::<Player>();
    assert_that(&player.pitch).is_equal_to(0.6);
    assert_that(&player.yaw).is_greater_than(5.7);
    assert_that(&world.resource::<PlayerInput>().look).is_equal_to(Vec2::ZERO);
}

fn world_at_exit(keys: u32) -> World {
    let mut world = common::create_test_world(&common::ROOM, common::test_tuning());
    {
        let mut player = world.resource_mut::<Player>();
        player.position = Vec2::new(10.5, 1.5);
        player.yaw = -FRAC_PI_2;
        player.keys = keys;
    }
    common::set_actions(&mut world, Actions::FORWARD);
    world
}

#[test]
fn test_exit_is_locked_without_keys() {
    let mut world = world_at_exit(1);

    for _ in 0..20 {
        step(&mut world);
    }

    assert_that(&*world.resource::<GameStage>()).is_equal_to(GameStage::Playing);
    assert_that(&world.resource::<Player>().position.y).is_greater_than(1.15);
    let message = world.resource::<TransientMessage>().text().map(str::to_owned);
    assert_that(&message).is_equal_to(Some("The door is locked (1/2 keys)".to_string()));
}

#[test]
fn test_exit_opens_with_enough_keys() {
    let mut world = world_at_exit(2);

    for _ in 0..20 {
        step(&mut world);
    }

    assert_that(&*world.resource::<GameStage>()).is_equal_to(GameStage::Escaped);
}

/// A full battery drained at 0.25 per tick dies on exactly the 400th tick.
#[test]
fn test_battery_runs_out_on_schedule() {
    let mut tuning = common::test_tuning();
    tuning.battery.drain_per_tick = 0.25;
    let mut game = common::create_game(&hollow::constants::RAW_LEVEL, tuning);

    for _ in 0..399 {
        game.tick();
    }
    assert_that(&game.stage()).is_equal_to(GameStage::Playing);
    assert_that(&game.player().battery).is_equal_to(0.25);
    assert_that(&game.snapshot().battery_percent).is_equal_to(1);

    game.tick();
    assert_that(&game.stage()).is_equal_to(GameStage::PowerLoss);
    assert_that(&game.player().battery).is_equal_to(0.0);

    let battery = game.player().battery;
    game.tick();
    assert_that(&game.stage()).is_equal_to(GameStage::PowerLoss);
    assert_that(&game.player().battery).is_equal_to(battery);
}

fn drain_until_power_loss(drain: f32, limit: u64) -> Option<u64> {
    let mut tuning = common::test_tuning();
    tuning.battery.drain_per_tick = drain;
    tuning.battery.flicker_chance = 0.0;
    let mut world = common::create_test_world(&common::ROOM, tuning);

    for tick in 1..=limit {
        world.run_system_once(battery_system).expect("System should run successfully");
        if *world.resource::<GameStage>() == GameStage::PowerLoss {
            return Some(tick);
        }
    }
    None
}

/// Drains that are not exact in binary still empty the battery on tick `100 / drain`.
#[test]
fn test_inexact_drain_runs_out_on_schedule() {
    assert_that(&drain_until_power_loss(0.1, 2000)).is_equal_to(Some(1000));
    assert_that(&drain_until_power_loss(0.2, 2000)).is_equal_to(Some(500));
    assert_that(&drain_until_power_loss(0.7, 2000)).is_equal_to(Some(143));
    assert_that(&drain_until_power_loss(1.0 / 3.0, 2000)).is_equal_to(Some(300));
}

#[test]
fn test_low_battery_flickers_the_light() {
    let mut tuning = common::test_tuning();
    tuning.battery.drain_per_tick = 0.0;
    tuning.battery.flicker_chance = 1.0;
    tuning.battery.low_threshold = 20.0;
    let mut world = common::create_test_world(&common::ROOM, tuning);
    world.resource_mut::<Player>().has_light = true;

    world.run_system_once(battery_system).expect("System should run successfully");
    assert_that(&world.resource::<Player>().flicker).is_false();
    assert_that(&world.resource::<Player>().light_active()).is_true();

    world.resource_mut::<Player>().battery = 10.0;
    world.run_system_once(battery_system).expect("System should run successfully");
    let player = world.resource::<Player>();
    assert_that(&player.flicker).is_true();
    assert_that(&player.light_active()).is_false();
    assert_that(&*world.resource::<GameStage>()).is_equal_to(GameStage::Playing);
}
