#![allow(dead_code)]

use bevy_ecs::event::Events;
use bevy_ecs::world::World;
use glam::{UVec2, Vec2};
use hollow::config::Tuning;
use hollow::game::{Game, GameConfig};
use hollow::systems::{Actions, AudioEvent, ObjectKind, Objects, PlayerInput};

pub const SEED: u64 = 0xC0FFEE;

/// A walled room with the exit in the top wall and a locker in each bottom corner.
pub const ROOM: [&str; 7] = [
    "##########E#",
    "#P.........#",
    "#..........#",
    "#..........#",
    "#..........#",
    "#L........L#",
    "############",
];

/// Tuning with a small render target so render systems stay cheap in tests.
pub fn test_tuning() -> Tuning {
    let mut tuning = Tuning::default();
    tuning.render.ray_count = 40;
    tuning
}

pub fn create_game(level: &[&str], tuning: Tuning) -> Game {
    Game::new(GameConfig {
        level: level.iter().map(|row| row.to_string()).collect(),
        tuning,
        seed: Some(SEED),
        canvas: UVec2::new(160, 90),
        ..GameConfig::default()
    })
    .expect("test level should load")
}

pub fn create_test_world(level: &[&str], tuning: Tuning) -> World {
    create_game(level, tuning).world
}

pub fn set_actions(world: &mut World, actions: Actions) {
    world.insert_resource(PlayerInput {
        actions,
        look: Vec2::ZERO,
    });
}

pub fn drain_audio(world: &mut World) -> Vec<AudioEvent> {
    world.resource_mut::<Events<AudioEvent>>().drain().collect()
}

/// Position of the first active object of `kind`.
pub fn find_object(world: &World, kind: ObjectKind) -> Vec2 {
    world
        .resource::<Objects>()
        .iter_active()
        .find(|object| object.kind == kind)
        .map(|object| object.position)
        .expect("level should contain the object")
}
