use bevy_ecs::system::RunSystemOnce;
use bevy_ecs::world::World;
use glam::Vec2;
use hollow::config::Tuning;
use hollow::systems::render::sprite::EYE_COLOR;
use hollow::systems::{
    overlay_render_system, sprite_render_system, wall_render_system, DepthBuffer, Enemy, EnemyState, Framebuffer, GameStage,
    Player,
};
use hollow::texture::sprite::{SpriteKey, TextureStore};
use hollow::texture::Texture;
use speculoos::prelude::*;

mod common;

const OPEN: [&str; 5] = [
    "##########E#",
    "#P.........#",
    "#..........#",
    "#L........L#",
    "############",
];

const BLOCKED: [&str; 5] = [
    "##########E#",
    "#P.#.......#",
    "#..........#",
    "#L........L#",
    "############",
];

fn render(world: &mut World) {
    world
        .run_system_once(wall_render_system)
        .expect("System should run successfully");
    world
        .run_system_once(sprite_render_system)
        .expect("System should run successfully");
}

fn count_pixels(world: &World, predicate: impl Fn(u32) -> bool) -> usize {
    world.resource::<Framebuffer>().pixels().iter().filter(|pixel| predicate(**pixel)).count()
}

/// The enemy four tiles straight ahead of the spawn.
fn facing_enemy(level: &[&str], state: EnemyState, tuning: Tuning) -> World {
    let mut world = common::create_test_world(level, tuning);
    let mut enemy = Enemy::at(Vec2::new(5.5, 1.5));
    enemy.transition(state);
    world.insert_resource(enemy);
    world
}

#[test]
fn test_depth_buffer_matches_ray_count() {
    let mut world = common::create_test_world(&common::ROOM, common::test_tuning());
    world
        .run_system_once(wall_render_system)
        .expect("System should run successfully");
    assert_that(&world.resource::<DepthBuffer>().0).has_length(40);

    world.resource_mut::<Tuning>().render.ray_count = 7;
    world
        .run_system_once(wall_render_system)
        .expect("System should run successfully");
    let depth = &world.resource::<DepthBuffer>().0;
    assert_that(depth).has_length(7);
    assert_that(&depth.iter().all(|d| d.is_finite() && *d > 0.0)).is_true();
}

/// Every ray hitting the same flat wall reports the same perpendicular distance.
#[test]
fn test_flat_wall_has_no_fisheye() {
    let mut tuning = common::test_tuning();
    tuning.render.fov_degrees = 20.0;
    let mut world = common::create_test_world(&common::ROOM, tuning);
    world.resource_mut::<Player>().position = Vec2::new(2.5, 3.5);

    world
        .run_system_once(wall_render_system)
        .expect("System should run successfully");

    for distance in &world.resource::<DepthBuffer>().0 {
        assert_that(&(distance - 8.5).abs()).is_less_than(1e-3);
    }
}

#[test]
fn test_walls_are_drawn() {
    let mut world = common::create_test_world(&common::ROOM, common::test_tuning());
    world.resource_mut::<Player>().has_light = true;
    render(&mut world);

    let framebuffer = world.resource::<Framebuffer>();
    let center = framebuffer.get(80, 45).unwrap();
    assert_that(&((center >> 16) & 0xFF)).is_greater_than(20);
}

#[test]
fn test_visible_enemy_draws_glowing_eyes() {
    let mut world = facing_enemy(&OPEN, EnemyState::Hunting, common::test_tuning());
    render(&mut world);
    assert_that(&count_pixels(&world, |pixel| pixel == EYE_COLOR)).is_greater_than(0);
}

#[test]
fn test_wall_occludes_enemy() {
    let mut world = facing_enemy(&BLOCKED, EnemyState::Hunting, common::test_tuning());
    render(&mut world);
    assert_that(&count_pixels(&world, |pixel| pixel == EYE_COLOR)).is_equal_to(0);
}

#[test]
fn test_invisible_stalker_only_flickers_through_by_chance() {
    let mut tuning = common::test_tuning();
    tuning.enemy.flicker_through_chance = 0.0;
    let mut world = facing_enemy(&OPEN, EnemyState::Stalking, tuning.clone());
    render(&mut world);
    assert_that(&count_pixels(&world, |pixel| pixel == EYE_COLOR)).is_equal_to(0);

    tuning.enemy.flicker_through_chance = 1.0;
    let mut world = facing_enemy(&OPEN, EnemyState::Stalking, tuning);
    render(&mut world);
    assert_that(&count_pixels(&world, |pixel| pixel == EYE_COLOR)).is_greater_than(0);
}

#[test]
fn test_loaded_texture_replaces_procedural_sprite() {
    let mut world = facing_enemy(&OPEN, EnemyState::Hunting, common::test_tuning());
    world.resource_mut::<Player>().has_light = true;
    let mut textures = TextureStore::default();
    textures.insert(SpriteKey::Enemy, Texture::from_argb(1, 1, vec![0xFF00_FF00]).unwrap());
    world.insert_resource(textures);

    render(&mut world);

    assert_that(&count_pixels(&world, |pixel| pixel == EYE_COLOR)).is_equal_to(0);
    let green = count_pixels(&world, |pixel| {
        let [_, r, g, b] = pixel.to_be_bytes();
        r == 0 && b == 0 && g > 60
    });
    assert_that(&green).is_greater_than(0);
}

#[test]
fn test_terminal_stages_paint_over_the_view() {
    for (stage, expected) in [(GameStage::Caught, 0xFF00_0000), (GameStage::PowerLoss, 0xFF00_0000), (GameStage::Escaped, 0xFFFF_FFFF)] {
        let mut world = common::create_test_world(&common::ROOM, common::test_tuning());
        render(&mut world);
        world.insert_resource(stage);
        world
            .run_system_once(overlay_render_system)
            .expect("System should run successfully");
        assert_that(&count_pixels(&world, |pixel| pixel != expected)).is_equal_to(0);
    }
}
