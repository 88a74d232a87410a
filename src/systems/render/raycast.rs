use bevy_ecs::system::{Res, ResMut};
use glam::{IVec2, Vec2};

use crate::config::Tuning;
use crate::constants::MapTile;
use crate::map::builder::Map;
use crate::systems::player::Player;
use crate::systems::render::{light_range, mix, rgb, shade, Camera, DepthBuffer, Framebuffer};

const CEILING_TOP: u32 = rgb(14, 12, 16);
const CEILING_HORIZON: u32 = rgb(4, 4, 6);
const FLOOR_HORIZON: u32 = rgb(6, 5, 4);
const FLOOR_BOTTOM: u32 = rgb(30, 24, 18);

/// Closest distance used for projection, keeping wall heights finite.
const MIN_DISTANCE: f32 = 1e-3;

/// Which grid line a ray crossed when it hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    /// A vertical grid line (the ray stepped along X).
    X,
    /// A horizontal grid line (the ray stepped along Y).
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance along the camera's forward axis, when cast with [`Camera::ray_direction`].
    pub distance: f32,
    pub side: WallSide,
    pub cell: IVec2,
    pub tile: MapTile,
}

/// Marches a ray through the grid with a DDA until it enters a solid cell.
///
/// Cells outside the grid are solid, so every ray terminates.
pub fn cast_ray(map: &Map, origin: Vec2, direction: Vec2) -> RayHit {
    let mut cell = Map::cell_of(origin);

    let delta = Vec2::new(
        if direction.x == 0.0 { f32::INFINITY } else { direction.x.recip().abs() },
        if direction.y == 0.0 { f32::INFINITY } else { direction.y.recip().abs() },
    );
    let step = IVec2::new(
        if direction.x < 0.0 { -1 } else { 1 },
        if direction.y < 0.0 { -1 } else { 1 },
    );

    let mut side_distance = Vec2::new(
        if direction.x == 0.0 {
            f32::INFINITY
        } else if direction.x < 0.0 {
            (origin.x - cell.x as f32) * delta.x
        } else {
            (cell.x as f32 + 1.0 - origin.x) * delta.x
        },
        if direction.y == 0.0 {
            f32::INFINITY
        } else if direction.y < 0.0 {
            (origin.y - cell.y as f32) * delta.y
        } else {
            (cell.y as f32 + 1.0 - origin.y) * delta.y
        },
    );

    let max_steps = map.width() + map.height() + 2;
    let mut side = WallSide::X;
    for _ in 0..max_steps {
        if side_distance.x < side_distance.y {
            side_distance.x += delta.x;
            cell.x += step.x;
            side = WallSide::X;
        } else {
            side_distance.y += delta.y;
            cell.y += step.y;
            side = WallSide::Y;
        }

        if map.is_solid_cell(cell) {
            break;
        }
    }

    let distance = match side {
        WallSide::X => side_distance.x - delta.x,
        WallSide::Y => side_distance.y - delta.y,
    };

    RayHit {
        distance: distance.max(MIN_DISTANCE),
        side,
        cell,
        tile: map.tile(cell),
    }
}

fn wall_color(tile: MapTile) -> u32 {
    match tile {
        MapTile::Exit => rgb(120, 40, 32),
        MapTile::Obstacle => rgb(92, 78, 60),
        _ => rgb(140, 132, 118),
    }
}

/// Fills ceiling and floor with vertical gradients split at the horizon.
fn draw_backdrop(framebuffer: &mut Framebuffer, horizon: f32) {
    let height = framebuffer.height();
    let width = framebuffer.width() as i32;
    let horizon = horizon.clamp(0.0, height as f32);

    for y in 0..height {
        let row = y as f32 + 0.5;
        let color = if row < horizon {
            mix(CEILING_TOP, CEILING_HORIZON, row / horizon.max(1.0))
        } else {
            let span = (height as f32 - horizon).max(1.0);
            mix(FLOOR_HORIZON, FLOOR_BOTTOM, (row - horizon) / span)
        };
        framebuffer.fill_rect(0, y as i32, width, y as i32 + 1, color);
    }
}

/// Casts one ray per configured column, records the depth buffer, and draws wall strips.
pub fn wall_render_system(
    map: Res<Map>,
    tuning: Res<Tuning>,
    player: Res<Player>,
    mut framebuffer: ResMut<Framebuffer>,
    mut depth: ResMut<DepthBuffer>,
) {
    let rays = tuning.render.ray_count.max(1);
    let camera = Camera::new(&player, &tuning, framebuffer.width(), framebuffer.height());
    let range = light_range(&player, &tuning);

    depth.0.clear();
    depth.0.resize(rays, f32::INFINITY);

    draw_backdrop(&mut framebuffer, camera.horizon);

    for (column, slot) in depth.0.iter_mut().enumerate() {
        let camera_x = 2.0 * (column as f32 + 0.5) / rays as f32 - 1.0;
        let hit = cast_ray(&map, camera.position, camera.ray_direction(camera_x));
        *slot = hit.distance;

        let side_factor = match hit.side {
            WallSide::X => 1.0,
            WallSide::Y => tuning.render.side_darkening,
        };
        let brightness = tuning.render.base_brightness * side_factor * Camera::falloff(hit.distance, range);
        let color = shade(wall_color(hit.tile), brightness);

        let strip = camera.focal / hit.distance;
        let top = (camera.horizon - strip * 0.5).floor() as i32;
        let bottom = (camera.horizon + strip * 0.5).ceil() as i32;
        let x0 = (column as u64 * camera.width as u64 / rays as u64) as i32;
        let x1 = ((column as u64 + 1) * camera.width as u64 / rays as u64) as i32;
        framebuffer.fill_rect(x0, top, x1, bottom, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Map {
        Map::new(&["#####E", "#P..L#", "#...L#", "######"]).unwrap()
    }

    #[test]
    fn test_axis_aligned_ray_hits_wall() {
        let map = corridor();
        let hit = cast_ray(&map, Vec2::new(1.5, 1.5), Vec2::new(1.0, 0.0));
        assert_eq!(hit.cell, IVec2::new(5, 1));
        assert_eq!(hit.side, WallSide::X);
        assert!((hit.distance - 3.5).abs() < 1e-5);
    }

    #[test]
    fn test_zero_component_never_produces_nan() {
        let map = corridor();
        let hit = cast_ray(&map, Vec2::new(1.0, 1.5), Vec2::new(0.0, -1.0));
        assert!(hit.distance.is_finite());
        assert_eq!(hit.side, WallSide::Y);
        assert_eq!(hit.cell, IVec2::new(1, 0));
    }
}
