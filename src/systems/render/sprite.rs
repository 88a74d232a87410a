//! Billboard sprites, sorted far to near and clipped against the wall depth buffer.

use bevy_ecs::system::{Res, ResMut};
use glam::Vec2;
use rand::Rng;
use smallvec::SmallVec;

use crate::config::Tuning;
use crate::systems::components::GameRng;
use crate::systems::enemy::{Enemy, EnemyState};
use crate::systems::objects::Objects;
use crate::systems::player::Player;
use crate::systems::render::{light_range, rgb, shade, Camera, DepthBuffer, Framebuffer};
use crate::texture::sprite::{SpriteKey, TextureStore};

/// Glow colour of procedural eyes. Drawn unlit, so it survives any amount of darkness.
pub const EYE_COLOR: u32 = rgb(255, 48, 32);

/// Anything nearer than this along the view axis is behind the camera plane.
const NEAR_PLANE: f32 = 0.1;

/// Texels with alpha below this are transparent.
const ALPHA_CUTOFF: u32 = 0x80;

/// A texel of a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Texel {
    /// Affected by distance falloff.
    Lit(u32),
    /// Always drawn at full brightness.
    Emissive(u32),
}

/// Where a world point lands on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub screen_x: f32,
    /// Distance along the camera's forward axis.
    pub depth: f32,
    /// Pixels per world unit at this depth.
    pub scale: f32,
}

/// Transforms `target` into camera space and projects it. `None` when behind the camera plane.
pub fn project(camera: &Camera, target: Vec2) -> Option<Projection> {
    let relative = target - camera.position;
    let depth = relative.dot(camera.forward);
    if depth <= NEAR_PLANE {
        return None;
    }
    let lateral = relative.dot(camera.right);
    let scale = camera.focal / depth;
    Some(Projection {
        screen_x: camera.width as f32 * 0.5 + lateral * scale,
        depth,
        scale,
    })
}

/// World-space width and height of each billboard.
fn dimensions(key: SpriteKey) -> Vec2 {
    match key {
        SpriteKey::Enemy => Vec2::new(0.6, 0.95),
        SpriteKey::Shadow => Vec2::new(0.55, 0.9),
        SpriteKey::Key => Vec2::new(0.2, 0.12),
        SpriteKey::Locker => Vec2::new(0.6, 0.95),
        SpriteKey::Note => Vec2::new(0.25, 0.12),
        SpriteKey::Bed => Vec2::new(0.9, 0.4),
        SpriteKey::Car => Vec2::new(0.95, 0.6),
        SpriteKey::Weapon => Vec2::new(0.35, 0.12),
    }
}

fn ellipse(u: f32, v: f32, center: Vec2, radius: Vec2) -> bool {
    let offset = (Vec2::new(u, v) - center) / radius;
    offset.length_squared() <= 1.0
}

/// A dark hooded figure with two glowing eyes, in normalised sprite coordinates.
pub fn eyes_silhouette(u: f32, v: f32) -> Option<Texel> {
    let eye = Vec2::new(0.07, 0.04);
    if ellipse(u, v, Vec2::new(0.41, 0.2), eye) || ellipse(u, v, Vec2::new(0.59, 0.2), eye) {
        return Some(Texel::Emissive(EYE_COLOR));
    }

    let head = ellipse(u, v, Vec2::new(0.5, 0.2), Vec2::new(0.22, 0.18));
    let body = v >= 0.3 && (u - 0.5).abs() <= 0.2 + 0.28 * (v - 0.3);
    (head || body).then_some(Texel::Lit(rgb(12, 10, 14)))
}

/// Fallback art for a sprite with no loaded texture.
pub fn procedural_texel(key: SpriteKey, u: f32, v: f32) -> Option<Texel> {
    let lit = |color| Some(Texel::Lit(color));
    match key {
        SpriteKey::Enemy | SpriteKey::Shadow => eyes_silhouette(u, v),
        SpriteKey::Key => {
            if ellipse(u, v, Vec2::new(0.25, 0.5), Vec2::new(0.2, 0.35)) || ((0.4..0.95).contains(&u) && (0.4..0.6).contains(&v)) {
                lit(rgb(212, 175, 55))
            } else {
                None
            }
        }
        SpriteKey::Locker => {
            let vent = (0.12..0.15).contains(&v) || (0.2..0.23).contains(&v) || (0.28..0.31).contains(&v);
            if vent && (0.2..0.8).contains(&u) {
                lit(rgb(24, 28, 32))
            } else if (0.04..0.96).contains(&u) {
                lit(rgb(74, 88, 104))
            } else {
                None
            }
        }
        SpriteKey::Note => lit(rgb(222, 214, 190)),
        SpriteKey::Bed => match v {
            v if v < 0.3 => None,
            v if v < 0.55 => lit(rgb(196, 196, 200)),
            _ => lit(rgb(96, 64, 40)),
        },
        SpriteKey::Car => {
            let window = (0.05..0.35).contains(&v) && (0.2..0.8).contains(&u);
            if window {
                lit(rgb(30, 36, 44))
            } else if v >= 0.35 {
                lit(rgb(110, 24, 24))
            } else {
                None
            }
        }
        SpriteKey::Weapon => ((v - u).abs() < 0.15).then_some(Texel::Lit(rgb(150, 150, 156))),
    }
}

fn resolve_texel(textures: &TextureStore, key: SpriteKey, u: f32, v: f32) -> Option<Texel> {
    match textures.get(key) {
        Some(texture) => {
            let color = texture.sample(u, v);
            (color >> 24 >= ALPHA_CUTOFF).then_some(Texel::Lit(color | 0xFF00_0000))
        }
        None => procedural_texel(key, u, v),
    }
}

/// Draws every active object and the enemy as billboards.
///
/// A stalking enemy is invisible but occasionally flickers into view.
#[allow(clippy::too_many_arguments)]
pub fn sprite_render_system(
    tuning: Res<Tuning>,
    player: Res<Player>,
    enemy: Res<Enemy>,
    objects: Res<Objects>,
    textures: Res<TextureStore>,
    depth: Res<DepthBuffer>,
    mut rng: ResMut<GameRng>,
    mut framebuffer: ResMut<Framebuffer>,
) {
    let camera = Camera::new(&player, &tuning, framebuffer.width(), framebuffer.height());
    let range = light_range(&player, &tuning);

    let mut sprites: SmallVec<[(SpriteKey, Projection); 32]> = objects
        .iter_active()
        .filter_map(|object| project(&camera, object.position).map(|projection| (SpriteKey::from(object.kind), projection)))
        .collect();

    let enemy_visible = !enemy.invisible
        || (enemy.state == EnemyState::Stalking && rng.0.random_bool(tuning.enemy.flicker_through_chance));
    if enemy_visible {
        if let Some(projection) = project(&camera, enemy.position) {
            sprites.push((SpriteKey::Enemy, projection));
        }
    }

    sprites.sort_by(|(_, a), (_, b)| b.depth.total_cmp(&a.depth));

    for (key, projection) in sprites {
        let size = dimensions(key) * projection.scale;
        let bottom = camera.horizon + 0.5 * projection.scale;
        let top = bottom - size.y;
        let left = projection.screen_x - size.x * 0.5;
        let brightness = tuning.render.base_brightness * Camera::falloff(projection.depth, range);

        let x_start = left.floor().max(0.0) as u32;
        let x_end = (left + size.x).ceil().clamp(0.0, camera.width as f32) as u32;
        let y_start = top.floor().max(0.0) as u32;
        let y_end = bottom.ceil().clamp(0.0, camera.height as f32) as u32;

        for x in x_start..x_end {
            if projection.depth >= depth.at_column(x, camera.width) {
                continue;
            }
            let u = (x as f32 + 0.5 - left) / size.x;
            if !(0.0..1.0).contains(&u) {
                continue;
            }
            for y in y_start..y_end {
                let v = (y as f32 + 0.5 - top) / size.y;
                if !(0.0..1.0).contains(&v) {
                    continue;
                }
                match resolve_texel(&textures, key, u, v) {
                    Some(Texel::Lit(color)) => framebuffer.set(x, y, shade(color, brightness)),
                    Some(Texel::Emissive(color)) => framebuffer.set(x, y, color),
                    None => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silhouette_has_eyes_and_transparent_corners() {
        assert_eq!(eyes_silhouette(0.41, 0.2), Some(Texel::Emissive(EYE_COLOR)));
        assert_eq!(eyes_silhouette(0.02, 0.02), None);
        assert!(matches!(eyes_silhouette(0.5, 0.8), Some(Texel::Lit(_))));
    }

    #[test]
    fn test_every_key_has_procedural_art() {
        use strum::IntoEnumIterator;
        for key in SpriteKey::iter() {
            let drawn = (0..10).flat_map(|i| (0..10).map(move |j| (i, j))).any(|(i, j)| {
                procedural_texel(key, (i as f32 + 0.5) / 10.0, (j as f32 + 0.5) / 10.0).is_some()
            });
            assert!(drawn, "{key} draws nothing");
        }
    }
}
