//! Software renderer: raycast walls, billboard sprites, and screen overlays.
//!
//! Everything draws into a [`Framebuffer`] of packed `0xAARRGGBB` pixels that the frontend
//! presents as-is. The wall pass fills a [`DepthBuffer`] with one perpendicular distance per
//! ray; the sprite pass reads it back for occlusion.

use bevy_ecs::resource::Resource;
use glam::{UVec2, Vec2};

use crate::config::Tuning;
use crate::systems::player::Player;

pub mod overlay;
pub mod raycast;
pub mod sprite;

pub use overlay::overlay_render_system;
pub use raycast::wall_render_system;
pub use sprite::sprite_render_system;

pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Scales a colour's RGB channels by `factor`, clamped to `[0, 1]`.
pub fn shade(color: u32, factor: f32) -> u32 {
    let factor = factor.clamp(0.0, 1.0);
    let channel = |shift: u32| (((color >> shift) & 0xFF) as f32 * factor) as u32;
    0xFF00_0000 | channel(16) << 16 | channel(8) << 8 | channel(0)
}

/// Linear blend from `base` toward `target` by `amount` in `[0, 1]`.
pub fn mix(base: u32, target: u32, amount: f32) -> u32 {
    let amount = amount.clamp(0.0, 1.0);
    let channel = |shift: u32| {
        let a = ((base >> shift) & 0xFF) as f32;
        let b = ((target >> shift) & 0xFF) as f32;
        (a + (b - a) * amount) as u32
    };
    0xFF00_0000 | channel(16) << 16 | channel(8) << 8 | channel(0)
}

/// The raster target, redrawn in full every frame.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Framebuffer {
    pub fn new(size: UVec2) -> Self {
        let size = size.max(UVec2::ONE);
        Self {
            width: size.x,
            height: size.y,
            pixels: vec![0xFF00_0000; (size.x * size.y) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.pixels[(y * self.width + x) as usize])
    }

    pub fn set(&mut self, x: u32, y: u32, color: u32) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = color;
        }
    }

    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Fills `[x0, x1) × [y0, y1)`, clipped to the surface.
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let x0 = x0.clamp(0, self.width as i32) as u32;
        let x1 = x1.clamp(0, self.width as i32) as u32;
        let y0 = y0.clamp(0, self.height as i32) as u32;
        let y1 = y1.clamp(0, self.height as i32) as u32;
        for y in y0..y1 {
            let row = (y * self.width) as usize;
            self.pixels[row + x0 as usize..row + x1 as usize].fill(color);
        }
    }

    pub fn map_pixels(&mut self, f: impl Fn(u32) -> u32) {
        for pixel in &mut self.pixels {
            *pixel = f(*pixel);
        }
    }
}

/// Perpendicular wall distance per ray for the current frame.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct DepthBuffer(pub Vec<f32>);

impl DepthBuffer {
    /// Depth at a screen column, mapped onto the ray that covers it.
    pub fn at_column(&self, x: u32, screen_width: u32) -> f32 {
        if self.0.is_empty() || screen_width == 0 {
            return f32::INFINITY;
        }
        let index = (x as usize * self.0.len() / screen_width as usize).min(self.0.len() - 1);
        self.0[index]
    }
}

/// Per-frame projection parameters shared by the render passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec2,
    pub forward: Vec2,
    pub right: Vec2,
    /// `tan(fov / 2)`; the camera plane's half-width at unit depth.
    pub plane: f32,
    /// Pixels per world unit at unit depth.
    pub focal: f32,
    /// Screen row of the horizon, shifted by pitch.
    pub horizon: f32,
    pub width: u32,
    pub height: u32,
}

impl Camera {
    pub fn new(player: &Player, tuning: &Tuning, width: u32, height: u32) -> Self {
        let plane = tuning.half_fov().tan().max(1e-3);
        let half_height = height as f32 * 0.5;
        Self {
            position: player.position,
            forward: player.forward(),
            right: player.right(),
            plane,
            focal: width as f32 * 0.5 / plane,
            horizon: half_height + player.pitch * half_height,
            width,
            height,
        }
    }

    /// Direction of the ray through screen-space `camera_x` in `[-1, 1]` (left to right).
    ///
    /// The forward component is always 1, so DDA side distances are already perpendicular.
    pub fn ray_direction(&self, camera_x: f32) -> Vec2 {
        self.forward + self.right * (camera_x * self.plane)
    }

    /// Light falloff factor for something `distance` away.
    pub fn falloff(distance: f32, range: f32) -> f32 {
        if range <= 0.0 {
            return 0.0;
        }
        (1.0 - distance / range).clamp(0.0, 1.0)
    }
}

/// How far the player can see: the torch range while it's on, otherwise the ambient range.
pub fn light_range(player: &Player, tuning: &Tuning) -> f32 {
    if player.light_active() {
        tuning.render.flashlight_range
    } else {
        tuning.render.ambient_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shade_scales_channels() {
        assert_eq!(shade(rgb(200, 100, 50), 0.5), rgb(100, 50, 25));
        assert_eq!(shade(rgb(200, 100, 50), 2.0), rgb(200, 100, 50));
        assert_eq!(shade(rgb(200, 100, 50), -1.0), rgb(0, 0, 0));
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut framebuffer = Framebuffer::new(UVec2::new(4, 4));
        framebuffer.fill_rect(-10, 2, 10, 10, rgb(255, 0, 0));
        assert_eq!(framebuffer.get(0, 1), Some(rgb(0, 0, 0)));
        assert_eq!(framebuffer.get(3, 3), Some(rgb(255, 0, 0)));
        assert_eq!(framebuffer.get(4, 3), None);
    }

    #[test]
    fn test_depth_column_mapping() {
        let depth = DepthBuffer(vec![1.0, 2.0]);
        assert_eq!(depth.at_column(0, 100), 1.0);
        assert_eq!(depth.at_column(49, 100), 1.0);
        assert_eq!(depth.at_column(50, 100), 2.0);
        assert_eq!(depth.at_column(99, 100), 2.0);
    }
}
