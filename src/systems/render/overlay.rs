use bevy_ecs::system::{Res, ResMut};

use crate::config::Tuning;
use crate::systems::player::{Hiding, Player};
use crate::systems::render::sprite::{eyes_silhouette, Texel};
use crate::systems::render::{mix, rgb, shade, Framebuffer};
use crate::systems::state::GameStage;

const BLOOD: u32 = rgb(140, 0, 0);
const BLACK: u32 = rgb(0, 0, 0);
const WHITE: u32 = rgb(255, 255, 255);

/// Draws the eyes silhouette centred on screen, `coverage` of the screen height tall.
fn draw_silhouette(framebuffer: &mut Framebuffer, coverage: f32) {
    let width = framebuffer.width() as f32;
    let height = framebuffer.height() as f32;
    let size_y = (height * coverage).max(1.0);
    let size_x = size_y * 0.65;
    let left = (width - size_x) * 0.5;
    let top = height - size_y;

    for y in top.max(0.0) as u32..framebuffer.height() {
        let v = (y as f32 + 0.5 - top) / size_y;
        for x in left.max(0.0) as u32..((left + size_x).min(width)) as u32 {
            let u = (x as f32 + 0.5 - left) / size_x;
            match eyes_silhouette(u, v) {
                Some(Texel::Lit(color)) | Some(Texel::Emissive(color)) => framebuffer.set(x, y, color),
                None => {}
            }
        }
    }
}

/// Horizontal slats across the view while hiding.
fn draw_hiding(framebuffer: &mut Framebuffer, hiding: Hiding) {
    let width = framebuffer.width() as i32;
    let height = framebuffer.height() as i32;
    match hiding {
        Hiding::None => {}
        Hiding::InLocker => {
            let pitch = (height / 9).max(2);
            for band in 0..=height / pitch {
                let y = band * pitch;
                framebuffer.fill_rect(0, y, width, y + pitch * 2 / 3, rgb(18, 20, 24));
            }
        }
        Hiding::UnderBed => {
            framebuffer.fill_rect(0, 0, width, height * 2 / 3, rgb(22, 16, 12));
            framebuffer.fill_rect(0, height * 2 / 3, width, height * 2 / 3 + (height / 40).max(1), rgb(60, 44, 30));
        }
    }
}

/// Screen-space effects for the current stage, drawn over the 3D view.
pub fn overlay_render_system(tuning: Res<Tuning>, stage: Res<GameStage>, player: Res<Player>, mut framebuffer: ResMut<Framebuffer>) {
    draw_hiding(&mut framebuffer, player.hiding);

    if player.flicker {
        framebuffer.map_pixels(|pixel| shade(pixel, 0.4));
    }

    match *stage {
        GameStage::Playing => {}
        GameStage::ReadingNote { .. } => framebuffer.map_pixels(|pixel| shade(pixel, 0.3)),
        GameStage::JumpScare { .. } => {
            framebuffer.fill(BLACK);
            draw_silhouette(&mut framebuffer, 1.0);
        }
        GameStage::Dying { remaining_ticks } => {
            let total = tuning.script.death_sequence_ticks.max(1) as f32;
            let progress = 1.0 - remaining_ticks as f32 / total;
            framebuffer.map_pixels(|pixel| mix(pixel, BLOOD, 0.25 + 0.5 * progress));
            draw_silhouette(&mut framebuffer, 0.3 + 0.7 * progress);
        }
        GameStage::Caught | GameStage::PowerLoss => framebuffer.fill(BLACK),
        GameStage::Escaped => framebuffer.fill(WHITE),
    }
}
