use bevy_ecs::system::{Res, ResMut};
use glam::Vec2;
use rand::Rng;
use tracing::trace;

use crate::config::Tuning;
use crate::map::builder::Map;
use crate::systems::components::GameRng;
use crate::systems::objects::{ObjectKind, Objects};
use crate::systems::player::Player;

/// Expires transient effects and occasionally spawns a shadow at the edge of the player's view.
pub fn ambient_system(
    map: Res<Map>,
    tuning: Res<Tuning>,
    player: Res<Player>,
    mut objects: ResMut<Objects>,
    mut rng: ResMut<GameRng>,
) {
    objects.expire_transients();

    let rng = &mut rng.0;
    if !rng.random_bool(tuning.script.shadow_chance) {
        return;
    }

    let side: f32 = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let angle = player.yaw + side * tuning.half_fov() * rng.random_range(0.7f32..=0.95);
    let distance: f32 = rng.random_range(3.0..=6.0);
    let position = player.position + Vec2::from_angle(angle) * distance;

    if map.is_solid_cell(Map::cell_of(position)) {
        return;
    }

    let id = objects.spawn_transient(ObjectKind::Shadow, position, tuning.script.shadow_ticks);
    trace!(?id, ?position, "Shadow spawned");
}
