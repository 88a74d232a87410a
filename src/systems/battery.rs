use bevy_ecs::system::{Res, ResMut};
use rand::Rng;
use tracing::info;

use crate::config::Tuning;
use crate::systems::components::GameRng;
use crate::systems::player::Player;
use crate::systems::state::GameStage;

/// Drains the battery by a fixed amount every tick and rolls the low-battery flicker.
///
/// An empty battery ends the session with [`GameStage::PowerLoss`].
pub fn battery_system(
    tuning: Res<Tuning>,
    mut player: ResMut<Player>,
    mut stage: ResMut<GameStage>,
    mut rng: ResMut<GameRng>,
) {
    let config = &tuning.battery;
    let mut battery = (player.battery - config.drain_per_tick).clamp(0.0, 100.0);
    // Float error from repeated subtraction would otherwise leave a sliver for one more tick
    if battery < config.drain_per_tick * 0.5 {
        battery = 0.0;
    }
    player.battery = battery;

    player.flicker =
        player.battery > 0.0 && player.battery < config.low_threshold && rng.0.random_bool(config.flicker_chance);

    if player.battery <= 0.0 && stage.is_playing() {
        info!("Battery exhausted");
        *stage = GameStage::PowerLoss;
    }
}
