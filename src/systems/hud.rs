use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Res, ResMut};

use crate::config::Tuning;
use crate::constants::NOTES;
use crate::systems::components::TransientMessage;
use crate::systems::player::{Hiding, Player};
use crate::systems::state::GameStage;

/// Everything the external HUD needs for one frame.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct StatsSnapshot {
    pub battery_percent: u8,
    pub keys_found: u32,
    pub keys_required: u32,
    pub noise_level: f32,
    pub message: Option<String>,
    /// Text of the open note, if any.
    pub note: Option<&'static str>,
    pub stage: GameStage,
    pub flicker: bool,
    pub hiding: Hiding,
}

pub fn hud_snapshot_system(
    tuning: Res<Tuning>,
    player: Res<Player>,
    stage: Res<GameStage>,
    message: Res<TransientMessage>,
    mut snapshot: ResMut<StatsSnapshot>,
) {
    let note = match *stage {
        GameStage::ReadingNote { note } => NOTES.get(note).copied(),
        _ => None,
    };

    *snapshot = StatsSnapshot {
        battery_percent: player.battery.ceil().clamp(0.0, 100.0) as u8,
        keys_found: player.keys,
        keys_required: tuning.script.required_keys,
        noise_level: player.noise,
        message: message.text().map(str::to_owned),
        note,
        stage: *stage,
        flicker: player.flicker,
        hiding: player.hiding,
    };
}
