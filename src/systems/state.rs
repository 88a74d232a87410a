use bevy_ecs::event::EventWriter;
use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Res, ResMut};
use strum_macros::IntoStaticStr;
use tracing::info;

use crate::config::Tuning;
use crate::systems::audio::AudioEvent;
use crate::systems::components::TransientMessage;

/// The top-level stage of a session.
///
/// Only `Playing` runs the full simulation. The sequence stages count down and hand
/// control back (or on to `Caught`); the last three are terminal.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default, IntoStaticStr)]
pub enum GameStage {
    #[default]
    Playing,
    /// A note overlay is open. Index into [`crate::constants::NOTES`].
    ReadingNote { note: usize },
    /// A non-lethal scare is on screen.
    JumpScare { remaining_ticks: u32 },
    /// The enemy has made contact; the death sequence is playing.
    Dying { remaining_ticks: u32 },
    Caught,
    PowerLoss,
    Escaped,
}

impl GameStage {
    pub fn is_playing(self) -> bool {
        matches!(self, GameStage::Playing)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, GameStage::Caught | GameStage::PowerLoss | GameStage::Escaped)
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Progress through the one-off scripted beats of a session.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct Script {
    pub intro_started: bool,
    pub outro_played: bool,
}

/// Run condition: the full simulation is active.
pub fn is_playing(stage: Res<GameStage>) -> bool {
    stage.is_playing()
}

/// Run condition: the interact command has something to do.
pub fn accepts_interaction(stage: Res<GameStage>) -> bool {
    matches!(*stage, GameStage::Playing | GameStage::ReadingNote { .. })
}

/// Advances intro/ambience timers and the scripted sequences.
///
/// Runs first every tick. Jump-scares count down back to `Playing`; the death sequence
/// counts down to `Caught`, so contact always ends the run exactly
/// `death_sequence_ticks` ticks after it happened.
pub fn stage_system(
    tuning: Res<Tuning>,
    mut stage: ResMut<GameStage>,
    mut script: ResMut<Script>,
    mut message: ResMut<TransientMessage>,
    mut audio_events: EventWriter<AudioEvent>,
) {
    if !script.intro_started {
        script.intro_started = true;
        audio_events.write(AudioEvent::AmbientStart);
        message.show("Find the keys. Stay out of sight.", tuning.script.intro_ticks);
        info!("Intro started");
    }

    message.tick();

    let next = match *stage {
        GameStage::JumpScare { remaining_ticks } if remaining_ticks > 1 => GameStage::JumpScare {
            remaining_ticks: remaining_ticks - 1,
        },
        GameStage::JumpScare { .. } => GameStage::Playing,
        GameStage::Dying { remaining_ticks } if remaining_ticks > 1 => GameStage::Dying {
            remaining_ticks: remaining_ticks - 1,
        },
        GameStage::Dying { .. } => GameStage::Caught,
        other => other,
    };

    if next != *stage {
        if std::mem::discriminant(&next) != std::mem::discriminant(&*stage) {
            info!(from = stage.name(), to = next.name(), "Stage changed");
        }
        *stage = next;
    }

    if stage.is_terminal() && !script.outro_played {
        script.outro_played = true;
        audio_events.write(AudioEvent::AmbientStop);
        info!(outcome = stage.name(), "Session over");
    }
}
