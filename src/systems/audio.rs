//! Audio cues and the output port that plays them.
//!
//! The simulation only ever writes [`AudioEvent`]s; `audio_system` forwards them to an
//! [`AudioSink`] at the end of the tick and never waits on playback. Sinks are plain trait
//! objects so a real mixer, a logger, or a test double can be dropped in.

use bevy_ecs::event::{Event, Events};
use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Res, ResMut};
use strum_macros::{AsRefStr, Display};
use tracing::{debug, trace};

/// What the player is walking on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Surface {
    Wood,
    Stone,
}

/// Fire-and-forget audio notifications.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum AudioEvent {
    AmbientStart,
    AmbientStop,
    Footstep(Surface),
    /// Enemy footstep; intensity in `[0, 1]`, louder when closer.
    GhostFootstep(f32),
    JumpScare,
    ItemPickup,
    BatteryRecharge,
    Swing,
    Hit,
}

/// The audio collaborator. Every method has a no-op default.
pub trait AudioSink: Send + Sync {
    fn ambient_start(&mut self) {}
    fn ambient_stop(&mut self) {}
    fn footstep(&mut self, _surface: Surface) {}
    fn ghost_footstep(&mut self, _intensity: f32) {}
    fn jump_scare(&mut self) {}
    fn item_pickup(&mut self) {}
    fn battery_recharge(&mut self) {}
    fn swing(&mut self) {}
    fn hit(&mut self) {}
}

/// Discards every cue.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {}

/// Logs every cue at trace level; used by the headless runner.
#[derive(Debug, Default)]
pub struct TracingAudio;

impl AudioSink for TracingAudio {
    fn ambient_start(&mut self) {
        trace!("Ambient wind started");
    }

    fn ambient_stop(&mut self) {
        trace!("Ambient wind stopped");
    }

    fn footstep(&mut self, surface: Surface) {
        trace!(surface = surface.as_ref(), "Footstep");
    }

    fn ghost_footstep(&mut self, intensity: f32) {
        trace!(intensity, "Ghost footstep");
    }

    fn jump_scare(&mut self) {
        trace!("Jump scare sting");
    }

    fn item_pickup(&mut self) {
        trace!("Item pickup");
    }

    fn battery_recharge(&mut self) {
        trace!("Battery recharge");
    }

    fn swing(&mut self) {
        trace!("Swing");
    }

    fn hit(&mut self) {
        trace!("Hit");
    }
}

/// Resource holding the active sink.
#[derive(Resource)]
pub struct AudioResource(pub Box<dyn AudioSink>);

/// Resource for tracking audio state
#[derive(Resource, Debug, Clone, Default)]
pub struct AudioState {
    pub muted: bool,
}

/// Drains this tick's audio events into the sink.
pub fn audio_system(mut audio: ResMut<AudioResource>, state: Res<AudioState>, mut events: ResMut<Events<AudioEvent>>) {
    if state.muted {
        let dropped = events.drain().count();
        if dropped > 0 {
            debug!(dropped, "Skipping audio cues while muted");
        }
        return;
    }

    let sink = audio.0.as_mut();
    for event in events.drain() {
        match event {
            AudioEvent::AmbientStart => sink.ambient_start(),
            AudioEvent::AmbientStop => sink.ambient_stop(),
            AudioEvent::Footstep(surface) => sink.footstep(surface),
            AudioEvent::GhostFootstep(intensity) => sink.ghost_footstep(intensity),
            AudioEvent::JumpScare => sink.jump_scare(),
            AudioEvent::ItemPickup => sink.item_pickup(),
            AudioEvent::BatteryRecharge => sink.battery_recharge(),
            AudioEvent::Swing => sink.swing(),
            AudioEvent::Hit => sink.hit(),
        }
    }
}
