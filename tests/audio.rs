use std::sync::{Arc, Mutex};

use bevy_ecs::event::Events;
use bevy_ecs::system::RunSystemOnce;
use hollow::systems::{audio_system, AudioEvent, AudioResource, AudioSink, AudioState, Surface};
use speculoos::prelude::*;

mod common;

#[derive(Clone, Default)]
struct RecordingSink {
    cues: Arc<Mutex<Vec<String>>>,
}

impl AudioSink for RecordingSink {
    fn footstep(&mut self, surface: Surface) {
        self.cues.lock().unwrap().push(format!("footstep:{surface}"));
    }

    fn ghost_footstep(&mut self, intensity: f32) {
        self.cues.lock().unwrap().push(format!("ghost:{intensity:.1}"));
    }

    fn jump_scare(&mut self) {
        self.cues.lock().unwrap().push("jump_scare".to_string());
    }
}

fn world_with_sink(sink: &RecordingSink) -> bevy_ecs::world::World {
    let mut world = common::create_test_world(&common::ROOM, common::test_tuning());
    world.insert_resource(AudioResource(Box::new(sink.clone())));
    {
        let mut events = world.resource_mut::<Events<AudioEvent>>();
        events.send(AudioEvent::Footstep(Surface::Stone));
        events.send(AudioEvent::ItemPickup);
        events.send(AudioEvent::GhostFootstep(0.5));
        events.send(AudioEvent::JumpScare);
    }
    world
}

#[test]
fn test_events_reach_sink_in_order() {
    let sink = RecordingSink::default();
    let mut world = world_with_sink(&sink);

    world.run_system_once(audio_system).expect("System should run successfully");

    let cues = sink.cues.lock().unwrap().clone();
    assert_that(&cues).is_equal_to(vec![
        "footstep:stone".to_string(),
        "ghost:0.5".to_string(),
        "jump_scare".to_string(),
    ]);
    assert_that(&common::drain_audio(&mut world)).is_empty();
}

#[test]
fn test_muted_audio_drops_cues() {
    let sink = RecordingSink::default();
    let mut world = world_with_sink(&sink);
    world.insert_resource(AudioState { muted: true });

    world.run_system_once(audio_system).expect("System should run successfully");

    assert_that(&*sink.cues.lock().unwrap()).is_empty();
    assert_that(&common::drain_audio(&mut world)).is_empty();
}
