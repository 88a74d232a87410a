//! The tick scheduler: one `World` holding every piece of game state, advanced by one `Schedule`.

use bevy_ecs::event::EventRegistry;
use bevy_ecs::observer::Trigger;
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs, Schedule, SystemSet};
use bevy_ecs::system::ResMut;
use bevy_ecs::world::World;
use glam::UVec2;
use tracing::{debug, info};

use crate::config::Tuning;
use crate::constants::{CANVAS_SIZE, RAW_LEVEL};
use crate::error::GameResult;
use crate::events::{GameCommand, GameEvent};
use crate::formatter;
use crate::map::builder::Map;
use crate::systems::{
    accepts_interaction, ambient_system, attack_system, audio_system, battery_system, enemy_system, hud_snapshot_system,
    interaction_system, is_playing, overlay_render_system, player_look_system, player_movement_system, sprite_render_system,
    stage_system, wall_render_system, AudioEvent, AudioResource, AudioSink, AudioState, DepthBuffer, Enemy, Framebuffer,
    GameRng, GameStage, GlobalState, NullAudio, Objects, Player, PlayerInput, Script, StatsSnapshot, TickCount,
    TransientMessage,
};
use crate::texture::sprite::TextureStore;

/// Phases of a tick, run strictly in this order.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum TickSet {
    /// Intro/ambience timers and scripted sequences.
    Stage,
    Player,
    Enemy,
    /// Transient visual effects.
    Ambient,
    /// Battery drain and random events.
    Drain,
    Render,
    /// Snapshot for the HUD and audio dispatch.
    Report,
}

/// Everything needed to start a session.
pub struct GameConfig {
    /// Level layout, one string per row.
    pub level: Vec<String>,
    pub tuning: Tuning,
    /// Fixed seed for a reproducible run; `None` seeds from the OS.
    pub seed: Option<u64>,
    pub canvas: UVec2,
    pub textures: TextureStore,
    pub audio: Box<dyn AudioSink>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            level: RAW_LEVEL.iter().map(|row| row.to_string()).collect(),
            tuning: Tuning::default(),
            seed: None,
            canvas: CANVAS_SIZE,
            textures: TextureStore::default(),
            audio: Box::new(NullAudio),
        }
    }
}

/// Core game state manager built on the Bevy ECS architecture.
///
/// The `World` is the single owner of all mutable state (player, enemy, objects, render
/// targets); the `Schedule` runs every phase of a tick against it in a fixed order.
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
}

impl Game {
    /// Loads the level, places the player, enemy, and objects, and builds the schedule.
    ///
    /// # Errors
    ///
    /// Returns `GameError::LevelParse` or `GameError::Map` if the level layout is invalid,
    /// and `GameError::Config` if the tuning fails [`Tuning::validate`].
    pub fn new(config: GameConfig) -> GameResult<Game> {
        info!("Starting game initialization");

        config.tuning.validate()?;
        let map = Map::new(&config.level)?;
        let mut rng = GameRng::new(config.seed);
        let tuning = config.tuning;

        let objects = Objects::from_map(&map, &mut rng.0, tuning.battery.locker_battery_chance);
        let player = Player::spawn(&map, &tuning);
        let enemy = Enemy::spawn(&map);
        debug!(
            objects = objects.len(),
            player = ?player.position,
            enemy = ?enemy.position,
            "Populated world"
        );

        let mut world = World::default();
        Self::setup_ecs(&mut world);

        world.insert_resource(DepthBuffer(vec![f32::INFINITY; tuning.render.ray_count.max(1)]));
        world.insert_resource(Framebuffer::new(config.canvas));
        world.insert_resource(map);
        world.insert_resource(objects);
        world.insert_resource(player);
        world.insert_resource(enemy);
        world.insert_resource(tuning);
        world.insert_resource(rng);
        world.insert_resource(config.textures);
        world.insert_resource(AudioResource(config.audio));
        world.insert_resource(AudioState::default());
        world.insert_resource(TickCount::default());
        world.insert_resource(TransientMessage::default());
        world.insert_resource(GlobalState::default());
        world.insert_resource(GameStage::default());
        world.insert_resource(Script::default());
        world.insert_resource(PlayerInput::default());
        world.insert_resource(StatsSnapshot::default());

        let mut schedule = Schedule::default();
        Self::configure_schedule(&mut schedule);

        info!("Game initialization complete");
        Ok(Game { world, schedule })
    }

    fn setup_ecs(world: &mut World) {
        EventRegistry::register_event::<GameEvent>(world);
        EventRegistry::register_event::<AudioEvent>(world);

        world.add_observer(
            |event: Trigger<GameEvent>, mut state: ResMut<GlobalState>, mut audio: ResMut<AudioState>| match *event {
                GameEvent::Command(GameCommand::Exit) => state.exit = true,
                GameEvent::Command(GameCommand::MuteAudio) => {
                    audio.muted = !audio.muted;
                    info!("Audio {}", if audio.muted { "muted" } else { "unmuted" });
                }
            },
        );
    }

    fn configure_schedule(schedule: &mut Schedule) {
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);

        schedule
            .add_systems((
                stage_system.in_set(TickSet::Stage),
                (
                    player_look_system.run_if(is_playing),
                    player_movement_system.run_if(is_playing),
                    interaction_system.run_if(accepts_interaction),
                    attack_system.run_if(is_playing),
                )
                    .chain()
                    .in_set(TickSet::Player),
                enemy_system.in_set(TickSet::Enemy),
                ambient_system.in_set(TickSet::Ambient),
                battery_system.in_set(TickSet::Drain),
                (wall_render_system, sprite_render_system, overlay_render_system)
                    .chain()
                    .in_set(TickSet::Render),
                (hud_snapshot_system, audio_system).chain().in_set(TickSet::Report),
            ))
            .configure_sets(
                (
                    TickSet::Stage,
                    TickSet::Player,
                    TickSet::Enemy.run_if(is_playing),
                    TickSet::Ambient.run_if(is_playing),
                    TickSet::Drain.run_if(is_playing),
                    TickSet::Render,
                    TickSet::Report,
                )
                    .chain(),
            );
    }

    /// Replaces this frame's input.
    pub fn set_input(&mut self, input: PlayerInput) {
        self.world.insert_resource(input);
    }

    pub fn command(&mut self, command: GameCommand) {
        self.world.trigger(GameEvent::from(command));
    }

    /// Runs one full tick.
    ///
    /// Returns `true` once the frontend has asked to exit.
    pub fn tick(&mut self) -> bool {
        let tick = {
            let mut count = self.world.resource_mut::<TickCount>();
            count.0 += 1;
            count.0
        };
        formatter::set_tick(tick);

        self.schedule.run(&mut self.world);

        self.world.resource::<GlobalState>().exit
    }

    pub fn tick_count(&self) -> u64 {
        self.world.resource::<TickCount>().0
    }

    pub fn stage(&self) -> GameStage {
        *self.world.resource::<GameStage>()
    }

    pub fn snapshot(&self) -> &StatsSnapshot {
        self.world.resource::<StatsSnapshot>()
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        self.world.resource::<Framebuffer>()
    }

    pub fn player(&self) -> &Player {
        self.world.resource::<Player>()
    }

    pub fn enemy(&self) -> &Enemy {
        self.world.resource::<Enemy>()
    }

    pub fn depth_buffer(&self) -> &DepthBuffer {
        self.world.resource::<DepthBuffer>()
    }
}
