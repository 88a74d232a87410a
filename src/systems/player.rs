use bevy_ecs::event::EventWriter;
use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Res, ResMut};
use bitflags::bitflags;
use glam::Vec2;
use tracing::{debug, info};

use crate::config::{NoiseTuning, Tuning};
use crate::constants::MapTile;
use crate::map::builder::Map;
use crate::systems::audio::{AudioEvent, Surface};
use crate::systems::collision::{move_per_axis, touches_exit};
use crate::systems::components::TransientMessage;
use crate::systems::objects::Objects;
use crate::systems::state::GameStage;

bitflags! {
    /// Resolved input actions for one frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Actions: u16 {
        const FORWARD = 1 << 0;
        const BACK = 1 << 1;
        const STRAFE_LEFT = 1 << 2;
        const STRAFE_RIGHT = 1 << 3;
        const RUN = 1 << 4;
        const SNEAK = 1 << 5;
        /// Edge-triggered; consumed by the interaction resolver.
        const INTERACT = 1 << 6;
        /// Edge-triggered; consumed by the attack system.
        const ATTACK = 1 << 7;
    }
}

/// Input for the current frame, as resolved by the frontend.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct PlayerInput {
    pub actions: Actions,
    /// Yaw and pitch delta in radians. Positive yaw turns right, positive pitch looks up.
    pub look: Vec2,
}

impl PlayerInput {
    /// Returns whether interact was requested, clearing the request.
    pub fn take_interact(&mut self) -> bool {
        let requested = self.actions.contains(Actions::INTERACT);
        self.actions.remove(Actions::INTERACT);
        requested
    }

    /// Returns whether an attack was requested, clearing the request.
    pub fn take_attack(&mut self) -> bool {
        let requested = self.actions.contains(Actions::ATTACK);
        self.actions.remove(Actions::ATTACK);
        requested
    }

    /// Forward/back on Y, strafe on X, each in `-1..=1`.
    pub fn intent(&self) -> Vec2 {
        let axis = |positive: Actions, negative: Actions| {
            (self.actions.contains(positive) as i8 - self.actions.contains(negative) as i8) as f32
        };
        Vec2::new(
            axis(Actions::STRAFE_RIGHT, Actions::STRAFE_LEFT),
            axis(Actions::FORWARD, Actions::BACK),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Hiding {
    #[default]
    None,
    UnderBed,
    InLocker,
}

impl Hiding {
    pub fn is_hidden(self) -> bool {
        !matches!(self, Hiding::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementMode {
    #[default]
    Still,
    Sneak,
    Walk,
    Run,
}

impl MovementMode {
    fn from_input(input: &PlayerInput) -> Self {
        if input.intent() == Vec2::ZERO {
            MovementMode::Still
        } else if input.actions.contains(Actions::SNEAK) {
            MovementMode::Sneak
        } else if input.actions.contains(Actions::RUN) {
            MovementMode::Run
        } else {
            MovementMode::Walk
        }
    }

    /// The lowest noise level this mode produces.
    pub fn noise_floor(self, tuning: &NoiseTuning) -> f32 {
        match self {
            MovementMode::Still => 0.0,
            MovementMode::Sneak => tuning.sneak_floor,
            MovementMode::Walk => tuning.walk_floor,
            MovementMode::Run => tuning.run_floor,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Player {
    pub position: Vec2,
    /// Facing angle in radians; zero faces +X, increasing turns toward +Y.
    pub yaw: f32,
    pub pitch: f32,
    pub mode: MovementMode,
    /// Percent, `0..=100`.
    pub battery: f32,
    /// `0..=1`.
    pub noise: f32,
    pub keys: u32,
    pub has_weapon: bool,
    pub has_light: bool,
    pub hiding: Hiding,
    /// Set on ticks where the failing light cuts out.
    pub flicker: bool,
    /// Tick from which the next attack is allowed.
    pub attack_ready_at: u64,
    /// Tick from which the next jump-scare may roll.
    pub jump_scare_ready_at: u64,
    pub footstep_timer: u32,
}

impl Player {
    pub fn spawn(map: &Map, tuning: &Tuning) -> Self {
        Self {
            position: map.spawn,
            yaw: 0.0,
            pitch: 0.0,
            mode: MovementMode::Still,
            battery: 100.0,
            noise: 0.0,
            keys: 0,
            has_weapon: false,
            has_light: tuning.player.start_with_light,
            hiding: Hiding::None,
            flicker: false,
            attack_ready_at: 0,
            jump_scare_ready_at: 0,
            footstep_timer: 0,
        }
    }

    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.yaw)
    }

    pub fn right(&self) -> Vec2 {
        self.forward().perp()
    }

    /// Whether the player's light is on and powered this tick.
    pub fn light_active(&self) -> bool {
        self.has_light && self.battery > 0.0 && !self.flicker
    }

    /// Decays noise toward zero, never below the current movement floor.
    pub fn update_noise(&mut self, floor: f32, tuning: &NoiseTuning) {
        let mut noise = (self.noise * tuning.decay).max(floor);
        if noise < tuning.cutoff {
            noise = 0.0;
        }
        self.noise = noise.clamp(0.0, 1.0);
    }

    pub fn recharge(&mut self, amount: f32) {
        self.battery = (self.battery + amount).clamp(0.0, 100.0);
    }
}

/// Applies the look delta. Pitch is clamped; yaw wraps.
pub fn player_look_system(tuning: Res<Tuning>, mut input: ResMut<PlayerInput>, mut player: ResMut<Player>) {
    if input.look == Vec2::ZERO {
        return;
    }

    let max_pitch = tuning.player.max_pitch;
    player.yaw = (player.yaw + input.look.x).rem_euclid(std::f32::consts::TAU);
    player.pitch = (player.pitch + input.look.y).clamp(-max_pitch, max_pitch);
    input.look = Vec2::ZERO;
}

/// Moves the player per axis against the world, updates noise, and handles the exit door.
///
/// Hidden players do not move and make no noise.
#[allow(clippy::too_many_arguments)]
pub fn player_movement_system(
    map: Res<Map>,
    objects: Res<Objects>,
    tuning: Res<Tuning>,
    input: Res<PlayerInput>,
    mut player: ResMut<Player>,
    mut stage: ResMut<GameStage>,
    mut message: ResMut<TransientMessage>,
    mut audio_events: EventWriter<AudioEvent>,
) {
    if player.hiding.is_hidden() {
        player.mode = MovementMode::Still;
        player.update_noise(0.0, &tuning.noise);
        return;
    }

    let mode = MovementMode::from_input(&input);
    player.mode = mode;
    player.update_noise(mode.noise_floor(&tuning.noise), &tuning.noise);

    if mode == MovementMode::Still {
        player.footstep_timer = 0;
        return;
    }

    let multiplier = match mode {
        MovementMode::Run => tuning.player.run_multiplier,
        MovementMode::Sneak => tuning.player.sneak_multiplier,
        _ => 1.0,
    };
    let speed = (tuning.player.walk_speed * multiplier).max(0.0);

    let intent = input.intent();
    let direction = (player.forward() * intent.y + player.right() * intent.x).normalize_or_zero();
    let result = move_per_axis(&map, &objects, player.position, direction * speed, tuning.player.radius);
    let moved = result.position != player.position;
    player.position = result.position;

    if result.touched_exit {
        let required = tuning.script.required_keys;
        if player.keys >= required {
            info!(keys = player.keys, "Player escaped");
            *stage = GameStage::Escaped;
            return;
        }
        debug!(keys = player.keys, required, "Exit rejected");
        message.show(
            format!("The door is locked ({}/{} keys)", player.keys, required),
            tuning.script.message_ticks,
        );
    }

    if moved && mode != MovementMode::Sneak {
        player.footstep_timer += if mode == MovementMode::Run { 2 } else { 1 };
        if player.footstep_timer >= tuning.player.footstep_interval {
            player.footstep_timer = 0;
            let surface = if map.tile_at(player.position) == MapTile::Spawn || touches_exit(&map, player.position, 1.0) {
                Surface::Stone
            } else {
                Surface::Wood
            };
            audio_events.write(AudioEvent::Footstep(surface));
        }
    }
}
