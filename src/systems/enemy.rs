//! The enemy and its Idle → Stalking → Hunting state machine.

use std::f32::consts::PI;

use bevy_ecs::event::EventWriter;
use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Res, ResMut};
use glam::Vec2;
use rand::Rng;
use strum_macros::{Display, EnumIter};
use tracing::{debug, info, trace};

use crate::config::Tuning;
use crate::map::builder::Map;
use crate::systems::audio::AudioEvent;
use crate::systems::collision::{is_solid, move_with_slide};
use crate::systems::components::GameRng;
use crate::systems::objects::{ObjectKind, Objects};
use crate::systems::player::Player;
use crate::systems::state::GameStage;

/// Attempts made to find a valid teleport target before waiting for the next tick.
const TELEPORT_ATTEMPTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum EnemyState {
    /// Dormant.
    #[default]
    Idle,
    /// Invisible pursuit; may teleport behind the player.
    Stalking,
    /// Visible and charging straight at the player.
    Hunting,
}

impl EnemyState {
    /// The only edges the state machine may take.
    pub fn can_transition_to(self, next: EnemyState) -> bool {
        use EnemyState::*;
        matches!(
            (self, next),
            (Idle, Stalking) | (Idle, Hunting) | (Stalking, Hunting) | (Stalking, Idle) | (Hunting, Idle)
        )
    }

    fn is_invisible(self) -> bool {
        !matches!(self, EnemyState::Hunting)
    }
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Enemy {
    pub position: Vec2,
    pub state: EnemyState,
    /// Consecutive ticks spent lit while stalking.
    pub stare_ticks: u32,
    /// Ticks until the next teleport is allowed.
    pub teleport_cooldown: u32,
    pub invisible: bool,
    pub step_timer: u32,
}

impl Enemy {
    /// Places the enemy in its lair, or as far from the player's spawn as the map allows.
    pub fn spawn(map: &Map) -> Self {
        let position = map.lair.unwrap_or_else(|| farthest_walkable(map, map.spawn, None));
        Self::at(position)
    }

    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            state: EnemyState::Idle,
            stare_ticks: 0,
            teleport_cooldown: 0,
            invisible: true,
            step_timer: 0,
        }
    }

    /// Moves to `next` if the edge is allowed, resetting per-state counters.
    ///
    /// Returns whether the transition happened.
    pub fn transition(&mut self, next: EnemyState) -> bool {
        if !self.state.can_transition_to(next) {
            trace!(from = %self.state, to = %next, "Rejected enemy transition");
            return false;
        }

        debug!(from = %self.state, to = %next, "Enemy state changed");
        self.state = next;
        self.invisible = next.is_invisible();
        self.stare_ticks = 0;
        self.step_timer = 0;
        true
    }

    /// Sends the enemy back to `Idle` and relocates it as far from the player as possible.
    pub fn banish(&mut self, map: &Map, objects: &Objects, player_position: Vec2, radius: f32) {
        if !self.transition(EnemyState::Idle) {
            return;
        }
        self.position = farthest_walkable(map, player_position, Some((objects, radius)));
        info!(position = ?self.position, "Enemy banished");
    }
}

/// The walkable tile centre farthest from `from`, skipping tiles blocked by solid objects.
fn farthest_walkable(map: &Map, from: Vec2, clearance: Option<(&Objects, f32)>) -> Vec2 {
    map.walkable_centers()
        .filter(|center| clearance.is_none_or(|(objects, radius)| !is_solid(map, objects, *center, radius)))
        .max_by(|a, b| a.distance_squared(from).total_cmp(&b.distance_squared(from)))
        .unwrap_or(from)
}

/// Whether `target` lies within the horizontal field of view centred on `forward`.
pub fn in_field_of_view(origin: Vec2, forward: Vec2, target: Vec2, half_fov: f32) -> bool {
    let offset = target - origin;
    if offset.length_squared() < f32::EPSILON {
        return true;
    }
    forward.dot(offset.normalize()) >= half_fov.cos()
}

/// Whether the player's light is on the target: in view, powered, and within range.
///
/// A hidden player's light is shut away with them.
pub fn is_lit(player: &Player, target: Vec2, tuning: &Tuning) -> bool {
    player.light_active()
        && !player.hiding.is_hidden()
        && in_field_of_view(player.position, player.forward(), target, tuning.half_fov())
        && player.position.distance(target) < tuning.enemy.visibility_range
}

/// Runs one step of the enemy state machine, then checks for contact.
#[allow(clippy::too_many_arguments)]
pub fn enemy_system(
    map: Res<Map>,
    tuning: Res<Tuning>,
    player: Res<Player>,
    mut objects: ResMut<Objects>,
    mut enemy: ResMut<Enemy>,
    mut stage: ResMut<GameStage>,
    mut rng: ResMut<GameRng>,
    mut audio_events: EventWriter<AudioEvent>,
) {
    let rng = &mut rng.0;
    let config = &tuning.enemy;
    let distance = enemy.position.distance(player.position);

    match enemy.state {
        EnemyState::Idle => {
            if player.noise > config.detection_noise && distance <= config.detection_radius {
                enemy.transition(EnemyState::Hunting);
            } else if (player.noise > 0.0 || distance <= config.detection_radius)
                && rng.random_bool(config.idle_to_stalk_chance)
            {
                enemy.transition(EnemyState::Stalking);
            }
        }
        EnemyState::Stalking => {
            if is_lit(&player, enemy.position, &tuning) {
                enemy.stare_ticks += 1;
                if enemy.stare_ticks > config.stare_threshold {
                    enemy.banish(&map, &objects, player.position, config.radius);
                    return;
                }
            } else {
                enemy.stare_ticks = 0;
            }

            enemy.teleport_cooldown = enemy.teleport_cooldown.saturating_sub(1);
            let in_view = in_field_of_view(player.position, player.forward(), enemy.position, tuning.half_fov());

            if !in_view && distance > config.stalk_max_distance && enemy.teleport_cooldown == 0 {
                teleport_behind(&map, &mut objects, &tuning, &player, &mut enemy, rng);
            } else if enemy.stare_ticks == 0 {
                let step = (player.position - enemy.position).normalize_or_zero() * config.stalk_speed;
                enemy.position = move_with_slide(&map, &objects, enemy.position, step, config.radius);
            }

            if distance <= config.escalate_distance && rng.random_bool(config.escalate_chance) {
                enemy.transition(EnemyState::Hunting);
            }
        }
        EnemyState::Hunting => {
            if distance > config.hunt_lose_distance || player.hiding.is_hidden() {
                enemy.transition(EnemyState::Idle);
                return;
            }

            let step = (player.position - enemy.position).normalize_or_zero() * config.hunt_speed;
            enemy.position = move_with_slide(&map, &objects, enemy.position, step, config.radius);

            enemy.step_timer += 1;
            if enemy.step_timer >= config.ghost_step_interval {
                enemy.step_timer = 0;
                let intensity = (1.0 - distance / config.hunt_lose_distance).clamp(0.0, 1.0);
                audio_events.write(AudioEvent::GhostFootstep(intensity));
            }
        }
    }

    if !enemy.invisible
        && !player.hiding.is_hidden()
        && enemy.position.distance(player.position) < config.contact_radius
        && stage.is_playing()
    {
        info!("Enemy made contact");
        *stage = GameStage::Dying {
            remaining_ticks: tuning.script.death_sequence_ticks.max(1),
        };
    }
}

/// Relocates a stalking enemy to a random point roughly behind the player.
///
/// The old position is marked with a short-lived shadow. If no valid target is found the
/// enemy stays put and tries again next tick.
fn teleport_behind(
    map: &Map,
    objects: &mut Objects,
    tuning: &Tuning,
    player: &Player,
    enemy: &mut Enemy,
    rng: &mut impl Rng,
) {
    let config = &tuning.enemy;
    for _ in 0..TELEPORT_ATTEMPTS {
        let angle = player.yaw + PI + rng.random_range(-config.teleport_spread..=config.teleport_spread);
        let distance = rng.random_range(config.teleport_min_distance..=config.teleport_max_distance);
        let target = player.position + Vec2::from_angle(angle) * distance;

        if is_solid(map, objects, target, config.radius)
            || in_field_of_view(player.position, player.forward(), target, tuning.half_fov())
        {
            continue;
        }

        objects.spawn_transient(ObjectKind::Shadow, enemy.position, tuning.script.teleport_shadow_ticks);
        debug!(from = ?enemy.position, to = ?target, "Enemy teleported");
        enemy.position = target;
        enemy.teleport_cooldown = config.teleport_cooldown;
        return;
    }

    trace!("No teleport target found");
}
