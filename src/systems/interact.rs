//! The interaction resolver and melee attack.

use bevy_ecs::event::EventWriter;
use bevy_ecs::system::{Res, ResMut};
use rand::Rng;
use tracing::debug;

use crate::config::Tuning;
use crate::map::builder::Map;
use crate::systems::audio::AudioEvent;
use crate::systems::collision::find_nearest_interactable_where;
use crate::systems::components::{GameRng, TickCount, TransientMessage};
use crate::systems::enemy::{in_field_of_view, Enemy, EnemyState};
use crate::systems::objects::{Loot, ObjectKind, Objects, Payload, WorldObject};
use crate::systems::player::{Hiding, Player, PlayerInput};
use crate::systems::state::GameStage;

/// What a single interact command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Nothing,
    ClosedNote,
    LeftHidingSpot,
    TookWeapon,
    TookKey,
    ReadNote { note: usize },
    HidUnderBed,
    OpenedLocker { loot: Loot, jump_scare: bool },
    HidInLocker,
    TookLight,
}

/// Resolves one interact command against the world.
///
/// An open note is closed first, then a hidden player steps out; only otherwise is the
/// nearest interactable object used.
pub fn resolve_interaction(
    player: &mut Player,
    objects: &mut Objects,
    stage: &mut GameStage,
    tuning: &Tuning,
    tick: u64,
    rng: &mut impl Rng,
) -> Interaction {
    if matches!(stage, GameStage::ReadingNote { .. }) {
        *stage = GameStage::Playing;
        return Interaction::ClosedNote;
    }

    if player.hiding.is_hidden() {
        player.hiding = Hiding::None;
        return Interaction::LeftHidingSpot;
    }

    // A car whose light is already taken has nothing left to give
    let usable = |object: &WorldObject| !(object.kind == ObjectKind::Car && player.has_light);
    let Some(id) = find_nearest_interactable_where(objects, player.position, tuning.player.interact_radius, usable)
    else {
        return Interaction::Nothing;
    };
    let Some((kind, payload)) = objects.get(id).map(|object| (object.kind, object.payload)) else {
        return Interaction::Nothing;
    };

    match (kind, payload) {
        (ObjectKind::Weapon, _) => {
            player.has_weapon = true;
            objects.deactivate(id);
            Interaction::TookWeapon
        }
        (ObjectKind::Key, _) => {
            player.keys += 1;
            objects.deactivate(id);
            Interaction::TookKey
        }
        (ObjectKind::Note, payload) => {
            let note = match payload {
                Payload::Note { text } => text,
                _ => 0,
            };
            *stage = GameStage::ReadingNote { note };
            objects.deactivate(id);
            Interaction::ReadNote { note }
        }
        (ObjectKind::Bed, _) => {
            player.hiding = Hiding::UnderBed;
            Interaction::HidUnderBed
        }
        (ObjectKind::Locker, Payload::Locker { open: false, loot }) => {
            if let Some(locker) = objects.get_mut(id) {
                locker.payload = Payload::Locker {
                    open: true,
                    loot: Loot::Empty,
                };
            }
            player.noise = 1.0;

            let jump_scare = tick >= player.jump_scare_ready_at && rng.random_bool(tuning.script.jump_scare_chance);
            if jump_scare {
                *stage = GameStage::JumpScare {
                    remaining_ticks: tuning.script.jump_scare_ticks.max(1),
                };
                player.jump_scare_ready_at = tick + u64::from(tuning.script.jump_scare_cooldown);
            }

            match loot {
                Loot::Key => player.keys += 1,
                Loot::Battery => player.recharge(tuning.battery.locker_recharge),
                Loot::Empty => {}
            }
            Interaction::OpenedLocker { loot, jump_scare }
        }
        (ObjectKind::Locker, _) => {
            player.hiding = Hiding::InLocker;
            Interaction::HidInLocker
        }
        (ObjectKind::Car, _) if !player.has_light => {
            player.has_light = true;
            player.battery = 100.0;
            Interaction::TookLight
        }
        _ => Interaction::Nothing,
    }
}

/// Consumes the interact command and resolves it, emitting audio cues and HUD messages.
#[allow(clippy::too_many_arguments)]
pub fn interaction_system(
    tuning: Res<Tuning>,
    tick: Res<TickCount>,
    mut input: ResMut<PlayerInput>,
    mut player: ResMut<Player>,
    mut objects: ResMut<Objects>,
    mut stage: ResMut<GameStage>,
    mut rng: ResMut<GameRng>,
    mut message: ResMut<TransientMessage>,
    mut audio_events: EventWriter<AudioEvent>,
) {
    if !input.take_interact() {
        return;
    }

    let interaction = resolve_interaction(&mut player, &mut objects, &mut stage, &tuning, tick.0, &mut rng.0);
    debug!(?interaction, "Resolved interaction");

    let required = tuning.script.required_keys;
    let text = match interaction {
        Interaction::TookWeapon => {
            audio_events.write(AudioEvent::ItemPickup);
            Some("You picked up a crowbar".to_string())
        }
        Interaction::TookKey
        | Interaction::OpenedLocker {
            loot: Loot::Key, ..
        } => {
            audio_events.write(AudioEvent::ItemPickup);
            Some(format!("Found a key ({}/{})", player.keys, required))
        }
        Interaction::OpenedLocker {
            loot: Loot::Battery, ..
        } => {
            audio_events.write(AudioEvent::BatteryRecharge);
            Some("Found batteries".to_string())
        }
        Interaction::OpenedLocker { loot: Loot::Empty, .. } => Some("The locker is empty".to_string()),
        Interaction::TookLight => {
            audio_events.write(AudioEvent::ItemPickup);
            Some("Found a flashlight in the glovebox".to_string())
        }
        Interaction::HidUnderBed => Some("You crawl under the bed".to_string()),
        Interaction::HidInLocker => Some("You squeeze into the locker".to_string()),
        _ => None,
    };

    if matches!(interaction, Interaction::OpenedLocker { jump_scare: true, .. }) {
        audio_events.write(AudioEvent::JumpScare);
    }

    if let Some(text) = text {
        message.show(text, tuning.script.message_ticks);
    }
}

/// Swings the weapon. A hit on an active enemy in front of the player banishes it.
#[allow(clippy::too_many_arguments)]
pub fn attack_system(
    map: Res<Map>,
    tuning: Res<Tuning>,
    tick: Res<TickCount>,
    objects: Res<Objects>,
    mut input: ResMut<PlayerInput>,
    mut player: ResMut<Player>,
    mut enemy: ResMut<Enemy>,
    mut audio_events: EventWriter<AudioEvent>,
) {
    if !input.take_attack() {
        return;
    }
    if !player.has_weapon || player.hiding.is_hidden() || tick.0 < player.attack_ready_at {
        return;
    }

    player.attack_ready_at = tick.0 + u64::from(tuning.combat.attack_cooldown);
    audio_events.write(AudioEvent::Swing);

    let hit = enemy.state != EnemyState::Idle
        && enemy.position.distance(player.position) <= tuning.combat.melee_range
        && in_field_of_view(player.position, player.forward(), enemy.position, tuning.half_fov());
    if hit {
        debug!(state = %enemy.state, "Melee hit");
        audio_events.write(AudioEvent::Hit);
        enemy.banish(&map, &objects, player.position, tuning.enemy.radius);
    }
}
