//! The mutable half of the world model: every object placed in the level.
//!
//! Objects are never removed when used up; they are deactivated and stay in the list.
//! The exception is transient effects (shadows), which carry a [`TimeToLive`] and are
//! dropped from the list once it runs out.

use bevy_ecs::resource::Resource;
use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;
use strum_macros::{Display, EnumIter};
use tracing::{debug, trace};

use crate::constants::{Marker, KEY_LOCKERS, NOTES};
use crate::map::builder::Map;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

/// A type tag for world objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ObjectKind {
    Key,
    Locker,
    Note,
    Bed,
    Car,
    Weapon,
    /// A transient shadow figure; purely visual.
    Shadow,
}

impl ObjectKind {
    /// Furniture and vehicles block movement; pickups and effects do not.
    pub fn is_solid(self) -> bool {
        matches!(self, ObjectKind::Locker | ObjectKind::Bed | ObjectKind::Car)
    }

    pub fn is_interactable(self) -> bool {
        !matches!(self, ObjectKind::Shadow)
    }

    /// Collision footprint radius, in tiles.
    pub fn footprint(self) -> f32 {
        match self {
            ObjectKind::Key | ObjectKind::Note => 0.15,
            ObjectKind::Weapon => 0.2,
            ObjectKind::Shadow => 0.3,
            ObjectKind::Locker => 0.35,
            ObjectKind::Bed => 0.4,
            ObjectKind::Car => 0.45,
        }
    }
}

impl From<Marker> for ObjectKind {
    fn from(marker: Marker) -> Self {
        match marker {
            Marker::Key => ObjectKind::Key,
            Marker::Locker => ObjectKind::Locker,
            Marker::Note => ObjectKind::Note,
            Marker::Bed => ObjectKind::Bed,
            Marker::Car => ObjectKind::Car,
            Marker::Weapon => ObjectKind::Weapon,
        }
    }
}

/// What a locker holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Loot {
    #[default]
    Empty,
    Battery,
    Key,
}

/// Type-specific object data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Payload {
    #[default]
    None,
    Locker {
        open: bool,
        loot: Loot,
    },
    Note {
        /// Index into [`NOTES`].
        text: usize,
    },
}

/// Remaining lifetime of a transient object, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeToLive {
    pub remaining_ticks: u32,
}

impl TimeToLive {
    pub fn new(ticks: u32) -> Self {
        Self { remaining_ticks: ticks }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorldObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub position: Vec2,
    /// Footprint radius, in tiles.
    pub size: f32,
    pub active: bool,
    pub payload: Payload,
    pub time_to_live: Option<TimeToLive>,
}

impl WorldObject {
    pub fn blocks_movement(&self) -> bool {
        self.active && self.kind.is_solid()
    }
}

/// The entity list of the world model.
#[derive(Resource, Debug, Default, Clone)]
pub struct Objects {
    objects: Vec<WorldObject>,
    next_id: u32,
}

impl Objects {
    /// Spawns one object per map marker and assigns locker loot.
    ///
    /// Loot is rolled once here and stays fixed for the session: exactly [`KEY_LOCKERS`]
    /// lockers hold a key, and every other locker independently holds a battery with
    /// probability `battery_chance`.
    pub fn from_map(map: &Map, rng: &mut impl Rng, battery_chance: f64) -> Self {
        let mut objects = Objects::default();
        let mut notes = 0;

        for (marker, position) in &map.markers {
            let kind = ObjectKind::from(*marker);
            let payload = match kind {
                ObjectKind::Locker => Payload::Locker {
                    open: false,
                    loot: Loot::Empty,
                },
                ObjectKind::Note => {
                    let text = notes % NOTES.len();
                    notes += 1;
                    Payload::Note { text }
                }
                _ => Payload::None,
            };
            objects.spawn(kind, *position, payload);
        }

        objects.assign_loot(rng, battery_chance);
        objects
    }

    fn assign_loot(&mut self, rng: &mut impl Rng, battery_chance: f64) {
        let mut lockers: Vec<usize> = self
            .objects
            .iter()
            .enumerate()
            .filter(|(_, object)| object.kind == ObjectKind::Locker)
            .map(|(index, _)| index)
            .collect();
        lockers.shuffle(rng);

        for (rank, index) in lockers.into_iter().enumerate() {
            let loot = if rank < KEY_LOCKERS {
                Loot::Key
            } else if rng.random_bool(battery_chance) {
                Loot::Battery
            } else {
                Loot::Empty
            };

            let object = &mut self.objects[index];
            trace!(id = ?object.id, ?loot, "Assigned locker loot");
            object.payload = Payload::Locker { open: false, loot };
        }
    }

    pub fn spawn(&mut self, kind: ObjectKind, position: Vec2, payload: Payload) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.push(WorldObject {
            id,
            kind,
            position,
            size: kind.footprint(),
            active: true,
            payload,
            time_to_live: None,
        });
        id
    }

    /// Spawns an object that removes itself after `ticks` ticks.
    pub fn spawn_transient(&mut self, kind: ObjectKind, position: Vec2, ticks: u32) -> ObjectId {
        let id = self.spawn(kind, position, Payload::None);
        if let Some(object) = self.get_mut(id) {
            object.time_to_live = Some(TimeToLive::new(ticks));
        }
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&WorldObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut WorldObject> {
        self.objects.iter_mut().find(|object| object.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorldObject> {
        self.objects.iter()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &WorldObject> {
        self.objects.iter().filter(|object| object.active)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Soft-deletes an object.
    pub fn deactivate(&mut self, id: ObjectId) {
        if let Some(object) = self.get_mut(id) {
            object.active = false;
        }
    }

    /// Advances every transient object's lifetime by one tick and removes the expired ones.
    ///
    /// Returns the number of objects removed.
    pub fn expire_transients(&mut self) -> usize {
        let before = self.objects.len();
        self.objects.retain_mut(|object| match object.time_to_live.as_mut() {
            Some(ttl) if ttl.remaining_ticks <= 1 => false,
            Some(ttl) => {
                ttl.remaining_ticks -= 1;
                true
            }
            None => true,
        });

        let removed = before - self.objects.len();
        if removed > 0 {
            debug!(removed, "Transient objects expired");
        }
        removed
    }
}
