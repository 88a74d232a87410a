//! World Model queries: solidity, nearest interactable, proximity, and movement resolution.

use glam::Vec2;
use smallvec::SmallVec;

use crate::constants::MapTile;
use crate::map::builder::Map;
use crate::systems::objects::{ObjectId, Objects, WorldObject};

/// Whether a circular footprint at `position` overlaps anything solid.
///
/// Tiles are tested by the footprint's bounding box (anything outside the grid is solid);
/// active solid objects are tested circle against circle.
pub fn is_solid(map: &Map, objects: &Objects, position: Vec2, radius: f32) -> bool {
    if Map::cells_touched(position, radius).any(|cell| map.is_solid_cell(cell)) {
        return true;
    }

    objects
        .iter_active()
        .filter(|object| object.blocks_movement())
        .any(|object| object.position.distance_squared(position) < (object.size + radius).powi(2))
}

/// Whether a footprint at `position` touches an exit tile.
pub fn touches_exit(map: &Map, position: Vec2, radius: f32) -> bool {
    Map::cells_touched(position, radius).any(|cell| map.tile(cell) == MapTile::Exit)
}

/// The closest active interactable object within `max_radius`, if any.
pub fn find_nearest_interactable(objects: &Objects, position: Vec2, max_radius: f32) -> Option<ObjectId> {
    find_nearest_interactable_where(objects, position, max_radius, |_| true)
}

/// Like [`find_nearest_interactable`], but only considers objects accepted by `usable`.
pub fn find_nearest_interactable_where(
    objects: &Objects,
    position: Vec2,
    max_radius: f32,
    usable: impl Fn(&WorldObject) -> bool,
) -> Option<ObjectId> {
    objects
        .iter_active()
        .filter(|object| object.kind.is_interactable() && usable(object))
        .map(|object| (object.id, object.position.distance_squared(position)))
        .filter(|(_, distance)| *distance <= max_radius * max_radius)
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(id, _)| id)
}

/// Every active object within `radius` of `position`.
pub fn entities_near(objects: &Objects, position: Vec2, radius: f32) -> SmallVec<[ObjectId; 8]> {
    objects
        .iter_active()
        .filter(|object| object.position.distance_squared(position) <= radius * radius)
        .map(|object| object.id)
        .collect()
}

/// Outcome of a per-axis move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    pub position: Vec2,
    /// Whether either axis was blocked by an exit tile.
    pub touched_exit: bool,
}

/// Moves along X, then Y, each axis independently blocked by solids.
///
/// Blocking one axis never cancels the other, so the mover slides along walls.
pub fn move_per_axis(map: &Map, objects: &Objects, position: Vec2, delta: Vec2, radius: f32) -> MoveResult {
    let mut result = MoveResult {
        position,
        touched_exit: false,
    };

    for step in [Vec2::new(delta.x, 0.0), Vec2::new(0.0, delta.y)] {
        if step == Vec2::ZERO {
            continue;
        }
        let target = result.position + step;
        if is_solid(map, objects, target, radius) {
            result.touched_exit |= touches_exit(map, target, radius);
        } else {
            result.position = target;
        }
    }

    result
}

/// Attempts the full move, then falls back to sliding along a single axis.
pub fn move_with_slide(map: &Map, objects: &Objects, position: Vec2, delta: Vec2, radius: f32) -> Vec2 {
    let candidates = [delta, Vec2::new(delta.x, 0.0), Vec2::new(0.0, delta.y)];
    candidates
        .into_iter()
        .filter(|step| *step != Vec2::ZERO)
        .map(|step| position + step)
        .find(|target| !is_solid(map, objects, *target, radius))
        .unwrap_or(position)
}
