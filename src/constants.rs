//! This module contains all the constants used in the game.

use std::time::Duration;

use glam::UVec2;
use strum_macros::{Display, EnumIter};

pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// The size of the render surface, in pixels.
pub const CANVAS_SIZE: UVec2 = UVec2::new(1280, 720);

/// Number of rays cast per frame (one per screen column strip).
pub const DEFAULT_RAY_COUNT: usize = 320;

/// Number of lockers that always receive a key when a level is loaded.
pub const KEY_LOCKERS: usize = 2;

/// An enum representing the different types of tiles on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapTile {
    /// Walkable floor.
    Floor,
    /// A solid wall.
    Wall,
    /// Solid furniture or debris occupying a whole tile.
    Obstacle,
    /// The exit door; solid until the player has enough keys.
    Exit,
    /// The player's starting position.
    Spawn,
    /// The enemy's starting position.
    Lair,
    /// A walkable tile that spawns an object when the level loads.
    Marker(Marker),
}

impl MapTile {
    /// Whether the tile blocks movement and stops rays.
    pub fn is_solid(self) -> bool {
        matches!(self, MapTile::Wall | MapTile::Obstacle | MapTile::Exit)
    }
}

/// Decorative markers placed in the layout, each spawning one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Marker {
    Key,
    Locker,
    Note,
    Bed,
    Car,
    Weapon,
}

/// The raw layout of the built-in level, one character per tile.
///
/// `#` wall, `.` floor, `O` obstacle, `E` exit door, `P` player spawn, `G` enemy lair,
/// `K` key, `L` locker, `N` note, `B` bed, `C` car, `W` weapon.
pub const RAW_LEVEL: [&str; 16] = [
    "########################",
    "#P...#......L#....N....#",
    "#....#.......#.........#",
    "#....O...B...#...O.....#",
    "#.............L........#",
    "######.####.######.#####",
    "#....#.....N.....#.....#",
    "#.L..#...........#..C..#",
    "#....#...OO......#.....#",
    "#.........OO...........#",
    "#.N..#...........#.....#",
    "#....#####.#######..L..#",
    "#B.........W...........#",
    "#..L.#.......K...#..G..#",
    "#....#...........#.....#",
    "##########E#############",
];

/// Note texts, handed out to note markers in reading order (wrapping around).
pub const NOTES: [&str; 4] = [
    "Day 3. The power keeps dropping at night. Something walks the halls when it does.",
    "It doesn't like the light. If you see it, keep the beam on it. Don't look away.",
    "Two keys. I hid them in the lockers before it found me. The door won't open without both.",
    "The car still has a working torch in the glovebox. Don't let the battery die.",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_time() {
        // 60 FPS = 16.67ms per frame
        let expected_nanos = (1_000_000_000.0 / 60.0) as u64;
        assert_eq!(LOOP_TIME.as_nanos() as u64, expected_nanos);
    }

    #[test]
    fn test_canvas_size() {
        assert_eq!(CANVAS_SIZE.x, 1280);
        assert_eq!(CANVAS_SIZE.y, 720);
    }

    #[test]
    fn test_map_tile_solidity() {
        assert!(MapTile::Wall.is_solid());
        assert!(MapTile::Obstacle.is_solid());
        assert!(MapTile::Exit.is_solid());
        assert!(!MapTile::Floor.is_solid());
        assert!(!MapTile::Spawn.is_solid());
        assert!(!MapTile::Marker(Marker::Locker).is_solid());
    }

    #[test]
    fn test_raw_level_is_rectangular() {
        let width = RAW_LEVEL[0].len();
        for row in RAW_LEVEL.iter() {
            assert_eq!(row.len(), width);
        }
    }

    #[test]
    fn test_raw_level_boundaries() {
        assert!(RAW_LEVEL[0].chars().all(|c| c == '#'));
        assert!(RAW_LEVEL[RAW_LEVEL.len() - 1].chars().all(|c| c == '#' || c == 'E'));
        for row in RAW_LEVEL.iter() {
            assert_eq!(row.chars().next().unwrap(), '#');
            assert_eq!(row.chars().last().unwrap(), '#');
        }
    }

    #[test]
    fn test_raw_level_has_enough_lockers() {
        let lockers: usize = RAW_LEVEL.iter().map(|row| row.matches('L').count()).sum();
        assert!(lockers >= KEY_LOCKERS);
    }

    #[test]
    fn test_raw_level_single_spawn() {
        let spawns: usize = RAW_LEVEL.iter().map(|row| row.matches('P').count()).sum();
        assert_eq!(spawns, 1);
    }
}
