//! Map construction and tile queries.

use bevy_ecs::resource::Resource;
use glam::{IVec2, UVec2, Vec2};
use tracing::debug;

use crate::constants::{MapTile, Marker, KEY_LOCKERS};
use crate::error::{GameResult, MapError};
use crate::map::parser::{LevelParser, ParsedLevel};

/// The immutable tile grid of a loaded level.
///
/// World coordinates are in tiles: tile `(x, y)` covers `[x, x + 1) × [y, y + 1)`.
/// Every lookup outside the grid reports a wall, so callers never index out of range.
#[derive(Resource, Debug, Clone)]
pub struct Map {
    width: usize,
    height: usize,
    tiles: Vec<MapTile>,
    /// Player start, at the centre of the spawn tile.
    pub spawn: Vec2,
    /// Enemy start, at the centre of the lair tile.
    pub lair: Option<Vec2>,
    /// Object markers in reading order, at tile centres.
    pub markers: Vec<(Marker, Vec2)>,
}

impl Map {
    /// Parses and validates a raw level layout.
    ///
    /// # Errors
    ///
    /// Returns `GameError::LevelParse` for malformed layouts and `GameError::Map` when the
    /// level is unplayable (no exit, or too few lockers to hide the keys in).
    pub fn new<S: AsRef<str>>(rows: &[S]) -> GameResult<Map> {
        let parsed = LevelParser::parse_level(rows)?;
        Ok(Self::from_parsed(parsed)?)
    }

    /// Builds a map from already-parsed level data.
    pub fn from_parsed(parsed: ParsedLevel) -> Result<Map, MapError> {
        if !parsed.tiles.contains(&MapTile::Exit) {
            return Err(MapError::MissingExit);
        }

        let lockers = parsed.markers.iter().filter(|(marker, _)| *marker == Marker::Locker).count();
        if lockers < KEY_LOCKERS {
            return Err(MapError::NotEnoughLockers {
                required: KEY_LOCKERS,
                found: lockers,
            });
        }

        debug!(
            width = parsed.width,
            height = parsed.height,
            markers = parsed.markers.len(),
            "Built map from level layout"
        );

        Ok(Map {
            width: parsed.width,
            height: parsed.height,
            spawn: Self::tile_center(parsed.spawn),
            lair: parsed.lair.map(Self::tile_center),
            markers: parsed
                .markers
                .iter()
                .map(|(marker, position)| (*marker, Self::tile_center(*position)))
                .collect(),
            tiles: parsed.tiles,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The centre of a tile in world coordinates.
    pub fn tile_center(cell: UVec2) -> Vec2 {
        cell.as_vec2() + Vec2::splat(0.5)
    }

    /// The grid cell containing a world position.
    pub fn cell_of(position: Vec2) -> IVec2 {
        position.floor().as_ivec2()
    }

    /// Returns the tile at a grid cell. Cells outside the grid are walls.
    pub fn tile(&self, cell: IVec2) -> MapTile {
        if cell.x < 0 || cell.y < 0 || cell.x as usize >= self.width || cell.y as usize >= self.height {
            return MapTile::Wall;
        }
        self.tiles[cell.y as usize * self.width + cell.x as usize]
    }

    /// Returns the tile under a world position.
    pub fn tile_at(&self, position: Vec2) -> MapTile {
        self.tile(Self::cell_of(position))
    }

    /// Whether the cell blocks movement. Cells outside the grid are always solid.
    pub fn is_solid_cell(&self, cell: IVec2) -> bool {
        self.tile(cell).is_solid()
    }

    /// Iterates every cell whose footprint box `[position - radius, position + radius]` touches.
    pub fn cells_touched(position: Vec2, radius: f32) -> impl Iterator<Item = IVec2> {
        let min = Self::cell_of(position - Vec2::splat(radius));
        let max = Self::cell_of(position + Vec2::splat(radius));
        (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| IVec2::new(x, y)))
    }

    /// Iterates the centres of all walkable tiles.
    pub fn walkable_centers(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.tiles.iter().enumerate().filter_map(|(index, tile)| {
            if tile.is_solid() {
                None
            } else {
                let cell = UVec2::new((index % self.width) as u32, (index / self.width) as u32);
                Some(Self::tile_center(cell))
            }
        })
    }
}
