//! Level parsing functionality for converting raw ASCII layouts into structured data.

use glam::UVec2;

use crate::constants::{MapTile, Marker};
use crate::error::ParseError;

/// Structured representation of a parsed ASCII level with extracted special positions.
///
/// Tiles are stored row-major. Markers are collected in reading order so that
/// objects (and their note texts) are assigned deterministically.
#[derive(Debug, Clone)]
pub struct ParsedLevel {
    pub width: usize,
    pub height: usize,
    /// Row-major tiles converted from ASCII characters
    pub tiles: Vec<MapTile>,
    /// Starting tile for the player ('P')
    pub spawn: UVec2,
    /// Starting tile for the enemy ('G'), if the level places one
    pub lair: Option<UVec2>,
    /// Object markers in reading order
    pub markers: Vec<(Marker, UVec2)>,
}

/// Parser for converting raw level layouts into structured data.
pub struct LevelParser;

impl LevelParser {
    /// Converts one layout character into its tile, or `None` if the character is unknown.
    pub fn parse_character(c: char) -> Option<MapTile> {
        match c {
            '#' => Some(MapTile::Wall),
            '.' => Some(MapTile::Floor),
            'O' => Some(MapTile::Obstacle),
            'E' => Some(MapTile::Exit),
            'P' => Some(MapTile::Spawn),
            'G' => Some(MapTile::Lair),
            'K' => Some(MapTile::Marker(Marker::Key)),
            'L' => Some(MapTile::Marker(Marker::Locker)),
            'N' => Some(MapTile::Marker(Marker::Note)),
            'B' => Some(MapTile::Marker(Marker::Bed)),
            'C' => Some(MapTile::Marker(Marker::Car)),
            'W' => Some(MapTile::Marker(Marker::Weapon)),
            _ => None,
        }
    }

    /// Parses a raw level layout into structured data.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is empty or ragged, contains unknown characters,
    /// or does not have exactly one player spawn and at most one enemy lair.
    pub fn parse_level<S: AsRef<str>>(rows: &[S]) -> Result<ParsedLevel, ParseError> {
        let height = rows.len();
        let width = rows.first().map(|row| row.as_ref().chars().count()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(ParseError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * height);
        let mut spawns = Vec::new();
        let mut lairs = Vec::new();
        let mut markers = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let actual = row.chars().count();
            if actual != width {
                return Err(ParseError::RaggedRow {
                    line: y,
                    expected: width,
                    actual,
                });
            }

            for (x, character) in row.chars().enumerate() {
                let tile = Self::parse_character(character).ok_or(ParseError::UnknownCharacter { character, x, y })?;
                let position = UVec2::new(x as u32, y as u32);

                match tile {
                    MapTile::Spawn => spawns.push(position),
                    MapTile::Lair => lairs.push(position),
                    MapTile::Marker(marker) => markers.push((marker, position)),
                    _ => {}
                }

                tiles.push(tile);
            }
        }

        if spawns.len() != 1 {
            return Err(ParseError::InvalidSpawnCount(spawns.len()));
        }
        if lairs.len() > 1 {
            return Err(ParseError::InvalidLairCount(lairs.len()));
        }

        Ok(ParsedLevel {
            width,
            height,
            tiles,
            spawn: spawns[0],
            lair: lairs.first().copied(),
            markers,
        })
    }
}
