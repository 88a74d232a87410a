use glam::UVec2;
use hollow::constants::{MapTile, Marker, RAW_LEVEL};
use hollow::error::ParseError;
use hollow::map::parser::LevelParser;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

#[test]
fn test_parse_character() {
    let test_cases = [
        ('#', MapTile::Wall),
        ('.', MapTile::Floor),
        ('O', MapTile::Obstacle),
        ('E', MapTile::Exit),
        ('P', MapTile::Spawn),
        ('G', MapTile::Lair),
        ('K', MapTile::Marker(Marker::Key)),
        ('L', MapTile::Marker(Marker::Locker)),
        ('N', MapTile::Marker(Marker::Note)),
        ('B', MapTile::Marker(Marker::Bed)),
        ('C', MapTile::Marker(Marker::Car)),
        ('W', MapTile::Marker(Marker::Weapon)),
    ];

    for (character, expected) in test_cases {
        assert_that(&LevelParser::parse_character(character)).is_equal_to(Some(expected));
    }

    assert_that(&LevelParser::parse_character('Z')).is_none();
}

#[test]
fn test_parse_raw_level() {
    let parsed = LevelParser::parse_level(&RAW_LEVEL).unwrap();

    assert_that(&parsed.width).is_equal_to(24);
    assert_that(&parsed.height).is_equal_to(16);
    assert_that(&parsed.tiles.len()).is_equal_to(24 * 16);
    assert_that(&parsed.spawn).is_equal_to(UVec2::new(1, 1));
    assert_that(&parsed.lair).is_equal_to(Some(UVec2::new(20, 13)));

    let lockers = parsed.markers.iter().filter(|(marker, _)| *marker == Marker::Locker).count();
    assert_that(&lockers).is_equal_to(5);
}

#[test]
fn test_markers_in_reading_order() {
    let parsed = LevelParser::parse_level(&["#P.N#", "#N.L#", "#L.E#"]).unwrap();
    assert_eq!(
        parsed.markers,
        vec![
            (Marker::Note, UVec2::new(3, 0)),
            (Marker::Note, UVec2::new(1, 1)),
            (Marker::Locker, UVec2::new(3, 1)),
            (Marker::Locker, UVec2::new(1, 2)),
        ]
    );
}

#[test]
fn test_parse_unknown_character() {
    let result = LevelParser::parse_level(&["#P#", "#?#"]);
    assert_that(&result.unwrap_err()).is_equal_to(ParseError::UnknownCharacter {
        character: '?',
        x: 1,
        y: 1,
    });
}

#[test]
fn test_parse_ragged_rows() {
    let result = LevelParser::parse_level(&["#P#", "#.##"]);
    assert_that(&result.unwrap_err()).is_equal_to(ParseError::RaggedRow {
        line: 1,
        expected: 3,
        actual: 4,
    });
}

#[test]
fn test_parse_empty() {
    let rows: [&str; 0] = [];
    assert_that(&LevelParser::parse_level(&rows).unwrap_err()).is_equal_to(ParseError::Empty);
    assert_that(&LevelParser::parse_level(&[""]).unwrap_err()).is_equal_to(ParseError::Empty);
}

#[test]
fn test_parse_spawn_count() {
    assert_that(&LevelParser::parse_level(&["#.#"]).unwrap_err()).is_equal_to(ParseError::InvalidSpawnCount(0));
    assert_that(&LevelParser::parse_level(&["PP#"]).unwrap_err()).is_equal_to(ParseError::InvalidSpawnCount(2));
}

#[test]
fn test_parse_lair_count() {
    assert_that(&LevelParser::parse_level(&["PGG"]).unwrap_err()).is_equal_to(ParseError::InvalidLairCount(2));
    assert_that(&LevelParser::parse_level(&["P.."]).unwrap().lair).is_none();
}
