use glam::{IVec2, UVec2, Vec2};
use hollow::constants::{MapTile, Marker, RAW_LEVEL};
use hollow::error::{GameError, MapError};
use hollow::map::builder::Map;
use speculoos::prelude::*;

#[test]
fn test_builtin_level_loads() {
    let map = Map::new(&RAW_LEVEL).unwrap();

    assert_that(&map.width()).is_equal_to(24);
    assert_that(&map.height()).is_equal_to(16);
    assert_that(&map.spawn).is_equal_to(Vec2::new(1.5, 1.5));
    assert_that(&map.lair).is_equal_to(Some(Vec2::new(20.5, 13.5)));
    assert_that(&map.tile(IVec2::new(10, 15))).is_equal_to(MapTile::Exit);
}

#[test]
fn test_out_of_bounds_is_wall() {
    let map = Map::new(&RAW_LEVEL).unwrap();

    for cell in [IVec2::new(-1, 3), IVec2::new(3, -1), IVec2::new(24, 3), IVec2::new(3, 16), IVec2::new(999, 999)] {
        assert_that(&map.tile(cell)).is_equal_to(MapTile::Wall);
        assert_that(&map.is_solid_cell(cell)).is_true();
    }
}

#[test]
fn test_tile_lookup_by_position() {
    let map = Map::new(&RAW_LEVEL).unwrap();

    assert_that(&map.tile_at(Vec2::new(2.99, 1.01))).is_equal_to(MapTile::Floor);
    assert_that(&map.tile_at(Vec2::new(1.5, 1.5))).is_equal_to(MapTile::Spawn);
    assert_that(&map.tile_at(Vec2::new(5.5, 3.5))).is_equal_to(MapTile::Obstacle);
    assert_that(&Map::cell_of(Vec2::new(-0.5, 2.0))).is_equal_to(IVec2::new(-1, 2));
    assert_that(&Map::tile_center(UVec2::new(3, 4))).is_equal_to(Vec2::new(3.5, 4.5));
}

#[test]
fn test_markers_are_walkable() {
    let map = Map::new(&RAW_LEVEL).unwrap();

    for (_, position) in &map.markers {
        assert_that(&map.tile_at(*position).is_solid()).is_false();
    }
    let notes = map.markers.iter().filter(|(marker, _)| *marker == Marker::Note).count();
    assert_that(&notes).is_equal_to(3);
}

#[test]
fn test_walkable_centers_skip_solids() {
    let map = Map::new(&["#####E", "#P.LL#", "######"]).unwrap();
    let centers: Vec<Vec2> = map.walkable_centers().collect();

    assert_that(&centers).has_length(4);
    assert_that(&centers).contains(Vec2::new(1.5, 1.5));
    assert_that(&centers).does_not_contain(Vec2::new(5.5, 0.5));
}

#[test]
fn test_cells_touched_by_footprint() {
    let cells: Vec<IVec2> = Map::cells_touched(Vec2::new(2.1, 3.5), 0.2).collect();
    assert_that(&cells).is_equal_to(vec![IVec2::new(1, 3), IVec2::new(2, 3)]);
}

#[test]
fn test_missing_exit() {
    let result = Map::new(&["#####", "#PLL#", "#####"]);
    assert!(matches!(result, Err(GameError::Map(MapError::MissingExit))));
}

#[test]
fn test_not_enough_lockers() {
    let result = Map::new(&["##E##", "#PL.#", "#####"]);
    assert!(matches!(
        result,
        Err(GameError::Map(MapError::NotEnoughLockers { required: 2, found: 1 }))
    ));
}

#[test]
fn test_parse_errors_propagate() {
    let result = Map::new(&["##E##", "#P?L#", "#L###"]);
    assert!(matches!(result, Err(GameError::LevelParse(_))));
}
