//! Centralized error types for the game.
//!
//! Steady-state simulation never fails; these errors cover loading a level, reading
//! configuration, and bringing up the desktop frontend.

/// Main error type for the game.
///
/// This is the primary error type that should be used in public APIs.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Level parsing error: {0}")]
    LevelParse(#[from] ParseError),

    #[error("Map error: {0}")]
    Map(#[from] MapError),

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("SDL error: {0}")]
    Sdl(String),

    #[error("Platform error: {0}")]
    Platform(String),
}

/// Error type for level parsing operations.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown character in level at ({x}, {y}): {character:?}")]
    UnknownCharacter { character: char, x: usize, y: usize },
    #[error("Level is empty")]
    Empty,
    #[error("Invalid level width at line {line}: expected {expected}, got {actual}")]
    RaggedRow { line: usize, expected: usize, actual: usize },
    #[error("Level must have exactly 1 player spawn, found {0}")]
    InvalidSpawnCount(usize),
    #[error("Level must have at most 1 enemy lair, found {0}")]
    InvalidLairCount(usize),
}

/// Errors related to building a playable map from parsed data.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MapError {
    #[error("Level has no exit door")]
    MissingExit,

    #[error("Level needs at least {required} lockers for key placement, found {found}")]
    NotEnoughLockers { required: usize, found: usize },
}

/// Errors related to texture loading.
#[derive(thiserror::Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture {name}: {source}")]
    LoadFailed {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid texture dimensions: {width}x{height} with {len} pixels")]
    InvalidDimensions { width: u32, height: u32, len: usize },
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
