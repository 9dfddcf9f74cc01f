use thiserror::Error;

use crate::core::types::{Location, PlayerId};

#[derive(Error, Debug)]
pub enum EaterError {
    #[error("No move available for player {player} this tick")]
    MoveUnavailable { player: PlayerId },

    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Duplicate player id: {0}")]
    DuplicatePlayer(PlayerId),

    #[error("Location {location:?} is outside the {width}x{height} map")]
    OutOfBounds {
        location: Location,
        width: i32,
        height: i32,
    },

    #[error("Invalid move: {0}")]
    InvalidMove(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EaterError>;
