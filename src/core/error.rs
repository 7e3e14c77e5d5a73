use thiserror::Error;

use crate::map::{HexCoord, Terrain};

/// Everything that can go wrong when planning or executing a move.
///
/// All variants are recoverable; none of them leaves an agent half-moved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MovementError {
    #[error("No path from {from} to {to}")]
    NoPath { from: HexCoord, to: HexCoord },

    #[error("Hex {coord} is impassable ({terrain})")]
    Impassable { coord: HexCoord, terrain: Terrain },

    #[error("Hex {0} is not on the map")]
    OffGrid(HexCoord),

    #[error("Already at {0}")]
    AlreadyThere(HexCoord),

    #[error("Agent is already moving")]
    AlreadyMoving,

    #[error("Path of {0} hexes is too short to walk")]
    PathTooShort(usize),

    #[error("Not initialized: {0} was never wired")]
    NotInitialized(&'static str),

    #[error("No valid spawn location found")]
    NotFound,

    #[error("No preview is pending")]
    NotPreviewing,

    #[error("Movement is not suspended")]
    NotSuspended,

    #[error("Resume token {got:?} does not match the current suspension {expected:?}")]
    StaleResume {
        expected: crate::movement::ResumeToken,
        got: crate::movement::ResumeToken,
    },
}

impl MovementError {
    /// Stable machine-readable reason tag
    pub fn reason(&self) -> &'static str {
        match self {
            MovementError::NoPath { .. } => "no_path",
            MovementError::Impassable { .. } => "impassable",
            MovementError::OffGrid(_) => "off_grid",
            MovementError::AlreadyThere(_) => "already_there",
            MovementError::AlreadyMoving => "already_moving",
            MovementError::PathTooShort(_) => "path_too_short",
            MovementError::NotInitialized(_) => "not_initialized",
            MovementError::NotFound => "not_found",
            MovementError::NotPreviewing => "not_previewing",
            MovementError::NotSuspended => "not_suspended",
            MovementError::StaleResume { .. } => "stale_resume",
        }
    }
}

/// Errors from loading configuration or map files
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, MovementError>;
