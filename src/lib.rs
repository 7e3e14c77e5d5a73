//! Hex Travel - terrain-aware route planning and interruptible movement on a hex grid

pub mod core;
pub mod map;
pub mod movement;
pub mod pathfinding;
pub mod spawn;

pub use crate::core::{ConfigError, MovementConfig, MovementError};
pub use crate::map::{HexCoord, HexMap, Terrain};
pub use crate::spawn::SpawnLocator;
