//! Hex map layer - coordinates, terrain, and the grid the movement core reads
//!
//! The map is the only state movement touches outside the agent itself, and
//! it only ever touches the preview highlight.

pub mod grid;
pub mod hex;
pub mod loader;
pub mod terrain;

pub use grid::{HexMap, TerrainCell};
pub use hex::{HexCoord, HexDirection};
pub use loader::MapFile;
pub use terrain::{PoiKind, PointOfInterest, Terrain};
