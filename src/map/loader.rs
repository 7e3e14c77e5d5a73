//! Map construction: TOML map files and seeded generation

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use std::path::Path;

use crate::core::error::ConfigError;
use crate::map::grid::HexMap;
use crate::map::hex::HexCoord;
use crate::map::terrain::{PoiKind, PointOfInterest, Terrain};

/// TOML representation of a map file
///
/// ```toml
/// width = 12
/// height = 10
/// default_terrain = "plains"
///
/// [[cells]]
/// q = 3
/// r = 2
/// terrain = "forest"
///
/// [[points]]
/// q = 5
/// r = 4
/// kind = "settlement"
/// name = "Millbrook"
/// ```
///
/// Terrain names are kept as strings until the map is built. Unknown names
/// are logged and treated as the default terrain.
#[derive(Debug, Deserialize)]
pub struct MapFile {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub default_terrain: Option<String>,
    #[serde(default)]
    pub cells: Vec<CellEntry>,
    #[serde(default)]
    pub points: Vec<PointEntry>,
}

#[derive(Debug, Deserialize)]
pub struct CellEntry {
    pub q: i32,
    pub r: i32,
    pub terrain: String,
}

#[derive(Debug, Deserialize)]
pub struct PointEntry {
    pub q: i32,
    pub r: i32,
    pub kind: PoiKind,
    pub name: String,
}

impl MapFile {
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Build the map, rejecting overrides that fall outside the grid
    pub fn into_map(self) -> Result<HexMap, ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid("map must be at least 1x1".into()));
        }

        let default_terrain = self
            .default_terrain
            .as_deref()
            .and_then(|name| known_terrain(name, Terrain::default()))
            .unwrap_or_default();
        let mut map = HexMap::filled(self.width, self.height, default_terrain);

        for cell in self.cells {
            let coord = HexCoord::new(cell.q, cell.r);
            if !map.in_bounds(coord) {
                return Err(ConfigError::Invalid(format!("cell {} is off the map", coord)));
            }
            if let Some(terrain) = known_terrain(&cell.terrain, default_terrain) {
                map.set_terrain(coord, terrain);
            }
        }

        for point in self.points {
            let coord = HexCoord::new(point.q, point.r);
            if !map.in_bounds(coord) {
                return Err(ConfigError::Invalid(format!(
                    "point of interest '{}' at {} is off the map",
                    point.name, coord
                )));
            }
            map.set_point_of_interest(coord, PointOfInterest::new(point.kind, &point.name));
        }

        Ok(map)
    }
}

fn known_terrain(name: &str, fallback: Terrain) -> Option<Terrain> {
    match name.parse::<Terrain>() {
        Ok(terrain) => Some(terrain),
        Err(_) => {
            tracing::warn!(name, %fallback, "unknown terrain in map file; using default terrain");
            None
        }
    }
}

impl HexMap {
    /// Load a map from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        MapFile::parse_toml(&content)?.into_map()
    }

    /// Generate a map with varied terrain and a handful of settlements
    pub fn generate(width: u32, height: u32, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut map = HexMap::new(width, height);

        for coord in map.coords() {
            let terrain = match rng.gen_range(0..20) {
                0..=6 => Terrain::Plains,
                7..=8 => Terrain::Grassland,
                9..=11 => Terrain::Forest,
                12..=13 => Terrain::Hills,
                14 => Terrain::Mountains,
                15 => Terrain::Swamp,
                16 => Terrain::Desert,
                17 => Terrain::Badlands,
                18 => Terrain::Lake,
                _ => Terrain::Peaks,
            };
            map.set_terrain(coord, terrain);
        }

        let mut candidates: Vec<HexCoord> = map
            .coords()
            .into_iter()
            .filter(|c| matches!(map.terrain_at(*c), Some(Terrain::Plains | Terrain::Grassland)))
            .collect();
        candidates.shuffle(&mut rng);

        let settlement_count = (HexMap::area(width, height) / 40).max(1);
        for (i, coord) in candidates.into_iter().take(settlement_count).enumerate() {
            let name = format!("{} {}", SETTLEMENT_NAMES[i % SETTLEMENT_NAMES.len()], i + 1);
            map.set_point_of_interest(coord, PointOfInterest::settlement(&name));
        }

        tracing::debug!(width, height, seed, "generated map");
        map
    }
}

const SETTLEMENT_NAMES: [&str; 6] = ["Ashford", "Millbrook", "Stonewatch", "Fairhollow", "Redmere", "Oakvale"];
