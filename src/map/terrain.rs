//! Terrain classifications and point-of-interest tags
//!
//! Costs are not stored here: the cost model owns the terrain → cost mapping
//! so that it can come from configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Terrain classification of a single hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    #[default]
    Plains,
    Grassland,
    Road,
    Forest,
    Jungle,
    Hills,
    Mountains,
    Peaks,
    Swamp,
    Desert,
    Badlands,
    Tundra,
    Snow,
    Coast,
    River,
    Lake,
    Ocean,
}

impl Terrain {
    pub const ALL: [Terrain; 17] = [
        Terrain::Plains,
        Terrain::Grassland,
        Terrain::Road,
        Terrain::Forest,
        Terrain::Jungle,
        Terrain::Hills,
        Terrain::Mountains,
        Terrain::Peaks,
        Terrain::Swamp,
        Terrain::Desert,
        Terrain::Badlands,
        Terrain::Tundra,
        Terrain::Snow,
        Terrain::Coast,
        Terrain::River,
        Terrain::Lake,
        Terrain::Ocean,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Terrain::Plains => "plains",
            Terrain::Grassland => "grassland",
            Terrain::Road => "road",
            Terrain::Forest => "forest",
            Terrain::Jungle => "jungle",
            Terrain::Hills => "hills",
            Terrain::Mountains => "mountains",
            Terrain::Peaks => "peaks",
            Terrain::Swamp => "swamp",
            Terrain::Desert => "desert",
            Terrain::Badlands => "badlands",
            Terrain::Tundra => "tundra",
            Terrain::Snow => "snow",
            Terrain::Coast => "coast",
            Terrain::River => "river",
            Terrain::Lake => "lake",
            Terrain::Ocean => "ocean",
        }
    }

    /// Terrain nobody can walk on, used when no cost model is wired
    pub fn default_impassable() -> &'static [Terrain] {
        &[Terrain::Peaks, Terrain::Lake, Terrain::Ocean]
    }

    /// Passable but unpleasant places to start a journey
    pub fn default_harsh() -> &'static [Terrain] {
        &[Terrain::Mountains, Terrain::Swamp, Terrain::Badlands]
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Terrain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Terrain::ALL
            .into_iter()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| format!("unknown terrain '{}'", s))
    }
}

/// What kind of place a point of interest is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiKind {
    Settlement,
    Ruin,
    Landmark,
    Dungeon,
}

/// Named point of interest sitting on a hex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub kind: PoiKind,
    pub name: String,
}

impl PointOfInterest {
    pub fn new(kind: PoiKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
        }
    }

    pub fn settlement(name: &str) -> Self {
        Self::new(PoiKind::Settlement, name)
    }

    pub fn is_settlement(&self) -> bool {
        self.kind == PoiKind::Settlement
    }
}
