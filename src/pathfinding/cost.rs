//! Terrain movement costs
//!
//! Maps terrain to an integer turn cost or `Impassable`. The impassable set
//! always wins over the cost table; terrain missing from the table costs 1.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::config::MovementConfig;
use crate::map::{HexCoord, HexMap, Terrain};

/// Cost of entering a hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveCost {
    Turns(u32),
    Impassable,
}

impl MoveCost {
    pub fn turns(&self) -> Option<u32> {
        match self {
            MoveCost::Turns(t) => Some(*t),
            MoveCost::Impassable => None,
        }
    }

    pub fn is_passable(&self) -> bool {
        matches!(self, MoveCost::Turns(_))
    }
}

/// Impassable absorbs everything it is added to
impl std::ops::Add for MoveCost {
    type Output = MoveCost;

    fn add(self, other: MoveCost) -> MoveCost {
        match (self, other) {
            (MoveCost::Turns(a), MoveCost::Turns(b)) => MoveCost::Turns(a.saturating_add(b)),
            _ => MoveCost::Impassable,
        }
    }
}

impl fmt::Display for MoveCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveCost::Turns(t) => write!(f, "{}", t),
            MoveCost::Impassable => f.write_str("impassable"),
        }
    }
}

/// One row of a path cost breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostStep {
    pub coord: HexCoord,
    /// `None` when the hex is not on the map
    pub terrain: Option<Terrain>,
    /// Zero for the origin
    pub cost: MoveCost,
    pub cumulative: MoveCost,
}

/// Terrain → movement cost lookup
#[derive(Debug, Clone, Default)]
pub struct CostModel {
    table: BTreeMap<Terrain, MoveCost>,
    impassable: Vec<Terrain>,
}

impl CostModel {
    pub fn new(table: BTreeMap<Terrain, MoveCost>, impassable: Vec<Terrain>) -> Self {
        Self { table, impassable }
    }

    pub fn from_config(config: &MovementConfig) -> Self {
        Self::new(config.costs.clone(), config.impassable.clone())
    }

    /// Every terrain costs 1 except the listed impassable ones
    pub fn uniform(impassable: &[Terrain]) -> Self {
        Self::new(BTreeMap::new(), impassable.to_vec())
    }

    pub fn cost(&self, terrain: Terrain) -> MoveCost {
        if self.impassable.contains(&terrain) {
            return MoveCost::Impassable;
        }
        self.table.get(&terrain).copied().unwrap_or(MoveCost::Turns(1))
    }

    pub fn is_passable(&self, terrain: Terrain) -> bool {
        self.cost(terrain).is_passable()
    }

    /// Cost of entering a map hex; off-map hexes are impassable
    pub fn hex_cost(&self, map: &HexMap, coord: HexCoord) -> MoveCost {
        map.terrain_at(coord)
            .map_or(MoveCost::Impassable, |terrain| self.cost(terrain))
    }

    /// Total cost of walking a path. The first hex is where the agent
    /// already stands and costs nothing.
    pub fn path_cost(&self, map: &HexMap, path: &[HexCoord]) -> MoveCost {
        let mut total = MoveCost::Turns(0);
        for &coord in path.iter().skip(1) {
            total = total + self.hex_cost(map, coord);
            if !total.is_passable() {
                return MoveCost::Impassable;
            }
        }
        total
    }

    /// Per-hex breakdown including the origin
    pub fn breakdown(&self, map: &HexMap, path: &[HexCoord]) -> Vec<CostStep> {
        let mut cumulative = MoveCost::Turns(0);
        path.iter()
            .enumerate()
            .map(|(i, &coord)| {
                let cost = if i == 0 {
                    MoveCost::Turns(0)
                } else {
                    self.hex_cost(map, coord)
                };
                cumulative = cumulative + cost;
                CostStep {
                    coord,
                    terrain: map.terrain_at(coord),
                    cost,
                    cumulative,
                }
            })
            .collect()
    }
}
