//! Starting-hex selection
//!
//! Three tiers, each returning on its first valid hex:
//! 1. settlements (and their neighbours), in shuffled order
//! 2. concentric rings around the map centre, each ring shuffled
//! 3. a uniform pick from every valid hex on the map

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::config::MovementConfig;
use crate::core::error::{MovementError, Result};
use crate::map::{HexCoord, HexMap, Terrain};
use crate::pathfinding::CostModel;

pub struct SpawnLocator<'a> {
    map: &'a HexMap,
    costs: Option<&'a CostModel>,
    prefer_towns: bool,
    harsh: &'a [Terrain],
    ring_radius: u32,
}

impl<'a> SpawnLocator<'a> {
    /// Locator using only the built-in impassable set until a cost model is
    /// attached with [`with_costs`](Self::with_costs)
    pub fn new(map: &'a HexMap, config: &'a MovementConfig) -> Self {
        Self {
            map,
            costs: None,
            prefer_towns: config.prefer_towns,
            harsh: &config.harsh_terrain,
            ring_radius: config.spawn_ring_radius,
        }
    }

    pub fn with_costs(mut self, costs: &'a CostModel) -> Self {
        self.costs = Some(costs);
        self
    }

    pub fn is_valid(&self, coord: HexCoord) -> bool {
        let Some(cell) = self.map.get_cell(coord) else {
            return false;
        };

        let passable = match self.costs {
            Some(costs) => costs.is_passable(cell.terrain),
            None => !Terrain::default_impassable().contains(&cell.terrain),
        };
        if !passable {
            return false;
        }

        !(self.prefer_towns && !cell.is_settlement() && self.harsh.contains(&cell.terrain))
    }

    pub fn find_spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<HexCoord> {
        let found = if self.prefer_towns {
            self.near_settlement(rng).map(|hex| (hex, "settlement"))
        } else {
            None
        };

        let found = found
            .or_else(|| self.around_center(rng).map(|hex| (hex, "center ring")))
            .or_else(|| self.anywhere(rng).map(|hex| (hex, "exhaustive")));

        match found {
            Some((hex, tier)) => {
                tracing::info!(%hex, tier, "spawn location found");
                Ok(hex)
            }
            None => {
                tracing::warn!(width = self.map.width, height = self.map.height, "no valid spawn location");
                Err(MovementError::NotFound)
            }
        }
    }

    fn near_settlement<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<HexCoord> {
        let mut settlements = self.map.settlements();
        settlements.shuffle(rng);

        for town in settlements {
            if self.is_valid(town) {
                return Some(town);
            }
            let mut around = self.map.neighbors(town);
            around.shuffle(rng);
            if let Some(hex) = around.into_iter().find(|&hex| self.is_valid(hex)) {
                return Some(hex);
            }
        }
        None
    }

    fn around_center<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<HexCoord> {
        let center = self.map.center();
        for radius in 0..=self.ring_radius {
            let mut ring = self.map.ring(center, radius);
            ring.shuffle(rng);
            if let Some(hex) = ring.into_iter().find(|&hex| self.is_valid(hex)) {
                return Some(hex);
            }
        }
        None
    }

    fn anywhere<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<HexCoord> {
        let valid: Vec<HexCoord> = self
            .map
            .coords()
            .into_iter()
            .filter(|&hex| self.is_valid(hex))
            .collect();
        valid.choose(rng).copied()
    }
}
