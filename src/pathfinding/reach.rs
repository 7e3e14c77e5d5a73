//! Budgeted reachability
//!
//! Plain FIFO frontier expansion: a hex's cumulative cost is fixed the first
//! time it is discovered and never revised. On uniform terrain this is exact.
//! On mixed terrain it can miss hexes that are only within budget through a
//! route discovered after a more expensive one; that is the expected
//! behavior, not a Dijkstra frontier.

use ahash::{AHashMap, AHashSet};
use std::collections::VecDeque;

use crate::map::{HexCoord, HexMap};
use crate::pathfinding::cost::{CostModel, MoveCost};

pub struct ReachabilitySolver<'a> {
    map: &'a HexMap,
    costs: &'a CostModel,
}

impl<'a> ReachabilitySolver<'a> {
    pub fn new(map: &'a HexMap, costs: &'a CostModel) -> Self {
        Self { map, costs }
    }

    /// Hexes reachable from `origin` without exceeding `budget` turns.
    /// The origin itself is never included, and an off-map origin reaches nothing.
    pub fn reachable(&self, origin: HexCoord, budget: u32) -> AHashSet<HexCoord> {
        if !self.map.in_bounds(origin) {
            return AHashSet::new();
        }

        let mut discovered: AHashMap<HexCoord, u32> = AHashMap::new();
        let mut queue = VecDeque::new();

        discovered.insert(origin, 0);
        queue.push_back(origin);

        while let Some(current) = queue.pop_front() {
            let current_cost = discovered.get(&current).copied().unwrap_or_default();

            for neighbor in self.map.neighbors(current) {
                if discovered.contains_key(&neighbor) {
                    continue;
                }

                let MoveCost::Turns(step) = self.costs.hex_cost(self.map, neighbor) else {
                    continue;
                };

                let total = current_cost.saturating_add(step);
                if total <= budget {
                    discovered.insert(neighbor, total);
                    queue.push_back(neighbor);
                }
            }
        }

        discovered.remove(&origin);
        tracing::debug!(%origin, budget, reachable = discovered.len(), "reachability computed");
        discovered.into_iter().map(|(coord, _)| coord).collect()
    }
}
