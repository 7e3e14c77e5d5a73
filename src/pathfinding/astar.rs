//! A* pathfinding over the hex map
//!
//! Respects terrain costs; impassable and off-map hexes are never entered.

use ahash::{AHashMap, AHashSet};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::map::{HexCoord, HexMap};
use crate::pathfinding::cost::{CostModel, MoveCost};
use crate::pathfinding::path::Path;

/// Node in the A* open set
#[derive(Debug, Clone, PartialEq, Eq)]
struct PathNode {
    coord: HexCoord,
    f_cost: u32, // g_cost + heuristic
    h_cost: u32,
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap. Ties go to the node closer to the goal,
        // then to the lowest coordinate, so equal-cost routes are reproducible.
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.h_cost.cmp(&self.h_cost))
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Terrain-aware route search
pub struct PathPlanner<'a> {
    map: &'a HexMap,
    costs: &'a CostModel,
}

impl<'a> PathPlanner<'a> {
    pub fn new(map: &'a HexMap, costs: &'a CostModel) -> Self {
        Self { map, costs }
    }

    /// Find the cheapest route from `start` to `goal`
    ///
    /// Returns None if no route exists or `start` is off the map. Never
    /// mutates anything.
    pub fn find_path(&self, start: HexCoord, goal: HexCoord) -> Option<Path> {
        if self.map.get_cell(start).is_none() {
            tracing::debug!(%start, "origin off the map; skipping search");
            return None;
        }

        if !self.costs.hex_cost(self.map, goal).is_passable() {
            tracing::debug!(%goal, "destination impassable; skipping search");
            return None;
        }

        if start == goal {
            return Some(Path::single(start));
        }

        // Safety bound; a finite map with an admissible heuristic never gets here
        let max_iterations = self.map.len() * 2;
        let mut iterations = 0;

        let mut open_set = BinaryHeap::new();
        let mut closed_set: AHashSet<HexCoord> = AHashSet::new();
        let mut came_from: AHashMap<HexCoord, HexCoord> = AHashMap::new();
        let mut g_scores: AHashMap<HexCoord, u32> = AHashMap::new();

        let h = start.distance(&goal);
        g_scores.insert(start, 0);
        open_set.push(PathNode {
            coord: start,
            f_cost: h,
            h_cost: h,
        });

        while let Some(current) = open_set.pop() {
            // Stale duplicate of an already-expanded node
            if !closed_set.insert(current.coord) {
                continue;
            }

            if current.coord == goal {
                let path = reconstruct_path(&came_from, current.coord);
                tracing::debug!(%start, %goal, hexes = path.len(), iterations, "path found");
                return Path::new(path);
            }

            iterations += 1;
            if iterations > max_iterations {
                tracing::warn!(%start, %goal, max_iterations, "A* iteration bound exceeded");
                return None;
            }

            let current_g = g_scores.get(&current.coord).copied().unwrap_or(u32::MAX);

            for neighbor in self.map.neighbors(current.coord) {
                if closed_set.contains(&neighbor) {
                    continue;
                }

                let MoveCost::Turns(move_cost) = self.costs.hex_cost(self.map, neighbor) else {
                    continue;
                };

                let tentative_g = current_g.saturating_add(move_cost);
                let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(u32::MAX);

                if tentative_g < neighbor_g {
                    came_from.insert(neighbor, current.coord);
                    g_scores.insert(neighbor, tentative_g);

                    let h_cost = neighbor.distance(&goal);
                    open_set.push(PathNode {
                        coord: neighbor,
                        f_cost: tentative_g.saturating_add(h_cost),
                        h_cost,
                    });
                }
            }
        }

        tracing::debug!(%start, %goal, iterations, "no path");
        None
    }
}

/// Reconstruct path from came_from map
fn reconstruct_path(came_from: &AHashMap<HexCoord, HexCoord>, mut current: HexCoord) -> Vec<HexCoord> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MovementConfig;
    use crate::map::Terrain;

    fn costs() -> CostModel {
        CostModel::from_config(&MovementConfig::default())
    }

    #[test]
    fn test_pathfind_straight_line() {
        let map = HexMap::new(5, 5);
        let costs = costs();
        let planner = PathPlanner::new(&map, &costs);

        let path = planner.find_path(HexCoord::new(0, 0), HexCoord::new(2, 0)).unwrap();

        assert_eq!(path.len(), 3);
        assert_eq!(costs.path_cost(&map, path.hexes()), MoveCost::Turns(2));
    }

    #[test]
    fn test_pathfind_same_start_goal() {
        let map = HexMap::new(10, 10);
        let costs = costs();
        let start = HexCoord::new(5, 2);

        let path = PathPlanner::new(&map, &costs).find_path(start, start).unwrap();

        assert_eq!(path.hexes(), &[start]);
        assert_eq!(costs.path_cost(&map, path.hexes()), MoveCost::Turns(0));
    }

    #[test]
    fn test_pathfind_from_off_map_origin() {
        let map = HexMap::new(5, 5);
        let costs = costs();
        let planner = PathPlanner::new(&map, &costs);

        assert!(planner.find_path(HexCoord::new(-1, 0), HexCoord::new(1, 0)).is_none());
        assert!(planner.find_path(HexCoord::new(i32::MIN, 0), HexCoord::new(1, 0)).is_none());
        assert!(planner.find_path(HexCoord::new(i32::MAX, i32::MIN), HexCoord::new(1, 0)).is_none());
    }

    #[test]
    fn test_pathfind_impassable_goal() {
        let mut map = HexMap::new(10, 10);
        map.set_terrain(HexCoord::new(3, 0), Terrain::Ocean);
        let costs = costs();

        let path = PathPlanner::new(&map, &costs).find_path(HexCoord::new(0, 0), HexCoord::new(3, 0));
        assert!(path.is_none());
    }

    #[test]
    fn test_pathfind_off_map_goal() {
        let map = HexMap::new(4, 4);
        let costs = costs();
        let path = PathPlanner::new(&map, &costs).find_path(HexCoord::new(0, 0), HexCoord::new(40, 0));
        assert!(path.is_none());
    }

    #[test]
    fn test_pathfind_around_obstacle() {
        let mut map = HexMap::new(10, 10);
        map.set_terrain(HexCoord::new(2, 2), Terrain::Ocean);
        map.set_terrain(HexCoord::new(3, 2), Terrain::Ocean);
        let costs = costs();

        let path = PathPlanner::new(&map, &costs)
            .find_path(HexCoord::new(0, 3), HexCoord::new(5, 1))
            .unwrap();

        assert!(!path.contains(&HexCoord::new(2, 2)));
        assert!(!path.contains(&HexCoord::new(3, 2)));
        assert_eq!(path.origin(), HexCoord::new(0, 3));
        assert_eq!(path.destination(), HexCoord::new(5, 1));
    }

    #[test]
    fn test_pathfind_no_path() {
        let mut map = HexMap::new(10, 10);
        let goal = HexCoord::from_offset(5, 5);
        for neighbor in goal.neighbors() {
            map.set_terrain(neighbor, Terrain::Peaks);
        }
        let costs = costs();

        let path = PathPlanner::new(&map, &costs).find_path(HexCoord::new(0, 0), goal);
        assert!(path.is_none());
    }

    #[test]
    fn test_pathfind_prefers_cheap_detour() {
        // Swamp wall straight ahead costs 3 per hex; going around is cheaper.
        let mut map = HexMap::new(8, 8);
        let start = HexCoord::new(0, 3);
        let goal = HexCoord::new(4, 3);
        for q in 1..4 {
            map.set_terrain(HexCoord::new(q, 3), Terrain::Swamp);
        }
        let costs = costs();

        let path = PathPlanner::new(&map, &costs).find_path(start, goal).unwrap();
        let cost = costs.path_cost(&map, path.hexes()).turns().unwrap();

        // The direct line would be 3 + 3 + 3 + 1 = 10
        assert!(cost < 10, "expected detour, got cost {}", cost);
    }

    #[test]
    fn test_pathfind_is_deterministic() {
        let map = HexMap::new(12, 12);
        let costs = costs();
        let planner = PathPlanner::new(&map, &costs);

        let a = planner.find_path(HexCoord::new(0, 0), HexCoord::new(7, 2));
        let b = planner.find_path(HexCoord::new(0, 0), HexCoord::new(7, 2));
        assert_eq!(a, b);
    }
}
