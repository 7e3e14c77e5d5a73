//! Route preview before committing to a move
//!
//! A preview holds one pending (path, cost, destination) and owns the map
//! highlight while it exists. Requesting the destination that is already
//! being previewed confirms it.

use serde::Serialize;

use crate::core::error::{MovementError, Result};
use crate::map::{HexCoord, HexMap};
use crate::movement::executor::{MoveStarted, MovementExecutor};
use crate::pathfinding::{CostModel, CostStep, MoveCost, Path, PathPlanner};

/// Pending route awaiting confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewState {
    pub path: Path,
    pub destination: HexCoord,
    pub cost: u32,
}

/// What a caller sees about a previewed route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewResult {
    pub destination: HexCoord,
    pub path: Path,
    pub total_cost: u32,
    pub breakdown: Vec<CostStep>,
}

/// Outcome of `request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A new route is now pending
    Previewed(PreviewResult),
    /// The destination was already pending, so the move started
    Started(MoveStarted),
}

#[derive(Debug, Default)]
pub struct PreviewSession {
    pending: Option<PreviewState>,
    searches: u64,
}

impl PreviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_previewing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PreviewState> {
        self.pending.as_ref()
    }

    /// How many route searches this session has run
    pub fn searches(&self) -> u64 {
        self.searches
    }

    /// Preview a route from `origin` to `destination`, or confirm it if that
    /// destination is already pending. On failure any existing preview is
    /// left untouched.
    pub fn request(
        &mut self,
        destination: HexCoord,
        origin: HexCoord,
        map: &mut HexMap,
        costs: &CostModel,
        executor: &mut MovementExecutor,
    ) -> Result<RequestOutcome> {
        if self.pending.as_ref().is_some_and(|p| p.destination == destination) {
            return self.confirm(map, executor).map(RequestOutcome::Started);
        }

        if !executor.is_idle() {
            return Err(MovementError::AlreadyMoving);
        }

        if !map.in_bounds(origin) {
            return Err(MovementError::OffGrid(origin));
        }

        let terrain = map.terrain_at(destination).ok_or(MovementError::OffGrid(destination))?;
        if !costs.is_passable(terrain) {
            return Err(MovementError::Impassable {
                coord: destination,
                terrain,
            });
        }

        if destination == origin {
            return Err(MovementError::AlreadyThere(origin));
        }

        self.searches += 1;
        let path = PathPlanner::new(map, costs)
            .find_path(origin, destination)
            .ok_or(MovementError::NoPath {
                from: origin,
                to: destination,
            })?;

        let breakdown = costs.breakdown(map, path.hexes());
        let total_cost = match breakdown.last().map(|step| step.cumulative) {
            Some(MoveCost::Turns(total)) => total,
            _ => return Err(first_blocked(&breakdown, destination)),
        };

        map.highlight_path(path.hexes());
        tracing::info!(%origin, %destination, hexes = path.len(), cost = total_cost, "route previewed");

        self.pending = Some(PreviewState {
            path: path.clone(),
            destination,
            cost: total_cost,
        });

        Ok(RequestOutcome::Previewed(PreviewResult {
            destination,
            path,
            total_cost,
            breakdown,
        }))
    }

    /// Hand the pending route to the executor. The highlight is cleared
    /// before the executor starts so the two never hold it together.
    pub fn confirm(&mut self, map: &mut HexMap, executor: &mut MovementExecutor) -> Result<MoveStarted> {
        if !executor.is_idle() {
            return Err(MovementError::AlreadyMoving);
        }
        let pending = self.pending.take().ok_or(MovementError::NotPreviewing)?;

        map.clear_highlight();
        tracing::info!(destination = %pending.destination, "route confirmed");
        executor.start(pending.path, pending.cost)
    }

    /// Drop any pending route. Idempotent.
    pub fn cancel(&mut self, map: &mut HexMap) {
        if self.pending.take().is_some() {
            tracing::debug!("preview cancelled");
        }
        map.clear_highlight();
    }
}

/// Error for the first hex on a route that cannot be entered
fn first_blocked(breakdown: &[CostStep], fallback: HexCoord) -> MovementError {
    breakdown
        .iter()
        .skip(1)
        .find(|step| !step.cost.is_passable())
        .map_or(MovementError::OffGrid(fallback), |step| match step.terrain {
            Some(terrain) => MovementError::Impassable {
                coord: step.coord,
                terrain,
            },
            None => MovementError::OffGrid(step.coord),
        })
}
